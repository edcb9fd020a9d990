//! Selection-set synthesis.
//!
//! Produces the field selection a client sends to request "everything safe to
//! request" on a type: fields are sorted by name, fields needing arguments are
//! left out of queries, composite fields recurse up to a depth bound and the
//! possible types of interfaces and unions are selected through inline
//! fragments in the order the schema declares them. Nested lines are indented
//! with one tab per level.

use crate::{Field, Result, Schema, SchemaError, Type, TypeKind, TYPENAME_FIELD};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Default limit on nested composite fields.
pub const DEFAULT_MAX_DEPTH: usize = 2;

const INDENT: &str = "\t";

/// The kind of operation a selection set is embedded in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    #[default]
    Query,
    Mutation,
}

impl OperationKind {
    /// Conventional name of the root type when the schema does not declare one.
    #[must_use]
    pub const fn default_root_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Mutation => write!(f, "mutation"),
        }
    }
}

/// Inputs that shape a synthesized selection set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOptions {
    /// Nested composite fields deeper than this are omitted.
    pub max_depth: usize,
    pub operation: OperationKind,
    /// Field names never selected, on any type.
    pub exclude_fields: BTreeSet<String>,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl SelectionOptions {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            operation: OperationKind::Query,
            exclude_fields: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_operation(mut self, operation: OperationKind) -> Self {
        self.operation = operation;
        self
    }

    #[must_use]
    pub fn with_excluded_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    fn skips(&self, ty: &Type, field: &Field) -> bool {
        self.exclude_fields.contains(&field.name) || ty.skips_field(&field.name)
    }
}

/// Synthesizes the selection set of `ty`, starting at depth zero.
///
/// An empty string means no field of the type can be selected.
///
/// Union-typed fields are expanded like interface fields: a nested block
/// holding `__typename` and one inline fragment per member, never a bare
/// field name.
///
/// ```
/// # use graphql_schema::{selection_set, Field, Schema, SelectionOptions, Type, TypeKind, TypeRef};
/// let mut user = Type::new("User", TypeKind::Object);
/// for name in ["name", "id"] {
///     user.fields.push(Field {
///         name: name.to_string(),
///         description: None,
///         args: Vec::new(),
///         type_ref: TypeRef::named(TypeKind::Scalar, "String"),
///         is_deprecated: false,
///         deprecation_reason: None,
///     });
/// }
/// let schema = Schema::from_types(vec![user]);
/// let user = schema.lookup_type_by_name("User").unwrap();
/// assert_eq!(selection_set(&schema, user, &SelectionOptions::default()), "id\nname");
/// ```
#[must_use]
pub fn selection_set(schema: &Schema, ty: &Type, options: &SelectionOptions) -> String {
    selection_set_at(schema, ty, 0, options)
}

/// Synthesizes the selection set of `ty` as if it were nested `depth` levels deep.
#[must_use]
#[tracing::instrument(skip(schema, ty, options), fields(type_name = %ty.name, max_depth = options.max_depth))]
pub fn selection_set_at(schema: &Schema, ty: &Type, depth: usize, options: &SelectionOptions) -> String {
    selection_lines(schema, ty, depth, options).join("\n")
}

fn indent(line: &str) -> String {
    format!("{INDENT}{line}")
}

fn selection_lines(schema: &Schema, ty: &Type, depth: usize, options: &SelectionOptions) -> Vec<String> {
    let depth = depth + 1;

    let mut fields: Vec<&Field> = ty.fields.iter().collect();
    fields.sort_by(|a, b| a.name.cmp(&b.name));

    let mut lines = Vec::new();
    let mut selected_leaves: HashSet<&str> = HashSet::new();

    for field in fields {
        // Argument values cannot be supplied, so such fields are only
        // requested where the caller provides them.
        if options.operation == OperationKind::Query && field.has_required_arg() {
            tracing::trace!(depth, name = %field.name, "skipping, field has at least one required arg");
            continue;
        }

        if options.skips(ty, field) {
            tracing::trace!(depth, name = %field.name, "skipping, field excluded via configuration");
            continue;
        }

        match field.type_ref.leaf_kind() {
            TypeKind::Object | TypeKind::Interface | TypeKind::Union => {
                if depth > options.max_depth {
                    tracing::trace!(depth, name = %field.name, "skipping, max depth reached");
                    continue;
                }

                let Some(type_name) = field.type_ref.type_name() else {
                    tracing::warn!(name = %field.name, "skipping, field type has no name");
                    continue;
                };
                let Some(sub_type) = schema.resolve(type_name, &ty.name) else {
                    continue;
                };

                // Recurse first: a field without selectable children would be
                // an invalid `field { }`.
                let sub_lines = selection_lines(schema, sub_type, depth, options);
                if sub_lines.is_empty() {
                    tracing::trace!(depth, name = %field.name, "skipping, no selectable sub-fields");
                    continue;
                }

                lines.push(format!("{} {{", field.name));
                lines.extend(sub_lines.iter().map(|line| indent(line)));
                lines.push("}".to_string());
            }
            TypeKind::Scalar
            | TypeKind::Enum
            | TypeKind::InputObject
            | TypeKind::List
            | TypeKind::NonNull => {
                lines.push(field.name.clone());
                selected_leaves.insert(field.name.as_str());
            }
        }
    }

    for possible in &ty.possible_types {
        let Some(type_name) = possible.type_name() else {
            tracing::warn!(type_name = %ty.name, "skipping possible type without a name");
            continue;
        };
        let Some(possible_type) = schema.resolve(type_name, &ty.name) else {
            continue;
        };

        lines.push(format!("... on {type_name} {{"));
        lines.push(indent(TYPENAME_FIELD));
        for line in selection_lines(schema, possible_type, depth, options) {
            // Leaves already selected on the parent are returned for every
            // concrete type anyway. The fragment already carries its own
            // discriminator.
            if line == TYPENAME_FIELD || selected_leaves.contains(line.as_str()) {
                continue;
            }
            lines.push(indent(&line));
        }
        lines.push("}".to_string());
    }

    if ty.kind.is_abstract() && !lines.is_empty() {
        lines.insert(0, TYPENAME_FIELD.to_string());
    }

    lines
}

/// Selection for one root field of the query or mutation type.
#[derive(Debug, Clone)]
pub struct OperationSelection<'s> {
    pub operation: OperationKind,
    pub field: &'s Field,
    pub return_type: &'s Type,
    /// Selection set of `return_type`; empty for leaf return types.
    pub selection: String,
}

/// Resolves root field `field_name` of the root type for `options.operation`
/// and synthesizes the selection set of its return type.
///
/// # Errors
///
/// Fails when the root type, the field or its return type is missing.
#[tracing::instrument(skip(schema, options), fields(operation = %options.operation))]
pub fn operation_selection<'s>(
    schema: &'s Schema,
    field_name: &str,
    options: &SelectionOptions,
) -> Result<OperationSelection<'s>> {
    let root = match options.operation {
        OperationKind::Query => schema.query_type(),
        OperationKind::Mutation => schema.mutation_type(),
    };
    let root = match root {
        Some(root) => root,
        None => schema.lookup_type_by_name(options.operation.default_root_name())?,
    };

    let field = root.get_field(field_name)?;
    let return_name = field
        .type_ref
        .type_name()
        .ok_or_else(|| SchemaError::TypeNotFound(field.type_ref.to_type_string()))?;
    let return_type = schema.lookup_type_by_name(return_name)?;

    let selection = if return_type.kind.is_composite() {
        selection_set(schema, return_type, options)
    } else {
        String::new()
    };

    Ok(OperationSelection {
        operation: options.operation,
        field,
        return_type,
        selection,
    })
}
