//! Discovery of the types that need bindings for a set of root types.

use crate::{Result, Schema, SchemaError, Type};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How far expansion follows type references from the roots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpansionMode {
    /// Roots plus the types their own fields and input fields reference.
    #[default]
    SingleHop,
    /// Every type reachable from the roots.
    Transitive,
}

/// Types referenced by the input fields and fields of `ty`, in declaration order.
///
/// Input fields come first. References that cannot be resolved are logged and
/// skipped; the result may contain the same type more than once.
#[must_use]
pub fn expand_type<'s>(schema: &'s Schema, ty: &Type) -> Vec<&'s Type> {
    let references = ty
        .input_fields
        .iter()
        .map(|input| (input.name.as_str(), &input.type_ref))
        .chain(ty.fields.iter().map(|field| (field.name.as_str(), &field.type_ref)));

    let mut found = Vec::new();
    for (member, type_ref) in references {
        let Some(name) = type_ref.type_name() else {
            tracing::warn!(
                type_name = %ty.name,
                member,
                "Type reference does not terminate in a named type"
            );
            continue;
        };

        if let Some(referenced) = schema.resolve(name, &ty.name) {
            found.push(referenced);
        }
    }
    found
}

/// Expands `roots` into the ordered, de-duplicated set of types that appear in
/// their shape.
///
/// The registry is scanned in its own order; each root found is followed by
/// the types it references. With [`ExpansionMode::Transitive`] the referenced
/// types are expanded as well until nothing new is reached. Roots missing from
/// the schema are logged and skipped.
///
/// # Errors
///
/// Returns [`SchemaError::EmptySchema`] for a schema without types and
/// [`SchemaError::DuplicateRoot`] when a root name is given twice.
#[tracing::instrument(skip(schema, roots), fields(schema_types = schema.len()))]
pub fn expand_types<'s, I, S>(
    schema: &'s Schema,
    roots: I,
    mode: ExpansionMode,
) -> Result<Vec<&'s Type>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if schema.is_empty() {
        return Err(SchemaError::EmptySchema);
    }

    let mut root_names: HashSet<String> = HashSet::new();
    let mut ordered_roots = Vec::new();
    for root in roots {
        let name = root.as_ref();
        if !root_names.insert(name.to_string()) {
            return Err(SchemaError::DuplicateRoot(name.to_string()));
        }
        ordered_roots.push(name.to_string());
    }

    let mut expansion = Expansion::default();
    for ty in schema.types() {
        if !root_names.contains(&ty.name) {
            continue;
        }

        expansion.push(ty);
        for referenced in expand_type(schema, ty) {
            expansion.push(referenced);
        }
    }

    for root in &ordered_roots {
        if !expansion.contains(root) {
            let suggestions = schema.similar_type_names(root, 3);
            tracing::warn!(root = %root, ?suggestions, "Root type not found in schema, skipping");
        }
    }

    if mode == ExpansionMode::Transitive {
        let mut cursor = 0;
        while cursor < expansion.types.len() {
            let ty = expansion.types[cursor];
            cursor += 1;
            if root_names.contains(&ty.name) {
                continue;
            }
            for referenced in expand_type(schema, ty) {
                expansion.push(referenced);
            }
        }
    }

    tracing::debug!(
        roots = ordered_roots.len(),
        expanded = expansion.types.len(),
        ?mode,
        "Expanded types"
    );
    Ok(expansion.types)
}

#[derive(Default)]
struct Expansion<'s> {
    types: Vec<&'s Type>,
    seen: HashSet<&'s str>,
}

impl<'s> Expansion<'s> {
    fn push(&mut self, ty: &'s Type) {
        if self.seen.insert(ty.name.as_str()) {
            self.types.push(ty);
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }
}
