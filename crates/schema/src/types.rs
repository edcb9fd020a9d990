//! Type definitions for the introspected schema graph.
//!
//! These types mirror the structure of the `__Type` records returned by a
//! GraphQL introspection query and deserialize directly from that JSON. Lists
//! that introspection reports as `null` (for example `fields` on a scalar)
//! deserialize as empty vectors.

use crate::{Result, SchemaError};
use serde::{Deserialize, Deserializer, Serialize};

/// Separator used by some APIs to append internal notes to a description.
const DESCRIPTION_SEPARATOR: &str = "\n---\n";

/// Marker selected on abstract types to discriminate the concrete type.
pub const TYPENAME_FIELD: &str = "__typename";

fn nullable_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl TypeKind {
    /// `LIST` and `NON_NULL` wrap another reference instead of naming a type.
    #[must_use]
    pub const fn is_wrapper(self) -> bool {
        matches!(self, Self::List | Self::NonNull)
    }

    /// Kinds that require a nested selection set when queried.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Object | Self::Interface | Self::Union)
    }

    /// Kinds whose concrete type is only known at runtime.
    #[must_use]
    pub const fn is_abstract(self) -> bool {
        matches!(self, Self::Interface | Self::Union)
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::InputObject => "INPUT_OBJECT",
            Self::List => "LIST",
            Self::NonNull => "NON_NULL",
        };
        f.write_str(name)
    }
}

/// A possibly wrapped reference to a named type.
///
/// `LIST` and `NON_NULL` references carry the wrapped reference in `of_type`;
/// the chain ends at a leaf whose `name` identifies the target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// A reference to a named type, without wrappers.
    #[must_use]
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            of_type: None,
        }
    }

    #[must_use]
    pub fn non_null(inner: Self) -> Self {
        Self {
            kind: TypeKind::NonNull,
            name: None,
            of_type: Some(Box::new(inner)),
        }
    }

    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self {
            kind: TypeKind::List,
            name: None,
            of_type: Some(Box::new(inner)),
        }
    }

    /// Unwraps every `LIST` and `NON_NULL` layer.
    ///
    /// A malformed wrapper without `of_type` is returned as-is.
    #[must_use]
    pub fn leaf(&self) -> &Self {
        let mut current = self;
        while let Some(inner) = current.of_type.as_deref() {
            current = inner;
        }
        current
    }

    /// The kind of the innermost named type.
    #[must_use]
    pub fn leaf_kind(&self) -> TypeKind {
        self.leaf().kind
    }

    /// Name of the innermost named type, if the chain terminates in one.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.leaf().name.as_deref()
    }

    /// Kinds along the chain, outermost first.
    #[must_use]
    pub fn kinds(&self) -> Vec<TypeKind> {
        let mut kinds = vec![self.kind];
        let mut current = self;
        while let Some(inner) = current.of_type.as_deref() {
            kinds.push(inner.kind);
            current = inner;
        }
        kinds
    }

    #[must_use]
    pub fn is_non_null(&self) -> bool {
        self.kind == TypeKind::NonNull
    }

    /// Renders the reference in GraphQL type syntax, e.g. `[String!]!`.
    ///
    /// ```
    /// # use graphql_schema::{TypeKind, TypeRef};
    /// let type_ref = TypeRef::non_null(TypeRef::list(TypeRef::non_null(
    ///     TypeRef::named(TypeKind::Scalar, "String"),
    /// )));
    /// assert_eq!(type_ref.to_type_string(), "[String!]!");
    /// ```
    #[must_use]
    pub fn to_type_string(&self) -> String {
        match self.kind {
            TypeKind::NonNull => self.of_type.as_ref().map_or_else(
                || "!".to_string(),
                |of_type| format!("{}!", of_type.to_type_string()),
            ),
            TypeKind::List => self.of_type.as_ref().map_or_else(
                || "[]".to_string(),
                |of_type| format!("[{}]", of_type.to_type_string()),
            ),
            _ => self.name.clone().unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_type_string())
    }
}

/// An argument or input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl InputValue {
    /// A value must be supplied when its type is non-null and it has no default.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.type_ref.is_non_null() && self.default_value.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec", skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<InputValue>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
}

impl Field {
    #[must_use]
    pub fn has_required_arg(&self) -> bool {
        self.args.iter().any(InputValue::is_required)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
}

/// A named type of the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Type {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: TypeKind,
    #[serde(default, deserialize_with = "nullable_vec", skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(default, deserialize_with = "nullable_vec", skip_serializing_if = "Vec::is_empty")]
    pub input_fields: Vec<InputValue>,
    #[serde(default, deserialize_with = "nullable_vec", skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeRef>,
    #[serde(default, deserialize_with = "nullable_vec", skip_serializing_if = "Vec::is_empty")]
    pub possible_types: Vec<TypeRef>,
    #[serde(default, deserialize_with = "nullable_vec", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<EnumValue>,
    /// Field names configured to never be selected on this type.
    #[serde(default, deserialize_with = "nullable_vec", skip_serializing_if = "Vec::is_empty")]
    pub skip_fields: Vec<String>,
}

impl Type {
    /// Creates a type with no members.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
            fields: Vec::new(),
            input_fields: Vec::new(),
            interfaces: Vec::new(),
            possible_types: Vec::new(),
            enum_values: Vec::new(),
            skip_fields: Vec::new(),
        }
    }

    pub fn get_field(&self, name: &str) -> Result<&Field> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| SchemaError::FieldNotFound {
                type_name: self.name.clone(),
                field: name.to_string(),
            })
    }

    /// The description without any trailing `---` section, trimmed.
    ///
    /// Returns `None` when nothing but whitespace remains.
    #[must_use]
    pub fn description_summary(&self) -> Option<&str> {
        let description = self.description.as_deref()?;
        let summary = description
            .split_once(DESCRIPTION_SEPARATOR)
            .map_or(description, |(head, _)| head)
            .trim();
        (!summary.is_empty()).then_some(summary)
    }

    /// Types such as `__Schema` and `__Type` that describe the schema itself.
    #[must_use]
    pub fn is_introspection_type(&self) -> bool {
        self.name.starts_with("__")
    }

    #[must_use]
    pub fn skips_field(&self, name: &str) -> bool {
        self.skip_fields.iter().any(|skip| skip == name)
    }
}
