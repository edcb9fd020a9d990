//! The type registry built from an introspection document.

use crate::{Result, SchemaError, Type};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Reference to one of the root operation types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootTypeRef {
    pub name: String,
}

/// The `__schema` object of an introspection response, as serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<RootTypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation_type: Option<RootTypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_type: Option<RootTypeRef>,
    #[serde(default)]
    pub types: Vec<Type>,
}

/// Read-only registry of every type in a schema.
///
/// Types keep the order of the source document. Lookups by name go through an
/// index built once at construction and hand out shared references into the
/// registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "SchemaDocument", into = "SchemaDocument")]
pub struct Schema {
    document: SchemaDocument,
    index: HashMap<String, usize>,
}

impl From<SchemaDocument> for Schema {
    fn from(document: SchemaDocument) -> Self {
        Self::from_document(document)
    }
}

impl From<Schema> for SchemaDocument {
    fn from(schema: Schema) -> Self {
        schema.document
    }
}

impl Schema {
    #[must_use]
    #[tracing::instrument(skip(document), fields(types = document.types.len()))]
    pub fn from_document(document: SchemaDocument) -> Self {
        let mut index = HashMap::with_capacity(document.types.len());
        for (position, ty) in document.types.iter().enumerate() {
            if index.contains_key(&ty.name) {
                tracing::warn!(name = %ty.name, "Duplicate type in schema, keeping first definition");
                continue;
            }
            index.insert(ty.name.clone(), position);
        }

        tracing::debug!(indexed = index.len(), "Built type index");
        Self { document, index }
    }

    /// Builds a registry from bare types, without root operation types.
    #[must_use]
    pub fn from_types(types: Vec<Type>) -> Self {
        Self::from_document(SchemaDocument {
            types,
            ..SchemaDocument::default()
        })
    }

    /// Loads a schema previously written by [`Schema::save`].
    ///
    /// Both the bare `__schema` object and a full introspection response
    /// (`{"data": {"__schema": ...}}`) are accepted.
    #[tracing::instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!("Reading schema file");
        let contents = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let schema = Self::from_json(&contents).map_err(|source| SchemaError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(types = schema.len(), "Schema loaded");
        Ok(schema)
    }

    /// Parses either a bare `__schema` object or a full introspection response.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        #[derive(Deserialize)]
        struct Response {
            data: Data,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "__schema")]
            schema: SchemaDocument,
        }

        let value: serde_json::Value = serde_json::from_str(contents)?;
        if value.get("data").is_some() {
            let response: Response = serde_json::from_value(value)?;
            Ok(Self::from_document(response.data.schema))
        } else {
            serde_json::from_value(value)
        }
    }

    /// Writes the schema as indented JSON.
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(SchemaError::NoSchemaFile);
        }

        tracing::debug!("Saving schema");
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.document
            .serialize(&mut serializer)
            .map_err(|source| SchemaError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        std::fs::write(path, buffer).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Exact, case-sensitive lookup of a type by its schema name.
    pub fn lookup_type_by_name(&self, name: &str) -> Result<&Type> {
        self.index
            .get(name)
            .map(|&position| &self.document.types[position])
            .ok_or_else(|| SchemaError::TypeNotFound(name.to_string()))
    }

    /// Lookup for traversals that continue past unknown names.
    ///
    /// A miss is logged here, so callers only need to skip the reference.
    pub(crate) fn resolve(&self, name: &str, referenced_by: &str) -> Option<&Type> {
        match self.lookup_type_by_name(name) {
            Ok(ty) => Some(ty),
            Err(err) => {
                tracing::warn!(error = %err, referenced_by, "Skipping unresolved type reference");
                None
            }
        }
    }

    #[must_use]
    pub fn types(&self) -> &[Type] {
        &self.document.types
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.document.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document.types.is_empty()
    }

    #[must_use]
    pub fn document(&self) -> &SchemaDocument {
        &self.document
    }

    #[must_use]
    pub fn query_type(&self) -> Option<&Type> {
        let root = self.document.query_type.as_ref()?;
        self.lookup_type_by_name(&root.name).ok()
    }

    #[must_use]
    pub fn mutation_type(&self) -> Option<&Type> {
        let root = self.document.mutation_type.as_ref()?;
        self.lookup_type_by_name(&root.name).ok()
    }

    #[must_use]
    pub fn subscription_type(&self) -> Option<&Type> {
        let root = self.document.subscription_type.as_ref()?;
        self.lookup_type_by_name(&root.name).ok()
    }

    /// Names of types that are close to `name`, best match first.
    ///
    /// Used to suggest a correction when a configured type is missing.
    #[must_use]
    pub fn similar_type_names(&self, name: &str, limit: usize) -> Vec<&str> {
        let mut scored: Vec<(f64, &str)> = self
            .document
            .types
            .iter()
            .map(|ty| (strsim::jaro_winkler(name, &ty.name), ty.name.as_str()))
            .filter(|(score, _)| *score >= 0.8)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored.into_iter().take(limit).map(|(_, name)| name).collect()
    }

    /// Sets the fields that selection synthesis must never request on a type.
    ///
    /// Intended to be applied from configuration while the registry is being
    /// assembled; unknown type names are reported as errors.
    pub fn with_skip_fields<I, S>(mut self, type_name: &str, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let position = *self
            .index
            .get(type_name)
            .ok_or_else(|| SchemaError::TypeNotFound(type_name.to_string()))?;

        let ty = &mut self.document.types[position];
        for field in fields {
            let field = field.into();
            if !ty.skip_fields.contains(&field) {
                ty.skip_fields.push(field);
            }
        }
        Ok(self)
    }
}
