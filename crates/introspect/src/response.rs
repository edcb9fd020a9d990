//! Shape of an introspection HTTP response.

use crate::{IntrospectionError, Result};
use graphql_schema::{Schema, SchemaDocument};
use serde::Deserialize;

/// Top-level GraphQL response to the introspection query.
#[derive(Debug, Deserialize)]
pub struct IntrospectionResponse {
    pub data: Option<IntrospectionData>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct IntrospectionData {
    #[serde(rename = "__schema")]
    pub schema: SchemaDocument,
}

/// An entry of the response's `errors` list.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

impl IntrospectionResponse {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns [`IntrospectionError::Parse`] when the body is not a GraphQL
    /// response carrying an introspection schema.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| IntrospectionError::Parse(e.to_string()))
    }

    /// Builds the type registry from the response.
    ///
    /// # Errors
    ///
    /// GraphQL errors, or a response without data, are
    /// [`IntrospectionError::Invalid`].
    pub fn into_schema(self) -> Result<Schema> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(IntrospectionError::Invalid(messages.join("; ")));
        }

        let data = self
            .data
            .ok_or_else(|| IntrospectionError::Invalid("response has no data".to_string()))?;
        Ok(Schema::from_document(data.schema))
    }
}
