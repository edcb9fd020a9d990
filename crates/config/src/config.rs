use graphql_schema::{ExpansionMode, OperationKind, SelectionOptions, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Header carrying the API key when none is configured.
pub const DEFAULT_AUTH_HEADER: &str = "Api-Key";

/// Environment variable read for the API key when none is configured.
pub const DEFAULT_API_KEY_ENV_VAR: &str = "TYPEGEN_API_KEY";

/// Cache file for the fetched schema when none is configured.
pub const DEFAULT_SCHEMA_FILE: &str = "schema.json";

/// Top-level typegen configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypegenConfig {
    /// Default log filter, overridden by `RUST_LOG`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// GraphQL endpoint the schema is fetched from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default = "default_max_depth")]
    pub max_query_field_depth: usize,

    #[serde(default)]
    pub expansion: ExpansionMode,

    /// Field names never selected, in any package.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_fields: Vec<String>,

    #[serde(default)]
    pub packages: Vec<PackageConfig>,
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl TypegenConfig {
    /// Looks up a package by name.
    #[must_use]
    pub fn package(&self, name: &str) -> Option<&PackageConfig> {
        self.packages.iter().find(|package| package.name == name)
    }

    /// Selection options for `operation`, with the endpoint's own depth and
    /// exclusions layered over the global ones.
    #[must_use]
    pub fn selection_options(
        &self,
        operation: OperationKind,
        endpoint: Option<&OperationConfig>,
    ) -> SelectionOptions {
        let max_depth = endpoint
            .and_then(|endpoint| endpoint.max_query_field_depth)
            .unwrap_or(self.max_query_field_depth);

        let mut options = SelectionOptions::new(max_depth)
            .with_operation(operation)
            .with_excluded_fields(self.exclude_fields.iter().cloned());
        if let Some(endpoint) = endpoint {
            options = options.with_excluded_fields(endpoint.exclude_fields.iter().cloned());
        }
        options
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Send no authentication header.
    #[serde(default)]
    pub disable: bool,

    #[serde(default = "default_auth_header")]
    pub header: String,

    #[serde(default = "default_api_key_env_var")]
    pub api_key_env_var: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            disable: false,
            header: default_auth_header(),
            api_key_env_var: default_api_key_env_var(),
        }
    }
}

fn default_auth_header() -> String {
    DEFAULT_AUTH_HEADER.to_string()
}

fn default_api_key_env_var() -> String {
    DEFAULT_API_KEY_ENV_VAR.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    #[serde(default = "default_schema_file")]
    pub schema_file: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            schema_file: default_schema_file(),
        }
    }
}

fn default_schema_file() -> PathBuf {
    PathBuf::from(DEFAULT_SCHEMA_FILE)
}

/// A generation unit: the types, queries and mutations emitted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageConfig {
    pub name: String,

    /// Output location of the package, relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub types: Vec<TypeConfig>,

    #[serde(default)]
    pub queries: Vec<OperationConfig>,

    #[serde(default)]
    pub mutations: Vec<OperationConfig>,
}

impl PackageConfig {
    /// Names of the configured root types, in configuration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|ty| ty.name.as_str())
    }

    /// Query endpoints followed by mutation endpoints, each with its kind.
    pub fn operations(&self) -> impl Iterator<Item = (OperationKind, &OperationConfig)> {
        self.queries
            .iter()
            .map(|query| (OperationKind::Query, query))
            .chain(
                self.mutations
                    .iter()
                    .map(|mutation| (OperationKind::Mutation, mutation)),
            )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeConfig {
    pub name: String,

    /// Fields of this type left out of generated selections.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skip_fields: Vec<String>,
}

/// A root field of the query or mutation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_query_field_depth: Option<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_fields: Vec<String>,
}
