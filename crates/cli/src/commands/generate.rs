//! `typegen generate`: expand configured types and synthesize selections.

use super::common::CommandContext;
use crate::OutputOptions;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use graphql_config::{PackageConfig, TypegenConfig};
use graphql_schema::{
    expand_types, operation_selection, selection_set, OperationKind, Schema, TypeKind,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Suggestions offered for a configured type missing from the schema.
const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Cached schema file (overrides config)
    #[arg(short, long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Output file path (writes to stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only generate this package
    #[arg(short, long, value_name = "NAME")]
    pub package: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Manifest {
    pub packages: Vec<PackageManifest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub types: Vec<TypeManifest>,
    pub queries: Vec<OperationManifest>,
    pub mutations: Vec<OperationManifest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_types: Vec<MissingType>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeManifest {
    pub name: String,
    pub kind: TypeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Present for object, interface and union types with selectable fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationManifest {
    pub name: String,
    pub arguments: Vec<ArgumentManifest>,
    pub return_type: String,
    pub selection: String,
}

#[derive(Debug, Serialize)]
pub struct ArgumentManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
}

#[derive(Debug, Serialize)]
pub struct MissingType {
    pub name: String,
    pub suggestions: Vec<String>,
}

#[tracing::instrument(skip_all, fields(package = args.package.as_deref()))]
pub fn run(
    context: Option<&CommandContext>,
    args: &GenerateArgs,
    output_opts: OutputOptions,
) -> Result<()> {
    let context = CommandContext::require(context, "generate")?;

    let schema_file = args
        .schema
        .clone()
        .unwrap_or_else(|| context.resolve(&context.config.cache.schema_file));
    let schema = Schema::load(&schema_file).with_context(|| {
        format!(
            "Failed to load schema {}. Run `typegen fetch` first.",
            schema_file.display()
        )
    })?;

    let manifest = build_manifest(&context.config, &schema, args.package.as_deref())?;
    let content =
        serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;

    for package in &manifest.packages {
        for missing in &package.missing_types {
            eprintln!(
                "{} Package '{}': type '{}' not found in schema{}",
                "⚠".yellow(),
                package.name,
                missing.name.yellow(),
                if missing.suggestions.is_empty() {
                    String::new()
                } else {
                    format!(" (did you mean {}?)", missing.suggestions.join(", "))
                }
            );
        }
    }

    if let Some(path) = &args.output {
        write_output(path, &content)?;

        if output_opts.show_info {
            println!(
                "{} Manifest written to {}",
                "✓".green(),
                path.display().to_string().cyan()
            );
            for package in &manifest.packages {
                println!(
                    "  {} {} types, {} queries, {} mutations",
                    package.name.bold(),
                    package.types.len(),
                    package.queries.len(),
                    package.mutations.len()
                );
            }
        }
    } else {
        println!("{content}");
    }

    Ok(())
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, format!("{content}\n"))
        .with_context(|| format!("Failed to write to {}", path.display()))
}

/// Builds the manifest for every package, or only for `only`.
#[tracing::instrument(skip(config, schema), fields(packages = config.packages.len(), types = schema.len()))]
pub fn build_manifest(
    config: &TypegenConfig,
    schema: &Schema,
    only: Option<&str>,
) -> Result<Manifest> {
    let packages: Vec<&PackageConfig> = match only {
        Some(name) => {
            let package = config.package(name).with_context(|| {
                let available: Vec<&str> =
                    config.packages.iter().map(|p| p.name.as_str()).collect();
                format!(
                    "Package '{name}' not found. Available packages: {}",
                    available.join(", ")
                )
            })?;
            vec![package]
        }
        None => config.packages.iter().collect(),
    };

    let packages = packages
        .into_iter()
        .map(|package| build_package(config, schema, package))
        .collect::<Result<Vec<_>>>()?;

    Ok(Manifest { packages })
}

#[tracing::instrument(skip(config, schema, package), fields(package = %package.name))]
fn build_package(
    config: &TypegenConfig,
    schema: &Schema,
    package: &PackageConfig,
) -> Result<PackageManifest> {
    let mut missing_types = Vec::new();
    for name in package.type_names() {
        if schema.lookup_type_by_name(name).is_err() {
            let suggestions: Vec<String> = schema
                .similar_type_names(name, MAX_SUGGESTIONS)
                .into_iter()
                .map(str::to_string)
                .collect();
            tracing::warn!(type_name = name, ?suggestions, "Configured type not in schema");
            missing_types.push(MissingType {
                name: name.to_string(),
                suggestions,
            });
        }
    }

    // Skip lists only affect this package's selections.
    let mut schema = schema.clone();
    for ty in &package.types {
        if ty.skip_fields.is_empty() || missing_types.iter().any(|m| m.name == ty.name) {
            continue;
        }
        schema = schema.with_skip_fields(&ty.name, ty.skip_fields.iter().cloned())?;
    }

    let type_options = config.selection_options(OperationKind::Query, None);
    let types: Vec<TypeManifest> = expand_types(&schema, package.type_names(), config.expansion)
        .with_context(|| format!("Package '{}': type expansion failed", package.name))?
        .into_iter()
        .filter(|ty| !ty.is_introspection_type())
        .map(|ty| {
            let selection = if ty.kind.is_composite() {
                Some(selection_set(&schema, ty, &type_options)).filter(|s| !s.is_empty())
            } else {
                None
            };
            TypeManifest {
                name: ty.name.clone(),
                kind: ty.kind,
                description: ty.description_summary().map(str::to_string),
                selection,
            }
        })
        .collect();

    let mut queries = Vec::new();
    let mut mutations = Vec::new();
    for (operation, endpoint) in package.operations() {
        let options = config.selection_options(operation, Some(endpoint));
        let selected = operation_selection(&schema, &endpoint.name, &options).with_context(
            || format!("Package '{}': {operation} '{}'", package.name, endpoint.name),
        )?;

        let manifest = OperationManifest {
            name: selected.field.name.clone(),
            arguments: selected
                .field
                .args
                .iter()
                .map(|arg| ArgumentManifest {
                    name: arg.name.clone(),
                    type_name: arg.type_ref.to_type_string(),
                    required: arg.is_required(),
                })
                .collect(),
            return_type: selected.field.type_ref.to_type_string(),
            selection: selected.selection,
        };
        match operation {
            OperationKind::Query => queries.push(manifest),
            OperationKind::Mutation => mutations.push(manifest),
        }
    }

    tracing::info!(
        types = types.len(),
        queries = queries.len(),
        mutations = mutations.len(),
        "Package generated"
    );

    Ok(PackageManifest {
        name: package.name.clone(),
        path: package.path.clone(),
        types,
        queries,
        mutations,
        missing_types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_config::load_config_from_str;
    use graphql_schema::SchemaError;

    const SCHEMA: &str = r#"{
        "queryType": { "name": "Query" },
        "mutationType": { "name": "Mutation" },
        "types": [
            {
                "kind": "OBJECT", "name": "Query",
                "fields": [
                    {
                        "name": "account",
                        "args": [
                            { "name": "id", "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "SCALAR", "name": "Int" } } }
                        ],
                        "type": { "kind": "OBJECT", "name": "Account" },
                        "isDeprecated": false
                    }
                ]
            },
            {
                "kind": "OBJECT", "name": "Mutation",
                "fields": [
                    {
                        "name": "accountRename",
                        "args": [
                            { "name": "id", "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "SCALAR", "name": "Int" } } },
                            { "name": "name", "type": { "kind": "SCALAR", "name": "String" }, "defaultValue": null }
                        ],
                        "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "OBJECT", "name": "Account" } },
                        "isDeprecated": false
                    }
                ]
            },
            {
                "kind": "OBJECT", "name": "Account",
                "description": "An account.\n---\nOwned by the platform team.",
                "fields": [
                    { "name": "id", "args": [], "type": { "kind": "SCALAR", "name": "Int" }, "isDeprecated": false },
                    { "name": "name", "args": [], "type": { "kind": "SCALAR", "name": "String" }, "isDeprecated": false },
                    { "name": "owner", "args": [], "type": { "kind": "OBJECT", "name": "User" }, "isDeprecated": false }
                ]
            },
            {
                "kind": "OBJECT", "name": "User",
                "fields": [
                    { "name": "email", "args": [], "type": { "kind": "SCALAR", "name": "String" }, "isDeprecated": false }
                ]
            },
            { "kind": "SCALAR", "name": "Int" },
            { "kind": "SCALAR", "name": "String" },
            { "kind": "OBJECT", "name": "__Type", "fields": [] }
        ]
    }"#;

    fn schema() -> Schema {
        Schema::from_json(SCHEMA).unwrap()
    }

    fn config(yaml: &str) -> TypegenConfig {
        load_config_from_str(yaml, Path::new(".typegen.yml")).unwrap()
    }

    const CONFIG: &str = r"
packages:
  - name: accounts
    path: pkg/accounts
    types:
      - name: Account
        skipFields: [owner]
    queries:
      - name: account
    mutations:
      - name: accountRename
        maxQueryFieldDepth: 1
  - name: users
    types:
      - name: User
";

    #[test]
    fn test_manifest_for_all_packages() {
        let manifest = build_manifest(&config(CONFIG), &schema(), None).unwrap();
        assert_eq!(manifest.packages.len(), 2);

        let accounts = &manifest.packages[0];
        assert_eq!(accounts.name, "accounts");
        assert_eq!(accounts.path, Some(PathBuf::from("pkg/accounts")));

        let names: Vec<&str> = accounts.types.iter().map(|ty| ty.name.as_str()).collect();
        assert_eq!(names, vec!["Account", "Int", "String", "User"]);

        let account = &accounts.types[0];
        assert_eq!(account.kind, TypeKind::Object);
        assert_eq!(account.description.as_deref(), Some("An account."));
        assert_eq!(account.selection.as_deref(), Some("id\nname"));
        assert_eq!(accounts.types[1].selection, None);

        // The skip list of one package does not leak into another.
        assert_eq!(manifest.packages[1].types[0].selection.as_deref(), Some("email"));
    }

    #[test]
    fn test_operations() {
        let manifest = build_manifest(&config(CONFIG), &schema(), Some("accounts")).unwrap();
        let accounts = &manifest.packages[0];

        let query = &accounts.queries[0];
        assert_eq!(query.name, "account");
        assert_eq!(query.return_type, "Account");
        assert_eq!(query.arguments.len(), 1);
        assert_eq!(query.arguments[0].type_name, "Int!");
        assert!(query.arguments[0].required);
        assert_eq!(query.selection, "id\nname");

        let mutation = &accounts.mutations[0];
        assert_eq!(mutation.return_type, "Account!");
        assert!(!mutation.arguments[1].required);
        assert_eq!(mutation.selection, "id\nname");
    }

    #[test]
    fn test_transitive_expansion_and_depth() {
        let config = config(
            r"
maxQueryFieldDepth: 1
expansion: transitive
packages:
  - name: root
    types:
      - name: Query
",
        );
        let manifest = build_manifest(&config, &schema(), None).unwrap();
        let types = &manifest.packages[0].types;

        let names: Vec<&str> = types.iter().map(|ty| ty.name.as_str()).collect();
        assert_eq!(names, vec!["Query", "Account", "Int", "String", "User"]);

        let account = types.iter().find(|ty| ty.name == "Account").unwrap();
        assert_eq!(
            account.selection.as_deref(),
            Some("id\nname\nowner {\n\temail\n}")
        );
    }

    #[test]
    fn test_missing_types_are_reported() {
        let config = config("packages:\n  - name: a\n    types:\n      - name: Acount\n        skipFields: [x]\n");
        let manifest = build_manifest(&config, &schema(), None).unwrap();
        let package = &manifest.packages[0];

        assert!(package.types.is_empty());
        assert_eq!(package.missing_types.len(), 1);
        assert_eq!(package.missing_types[0].name, "Acount");
        assert_eq!(package.missing_types[0].suggestions, vec!["Account"]);
    }

    #[test]
    fn test_unknown_operation_is_schema_error() {
        let config = config("packages:\n  - name: a\n    queries:\n      - name: nope\n");
        let error = build_manifest(&config, &schema(), None).unwrap_err();

        assert!(error.to_string().contains("Package 'a': query 'nope'"));
        assert!(matches!(
            error.downcast_ref::<SchemaError>(),
            Some(SchemaError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_package() {
        let error = build_manifest(&config(CONFIG), &schema(), Some("nope")).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Package 'nope' not found. Available packages: accounts, users"
        );
    }

    #[test]
    fn test_manifest_json_shape() {
        let manifest = build_manifest(&config(CONFIG), &schema(), Some("accounts")).unwrap();
        let value = serde_json::to_value(&manifest).unwrap();

        let package = &value["packages"][0];
        assert_eq!(package["types"][0]["kind"], "OBJECT");
        assert_eq!(package["queries"][0]["returnType"], "Account");
        assert_eq!(package["queries"][0]["arguments"][0]["type"], "Int!");
        assert!(package.get("missingTypes").is_none());
    }

    #[test]
    fn test_run_writes_manifest_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let schema_file = temp_dir.path().join("schema.json");
        schema().save(&schema_file).unwrap();

        let context = CommandContext {
            config: config(CONFIG),
            base_dir: temp_dir.path().to_path_buf(),
        };
        let output = temp_dir.path().join("out").join("manifest.json");
        let args = GenerateArgs {
            schema: None,
            output: Some(output.clone()),
            package: Some("users".to_string()),
        };
        let quiet = OutputOptions {
            show_progress: false,
            show_info: false,
        };

        run(Some(&context), &args, quiet).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(written["packages"][0]["name"], "users");
    }
}
