//! `typegen fetch`: introspect the endpoint and cache the schema.

use super::common::CommandContext;
use crate::OutputOptions;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use graphql_config::{DEFAULT_API_KEY_ENV_VAR, DEFAULT_AUTH_HEADER, DEFAULT_SCHEMA_FILE};
use graphql_introspect::IntrospectionClient;
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout in seconds for introspection requests.
const DEFAULT_TIMEOUT: u64 = 30;

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// GraphQL endpoint to introspect (overrides config)
    #[arg(short, long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Header carrying the API key (overrides config)
    #[arg(long, value_name = "NAME")]
    pub header: Option<String>,

    /// Environment variable to read the API key from (overrides config)
    #[arg(long, value_name = "VAR")]
    pub api_key_env: Option<String>,

    /// File the schema is cached to (overrides config)
    #[arg(short, long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Fetch even when the schema file already exists
    #[arg(long)]
    pub refetch: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Number of retry attempts on network and server errors
    #[arg(long, value_name = "N")]
    pub retry: Option<u32>,
}

/// Fetch settings resolved from config and command-line overrides.
#[derive(Debug, PartialEq, Eq)]
struct FetchSettings {
    endpoint: String,
    auth_header: Option<(String, String)>,
    schema_file: PathBuf,
    timeout: u64,
    retry: u32,
}

/// Resolve fetch settings; flags win over config values.
///
/// `api_key` looks up an environment variable by name.
fn resolve_settings(
    context: Option<&CommandContext>,
    args: &FetchArgs,
    api_key: impl Fn(&str) -> Option<String>,
) -> Result<FetchSettings> {
    let config = context.map(|context| &context.config);

    let endpoint = args
        .endpoint
        .clone()
        .or_else(|| config.and_then(|config| config.endpoint.clone()))
        .context("No endpoint configured. Set `endpoint` in the config or pass --endpoint.")?;

    let schema_file = match (&args.schema, context) {
        (Some(path), _) => path.clone(),
        (None, Some(context)) => context.resolve(&context.config.cache.schema_file),
        (None, None) => PathBuf::from(DEFAULT_SCHEMA_FILE),
    };

    let auth_disabled = config.is_some_and(|config| config.auth.disable);
    let auth_header = if auth_disabled {
        tracing::debug!("Authentication disabled");
        None
    } else {
        let header = args
            .header
            .clone()
            .or_else(|| config.map(|config| config.auth.header.clone()))
            .unwrap_or_else(|| DEFAULT_AUTH_HEADER.to_string());
        let env_var = args
            .api_key_env
            .clone()
            .or_else(|| config.map(|config| config.auth.api_key_env_var.clone()))
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV_VAR.to_string());

        match api_key(&env_var).filter(|key| !key.is_empty()) {
            Some(key) => Some((header, key)),
            None => {
                tracing::warn!(env_var, "API key not set, fetching without authentication");
                None
            }
        }
    };

    Ok(FetchSettings {
        endpoint,
        auth_header,
        schema_file,
        timeout: args.timeout.unwrap_or(DEFAULT_TIMEOUT),
        retry: args.retry.unwrap_or(0),
    })
}

#[tracing::instrument(skip_all, fields(refetch = args.refetch))]
pub async fn run(
    context: Option<&CommandContext>,
    args: &FetchArgs,
    output_opts: OutputOptions,
) -> Result<()> {
    let settings = resolve_settings(context, args, |name| std::env::var(name).ok())?;

    if settings.schema_file.exists() && !args.refetch {
        tracing::info!(schema_file = %settings.schema_file.display(), "Schema already cached");
        if output_opts.show_info {
            println!(
                "{} Using cached schema {} (pass --refetch to update)",
                "✓".green(),
                settings.schema_file.display().to_string().cyan()
            );
        }
        return Ok(());
    }

    let start_time = std::time::Instant::now();

    let mut client = IntrospectionClient::new()
        .with_timeout(Duration::from_secs(settings.timeout))
        .with_retries(settings.retry);
    if let Some((name, value)) = &settings.auth_header {
        client = client.with_header(name, value);
    }

    let spinner = crate::progress::spinner(
        &format!("Fetching schema from {}...", settings.endpoint),
        output_opts.show_progress,
    );
    let fetched = client.fetch_schema(&settings.endpoint).await;
    spinner.finish_and_clear();
    let schema =
        fetched.with_context(|| format!("Failed to fetch schema from {}", settings.endpoint))?;

    if let Some(parent) = settings.schema_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    schema.save(&settings.schema_file).context("Failed to cache schema")?;

    tracing::info!(
        endpoint = %settings.endpoint,
        schema_file = %settings.schema_file.display(),
        types = schema.len(),
        "Successfully fetched schema"
    );

    if output_opts.show_info {
        println!(
            "{} Schema fetched to {} ({} types)",
            "✓".green(),
            settings.schema_file.display().to_string().cyan(),
            schema.len()
        );
        println!("  {} {:.2}s", "⏱".dimmed(), start_time.elapsed().as_secs_f64());
    }

    Ok(())
}
