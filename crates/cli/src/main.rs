mod commands;
mod exit_code;
mod progress;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::common::CommandContext;
use exit_code::ExitCode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "typegen")]
#[command(
    about = "Fetch a GraphQL schema and synthesize selection sets for code generation",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Path to typegen config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show progress indicators (spinners)
    pub show_progress: bool,
    /// Whether to show informational output (success messages, summaries)
    pub show_info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the schema via introspection and cache it to a file
    ///
    /// The cached schema is reused on later runs unless --refetch is given.
    Fetch(commands::fetch::FetchArgs),

    /// Expand configured types and synthesize their selection sets
    ///
    /// Writes a JSON manifest with every package's types, queries and
    /// mutations to stdout or --output.
    Generate(commands::generate::GenerateArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Config is read before tracing starts so its log level can seed the filter.
    let context = CommandContext::load(cli.config.as_deref());
    let log_level = context
        .as_ref()
        .ok()
        .and_then(Option::as_ref)
        .and_then(|context| context.config.log_level.clone());
    init_tracing(log_level.as_deref());

    configure_colors(cli.color, cli.no_color);

    let output_opts = OutputOptions {
        show_progress: !cli.quiet,
        show_info: !cli.quiet,
    };

    let result = match context {
        Err(e) => Err(e),
        Ok(context) => match cli.command {
            Commands::Fetch(args) => {
                commands::fetch::run(context.as_ref(), &args, output_opts).await
            }
            Commands::Generate(args) => {
                commands::generate::run(context.as_ref(), &args, output_opts)
            }
        },
    };

    let code = match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            let code = ExitCode::from_error(&e);
            tracing::error!(error = %e, %code, "Command failed");
            eprintln!("{} {e:#}", "✗".red().bold());
            code
        }
    };
    code.exit();
}

/// Initialize tracing to stderr.
///
/// `RUST_LOG` wins over the config's `logLevel`; with neither, logging is off.
fn init_tracing(default_level: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(default_level.unwrap_or("off"))
            }),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set to any value, disable colors)
/// 4. `CLICOLOR_FORCE` environment variable (if set to non-zero, force colors)
/// 5. `CLICOLOR` environment variable (if set to "0", disable colors)
/// 6. Default: colors enabled if stdout is a TTY (handled by `colored` crate)
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color || std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if std::env::var("CLICOLOR").is_ok_and(|val| val == "0") {
        control::set_override(false);
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_fetch_flags() {
        let cli = Cli::try_parse_from([
            "typegen",
            "--config",
            "configs/typegen.yml",
            "fetch",
            "--endpoint",
            "https://api.example.com/graphql",
            "--api-key-env",
            "EXAMPLE_KEY",
            "--refetch",
            "--retry",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("configs/typegen.yml")));
        let Commands::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.endpoint.as_deref(), Some("https://api.example.com/graphql"));
        assert_eq!(args.api_key_env.as_deref(), Some("EXAMPLE_KEY"));
        assert!(args.refetch);
        assert_eq!(args.retry, Some(2));
        assert_eq!(args.timeout, None);
    }

    #[test]
    fn parses_generate_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "typegen", "generate", "--package", "alerts", "-o", "out.json", "--quiet",
        ])
        .unwrap();

        assert!(cli.quiet);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.package.as_deref(), Some("alerts"));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn color_flags_conflict() {
        assert!(Cli::try_parse_from(["typegen", "--color", "--no-color", "generate"]).is_err());
    }
}
