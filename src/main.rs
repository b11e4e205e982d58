//! model-hierarchy: browse hub/project/folder trees and print component
//! assembly hierarchies from a paginated GraphQL API.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use model_hierarchy::{
    cli::{self, HierarchyRequest, Session},
    config::{self, AppConfig, ConfigPreset, Validatable},
    pipeline::{exit_code_for, exit_codes},
    provider::AccessToken,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "model-hierarchy")]
#[command(version)]
#[command(about = "Browse hub/project/folder trees and component assembly hierarchies", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Component not found; the placeholder hierarchy was printed
    2  Client error (malformed node id, item expansion)
    3  Error occurred

EXAMPLES:
    # List hubs
    model-hierarchy expand '#'

    # Print the assembly tree of a component
    model-hierarchy hierarchy --hub 'My Hub' --project Alpha --component Widget

    # Work offline against a fixture
    model-hierarchy --fixture tests/fixtures/workspace.json browse")]
struct Cli {
    /// OAuth bearer token forwarded on every provider request
    #[arg(long, global = true, env = "MODEL_HIERARCHY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Serve data from a JSON fixture instead of the remote API
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Overall deadline per command in seconds
    #[arg(long, global = true)]
    deadline: Option<u64>,

    /// Maximum pages followed by one cursor loop
    #[arg(long, global = true)]
    max_pages: Option<usize>,

    /// Policy preset: default, strict
    #[arg(long, global = true)]
    preset: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the children of one tree node
    Expand {
        /// Encoded node id; `#` for the list of hubs
        #[arg(default_value = "#")]
        node_id: String,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<ReportFormat>,

        /// Write output to a file instead of stdout
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,
    },

    /// Print the assembly hierarchy of a component
    Hierarchy {
        /// Hub name
        #[arg(long)]
        hub: String,

        /// Project name within the hub
        #[arg(long)]
        project: String,

        /// Component name within the project
        #[arg(long)]
        component: String,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<ReportFormat>,

        /// Write output to a file instead of stdout
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,
    },

    /// Browse the tree interactively
    Browse,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .model-hierarchy.yaml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging on stderr so stdout stays machine-readable
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code_for(&e)
        }
    };
    std::process::exit(code);
}

/// Layer CLI flags over the discovered config file.
fn effective_config(cli: &Cli, output: Option<ReportFormat>, file: Option<PathBuf>) -> Result<AppConfig> {
    let mut overrides = AppConfig::builder().fixture(cli.fixture.clone());
    if let Some(timeout) = cli.timeout {
        overrides = overrides.timeout_secs(timeout);
    }
    if let Some(max_pages) = cli.max_pages {
        overrides = overrides.max_pages(max_pages);
    }
    if let Some(format) = output {
        overrides = overrides.output_format(format);
    }
    let mut overrides = overrides
        .deadline_secs(cli.deadline)
        .output_file(file)
        .build();

    if let Some(name) = &cli.preset {
        let preset = ConfigPreset::from_name(name).with_context(|| {
            let known: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
            format!("unknown preset '{name}' (expected one of: {})", known.join(", "))
        })?;
        overrides.policy = AppConfig::from_preset(preset).policy;
    }

    let (config, loaded_from) = AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
    if let Some(path) = loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("invalid configuration:\n  {}", messages.join("\n  "));
    }
    Ok(config)
}

fn session(cli: &Cli, config: AppConfig) -> Session {
    let token = AccessToken::new(cli.token.clone().unwrap_or_default());
    Session::new(config, token).quiet(cli.quiet)
}

fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Expand {
            node_id,
            output,
            output_file,
        } => {
            let config = effective_config(&cli, *output, output_file.clone())?;
            cli::run_expand(&session(&cli, config), node_id)
        }

        Commands::Hierarchy {
            hub,
            project,
            component,
            output,
            output_file,
        } => {
            let config = effective_config(&cli, *output, output_file.clone())?;
            let request = HierarchyRequest {
                hub: hub.clone(),
                project: project.clone(),
                component: component.clone(),
            };
            cli::run_hierarchy(&session(&cli, config), &request)
        }

        Commands::Browse => {
            let config = effective_config(&cli, None, None)?;
            cli::run_browse(&session(&cli, config))
        }

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "model-hierarchy", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema().context("failed to serialize schema")?;
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => {
            run_config_action(action, &cli)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn run_config_action(action: &ConfigAction, cli: &Cli) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) = config::load_or_default(cli.config.as_deref());
            match &loaded_from {
                Some(path) => eprintln!("# Loaded from: {}", path.display()),
                None => eprintln!("# No config file found; showing defaults"),
            }
            let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths = [
                std::env::current_dir().ok(),
                Some(PathBuf::from("<git repository root>")),
                config::user_config_dir(),
                dirs::home_dir(),
            ];
            eprintln!("Config file search paths (in order):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {}", path.display());
            }
            eprintln!();
            eprintln!("Recognized file names:");
            for name in [
                ".model-hierarchy.yaml",
                ".model-hierarchy.yml",
                "model-hierarchy.yaml",
                "model-hierarchy.yml",
            ] {
                eprintln!("  {name}");
            }
            eprintln!();
            match config::discover_config_file(cli.config.as_deref()) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".model-hierarchy.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            std::fs::write(&target, config::generate_full_example_config())
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
    }
    Ok(())
}
