//! Bean Control - CLI for the bean pest advisor
//!
//! Diagnoses pests from observed symptoms and browses the pest and control
//! catalog.

use anyhow::Result;
use bean_common::{AdvisorConfig, ColorMode, KnowledgeBase};
use beanctl::commands::{self, Context};
use beanctl::errors::{exit_code_for, EXIT_SUCCESS};
use beanctl::logging;
use beanctl::output::Painter;
use clap::{Parser, Subcommand};
use tracing::debug;

// Version is embedded at build time
const VERSION: &str = env!("BEAN_VERSION");

#[derive(Parser)]
#[command(name = "beanctl")]
#[command(about = "Bean Pest Management Advisor - symptom pest diagnosis", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Debug logging to stderr (overridden by BEAN_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every known symptom
    Symptoms,

    /// Rank likely pests for the observed symptoms
    Diagnose {
        /// Symptom ids or labels, e.g. leaf_curling "Sticky Leaves"
        symptoms: Vec<String>,

        /// How many pests to show (default from config)
        #[arg(long)]
        top: Option<usize>,
    },

    /// Show the pest library, or one pest with its controls
    Pests {
        /// Pest id
        id: Option<String>,
    },

    /// Show control methods grouped by type, or one control
    Controls {
        /// Control id
        id: Option<String>,

        /// Only show one control type (chemical, biological, botanical, cultural)
        #[arg(long = "type")]
        control_type: Option<String>,
    },

    /// List control -> pest relationships
    Graph,

    /// Show or change configuration
    Config {
        /// Set a configuration value (key=value)
        #[arg(long)]
        set: Option<String>,
    },

    /// About this advisor
    About,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let painter = if cli.no_color {
        Painter::plain()
    } else {
        Painter::for_mode(ColorMode::Auto)
    };

    let code = match run(cli) {
        Ok(output) => {
            print!("{}", output);
            EXIT_SUCCESS
        }
        Err(err) => {
            eprintln!("{} {:#}", painter.error("[ERROR]"), err);
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<String> {
    // `config` must still work on a broken file so it can be repaired
    let stored = match cli.command {
        Commands::Config { .. } => {
            AdvisorConfig::load_from_or_default(&AdvisorConfig::config_path()?)
        }
        _ => AdvisorConfig::load()?,
    };
    // Flags override the stored config for this run only
    let mut config = stored.clone();
    if cli.json {
        config.output.json = true;
    }
    if let Commands::Diagnose { top: Some(top), .. } = &cli.command {
        config.diagnosis.top_k = (*top).max(1);
    }
    let painter = if cli.no_color || config.output.json {
        Painter::plain()
    } else {
        Painter::for_mode(config.output.color)
    };

    let kb = KnowledgeBase::new();
    debug!(pests = kb.list_pests().len(), "Loaded bean catalog");
    let ctx = Context::new(&kb, &config, painter);

    match cli.command {
        Commands::Symptoms => commands::symptoms(&ctx),
        Commands::Diagnose { symptoms, .. } => commands::diagnose(&ctx, &symptoms),
        Commands::Pests { id: None } => commands::pests(&ctx),
        Commands::Pests { id: Some(id) } => commands::pest(&ctx, &id),
        Commands::Controls { id: Some(id), .. } => commands::control(&ctx, &id),
        Commands::Controls { id: None, control_type } => {
            commands::controls(&ctx, control_type.as_deref())
        }
        Commands::Graph => commands::graph(&ctx),
        Commands::Config { set } => configure(stored, set),
        Commands::About => Ok(commands::about(VERSION)),
    }
}

fn configure(mut config: AdvisorConfig, set: Option<String>) -> Result<String> {
    let path = AdvisorConfig::config_path()?;
    if let Some(assignment) = set {
        config.set(&assignment)?;
        config.save_to(&path)?;
        return Ok(format!("Saved {} to {}\n", assignment, path.display()));
    }
    commands::show_config(&config, &path)
}
