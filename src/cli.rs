use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qmsrisk")]
#[command(
    about = "ISO 14971 risk assessment and ISO 13485 gap scoring for medical device quality systems",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Color output (auto, always, never)
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the risk register for a risk file
    Register {
        /// Risk file with hazards and controls (TOML or JSON)
        risk_file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// High priority threshold (overrides the config file)
        #[arg(long)]
        threshold: Option<u8>,
    },

    /// Print the control plan for one hazard as JSON
    Plan {
        /// Risk file with hazards and controls (TOML or JSON)
        risk_file: PathBuf,

        /// Hazard id
        hazard_id: String,
    },

    /// Print the risk acceptability matrix
    Matrix {
        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },

    /// Score compliance statuses against a gap analysis checklist
    Gap {
        /// Table of checklist item id to status (TOML or JSON)
        statuses: PathBuf,

        /// Checklist catalog (defaults to the bundled ISO 13485 catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print template hazard suggestions for a product as JSON
    Suggest {
        /// Product description
        #[arg(long)]
        product: String,

        /// Intended use of the device
        #[arg(long)]
        intended_use: String,

        /// User group (repeatable)
        #[arg(long = "user-group")]
        user_groups: Vec<String>,

        /// Use environment
        #[arg(long, default_value = "")]
        environment: String,
    },

    /// Initialize a .qmsrisk.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

impl From<ColorChoice> for crate::formatting::ColorMode {
    fn from(c: ColorChoice) -> Self {
        match c {
            ColorChoice::Auto => crate::formatting::ColorMode::from_env(),
            ColorChoice::Always => crate::formatting::ColorMode::Always,
            ColorChoice::Never => crate::formatting::ColorMode::Never,
        }
    }
}
