use anyhow::Result;
use clap::Parser;
use qmsrisk::cli::{Cli, Commands};
use qmsrisk::commands::{self, GapCommand, RegisterCommand};
use qmsrisk::config::load_config;
use qmsrisk::enrichment::ProductContext;
use qmsrisk::formatting::ColorMode;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        let code = err
            .downcast_ref::<qmsrisk::Error>()
            .map_or(1, qmsrisk::Error::exit_code);
        std::process::exit(code);
    }
}

// RUST_LOG wins over -v when set
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let color = ColorMode::from(cli.color).apply();
    let config = load_config();

    match cli.command {
        Commands::Register {
            risk_file,
            format,
            output,
            threshold,
        } => commands::run_register(
            RegisterCommand {
                risk_file,
                format: format.into(),
                output,
                threshold,
            },
            &config,
            color,
        ),
        Commands::Plan {
            risk_file,
            hazard_id,
        } => commands::print_plan(&risk_file, &hazard_id, &config),
        Commands::Matrix { format } => commands::print_matrix(format.into(), &config, color),
        Commands::Gap {
            statuses,
            catalog,
            format,
            output,
        } => commands::run_gap(
            GapCommand {
                statuses,
                catalog,
                format: format.into(),
                output,
            },
            &config,
            color,
        ),
        Commands::Suggest {
            product,
            intended_use,
            user_groups,
            environment,
        } => commands::print_suggestions(
            &ProductContext::new(product, intended_use)
                .with_user_groups(user_groups)
                .with_environment(environment),
            &config,
        ),
        Commands::Init { force } => commands::init_config(&std::env::current_dir()?, force),
    }
}
