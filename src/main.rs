//! zepower - Level Zero GPU power monitor
//!
//! A command-line tool reporting card-level and per-tile power draw of
//! Intel GPUs.

use clap::Parser;
use zepower::cli::args::{generate_completions, Cli, Commands};
use zepower::commands::{open_monitor, run_list, run_read, run_watch};
use zepower::config::{Config, ConfigBuilder};
use zepower::error::{AppError, DiscoveryError, SysmanError};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Merge config file and CLI overrides; logging depends on the result
    let result = load_config(&cli).and_then(|config| {
        init_logging(config.general.verbose);
        run(&cli, &config)
    });

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, AppError> {
    let interval = match &cli.command {
        Commands::Read(args) => args.interval,
        Commands::Watch(args) => args.interval,
        _ => None,
    };

    let config = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_verbose(cli.verbose.then_some(true))
        .with_interval_ms(interval)
        .build()?;

    Ok(config)
}

fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::List => run_list(&mut open_monitor()?, cli.format, &mut out),

        Commands::Read(_) => run_read(&mut open_monitor()?, config, cli.format, &mut out),

        Commands::Watch(args) => run_watch(&mut open_monitor()?, args, config, &mut out),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Discovery(DiscoveryError::SubsystemInitFailed(SysmanError::LibraryNotFound)) => {
            eprintln!();
            eprintln!("Hint: Make sure the Level Zero loader is installed.");
            eprintln!("      On Linux, install the level-zero package.");
        }
        AppError::Discovery(DiscoveryError::SubsystemInitFailed(_)) => {
            eprintln!();
            eprintln!("Hint: Check that your user can access /dev/dri (render group).");
        }
        AppError::Discovery(DiscoveryError::NoDriversFound | DiscoveryError::NoDevicesFound) => {
            eprintln!();
            eprintln!("Hint: Make sure you have a supported Intel GPU and driver installed.");
        }
        _ => {}
    }
}
