//! conform CLI binary entry point.
//! Resolves configuration, runs the pipeline and prints results.

use clap::Parser;
use conform::cli::{Cli, Commands};
use conform::error::ConformError;
use conform::output::OutputMode;
use conform::{config, output, pipeline, utils};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Check {
            path,
            output,
            permissive,
            exclude,
            config,
        } => {
            let eff = config::resolve_effective(
                path.as_deref(),
                config.as_deref(),
                output,
                if permissive { Some(true) } else { None },
                &exclude,
            )
            .unwrap_or_else(|e| fatal(e));
            if eff.config_path.is_none() && eff.output != OutputMode::Json {
                eprintln!("{} No conform.toml found; using defaults.", utils::note_prefix());
            }
            let registry = eff.registry().unwrap_or_else(|e| fatal(e));
            let report = pipeline::run(&eff.root, &registry, eff.scan_options())
                .unwrap_or_else(|e| fatal(e));
            output::print_report(&report, eff.output);
            std::process::exit(report.exit_code());
        }
        Commands::Rules {
            path,
            output,
            config,
        } => {
            let eff = config::resolve_effective(
                path.as_deref(),
                config.as_deref(),
                output,
                None,
                &[],
            )
            .unwrap_or_else(|e| fatal(e));
            let registry = eff.registry().unwrap_or_else(|e| fatal(e));
            output::print_rules(registry.list_rules(), eff.output);
        }
    }
}

fn fatal(err: ConformError) -> ! {
    eprintln!("{} {}", utils::error_prefix(), err);
    std::process::exit(2);
}
