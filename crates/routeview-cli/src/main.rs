//! routeview: replay map-session scenarios from the terminal
//!
//! Runs a session against the in-memory engine and prints every engine and
//! control call it made, followed by the final session state.
//!
//! Usage examples
//! --------------
//!
//! - Canonical walkthrough (create dark, select a route, go light)
//!   $ routeview demo
//!
//! - A custom script, with session transitions logged
//!   $ routeview --verbose run scenario.json
//!
//! - Effective configuration (built-in or from `--config`)
//!   $ routeview --config view.json config
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use routeview_core::sim::script::{Report, Scenario};
use routeview_core::ViewConfig;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose {
        "info,routeview_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_report(report: &Report) {
    for (i, call) in report.calls.iter().enumerate() {
        println!("{i:>3}  {call}");
    }
    println!();
    println!("Final state:");
    match (report.phase, report.style) {
        (Some(phase), Some(style)) => {
            println!("  Phase: {phase}");
            println!("  Style: {style}");
        }
        _ => println!("  (no session created)"),
    }
    let attached: Vec<String> = report.attached.iter().map(|k| k.to_string()).collect();
    println!("  Controls: {}", attached.join(", "));
    match report.route_points {
        Some(n) => println!("  Route: {n} points"),
        None => println!("  Route: none"),
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => ViewConfig::from_path(path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => ViewConfig::default(),
    };

    match args.command {
        Commands::Demo => {
            let report = Scenario::theme_toggle().run(&config)?;
            print_report(&report);
        }

        Commands::Run { script } => {
            let scenario = Scenario::from_path(&script)?;
            tracing::info!(steps = scenario.steps.len(), %script, "running scenario");
            let report = scenario.run(&config)?;
            print_report(&report);
        }

        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
