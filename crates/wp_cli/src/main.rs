//! wpsim - run seeded water polo matches from the command line
//!
//! Goes through the same JSON entry point a game host uses, so the output
//! file is exactly what the host would receive.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use wp_core::api::{simulate_match_json, MatchRequest, MatchResponse, SCHEMA_VERSION};
use wp_core::config::MatchConfig;
use wp_core::models::TeamId;
use wp_core::referee::{OfficiatingProfile, PRESET_NAMES};
use wp_core::MatchReport;

#[derive(Parser)]
#[command(name = "wpsim")]
#[command(about = "Deterministic water polo officiating and tactics simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one match and print the result
    Simulate {
        /// Match seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Match configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Referee preset (see `wpsim presets`)
        #[arg(long)]
        referee: Option<String>,

        /// Short quarters, ignored when --config is given. Without --config the
        /// referee comes from WP_REFEREE_PROFILE unless --referee is set
        #[arg(long, default_value = "false")]
        quick: bool,

        /// Write the full JSON response here
        #[arg(long)]
        output: Option<PathBuf>,

        /// Keep every notification in the JSON response
        #[arg(long, default_value = "false")]
        notifications: bool,
    },

    /// List referee presets
    Presets,

    /// Print a configuration file to start from
    DefaultConfig {
        #[arg(long, default_value = "false")]
        quick: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { seed, config, referee, quick, output, notifications } => {
            let config = match config {
                Some(path) => MatchConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => {
                    let mut config =
                        if quick { MatchConfig::quick() } else { MatchConfig::default() };
                    config.officiating.profile = OfficiatingProfile::from_env_or_default();
                    config
                }
            };

            let request = MatchRequest {
                schema_version: SCHEMA_VERSION,
                seed,
                config: Some(config),
                referee_preset: referee,
                include_notifications: notifications,
            };
            let request_json = serde_json::to_string(&request)?;
            tracing::info!(seed, "simulating match");

            let response_json = simulate_match_json(&request_json)?;
            let response: MatchResponse = serde_json::from_str(&response_json)?;
            print_report(&response.report);

            if let Some(path) = output {
                std::fs::write(&path, &response_json)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("\nReport saved to: {}", path.display());
            }
        }

        Commands::Presets => {
            for name in PRESET_NAMES {
                let profile = OfficiatingProfile::preset(name)?;
                println!(
                    "{:<18} call >= {:.2}  exclusion >= {:.2}  advantage {:.2}  error {:.2}",
                    name,
                    profile.call_threshold(),
                    profile.exclusion_threshold(),
                    profile.advantage_orientation,
                    profile.error_rate
                );
            }
        }

        Commands::DefaultConfig { quick } => {
            let config = if quick { MatchConfig::quick() } else { MatchConfig::default() };
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn print_report(report: &MatchReport) {
    println!("Final: Home {} - {} Away (seed {})", report.home_goals, report.away_goals, report.seed);
    match report.winner() {
        Some(team) => println!("Winner: {}", team),
        None => println!("Draw"),
    }
    println!("Match time: {:.0}s over {} quarters", report.match_secs, report.quarters_played);

    for team in TeamId::BOTH {
        let t = report.team(team);
        println!("\n{}", team);
        println!(
            "   Fouls {}  exclusions {}  penalties conceded {}  removed {}",
            t.stats.ordinary_fouls,
            t.stats.exclusions,
            t.stats.penalties_conceded,
            t.stats.permanent_exclusions
        );
        println!("   Turnovers {}  timeouts {}", t.stats.turnovers, t.stats.timeouts_used);
        println!("   Defense {}  offense {}", t.tactics.defense, t.tactics.offense);
        println!(
            "   Read opponent as {} ({:.0}% over {} samples)",
            t.learner.detected,
            t.learner.confidence * 100.0,
            t.learner.samples
        );
    }

    let r = &report.referee;
    println!(
        "\nReferee: {} seen, {} called, {} let go, {} advantages ({} converted), {} errors",
        r.violations_seen,
        r.calls,
        r.ignored,
        r.advantages_played,
        r.advantages_converted,
        r.erroneous_calls
    );
}
