use clap::{Parser, Subcommand, ValueEnum};
use paddock::config::SnapshotSource;
use paddock::snapshot::{CompetitionId, DriverId, Snapshot, TeamId};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

const EXIT_SUCCESS: i32 = 0;
const EXIT_LOAD: i32 = 2;
const EXIT_NOT_FOUND: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ranked driver standings (default if no subcommand)
    Standings {
        /// Competition id (defaults to the configured or only competition)
        competition: Option<CompetitionId>,
    },
    /// Pole sitter and race winner of every round
    Rounds {
        /// Competition id (defaults to the configured or only competition)
        competition: Option<CompetitionId>,
    },
    /// Driver profile: team, career stats, competitions, recent races
    Driver {
        /// Driver id
        id: DriverId,
    },
    /// List drivers with their number and team
    Drivers {
        /// Only drivers whose name contains this (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },
    /// Team drivers with their points across all competitions
    Team {
        /// Team id
        id: TeamId,
    },
    /// List teams, most competitions entered first
    Teams {
        /// Only teams whose name contains this (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },
    /// List competitions in the loaded snapshots
    Competitions,
    /// Write a competition's standings and round highlights as JSON
    Export {
        /// Competition id
        competition: CompetitionId,
        /// Destination file (replaced atomically)
        path: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "paddock")]
#[command(about = "Motorsport championship standings from race results", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and point breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/paddock/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Snapshot file to read instead of the configured ones (repeatable)
    #[arg(short, long, global = true)]
    snapshot: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            std::process::exit(EXIT_LOAD);
        }
    }
}

/// Pick the competition a command applies to: explicit argument, then the
/// configured default, then the snapshot's only competition.
fn resolve_competition(
    explicit: Option<CompetitionId>,
    default: Option<CompetitionId>,
    snapshot: &Snapshot,
) -> CompetitionId {
    if let Some(id) = explicit.or(default) {
        return id;
    }
    if let [only] = snapshot.competitions.as_slice() {
        return only.id;
    }
    eprintln!(
        "No competition given and the snapshot holds {} competitions.",
        snapshot.competitions.len()
    );
    eprintln!("Pass a competition id, or set default_competition in the config file.");
    eprintln!("Run `paddock competitions` to list them.");
    std::process::exit(EXIT_CONFIG);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    paddock::logging::init(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Standings { competition: None });
    let start_time = Instant::now();

    // Snapshot sources: --snapshot flags win over the config file
    let (sources, default_competition) = if !cli.snapshot.is_empty() {
        let sources: Vec<SnapshotSource> = cli
            .snapshot
            .iter()
            .map(|path| SnapshotSource {
                name: None,
                path: path.clone(),
            })
            .collect();
        (sources, None)
    } else {
        let config_path = cli.config.map(PathBuf::from);
        let config = match paddock::config::load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };

        if config.snapshots.is_empty() {
            eprintln!("No snapshots configured in config file.");
            eprintln!("Add snapshots to ~/.config/paddock/config.yaml:");
            eprintln!("  snapshots:");
            eprintln!("    - name: season-2024");
            eprintln!("      path: season-2024.yaml");
            std::process::exit(EXIT_CONFIG);
        }
        (config.snapshots, config.default_competition)
    };

    for (i, source) in sources.iter().enumerate() {
        tracing::debug!("Snapshot {}: {}", i + 1, source.label());
    }

    let snapshot = match paddock::load::load_snapshots(&sources).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(EXIT_LOAD);
        }
    };

    if let Err(errors) = paddock::snapshot::validate_snapshot(&snapshot) {
        eprintln!("Snapshot errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let use_colors = paddock::output::should_use_colors();

    match command {
        Commands::Standings { competition } => {
            let id = resolve_competition(competition, default_competition, &snapshot);
            let report = match paddock::report::competition_report(&snapshot, id) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_NOT_FOUND);
                }
            };

            match cli.format {
                OutputFormat::Json => print_json(&report.standings),
                OutputFormat::Tsv => {
                    println!("{}", paddock::output::format_standings_tsv(&report.standings))
                }
                OutputFormat::Table => {
                    println!("{}", paddock::output::format_standings_table(&report, use_colors));
                    if cli.verbose {
                        println!();
                        for row in &report.standings {
                            println!(
                                "{:>2}. {}: {}",
                                row.rank,
                                row.name,
                                paddock::output::format_breakdown(&row.breakdown)
                            );
                        }
                    }
                }
            }
        }
        Commands::Rounds { competition } => {
            let id = resolve_competition(competition, default_competition, &snapshot);
            let report = match paddock::report::competition_report(&snapshot, id) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_NOT_FOUND);
                }
            };

            match cli.format {
                OutputFormat::Json => print_json(&report.rounds),
                OutputFormat::Tsv => {
                    println!("{}", paddock::output::format_highlights_tsv(&report.rounds))
                }
                OutputFormat::Table => {
                    let table =
                        paddock::output::format_highlights_table(&report.rounds, use_colors);
                    println!("{}", table)
                }
            }
        }
        Commands::Driver { id } => {
            let report = match paddock::report::driver_report(&snapshot, id) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_NOT_FOUND);
                }
            };

            match cli.format {
                OutputFormat::Json => print_json(&report),
                _ => println!("{}", paddock::output::format_driver_report(&report, use_colors)),
            }
        }
        Commands::Drivers { search } => {
            let drivers = paddock::report::driver_summaries(&snapshot, search.as_deref());
            match cli.format {
                OutputFormat::Json => print_json(&drivers),
                _ => println!("{}", paddock::output::format_drivers(&drivers)),
            }
        }
        Commands::Team { id } => {
            let report = match paddock::report::team_report(&snapshot, id) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_NOT_FOUND);
                }
            };

            match cli.format {
                OutputFormat::Json => print_json(&report),
                _ => println!("{}", paddock::output::format_team_report(&report, use_colors)),
            }
        }
        Commands::Teams { search } => {
            let teams = paddock::report::team_summaries(&snapshot, search.as_deref());
            match cli.format {
                OutputFormat::Json => print_json(&teams),
                _ => println!("{}", paddock::output::format_teams(&teams)),
            }
        }
        Commands::Competitions => match cli.format {
            OutputFormat::Json => print_json(&snapshot.competitions),
            _ => println!("{}", paddock::output::format_competitions(&snapshot.competitions)),
        },
        Commands::Export { competition, path } => {
            let report = match paddock::report::competition_report(&snapshot, competition) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_NOT_FOUND);
                }
            };

            if let Err(e) = paddock::report::save_report(&path, &report) {
                eprintln!("Export failed: {:#}", e);
                std::process::exit(EXIT_LOAD);
            }
            println!(
                "Wrote standings for {} ({} drivers) to {}",
                report.name,
                report.standings.len(),
                path.display()
            );
        }
    }

    tracing::debug!("Done in {:?}", start_time.elapsed());
    std::process::exit(EXIT_SUCCESS);
}
