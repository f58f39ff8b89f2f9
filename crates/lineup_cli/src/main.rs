//! Line-up CLI
//!
//! Demo walk-through, scripted editing sessions, formation listing.

mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lineup_core::{
    EventLog, Formation, LineupEvent, LineupSession, LineupSheet, Role, SessionConfig,
};
use std::path::PathBuf;

use script::Script;

#[derive(Parser)]
#[command(name = "lineup")]
#[command(about = "Pick starters and substitutes without picking anyone twice", long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill and compact a bench line with a built-in squad
    Demo {
        /// Print the final sheet as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Replay an editing script
    Run {
        /// Session config (.json, .yaml or .yml); defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Script file (.json, .yaml or .yml)
        #[arg(long)]
        script: PathBuf,

        /// Also print every selection and bench event
        #[arg(long, default_value = "false")]
        events: bool,

        /// Write the final sheet to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List supported formations
    Formations,
}

const DEMO_SQUAD: [&str; 18] = [
    "Moreau", "Okafor", "Lindqvist", "Brandt", "Castillo", "Haddad", "Novak", "Petrov",
    "Adeyemi", "Ferreira", "Kowalski", "Tanaka", "Rossi", "Mbeki", "Salazar", "Ivanov", "Duarte",
    "Keane",
];

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Demo { json } => run_demo(json),
        Commands::Run { config, script, events, out } => run_script(config, script, events, out),
        Commands::Formations => {
            for formation in Formation::ALL {
                let counts = formation.role_counts();
                println!(
                    "{:<8} GK {}  DF {}  MF {}  FW {}",
                    formation.code(),
                    counts.goalkeepers,
                    counts.defenders,
                    counts.midfielders,
                    counts.forwards
                );
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn run_demo(json: bool) -> Result<()> {
    let squad: Vec<String> = DEMO_SQUAD.iter().map(|s| s.to_string()).collect();
    let mut session = LineupSession::new(SessionConfig::default(), squad)?;
    let journal = EventLog::new();
    session.journal(&journal)?;

    let starters = [
        "Moreau", "Lindqvist", "Brandt", "Castillo", "Haddad", "Adeyemi", "Ferreira", "Kowalski",
        "Tanaka", "Salazar", "Ivanov",
    ];
    for (slot, name) in starters.iter().enumerate() {
        session.pick_starter(slot, &name.to_string())?;
    }
    journal.take();

    println!("Bench (defenders), filled left to right:");
    for name in ["Novak", "Petrov"] {
        let position = session.pick_substitute(Role::Defender, &name.to_string())?;
        println!("   {} -> slot {}", name, position);
    }
    println!("   available next: {:?}", session.available_for_bench(Role::Defender)?);

    println!("\nRemoving slot 0 closes the gap:");
    session.remove_substitute(Role::Defender, 0)?;
    println!("   {:?}", session.substitutes(Role::Defender)?);

    print_events(&journal.take());

    let lineup = session.starting_lineup()?;
    println!("\nStarting eleven ({}):", lineup.formation());
    for role in Role::ALL {
        println!("   {}: {}", role, lineup.by_role(role).join(", "));
    }

    let sheet = session.sheet()?;
    if json {
        println!("\n{}", serde_json::to_string_pretty(&sheet)?);
    } else {
        print_sheet(&sheet);
    }
    Ok(())
}

fn run_script(
    config: Option<PathBuf>,
    script: PathBuf,
    events: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let config = match config {
        Some(path) => SessionConfig::from_path(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    let script = Script::load(&script)?;

    let mut session = LineupSession::new(config, script.squad.clone())?;
    let journal = EventLog::new();
    session.journal(&journal)?;

    let outcomes = script.run(&mut session)?;
    for outcome in outcomes.iter().filter(|o| o.error.is_some()) {
        let reason = outcome.error.as_deref().unwrap_or_default();
        eprintln!("step {} rejected: {}", outcome.step, reason);
    }
    if events {
        print_events(&journal.take());
    }

    let sheet = session.sheet()?;
    let rendered = serde_json::to_string_pretty(&sheet)?;
    match out {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            println!("Sheet saved to: {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn print_events(events: &[LineupEvent<String>]) {
    println!("\nEvents:");
    for event in events {
        match event {
            LineupEvent::SelectionMade { dealer, option } => {
                println!("   {} picked {}", dealer, option)
            }
            LineupEvent::SelectionCleared { dealer, option } => {
                println!("   {} dropped {}", dealer, option)
            }
            LineupEvent::BecameFilled { sequence, dealer } => {
                println!("   {} filled at {}", sequence, dealer)
            }
            LineupEvent::BecameEmpty { sequence, dealer } => {
                println!("   {} opened at {}", sequence, dealer)
            }
        }
    }
}

fn print_sheet(sheet: &LineupSheet<String>) {
    println!("\nSheet taken {}", sheet.taken_at.format("%Y-%m-%d %H:%M:%S"));
    println!("   Starters: {}/{}", sheet.starters_filled(), sheet.starters.len());
    for line in &sheet.bench {
        let names: Vec<&str> = line.players.iter().map(|p| p.as_deref().unwrap_or("-")).collect();
        println!("   Bench {}: [{}]", line.role, names.join(", "));
    }
}
