//! `worldvote-admin` — operator CLI for the voting database.
//!
//! Works directly against the SQLite file; the server does not need to be
//! running (and should not be, for bulk imports).

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Worldvote operator CLI.
#[derive(Parser, Debug)]
#[command(name = "worldvote-admin", about = "Worldvote operator CLI")]
struct Cli {
    /// Path to the SQLite database file.
    #[arg(long = "db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load students from a JSON file, hashing passwords on the way in.
    ImportStudents {
        /// JSON array of {"email", "password", "fullName"?}.
        file: PathBuf,
    },

    /// Load participants from a JSON file.
    ImportParticipants {
        /// JSON array of {"serialNumber", "videoUrl"}.
        file: PathBuf,
    },

    /// Recompute like counters from the vote rows.
    Recount {
        /// Recount a single participant (default: all).
        #[arg(long)]
        id: Option<i64>,
    },

    /// Delete a student and their votes, correcting affected counters.
    RemoveStudent {
        id: i64,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::ImportStudents { file } => commands::import::students(&cli.db, &file),
        Commands::ImportParticipants { file } => commands::import::participants(&cli.db, &file),
        Commands::Recount { id } => commands::maintenance::recount(&cli.db, id),
        Commands::RemoveStudent { id, yes } => {
            if !yes {
                eprint!("Delete student {id} and all their votes? [y/N]: ");
                let mut s = String::new();
                std::io::stdin().read_line(&mut s)?;
                if !s.trim().eq_ignore_ascii_case("y") {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            commands::maintenance::remove_student(&cli.db, id)
        }
    }
}
