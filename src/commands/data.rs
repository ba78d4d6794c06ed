use clap::{Args, Subcommand};
use std::fs;
use std::path::PathBuf;
use sugarlog_core::{DayGroup, DayRecord};

use crate::db::EntryRepository;

#[derive(Args)]
pub struct DataCommand {
    #[command(subcommand)]
    pub command: DataSubcommand,
}

#[derive(Subcommand)]
pub enum DataSubcommand {
    /// Export the whole diary as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import a diary exported as JSON
    Import {
        /// File to read
        file: PathBuf,

        /// Clear the existing diary before importing
        #[arg(long)]
        replace: bool,
    },
}

impl DataCommand {
    pub async fn run(&self, repo: &EntryRepository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DataSubcommand::Export { output } => {
                let records = repo.export_days().await?;
                let json = serde_json::to_string_pretty(&records)?;

                match output {
                    Some(path) => {
                        fs::write(path, json + "\n")
                            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
                        let entries: usize = records.iter().map(|r| r.entries.len()).sum();
                        println!(
                            "Exported {} entries over {} days to {}",
                            entries,
                            records.len(),
                            path.display()
                        );
                    }
                    None => println!("{}", json),
                }
                Ok(())
            }

            DataSubcommand::Import { file, replace } => {
                let contents = fs::read_to_string(file)
                    .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
                let days = parse_diary(&contents)?;

                let written = repo.import_days(&days, *replace).await?;
                println!("Imported {} entries from {}", written, file.display());
                Ok(())
            }
        }
    }
}

/// Parses and validates an exported diary. Nothing is written when any entry
/// fails, so a bad file leaves the store untouched.
fn parse_diary(contents: &str) -> Result<Vec<DayGroup>, Box<dyn std::error::Error>> {
    let records: Vec<DayRecord> =
        serde_json::from_str(contents).map_err(|e| format!("Invalid diary file: {}", e))?;

    let days: Vec<DayGroup> = records.into_iter().map(DayRecord::into_group).collect();
    for day in &days {
        for entry in &day.entries {
            entry
                .validate()
                .map_err(|e| format!("Invalid entry {} {}: {}", day.date, entry.time, e))?;
        }
    }

    Ok(days)
}
