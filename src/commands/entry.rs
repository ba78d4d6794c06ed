use chrono::Local;
use clap::{Args, Subcommand};
use std::io::{self, Write};
use sugarlog_core::{Classifier, Entry, Insulin, InsulinKind, TimeOfDay};
use uuid::Uuid;

use super::{parse_date, OutputFormat};
use crate::db::EntryRepository;
use crate::render::format_sugar;

#[derive(Args)]
pub struct EntryCommand {
    #[command(subcommand)]
    pub command: EntrySubcommand,
}

#[derive(Subcommand)]
pub enum EntrySubcommand {
    /// Record a new measurement, injection or meal
    Add {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Time (HH:MM), defaults to now
        #[arg(long, short)]
        time: Option<TimeOfDay>,

        /// Blood sugar in mmol/L
        #[arg(long, short)]
        sugar: Option<f64>,

        /// Insulin type (rapid, short, long-acting, mixed)
        #[arg(long = "insulin", value_name = "TYPE", requires = "units")]
        insulin_type: Option<InsulinKind>,

        /// Insulin units
        #[arg(long, short, requires = "insulin_type")]
        units: Option<u8>,

        /// What was eaten
        #[arg(long, short)]
        food: Option<String>,

        /// Bread units eaten (steps of 0.5)
        #[arg(long, short, requires = "food", default_value_t = 0.0)]
        bread_units: f64,
    },

    /// Change an existing entry
    Edit {
        /// Entry ID (UUID) or DATE_TIME key, e.g. 2025-01-15_08:30
        identifier: String,

        /// New date (YYYY-MM-DD)
        #[arg(long, short)]
        date: Option<String>,

        /// New time (HH:MM)
        #[arg(long, short)]
        time: Option<TimeOfDay>,

        /// New blood sugar in mmol/L
        #[arg(long, short, conflicts_with = "clear_sugar")]
        sugar: Option<f64>,

        /// Remove the sugar reading
        #[arg(long)]
        clear_sugar: bool,

        /// New insulin type
        #[arg(long = "insulin", value_name = "TYPE", conflicts_with = "clear_insulin")]
        insulin_type: Option<InsulinKind>,

        /// New insulin units
        #[arg(long, short, conflicts_with = "clear_insulin")]
        units: Option<u8>,

        /// Remove the insulin dose
        #[arg(long)]
        clear_insulin: bool,

        /// New food description
        #[arg(long, short, conflicts_with = "clear_food")]
        food: Option<String>,

        /// New bread units
        #[arg(long, short, conflicts_with = "clear_food")]
        bread_units: Option<f64>,

        /// Remove the meal (bread units are reset to 0)
        #[arg(long)]
        clear_food: bool,
    },

    /// Delete an entry
    Delete {
        /// Entry ID (UUID) or DATE_TIME key
        identifier: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Show an entry and how its reading was classified
    Show {
        /// Entry ID (UUID) or DATE_TIME key
        identifier: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl EntryCommand {
    pub async fn run(
        &self,
        repo: &EntryRepository,
        classifier: &Classifier,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            EntrySubcommand::Add {
                date,
                time,
                sugar,
                insulin_type,
                units,
                food,
                bread_units,
            } => {
                let now = Local::now();
                let date = match date {
                    Some(d) => parse_date(d)?,
                    None => now.date_naive(),
                };
                let time = time.unwrap_or_else(|| TimeOfDay::from_naive_time(now.time()));

                let mut entry = Entry::new(date, time);
                if let Some(sugar) = sugar {
                    entry = entry.with_sugar(*sugar);
                }
                if let (Some(kind), Some(units)) = (insulin_type, units) {
                    entry = entry.with_insulin(Insulin::new(*kind, *units));
                }
                if let Some(food) = food {
                    entry = entry.with_food(food.trim(), *bread_units);
                }
                entry.validate()?;

                let created = repo.append(&entry).await?;
                let siblings = repo.get_day(created.date).await?;

                println!("Recorded entry:");
                println!();
                print_entry_details(&created, &siblings, classifier);
                Ok(())
            }

            EntrySubcommand::Edit {
                identifier,
                date,
                time,
                sugar,
                clear_sugar,
                insulin_type,
                units,
                clear_insulin,
                food,
                bread_units,
                clear_food,
            } => {
                let has_updates = date.is_some()
                    || time.is_some()
                    || sugar.is_some()
                    || *clear_sugar
                    || insulin_type.is_some()
                    || units.is_some()
                    || *clear_insulin
                    || food.is_some()
                    || bread_units.is_some()
                    || *clear_food;

                if !has_updates {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let mut entry = resolve_entry(repo, identifier).await?;
                let id = entry.id;

                if let Some(new_date) = date {
                    entry.date = parse_date(new_date)?;
                }
                if let Some(new_time) = time {
                    entry.time = *new_time;
                }

                if *clear_sugar {
                    entry.sugar = None;
                } else if let Some(new_sugar) = sugar {
                    entry.sugar = Some(*new_sugar);
                }

                if *clear_insulin {
                    entry.insulin = None;
                } else if insulin_type.is_some() || units.is_some() {
                    let current = entry.insulin;
                    let kind = insulin_type
                        .or(current.map(|i| i.kind))
                        .ok_or("--insulin is required when the entry has no insulin yet")?;
                    let units = units
                        .or(current.map(|i| i.units))
                        .ok_or("--units is required when the entry has no insulin yet")?;
                    entry.insulin = Some(Insulin::new(kind, units));
                }

                if *clear_food {
                    entry.comment.clear();
                    entry.bread_units = 0.0;
                } else {
                    if let Some(new_food) = food {
                        entry.comment = new_food.trim().to_string();
                    }
                    if let Some(new_bread_units) = bread_units {
                        entry.bread_units = *new_bread_units;
                    }
                }

                entry.validate()?;

                let updated = repo.replace(id, &entry).await?;
                let siblings = repo.get_day(updated.date).await?;

                println!("Updated entry:");
                println!();
                print_entry_details(&updated, &siblings, classifier);
                Ok(())
            }

            EntrySubcommand::Delete { identifier, force } => {
                let entry = resolve_entry(repo, identifier).await?;

                if !force {
                    print!("Delete entry {} {}? [y/N] ", entry.date, entry.time);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                repo.remove(entry.id).await?;
                println!("Deleted entry {} {}", entry.date, entry.time);

                if repo.get_day(entry.date).await?.is_empty() {
                    println!("No entries left on {}; the day was removed.", entry.date);
                }
                Ok(())
            }

            EntrySubcommand::Show { identifier, format } => {
                let entry = resolve_entry(repo, identifier).await?;
                let siblings = repo.get_day(entry.date).await?;

                match format {
                    OutputFormat::Json => {
                        let view = crate::render::EntryView {
                            level: classifier.classify(&entry, &siblings),
                            entry,
                        };
                        println!("{}", serde_json::to_string_pretty(&view)?);
                    }
                    OutputFormat::Text => {
                        print_entry_details(&entry, &siblings, classifier);
                    }
                }
                Ok(())
            }
        }
    }
}

/// Finds an entry by UUID or by a `DATE_TIME` key.
async fn resolve_entry(
    repo: &EntryRepository,
    identifier: &str,
) -> Result<Entry, Box<dyn std::error::Error>> {
    if let Ok(id) = Uuid::parse_str(identifier) {
        return repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| format!("Entry not found: {}", identifier).into());
    }

    let (date, time) = identifier
        .split_once('_')
        .ok_or_else(|| format!("Invalid entry identifier '{}'. Use a UUID or DATE_TIME.", identifier))?;
    let date = parse_date(date)?;
    let time: TimeOfDay = time.parse()?;

    let mut matches: Vec<Entry> = repo
        .get_day(date)
        .await?
        .into_iter()
        .filter(|e| e.time == time)
        .collect();

    match matches.len() {
        0 => Err(format!("Entry not found: {}", identifier).into()),
        1 => Ok(matches.remove(0)),
        n => Err(format!(
            "{} entries are logged at {}; use the entry ID instead",
            n, identifier
        )
        .into()),
    }
}

fn print_entry_details(entry: &Entry, siblings: &[Entry], classifier: &Classifier) {
    println!("  Date: {}", entry.date);
    println!("  Time: {}", entry.time);
    println!(
        "  Sugar: {}",
        format_sugar(entry.sugar, classifier.classify(entry, siblings))
    );
    if let Some(insulin) = &entry.insulin {
        println!("  Insulin: {}", insulin);
    }
    if entry.has_food() {
        println!("  Food: {} ({} BU)", entry.comment.trim(), entry.bread_units);
    }
    println!();
    println!("Entry ID: {}", entry.id);
}
