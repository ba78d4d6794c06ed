mod config_cmd;
mod data;
mod diary;
mod entry;
mod streak;

pub use config_cmd::ConfigCommand;
pub use data::DataCommand;
pub use diary::DiaryCommand;
pub use entry::EntryCommand;
pub use streak::StreakCommand;

use chrono::NaiveDate;
use clap::ValueEnum;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", s))
}
