use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use sugarlog_core::{sort_days_by_date, Classifier, DayGroup};

use super::{parse_date, OutputFormat};
use crate::db::EntryRepository;
use crate::render::{format_day, DayView};

/// Days shown when no range is given.
const DEFAULT_DAYS: i64 = 7;

#[derive(Args)]
pub struct DiaryCommand {
    /// First day to show (YYYY-MM-DD), defaults to a week ago
    #[arg(long, conflicts_with = "all")]
    pub from: Option<String>,

    /// Last day to show (YYYY-MM-DD), defaults to today
    #[arg(long, conflicts_with = "all")]
    pub to: Option<String>,

    /// Show the whole diary
    #[arg(long, short)]
    pub all: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl DiaryCommand {
    pub async fn run(
        &self,
        repo: &EntryRepository,
        classifier: &Classifier,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut days: Vec<DayGroup> = if self.all {
            repo.get_all_days().await?
        } else {
            let (from, to) = self.range(Local::now().date_naive())?;
            repo.list_range(from, to).await?
        };
        sort_days_by_date(&mut days);

        let views: Vec<DayView> = days
            .iter()
            .map(|day| DayView::build(day, classifier))
            .collect();

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&views)?);
            }
            OutputFormat::Text => {
                if views.is_empty() {
                    println!("No entries found");
                    return Ok(());
                }
                let blocks: Vec<String> = views.iter().map(format_day).collect();
                println!("{}", blocks.join("\n\n"));
            }
        }

        Ok(())
    }

    fn range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), String> {
        let to = match &self.to {
            Some(s) => parse_date(s)?,
            None => today,
        };
        let from = match &self.from {
            Some(s) => parse_date(s)?,
            None => to - Duration::days(DEFAULT_DAYS - 1),
        };
        if from > to {
            return Err(format!("--from {} is after --to {}", from, to));
        }
        Ok((from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(from: Option<&str>, to: Option<&str>) -> DiaryCommand {
        DiaryCommand {
            from: from.map(String::from),
            to: to.map(String::from),
            all: false,
            format: OutputFormat::Text,
        }
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_range_defaults_to_last_week() {
        let (from, to) = command(None, None).range(date("2025-01-15")).unwrap();
        assert_eq!(from, date("2025-01-09"));
        assert_eq!(to, date("2025-01-15"));
    }

    #[test]
    fn test_range_counts_back_from_explicit_end() {
        let (from, to) = command(None, Some("2025-03-02"))
            .range(date("2025-06-01"))
            .unwrap();
        assert_eq!(from, date("2025-02-24"));
        assert_eq!(to, date("2025-03-02"));
    }

    #[test]
    fn test_range_rejects_reversed_bounds() {
        let err = command(Some("2025-01-10"), Some("2025-01-01"))
            .range(date("2025-01-15"))
            .unwrap_err();
        assert!(err.contains("is after"));
    }
}
