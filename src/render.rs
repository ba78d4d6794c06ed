//! Text and JSON views of the diary.

use chrono::NaiveDate;
use serde::Serialize;
use sugarlog_core::{
    sorted_by_time_of_day, Classifier, CleanTransition, DayGroup, DayStats, Entry, RewardTier,
    StreakState, SugarLevel,
};

/// An entry together with its classification.
#[derive(Debug, Serialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: Entry,
    pub level: Option<SugarLevel>,
}

/// A day as shown in the diary: entries earliest first, plus totals.
#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub entries: Vec<EntryView>,
    pub stats: DayStats,
}

impl DayView {
    pub fn build(day: &DayGroup, classifier: &Classifier) -> Self {
        let entries = sorted_by_time_of_day(&day.entries)
            .into_iter()
            .map(|entry| EntryView {
                entry: entry.clone(),
                level: classifier.classify(entry, &day.entries),
            })
            .collect();

        Self {
            date: day.date,
            entries,
            stats: DayStats::for_entries(&day.entries, classifier),
        }
    }
}

pub fn format_sugar(sugar: Option<f64>, level: Option<SugarLevel>) -> String {
    match (sugar, level) {
        (Some(sugar), Some(SugarLevel::High)) => format!("{:.1} mmol/L [HIGH]", sugar),
        (Some(sugar), _) => format!("{:.1} mmol/L [ok]", sugar),
        (None, _) => "-".to_string(),
    }
}

pub fn format_entry_line(entry: &Entry, level: Option<SugarLevel>) -> String {
    let mut details = Vec::new();
    if let Some(insulin) = &entry.insulin {
        details.push(format!("insulin {}", insulin));
    }
    if entry.has_food() {
        details.push(format!(
            "{} ({} BU)",
            entry.comment.trim(),
            entry.bread_units
        ));
    }

    let line = format!("  {}  {:<22}", entry.time, format_sugar(entry.sugar, level));
    if details.is_empty() {
        line.trim_end().to_string()
    } else {
        format!("{}{}", line, details.join(" | "))
    }
}

/// Footer line, or `None` for a day with nothing to total.
pub fn format_stats(stats: &DayStats) -> Option<String> {
    let mut parts = Vec::new();
    if stats.total_bread_units > 0.0 {
        parts.push(format!("{} BU", stats.total_bread_units));
    }
    if stats.total_insulin_units > 0 {
        parts.push(format!("{} u insulin", stats.total_insulin_units));
    }
    if let Some(average) = stats.average_sugar {
        parts.push(format!("avg {:.1} mmol/L", average));
        parts.push(format!("{} of {} high", stats.high_readings, stats.readings));
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!("  Total: {}", parts.join(" | ")))
    }
}

pub fn format_day(view: &DayView) -> String {
    let mut lines = vec![
        format!("{} ({})", view.date, view.date.format("%A")),
        "-".repeat(60),
    ];
    for item in &view.entries {
        lines.push(format_entry_line(&item.entry, item.level));
    }
    if let Some(footer) = format_stats(&view.stats) {
        lines.push(format!("  {}", "-".repeat(56)));
        lines.push(footer);
    }
    lines.join("\n")
}

pub fn format_streak(state: &StreakState) -> String {
    let mut lines = vec![
        "Clean-day streak".to_string(),
        "================".to_string(),
        format!("Current streak:    {}", state.current_streak),
        format!("Best streak:       {}", state.best_streak),
        format!("Clean transitions: {}", state.total_clean),
        format!(
            "Rewards:           {} regular, {} unique, {} premium",
            state.regular, state.unique, state.premium
        ),
    ];
    if let Some(date) = state.last_transition_date {
        lines.push(format!("Last clean day:    {}", date));
    }
    lines.join("\n")
}

pub fn format_reward(transition: &CleanTransition) -> String {
    let label = match transition.tier {
        RewardTier::Regular => "regular reward",
        RewardTier::Unique => "UNIQUE reward",
        RewardTier::Premium => "PREMIUM reward",
    };
    format!(
        "{}: {} unlocked ({} clean day{})",
        transition.date,
        label,
        transition.total,
        if transition.total == 1 { "" } else { "s" }
    )
}
