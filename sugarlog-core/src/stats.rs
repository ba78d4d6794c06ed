use serde::{Deserialize, Serialize};

use crate::classifier::Classifier;
use crate::models::Entry;

/// Totals shown under a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayStats {
    pub total_bread_units: f64,
    pub total_insulin_units: u32,
    pub average_sugar: Option<f64>,
    pub readings: usize,
    pub high_readings: usize,
}

impl DayStats {
    pub fn for_entries(entries: &[Entry], classifier: &Classifier) -> Self {
        let mut stats = DayStats::default();
        let mut sugar_sum = 0.0;

        for entry in entries {
            stats.total_bread_units += entry.bread_units;
            if let Some(insulin) = &entry.insulin {
                stats.total_insulin_units += u32::from(insulin.units);
            }
            if let Some(sugar) = entry.sugar {
                sugar_sum += sugar;
                stats.readings += 1;
                if classifier.is_high(entry, entries) {
                    stats.high_readings += 1;
                }
            }
        }

        if stats.readings > 0 {
            stats.average_sugar = Some(sugar_sum / stats.readings as f64);
        }

        stats
    }
}
