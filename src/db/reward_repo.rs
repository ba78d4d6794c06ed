use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use sugarlog_core::CleanTransition;

use super::StoreError;

/// Remembers which reward dates have already been announced.
pub struct RewardRepository {
    pool: SqlitePool,
}

impl RewardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records the transition's reward as shown. Returns false if its date was
    /// already recorded.
    pub async fn mark_shown(&self, transition: &CleanTransition) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO shown_rewards (date, tier, total, shown_at) VALUES (?, ?, ?, ?)",
        )
        .bind(transition.date.to_string())
        .bind(transition.tier.to_string())
        .bind(i64::from(transition.total))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn shown_dates(&self) -> Result<BTreeSet<NaiveDate>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT date FROM shown_rewards")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|(date,)| {
                NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| StoreError::CorruptRow {
                    id: date.clone(),
                    reason: format!("bad reward date: {}", e),
                })
            })
            .collect()
    }
}
