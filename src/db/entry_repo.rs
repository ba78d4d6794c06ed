use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use sugarlog_core::{DayGroup, DayRecord, Entry, Insulin, InsulinKind, TimeOfDay};
use uuid::Uuid;

use super::StoreError;

/// Durable diary storage. Days are not stored on their own: a day exists
/// while at least one entry carries its date.
pub struct EntryRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: String,
    date: String,
    time: String,
    sugar: Option<f64>,
    insulin_type: Option<String>,
    insulin_units: Option<i64>,
    bread_units: f64,
    comment: String,
    created_at: String,
}

const INSERT_ENTRY: &str = r#"
    INSERT INTO entries (id, date, time, sugar, insulin_type, insulin_units, bread_units, comment, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPSERT_ENTRY: &str = r#"
    INSERT OR REPLACE INTO entries (id, date, time, sugar, insulin_type, insulin_units, bread_units, comment, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

impl EntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Adds an entry to the day matching its date.
    pub async fn append(&self, entry: &Entry) -> Result<Entry, StoreError> {
        let mut conn = self.pool.acquire().await?;
        write_entry(&mut conn, INSERT_ENTRY, entry).await?;
        tracing::info!("Added entry {} on {} {}", entry.id, entry.date, entry.time);

        self.get_by_id(entry.id)
            .await?
            .ok_or(StoreError::NotFound(entry.id))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Entry>, StoreError> {
        let row: Option<EntryRow> = sqlx::query_as("SELECT * FROM entries WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(hydrate_entry).transpose()
    }

    /// Entries of one day in the order they were stored, not by time.
    pub async fn get_day(&self, date: NaiveDate) -> Result<Vec<Entry>, StoreError> {
        let rows: Vec<EntryRow> =
            sqlx::query_as("SELECT * FROM entries WHERE date = ? ORDER BY rowid")
                .bind(date.to_string())
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(hydrate_entry).collect()
    }

    /// The whole diary, oldest day first.
    pub async fn get_all_days(&self) -> Result<Vec<DayGroup>, StoreError> {
        let rows: Vec<EntryRow> = sqlx::query_as("SELECT * FROM entries ORDER BY date, rowid")
            .fetch_all(&self.pool)
            .await?;

        let entries = rows
            .into_iter()
            .map(hydrate_entry)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("Loaded {} entries", entries.len());

        Ok(DayGroup::group_entries(entries))
    }

    /// The whole diary in the exchange format, oldest day first.
    pub async fn export_days(&self) -> Result<Vec<DayRecord>, StoreError> {
        let days = self.get_all_days().await?;
        Ok(days.iter().map(DayRecord::from_group).collect())
    }

    /// Days between `from` and `to` inclusive, oldest first.
    pub async fn list_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DayGroup>, StoreError> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            "SELECT * FROM entries WHERE date >= ? AND date <= ? ORDER BY date, rowid",
        )
        .bind(from.to_string())
        .bind(to.to_string())
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(hydrate_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DayGroup::group_entries(entries))
    }

    /// Deletes an entry. Returns false when no entry has this id.
    pub async fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            tracing::info!("Deleted entry {}", id);
        }
        Ok(removed)
    }

    /// Replaces the entry stored under `id` with `entry`, keeping the id and
    /// creation time. Moving an entry to another date deletes and re-inserts
    /// it in one transaction; otherwise the row is updated in place.
    pub async fn replace(&self, id: Uuid, entry: &Entry) -> Result<Entry, StoreError> {
        let existing = self.get_by_id(id).await?.ok_or(StoreError::NotFound(id))?;

        let mut updated = entry.clone();
        updated.id = id;
        updated.created_at = existing.created_at;

        if existing.date == updated.date {
            sqlx::query(
                r#"
                UPDATE entries
                SET time = ?, sugar = ?, insulin_type = ?, insulin_units = ?, bread_units = ?, comment = ?
                WHERE id = ?
                "#,
            )
            .bind(updated.time.to_string())
            .bind(updated.sugar)
            .bind(updated.insulin.map(|i| i.kind.to_string()))
            .bind(updated.insulin.map(|i| i64::from(i.units)))
            .bind(updated.bread_units)
            .bind(&updated.comment)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
            tracing::info!("Updated entry {} in place", id);
        } else {
            let mut tx = self.pool.begin().await?;
            sqlx::query("DELETE FROM entries WHERE id = ?")
                .bind(id.to_string())
                .execute(&mut *tx)
                .await?;
            write_entry(&mut tx, INSERT_ENTRY, &updated).await?;
            tx.commit().await?;
            tracing::info!(
                "Moved entry {} from {} to {}",
                id,
                existing.date,
                updated.date
            );
        }

        self.get_by_id(id).await?.ok_or(StoreError::NotFound(id))
    }

    /// Writes imported days in one transaction. Entries whose id already
    /// exists are overwritten; with `replace_all` the diary is cleared first.
    /// Returns the number of entries written.
    pub async fn import_days(
        &self,
        days: &[DayGroup],
        replace_all: bool,
    ) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;

        if replace_all {
            let cleared = sqlx::query("DELETE FROM entries")
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::info!("Cleared {} existing entries before import", cleared);
        }

        let mut written = 0;
        for day in days {
            if day.is_empty() {
                tracing::warn!("Skipping {} in import: no entries", day.date);
                continue;
            }
            for entry in &day.entries {
                write_entry(&mut tx, UPSERT_ENTRY, entry).await?;
                written += 1;
            }
        }

        tx.commit().await?;
        tracing::info!("Imported {} entries across {} days", written, days.len());
        Ok(written)
    }
}

async fn write_entry(
    conn: &mut SqliteConnection,
    sql: &str,
    entry: &Entry,
) -> Result<(), sqlx::Error> {
    sqlx::query(sql)
        .bind(entry.id.to_string())
        .bind(entry.date.to_string())
        .bind(entry.time.to_string())
        .bind(entry.sugar)
        .bind(entry.insulin.map(|i| i.kind.to_string()))
        .bind(entry.insulin.map(|i| i64::from(i.units)))
        .bind(entry.bread_units)
        .bind(&entry.comment)
        .bind(entry.created_at.to_rfc3339())
        .execute(conn)
        .await?;
    Ok(())
}

fn hydrate_entry(row: EntryRow) -> Result<Entry, StoreError> {
    let corrupt = |reason: String| StoreError::CorruptRow {
        id: row.id.clone(),
        reason,
    };

    let id = Uuid::parse_str(&row.id).map_err(|e| corrupt(format!("bad id: {}", e)))?;
    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
        .map_err(|e| corrupt(format!("bad date '{}': {}", row.date, e)))?;
    let time: TimeOfDay = row.time.parse().map_err(|e| corrupt(format!("{}", e)))?;

    let insulin = match (&row.insulin_type, row.insulin_units) {
        (Some(kind), Some(units)) => {
            let kind: InsulinKind = kind.parse().map_err(corrupt)?;
            let units = u8::try_from(units)
                .map_err(|_| corrupt(format!("insulin units {} out of range", units)))?;
            Some(Insulin::new(kind, units))
        }
        (None, None) => None,
        _ => return Err(corrupt("insulin type and units must be stored together".into())),
    };

    let created_at = DateTime::parse_from_rfc3339(&row.created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok(Entry {
        id,
        date,
        time,
        sugar: row.sugar,
        insulin,
        bread_units: row.bread_units,
        comment: row.comment,
        created_at,
    })
}
