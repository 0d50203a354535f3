use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{BattlecardError, Result};
use crate::domain::{AnalysisSource, CompetitorAnalysis, Outcome, Swot, TalkingPoints};
use crate::store::Store;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| BattlecardError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            BattlecardError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn row_to_analysis(row: &Row<'_>) -> rusqlite::Result<CompetitorAnalysis> {
        let source = match (
            row.get::<_, String>(4)?.as_str(),
            row.get::<_, Option<String>>(5)?,
        ) {
            ("url", Some(url)) => AnalysisSource::Url { url },
            ("shared", _) => AnalysisSource::Shared,
            _ => AnalysisSource::Paste,
        };

        Ok(CompetitorAnalysis {
            id: row.get(0)?,
            company_name: row.get(1)?,
            analyzed_at: row
                .get::<_, String>(3)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
            source,
            raw_content: row.get(6)?,
            pricing: Self::json_column(row, 7),
            features: Self::json_column(row, 8),
            positioning: Self::json_column(row, 9),
            social_proof: Self::json_column(row, 10),
            calls_to_action: Self::json_column(row, 11),
            extracted_quotes: Self::json_column(row, 12),
            swot: row
                .get::<_, Option<String>>(13)?
                .and_then(|s| serde_json::from_str(&s).ok()),
            talking_points: row
                .get::<_, Option<String>>(14)?
                .and_then(|s| serde_json::from_str(&s).ok()),
            price_history: Self::json_column(row, 15),
            outcomes: Self::json_column(row, 16),
        })
    }

    /// Sections are written by this store, but a corrupted column degrades
    /// to its default rather than poisoning every read.
    fn json_column<T: serde::de::DeserializeOwned + Default>(row: &Row<'_>, idx: usize) -> T {
        row.get::<_, String>(idx)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    fn write(&self, analysis: &CompetitorAnalysis, update_existing: bool) -> Result<()> {
        let conn = self.lock()?;

        let sql = if update_existing {
            "UPDATE competitors SET company_name = ?2, company_key = ?3, analyzed_at = ?4,
                 source_type = ?5, source_url = ?6, raw_content = ?7, pricing = ?8,
                 features = ?9, positioning = ?10, social_proof = ?11, calls_to_action = ?12,
                 extracted_quotes = ?13, swot = ?14, talking_points = ?15,
                 price_history = ?16, outcomes = ?17
             WHERE id = ?1"
        } else {
            "INSERT INTO competitors (id, company_name, company_key, analyzed_at, source_type,
                 source_url, raw_content, pricing, features, positioning, social_proof,
                 calls_to_action, extracted_quotes, swot, talking_points, price_history, outcomes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
        };

        conn.execute(
            sql,
            params![
                analysis.id,
                analysis.company_name,
                analysis.company_name.to_lowercase(),
                analysis.analyzed_at.to_rfc3339(),
                analysis.source.kind(),
                analysis.source.url(),
                analysis.raw_content,
                serde_json::to_string(&analysis.pricing)?,
                serde_json::to_string(&analysis.features)?,
                serde_json::to_string(&analysis.positioning)?,
                serde_json::to_string(&analysis.social_proof)?,
                serde_json::to_string(&analysis.calls_to_action)?,
                serde_json::to_string(&analysis.extracted_quotes)?,
                analysis
                    .swot
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
                analysis
                    .talking_points
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
                serde_json::to_string(&analysis.price_history)?,
                serde_json::to_string(&analysis.outcomes)?,
            ],
        )?;

        Ok(())
    }
}

const SELECT_COLUMNS: &str = "id, company_name, company_key, analyzed_at, source_type, source_url,
    raw_content, pricing, features, positioning, social_proof, calls_to_action,
    extracted_quotes, swot, talking_points, price_history, outcomes";

impl Store for SqliteStore {
    fn save(&self, analysis: CompetitorAnalysis) -> Result<CompetitorAnalysis> {
        let existing = self.get_by_company(&analysis.company_name)?;

        match existing {
            Some(previous) => {
                let merged = CompetitorAnalysis::merge_resave(&previous, analysis);
                self.write(&merged, true)?;
                Ok(merged)
            }
            None => {
                self.write(&analysis, false)?;
                Ok(analysis)
            }
        }
    }

    fn get(&self, id: &str) -> Result<Option<CompetitorAnalysis>> {
        let conn = self.lock()?;
        let result = conn
            .query_row(
                &format!("SELECT {} FROM competitors WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                Self::row_to_analysis,
            )
            .optional()?;
        Ok(result)
    }

    fn get_by_company(&self, company_name: &str) -> Result<Option<CompetitorAnalysis>> {
        let conn = self.lock()?;
        let result = conn
            .query_row(
                &format!(
                    "SELECT {} FROM competitors WHERE company_key = ?1",
                    SELECT_COLUMNS
                ),
                params![company_name.to_lowercase()],
                Self::row_to_analysis,
            )
            .optional()?;
        Ok(result)
    }

    fn get_all(&self) -> Result<Vec<CompetitorAnalysis>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM competitors ORDER BY company_key",
            SELECT_COLUMNS
        ))?;

        let analyses = stmt
            .query_map([], Self::row_to_analysis)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(analyses)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM competitors WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn set_swot(&self, id: &str, swot: &Swot) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE competitors SET swot = ?1 WHERE id = ?2",
            params![serde_json::to_string(swot)?, id],
        )?;
        Ok(())
    }

    fn set_talking_points(&self, id: &str, talking_points: &TalkingPoints) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE competitors SET talking_points = ?1 WHERE id = ?2",
            params![serde_json::to_string(talking_points)?, id],
        )?;
        Ok(())
    }

    fn add_outcome(&self, id: &str, outcome: &Outcome) -> Result<()> {
        let mut outcomes = self
            .get(id)?
            .ok_or_else(|| BattlecardError::CompetitorNotFound(id.to_string()))?
            .outcomes;
        outcomes.push(outcome.clone());

        let conn = self.lock()?;
        conn.execute(
            "UPDATE competitors SET outcomes = ?1 WHERE id = ?2",
            params![serde_json::to_string(&outcomes)?, id],
        )?;
        Ok(())
    }
}
