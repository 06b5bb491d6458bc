//! SQLite-backed problem store
//!
//! Schema:
//! - `tags(id, name UNIQUE)`
//! - `problems(id, lc_num UNIQUE, title, importance, created_at,
//!   last_attempt_at, last_review_at, snooze_until, review_count)`
//! - `problem_tags(problem_id, tag_id)` many-to-many
//! - `attempts(id, problem_id, attempt_at, notes)`
//! - `reviews(id, problem_id, reviewed_at, grade)` review log
//!
//! All date columns hold `YYYY-MM-DD` text; unparseable values read
//! back as absent rather than failing the row. Every mutation is
//! followed by a best-effort file backup (two most recent kept).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use thiserror::Error;

use crate::dashboard::models::{ImportanceSplit, TagCount, Totals};
use crate::review::scheduler::{due_score, is_due, Grade};

use super::models::{render_notes_html, Attempt, Importance, NewAttempt, Problem};

const DB_FILE: &str = "kata.db";
const BACKUP_KEEP: usize = 2;

/// Tags seeded into a fresh database.
const DEFAULT_TAGS: [&str; 10] = [
    "Array",
    "DP",
    "Greedy",
    "HashMap",
    "Two Pointers",
    "Sliding Window",
    "Graph",
    "Tree",
    "Stack",
    "Binary Search",
];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("problem not found: {0}")]
    ProblemNotFound(i64),

    #[error("attempt not found: {0}")]
    AttemptNotFound(i64),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// The problem library: tags, problems, attempts, and the review log.
pub struct ProblemStore {
    conn: Connection,
    db_path: PathBuf,
    backup_dir: PathBuf,
}

impl ProblemStore {
    /// Open (creating if needed) the store under a data directory.
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let db_path = data_dir.join(DB_FILE);
        let conn = Connection::open(&db_path)?;

        let store = Self {
            conn,
            db_path,
            backup_dir: data_dir.join("backups"),
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL
            );
            CREATE TABLE IF NOT EXISTS problems (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                lc_num TEXT UNIQUE NOT NULL,
                title TEXT NOT NULL,
                importance TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_attempt_at TEXT,
                last_review_at TEXT,
                snooze_until TEXT,
                review_count INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS problem_tags (
                problem_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (problem_id, tag_id),
                FOREIGN KEY (problem_id) REFERENCES problems (id),
                FOREIGN KEY (tag_id) REFERENCES tags (id)
            );
            CREATE TABLE IF NOT EXISTS attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                problem_id INTEGER NOT NULL,
                attempt_at TEXT NOT NULL,
                notes TEXT NOT NULL,
                FOREIGN KEY (problem_id) REFERENCES problems (id)
            );
            CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                problem_id INTEGER NOT NULL,
                reviewed_at TEXT NOT NULL,
                grade TEXT NOT NULL,
                FOREIGN KEY (problem_id) REFERENCES problems (id)
            );",
        )?;

        // Databases created before snoozing existed lack the column.
        let has_snooze = self
            .conn
            .prepare("PRAGMA table_info(problems)")?
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<std::result::Result<Vec<String>, _>>()?
            .iter()
            .any(|name| name == "snooze_until");
        if !has_snooze {
            self.conn
                .execute("ALTER TABLE problems ADD COLUMN snooze_until TEXT", [])?;
        }

        for tag in DEFAULT_TAGS {
            self.conn
                .execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", [tag])?;
        }

        Ok(())
    }

    // ==================== Backups ====================

    /// Best-effort copy of the database file after a mutation.
    fn backup(&self) {
        if let Err(e) = self.try_backup() {
            log::warn!("Database backup failed: {}", e);
        }
    }

    fn try_backup(&self) -> Result<()> {
        if !self.db_path.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.backup_dir)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let backup_path = self.backup_dir.join(format!("kata_{}.db", stamp));
        fs::copy(&self.db_path, backup_path)?;

        // Timestamped names sort chronologically; drop the oldest.
        let mut backups: Vec<PathBuf> = fs::read_dir(&self.backup_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with("kata_") && n.ends_with(".db"))
                    .unwrap_or(false)
            })
            .collect();
        backups.sort();
        while backups.len() > BACKUP_KEEP {
            fs::remove_file(backups.remove(0))?;
        }
        Ok(())
    }

    // ==================== Tags ====================

    fn get_or_create_tag(&self, name: &str) -> Result<Option<i64>> {
        let tag = name.trim();
        if tag.is_empty() {
            return Ok(None);
        }
        let existing: Option<i64> = self
            .conn
            .query_row("SELECT id FROM tags WHERE name = ?1", [tag], |row| {
                row.get(0)
            })
            .optional()?;
        if let Some(id) = existing {
            return Ok(Some(id));
        }
        self.conn
            .execute("INSERT INTO tags (name) VALUES (?1)", [tag])?;
        Ok(Some(self.conn.last_insert_rowid()))
    }

    /// All tag names, case-insensitively sorted.
    pub fn list_tags(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM tags ORDER BY name COLLATE NOCASE")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<String>, _>>()?)
    }

    /// Create a tag; blank names are ignored.
    pub fn add_tag(&self, name: &str) -> Result<()> {
        if self.get_or_create_tag(name)?.is_some() {
            self.backup();
        }
        Ok(())
    }

    /// Rename a tag across all problem associations in one UPDATE.
    /// Returns false if either name is blank, the names are equal, the
    /// new name is taken, or the old name does not exist.
    pub fn rename_tag(&self, old: &str, new: &str) -> Result<bool> {
        let old = old.trim();
        let new = new.trim();
        if old.is_empty() || new.is_empty() || old == new {
            return Ok(false);
        }
        let taken: Option<i64> = self
            .conn
            .query_row("SELECT id FROM tags WHERE name = ?1", [new], |row| {
                row.get(0)
            })
            .optional()?;
        if taken.is_some() {
            return Ok(false);
        }
        let updated = self
            .conn
            .execute("UPDATE tags SET name = ?1 WHERE name = ?2", [new, old])?;
        if updated > 0 {
            self.backup();
        }
        Ok(updated > 0)
    }

    // ==================== Attempts ====================

    /// Log an attempt, creating or updating the problem keyed by its
    /// catalog number. An attempt restarts the review clock: it stamps
    /// both activity dates and clears any snooze.
    pub fn add_attempt(&mut self, request: &NewAttempt, attempt_at: NaiveDate) -> Result<i64> {
        let lc_num = request.lc_num.trim();
        let title = request.title.trim();
        let notes = request.notes.trim();
        if lc_num.is_empty() || title.is_empty() || notes.is_empty() {
            return Err(StoreError::InvalidInput(
                "lc_num, title, and notes are required".to_string(),
            ));
        }
        let importance = request
            .importance
            .as_deref()
            .map(Importance::parse)
            .unwrap_or_default();
        let date = attempt_at.to_string();

        let tag_ids: Vec<i64> = request
            .tags
            .iter()
            .filter_map(|name| self.get_or_create_tag(name).transpose())
            .collect::<Result<Vec<i64>>>()?;

        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM problems WHERE lc_num = ?1",
                [lc_num],
                |row| row.get(0),
            )
            .optional()?;

        let problem_id = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE problems
                     SET title = ?1, importance = ?2, last_attempt_at = ?3,
                         last_review_at = ?3, snooze_until = NULL
                     WHERE id = ?4",
                    params![title, importance.as_str(), date, id],
                )?;
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO problems
                     (lc_num, title, importance, created_at, last_attempt_at, last_review_at)
                     VALUES (?1, ?2, ?3, ?4, ?4, ?4)",
                    params![lc_num, title, importance.as_str(), date],
                )?;
                tx.last_insert_rowid()
            }
        };

        if !tag_ids.is_empty() {
            tx.execute(
                "DELETE FROM problem_tags WHERE problem_id = ?1",
                [problem_id],
            )?;
            for tag_id in tag_ids {
                tx.execute(
                    "INSERT OR IGNORE INTO problem_tags (problem_id, tag_id) VALUES (?1, ?2)",
                    params![problem_id, tag_id],
                )?;
            }
        }

        tx.execute(
            "INSERT INTO attempts (problem_id, attempt_at, notes) VALUES (?1, ?2, ?3)",
            params![problem_id, date, notes],
        )?;

        tx.commit()?;
        self.backup();
        Ok(problem_id)
    }

    pub fn update_attempt(&self, attempt_id: i64, notes: &str) -> Result<()> {
        let notes = notes.trim();
        if notes.is_empty() {
            return Err(StoreError::InvalidInput("notes are required".to_string()));
        }
        let updated = self.conn.execute(
            "UPDATE attempts SET notes = ?1 WHERE id = ?2",
            params![notes, attempt_id],
        )?;
        if updated == 0 {
            return Err(StoreError::AttemptNotFound(attempt_id));
        }
        self.backup();
        Ok(())
    }

    /// Delete an attempt; its problem survives even if this was the
    /// last one.
    pub fn delete_attempt(&self, attempt_id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM attempts WHERE id = ?1", [attempt_id])?;
        self.backup();
        Ok(())
    }

    /// Attempts for a problem, newest first.
    pub fn attempts_for(&self, problem_id: i64) -> Result<Vec<Attempt>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, attempt_at, notes FROM attempts
             WHERE problem_id = ?1 ORDER BY attempt_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([problem_id], |row| {
            let notes: String = row.get(2)?;
            Ok(Attempt {
                id: row.get(0)?,
                attempt_at: row.get::<_, String>(1).map(|v| parse_date(Some(v)))?.unwrap_or_default(),
                notes_html: render_notes_html(&notes),
                notes,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<Attempt>, _>>()?)
    }

    // ==================== Problems ====================

    /// List problems with optional text search (catalog number, title,
    /// or tag name) and an any-of tag filter. Tags are aggregated per
    /// problem and attempts counted; most recently attempted first.
    pub fn list_problems(
        &self,
        search: &str,
        tags: &[String],
        today: NaiveDate,
    ) -> Result<Vec<Problem>> {
        let mut query = String::from(
            "SELECT
                p.id, p.lc_num, p.title, p.importance, p.created_at,
                p.last_attempt_at, p.last_review_at, p.snooze_until, p.review_count,
                GROUP_CONCAT(DISTINCT t.name) AS tags,
                COUNT(DISTINCT a.id) AS attempt_count
             FROM problems p
             LEFT JOIN problem_tags pt ON p.id = pt.problem_id
             LEFT JOIN tags t ON pt.tag_id = t.id
             LEFT JOIN attempts a ON p.id = a.problem_id",
        );
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        let search = search.trim();
        if !search.is_empty() {
            let like = format!("%{}%", search);
            conditions.push("(p.lc_num LIKE ?1 OR p.title LIKE ?1 OR t.name LIKE ?1)".to_string());
            params.push(like);
        }

        let tag_values: Vec<&String> = tags
            .iter()
            .filter(|t| !t.trim().is_empty() && t.as_str() != "All")
            .collect();
        if !tag_values.is_empty() {
            let placeholders: Vec<String> = tag_values
                .iter()
                .enumerate()
                .map(|(i, _)| format!("?{}", params.len() + i + 1))
                .collect();
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM problem_tags pt2
                 JOIN tags t2 ON pt2.tag_id = t2.id
                 WHERE pt2.problem_id = p.id AND t2.name IN ({}))",
                placeholders.join(", ")
            ));
            params.extend(tag_values.iter().map(|t| t.to_string()));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" GROUP BY p.id ORDER BY p.last_attempt_at DESC");

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            row_to_problem(row, today)
        })?;
        Ok(rows.collect::<std::result::Result<Vec<Problem>, _>>()?)
    }

    pub fn problem_detail(&self, problem_id: i64, today: NaiveDate) -> Result<Problem> {
        let mut stmt = self.conn.prepare(
            "SELECT
                p.id, p.lc_num, p.title, p.importance, p.created_at,
                p.last_attempt_at, p.last_review_at, p.snooze_until, p.review_count,
                GROUP_CONCAT(DISTINCT t.name) AS tags,
                COUNT(DISTINCT a.id) AS attempt_count
             FROM problems p
             LEFT JOIN problem_tags pt ON p.id = pt.problem_id
             LEFT JOIN tags t ON pt.tag_id = t.id
             LEFT JOIN attempts a ON p.id = a.problem_id
             WHERE p.id = ?1
             GROUP BY p.id",
        )?;
        stmt.query_row([problem_id], |row| row_to_problem(row, today))
            .optional()?
            .ok_or(StoreError::ProblemNotFound(problem_id))
    }

    /// Delete a problem with its tag associations, attempts, and
    /// review log.
    pub fn delete_problem(&self, problem_id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM problem_tags WHERE problem_id = ?1", [problem_id])?;
        self.conn
            .execute("DELETE FROM attempts WHERE problem_id = ?1", [problem_id])?;
        self.conn
            .execute("DELETE FROM reviews WHERE problem_id = ?1", [problem_id])?;
        self.conn
            .execute("DELETE FROM problems WHERE id = ?1", [problem_id])?;
        self.backup();
        Ok(())
    }

    // ==================== Reviews ====================

    /// The head of the review queue: due problems, most overdue first.
    /// The limit is clamped to 1..=5 prompts.
    pub fn due_reviews(&self, limit: usize, today: NaiveDate) -> Result<Vec<Problem>> {
        let limit = limit.clamp(1, 5);
        let mut due: Vec<Problem> = self
            .list_problems("", &[], today)?
            .into_iter()
            .filter(|p| is_due(p, today))
            .collect();
        due.sort_by(|a, b| due_score(b, today).cmp(&due_score(a, today)));
        due.truncate(limit);
        Ok(due)
    }

    /// Record a review: restamp the review date, clear any snooze,
    /// advance the review count per the grade, and append to the
    /// review log.
    pub fn mark_review(&self, problem_id: i64, grade: Grade, today: NaiveDate) -> Result<()> {
        let current: i64 = self
            .conn
            .query_row(
                "SELECT review_count FROM problems WHERE id = ?1",
                [problem_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(StoreError::ProblemNotFound(problem_id))?;

        let date = today.to_string();
        self.conn.execute(
            "UPDATE problems
             SET last_review_at = ?1, review_count = ?2, snooze_until = NULL
             WHERE id = ?3",
            params![date, grade.next_review_count(current), problem_id],
        )?;
        self.conn.execute(
            "INSERT INTO reviews (problem_id, reviewed_at, grade) VALUES (?1, ?2, ?3)",
            params![problem_id, date, grade.as_str()],
        )?;
        self.backup();
        Ok(())
    }

    /// Exclude a problem from due-ranking until the given date.
    pub fn snooze(&self, problem_id: i64, until: NaiveDate) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE problems SET snooze_until = ?1 WHERE id = ?2",
            params![until.to_string(), problem_id],
        )?;
        if updated == 0 {
            return Err(StoreError::ProblemNotFound(problem_id));
        }
        self.backup();
        Ok(())
    }

    // ==================== Dashboard queries ====================

    pub fn totals(&self) -> Result<Totals> {
        let count = |sql: &str| -> Result<i64> {
            Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
        };
        Ok(Totals {
            problems: count("SELECT COUNT(*) FROM problems")?,
            attempts: count("SELECT COUNT(*) FROM attempts")?,
            reviews: count("SELECT COUNT(*) FROM reviews")?,
        })
    }

    pub fn importance_split(&self) -> Result<ImportanceSplit> {
        let mut stmt = self
            .conn
            .prepare("SELECT importance, COUNT(*) FROM problems GROUP BY importance")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut split = ImportanceSplit::default();
        for row in rows {
            let (importance, count) = row?;
            match Importance::parse(&importance) {
                Importance::Low => split.low += count,
                Importance::Medium => split.medium += count,
                Importance::High => split.high += count,
            }
        }
        Ok(split)
    }

    /// Tags by problem count, most used first.
    pub fn top_tags(&self, limit: usize) -> Result<Vec<TagCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.name, COUNT(pt.problem_id) AS cnt
             FROM tags t
             JOIN problem_tags pt ON t.id = pt.tag_id
             GROUP BY t.id
             ORDER BY cnt DESC, t.name COLLATE NOCASE
             LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            Ok(TagCount {
                tag: row.get(0)?,
                count: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<TagCount>, _>>()?)
    }

    pub fn attempt_dates(&self) -> Result<Vec<NaiveDate>> {
        self.dates("SELECT attempt_at FROM attempts")
    }

    pub fn review_dates(&self) -> Result<Vec<NaiveDate>> {
        self.dates("SELECT reviewed_at FROM reviews")
    }

    fn dates(&self, sql: &str) -> Result<Vec<NaiveDate>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut dates = Vec::new();
        for row in rows {
            if let Some(date) = parse_date(Some(row?)) {
                dates.push(date);
            }
        }
        Ok(dates)
    }
}

fn parse_date(value: Option<String>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok())
}

fn row_to_problem(row: &Row, today: NaiveDate) -> std::result::Result<Problem, rusqlite::Error> {
    let tags: Option<String> = row.get(9)?;
    let tags = tags
        .map(|t| {
            t.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    let last_attempt_at = parse_date(row.get(5)?);

    Ok(Problem {
        id: row.get(0)?,
        lc_num: row.get(1)?,
        title: row.get(2)?,
        importance: Importance::parse(&row.get::<_, String>(3)?),
        created_at: parse_date(row.get(4)?),
        last_attempt_at,
        last_review_at: parse_date(row.get(6)?),
        snooze_until: parse_date(row.get(7)?),
        review_count: row.get(8)?,
        attempt_count: row.get(10)?,
        days_since: last_attempt_at.map(|d| (today - d).num_days()),
        tags,
    })
}
