//! Habit store contract and SQLite implementation.
//!
//! # Responsibility
//! - Stage habit writes and deletes, then commit them in one `save()`.
//! - Keep SQL and column encodings inside the persistence boundary.
//!
//! # Invariants
//! - Staged writes pass `Habit::validate()` before they are accepted.
//! - `save()` applies the whole batch or nothing; a failed batch is discarded.
//! - Read paths reject persisted rows that violate habit invariants.

use crate::db::DbError;
use crate::model::habit::{Habit, HabitId, HabitValidationError};
use chrono::NaiveTime;
use log::{error, info};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TIME_FORMAT: &str = "%H:%M";

const HABIT_COLUMNS: [&str; 10] = [
    "uuid",
    "title",
    "color",
    "week_days",
    "is_reminder_on",
    "reminder_text",
    "notification_time",
    "notification_ids",
    "created_at",
    "updated_at",
];

const HABIT_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    color,
    week_days,
    is_reminder_on,
    reminder_text,
    notification_time,
    notification_ids,
    created_at,
    updated_at
FROM habits";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for habit storage.
#[derive(Debug)]
pub enum RepoError {
    Validation(HabitValidationError),
    Db(DbError),
    NotFound(HabitId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "habit not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted habit data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HabitValidationError> for RepoError {
    fn from(value: HabitValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Unit-of-work store for habit records.
pub trait HabitStore {
    /// Stages an insert-or-update of `habit`.
    fn write(&mut self, habit: &Habit) -> RepoResult<()>;
    /// Stages removal of the habit with `id`.
    fn delete(&mut self, id: HabitId);
    /// Commits every staged change.
    fn save(&mut self) -> RepoResult<()>;
    fn has_pending_changes(&self) -> bool;
    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>>;
    /// Lists committed habits, oldest first.
    fn list_habits(&self) -> RepoResult<Vec<Habit>>;
}

#[derive(Debug, Clone)]
enum StagedChange {
    Write(Habit),
    Delete(HabitId),
}

/// SQLite-backed habit store.
pub struct SqliteHabitStore<'conn> {
    conn: &'conn mut Connection,
    pending: Vec<StagedChange>,
}

impl<'conn> SqliteHabitStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is
    ///   not the habit schema.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_habit_schema(conn)?;
        Ok(Self {
            conn,
            pending: Vec::new(),
        })
    }

    fn apply(&mut self, changes: &[StagedChange]) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        for change in changes {
            match change {
                StagedChange::Write(habit) => {
                    tx.execute(
                        "INSERT INTO habits (
                            uuid,
                            title,
                            color,
                            week_days,
                            is_reminder_on,
                            reminder_text,
                            notification_time,
                            notification_ids
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                        ON CONFLICT(uuid) DO UPDATE SET
                            title = excluded.title,
                            color = excluded.color,
                            week_days = excluded.week_days,
                            is_reminder_on = excluded.is_reminder_on,
                            reminder_text = excluded.reminder_text,
                            notification_time = excluded.notification_time,
                            notification_ids = excluded.notification_ids,
                            updated_at = (strftime('%s', 'now') * 1000);",
                        params![
                            habit.uuid.to_string(),
                            habit.title.as_str(),
                            habit.color.as_str(),
                            encode_list(&habit.week_days)?,
                            habit.is_reminder_on,
                            habit.reminder_text.as_str(),
                            habit.notification_time.format(TIME_FORMAT).to_string(),
                            encode_list(&habit.notification_ids)?,
                        ],
                    )?;
                }
                StagedChange::Delete(id) => {
                    let changed =
                        tx.execute("DELETE FROM habits WHERE uuid = ?1;", [id.to_string()])?;
                    if changed == 0 {
                        return Err(RepoError::NotFound(*id));
                    }
                }
            }
        }

        tx.commit()?;
        Ok(())
    }
}

impl HabitStore for SqliteHabitStore<'_> {
    fn write(&mut self, habit: &Habit) -> RepoResult<()> {
        habit.validate()?;
        self.pending.push(StagedChange::Write(habit.clone()));
        Ok(())
    }

    fn delete(&mut self, id: HabitId) {
        self.pending.push(StagedChange::Delete(id));
    }

    fn save(&mut self) -> RepoResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let changes = std::mem::take(&mut self.pending);
        match self.apply(&changes) {
            Ok(()) => {
                info!(
                    "event=habit_store_save module=repo status=ok changes={}",
                    changes.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=habit_store_save module=repo status=error changes={} error={}",
                    changes.len(),
                    err
                );
                Err(err)
            }
        }
    }

    fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_habit_row(row)?));
        }
        Ok(None)
    }

    fn list_habits(&self) -> RepoResult<Vec<Habit>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in habits.uuid"))
    })?;

    let time_text: String = row.get("notification_time")?;
    let notification_time = NaiveTime::parse_from_str(&time_text, TIME_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid time `{time_text}` in habits.notification_time"
        ))
    })?;

    let is_reminder_on = match row.get::<_, i64>("is_reminder_on")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_reminder_on value `{other}` in habits.is_reminder_on"
            )));
        }
    };

    let habit = Habit {
        uuid,
        title: row.get("title")?,
        color: row.get("color")?,
        week_days: decode_list(row, "week_days")?,
        is_reminder_on,
        reminder_text: row.get("reminder_text")?,
        notification_time,
        notification_ids: decode_list(row, "notification_ids")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    habit.validate()?;
    Ok(habit)
}

fn encode_list(values: &[String]) -> RepoResult<String> {
    serde_json::to_string(values)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode list: {err}")))
}

fn decode_list(row: &Row<'_>, column: &'static str) -> RepoResult<Vec<String>> {
    let text: String = row.get(column)?;
    serde_json::from_str(&text).map_err(|err| {
        RepoError::InvalidData(format!("invalid JSON list in habits.{column}: {err}"))
    })
}

fn ensure_habit_schema(conn: &Connection) -> RepoResult<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'habits');",
        [],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(RepoError::MissingRequiredTable("habits"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(habits);")?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    for column in HABIT_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "habits",
                column,
            });
        }
    }
    Ok(())
}
