use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, Row, ToSql};
use uuid::Uuid;

use crate::error::{DietlogError, Result};
use crate::model::{Meal, MealUpdate, User};
use crate::storage::StorageBackend;

/// SQLite-backed storage for Dietlog sessions and meals.
///
/// Uses a single `Connection` behind `Arc<Mutex<>>` so it can be shared
/// across async tasks. All blocking SQLite calls go through
/// [`with_conn`](Self::with_conn) which runs them on the Tokio blocking
/// thread-pool.
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SqliteStorage {
    /// Open (or create) a file-backed SQLite database at `path`.
    ///
    /// Sets WAL journal mode and enables foreign keys, then creates all
    /// tables and indexes if they don't already exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)
            .map_err(|e| DietlogError::Storage(format!("failed to open SQLite database: {e}")))?;

        Self::configure_and_init(conn, path)
    }

    /// Open an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            DietlogError::Storage(format!("failed to open in-memory SQLite database: {e}"))
        })?;

        Self::configure_and_init(conn, PathBuf::from(":memory:"))
    }

    /// Return the path this database was opened with (`:memory:` for in-memory).
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ── helpers ────────────────────────────────────────────────────────

    /// Shared initialisation: pragmas + table creation.
    fn configure_and_init(conn: Connection, path: PathBuf) -> Result<Self> {
        // WAL mode for better concurrent-read performance.
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(|e| DietlogError::Storage(format!("failed to set WAL mode: {e}")))?;

        // Enforce foreign-key constraints.
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| DietlogError::Storage(format!("failed to enable foreign keys: {e}")))?;

        let storage = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        storage.create_tables()?;
        Ok(storage)
    }

    /// Create all tables and indexes (idempotent).
    fn create_tables(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DietlogError::Storage(format!("failed to acquire database lock: {e}")))?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS meals (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL REFERENCES users(session_id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT,
                date_time TEXT NOT NULL,
                is_on_diet INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_meals_session_id ON meals(session_id);
            ",
        )
        .map_err(|e| DietlogError::Storage(format!("failed to create tables: {e}")))?;

        Ok(())
    }

    /// Run a blocking closure against the SQLite connection on the Tokio
    /// blocking thread-pool. This is the primary way trait methods
    /// interact with the database.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| {
                DietlogError::Storage(format!("failed to acquire database lock: {e}"))
            })?;
            f(&conn)
        })
        .await
        .map_err(|e| DietlogError::Storage(format!("task join error: {e}")))?
    }
}

// ── row mapping ────────────────────────────────────────────────────────

fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn meal_from_row(row: &Row<'_>) -> rusqlite::Result<Meal> {
    // Storage keeps the flag as an INTEGER; normalize to bool here so
    // the analyzer and API responses only ever see a true boolean.
    let on_diet: i64 = row.get(5)?;

    Ok(Meal {
        id: uuid_column(row, 0)?,
        session_id: uuid_column(row, 1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        date_time: datetime_column(row, 4)?,
        is_on_diet: on_diet != 0,
        created_at: datetime_column(row, 6)?,
        updated_at: datetime_column(row, 7)?,
    })
}

const MEAL_COLUMNS: &str = "id, session_id, name, description, date_time, is_on_diet, created_at, updated_at";

fn storage_err(e: rusqlite::Error) -> DietlogError {
    DietlogError::Storage(e.to_string())
}

/// Map a unique-constraint violation on `users` to a `Conflict`,
/// distinguishing a taken username from an already-registered token.
fn user_insert_err(e: rusqlite::Error) -> DietlogError {
    if let rusqlite::Error::SqliteFailure(inner, Some(msg)) = &e {
        if inner.code == ErrorCode::ConstraintViolation {
            if msg.contains("users.username") {
                return DietlogError::Conflict("Username already taken.".into());
            }
            if msg.contains("users.session_id") {
                return DietlogError::Conflict("Session already registered.".into());
            }
        }
    }
    storage_err(e)
}

impl StorageBackend for SqliteStorage {
    async fn create_user(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO users (id, session_id, username) VALUES (?1, ?2, ?3)",
                rusqlite::params![
                    user.id.to_string(),
                    user.session_id.to_string(),
                    user.username,
                ],
            )
            .map_err(user_insert_err)?;
            Ok(())
        })
        .await
    }

    async fn session_exists(&self, session_id: Uuid) -> Result<bool> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE session_id = ?1)",
                [session_id.to_string()],
                |row| row.get(0),
            )
            .map_err(storage_err)
        })
        .await
    }

    async fn insert_meal(&self, meal: &Meal) -> Result<()> {
        let meal = meal.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO meals (id, session_id, name, description, date_time, is_on_diet, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    meal.id.to_string(),
                    meal.session_id.to_string(),
                    meal.name,
                    meal.description,
                    meal.date_time.to_rfc3339(),
                    meal.is_on_diet as i64,
                    meal.created_at.to_rfc3339(),
                    meal.updated_at.to_rfc3339(),
                ],
            )
            .map_err(storage_err)?;
            Ok(())
        })
        .await
    }

    async fn list_meals(&self, session_id: Uuid) -> Result<Vec<Meal>> {
        self.with_conn(move |conn| {
            // rowid order is the insertion-order contract the streak
            // analyzer depends on.
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {MEAL_COLUMNS} FROM meals WHERE session_id = ?1 ORDER BY rowid"
                ))
                .map_err(storage_err)?;

            let meals = stmt
                .query_map([session_id.to_string()], meal_from_row)
                .map_err(storage_err)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(storage_err)?;

            Ok(meals)
        })
        .await
    }

    async fn get_meal(&self, session_id: Uuid, id: Uuid) -> Result<Meal> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {MEAL_COLUMNS} FROM meals WHERE id = ?1 AND session_id = ?2"),
                [id.to_string(), session_id.to_string()],
                meal_from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    DietlogError::NotFound("Meal not found.".into())
                }
                other => storage_err(other),
            })
        })
        .await
    }

    async fn update_meal(&self, session_id: Uuid, id: Uuid, update: &MealUpdate) -> Result<()> {
        let update = update.clone();
        self.with_conn(move |conn| {
            // Build the SET list from whichever fields are present. The
            // ownership check lives in the WHERE predicate of this same
            // statement, so there is no check-then-act gap.
            let mut sets: Vec<&str> = Vec::new();
            let mut values: Vec<Box<dyn ToSql>> = Vec::new();

            if let Some(name) = update.name {
                sets.push("name = ?");
                values.push(Box::new(name));
            }
            if let Some(description) = update.description {
                sets.push("description = ?");
                values.push(Box::new(description));
            }
            if let Some(date_time) = update.date_time {
                sets.push("date_time = ?");
                values.push(Box::new(date_time.to_rfc3339()));
            }
            if let Some(is_on_diet) = update.is_on_diet {
                sets.push("is_on_diet = ?");
                values.push(Box::new(is_on_diet as i64));
            }

            sets.push("updated_at = ?");
            values.push(Box::new(Utc::now().to_rfc3339()));

            values.push(Box::new(id.to_string()));
            values.push(Box::new(session_id.to_string()));

            let sql = format!(
                "UPDATE meals SET {} WHERE id = ? AND session_id = ?",
                sets.join(", ")
            );

            let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
            let affected = conn.execute(&sql, params.as_slice()).map_err(storage_err)?;

            if affected == 0 {
                return Err(DietlogError::NotFound("Meal not found.".into()));
            }
            Ok(())
        })
        .await
    }

    async fn delete_meal(&self, session_id: Uuid, id: Uuid) -> Result<()> {
        self.with_conn(move |conn| {
            let affected = conn
                .execute(
                    "DELETE FROM meals WHERE id = ?1 AND session_id = ?2",
                    [id.to_string(), session_id.to_string()],
                )
                .map_err(storage_err)?;

            if affected == 0 {
                return Err(DietlogError::NotFound("Meal not found.".into()));
            }
            Ok(())
        })
        .await
    }
}
