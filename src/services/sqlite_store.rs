//! SQLite persistence for user accounts, analysis history and the company
//! directory.

use crate::error::Result;
use crate::types::{AnalysisRecord, Company, Role, User};
use rusqlite::{params, Connection, OptionalExtension};
use std::io::Read;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Maximum rows returned by [`SqliteStore::list_companies`].
pub const COMPANY_LIST_LIMIT: usize = 1000;

/// SQLite store shared by the auth, history and company endpoints.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> std::result::Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub fn new_in_memory() -> std::result::Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    fn init_schema(&self) -> std::result::Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                salt TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'free',
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS analysis_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                symbol TEXT NOT NULL,
                indicators TEXT NOT NULL,
                result TEXT,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_history_username
             ON analysis_history(username, created_at DESC)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS companies (
                symbol TEXT PRIMARY KEY,
                name TEXT NOT NULL
            )",
            [],
        )?;

        info!("SQLite schema initialized");
        Ok(())
    }

    // ========== User Methods ==========

    /// Insert a new user. Returns `false` if the username is taken.
    pub fn create_user(&self, user: &User) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO users (id, username, password_hash, salt, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id,
                user.username,
                user.password_hash,
                user.salt,
                user.role.as_str(),
                user.created_at,
            ],
        )?;
        if inserted > 0 {
            debug!("Created user {}", user.username);
        }
        Ok(inserted > 0)
    }

    pub fn get_user(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let user = conn
            .query_row(
                "SELECT id, username, password_hash, salt, role, created_at
                 FROM users WHERE username = ?1",
                params![username],
                |row| {
                    let role: String = row.get(4)?;
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                        salt: row.get(3)?,
                        role: Role::from_id(&role).unwrap_or(Role::Free),
                        created_at: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    pub fn set_role(&self, username: &str, role: Role) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE users SET role = ?1 WHERE username = ?2",
            params![role.as_str(), username],
        )?;
        Ok(updated > 0)
    }

    // ========== History Methods ==========

    /// Store an analysis result for a user. Returns the new row id.
    pub fn save_analysis(
        &self,
        username: &str,
        symbol: &str,
        indicators: &str,
        result: &serde_json::Value,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let now = chrono::Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO analysis_history (username, symbol, indicators, result, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![username, symbol, indicators, result.to_string(), now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// A user's most recent analyses, newest first.
    pub fn get_user_history(&self, username: &str, limit: usize) -> Result<Vec<AnalysisRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, username, symbol, indicators, result, created_at
             FROM analysis_history
             WHERE username = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![username, limit as i64], |row| {
            let raw: Option<String> = row.get(4)?;
            Ok(AnalysisRecord {
                id: row.get(0)?,
                username: row.get(1)?,
                symbol: row.get(2)?,
                indicators: row.get(3)?,
                result: raw
                    .filter(|s| !s.is_empty())
                    .and_then(|s| serde_json::from_str(&s).ok()),
                created_at: row.get(5)?,
            })
        })?;

        let records = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    // ========== Company Methods ==========

    /// Insert a company unless the symbol is already present.
    pub fn upsert_company(&self, company: &Company) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO companies (symbol, name) VALUES (?1, ?2)",
            params![company.symbol, company.name],
        )?;
        Ok(inserted > 0)
    }

    /// Import a `Symbol,Name` CSV with headers. Rows with a blank symbol or
    /// name are skipped. Returns the number of new companies.
    pub fn import_companies_csv<R: Read>(&self, reader: R) -> Result<usize> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let symbol_idx = headers.iter().position(|h| h.trim() == "Symbol");
        let name_idx = headers.iter().position(|h| h.trim() == "Name");
        let (Some(symbol_idx), Some(name_idx)) = (symbol_idx, name_idx) else {
            warn!("Company CSV is missing Symbol/Name headers");
            return Ok(0);
        };

        let mut added = 0;
        for record in csv_reader.records() {
            let record = record?;
            let symbol = record.get(symbol_idx).unwrap_or("").trim();
            let name = record.get(name_idx).unwrap_or("").trim();
            if symbol.is_empty() || name.is_empty() {
                continue;
            }
            let company = Company {
                symbol: symbol.to_string(),
                name: name.to_string(),
            };
            if self.upsert_company(&company)? {
                added += 1;
            }
        }

        info!("Imported {} companies", added);
        Ok(added)
    }

    /// Import the company CSV at `path`.
    pub fn import_companies_file<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let file = std::fs::File::open(path.as_ref())
            .map_err(|e| anyhow::anyhow!("open {}: {}", path.as_ref().display(), e))?;
        self.import_companies_csv(file)
    }

    pub fn list_companies(&self, limit: usize) -> Result<Vec<Company>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT symbol, name FROM companies ORDER BY rowid LIMIT ?1")?;
        let rows = stmt.query_map(params![limit.min(COMPANY_LIST_LIMIT) as i64], |row| {
            Ok(Company {
                symbol: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// First company whose name contains `name`, ignoring ASCII case.
    pub fn find_company_by_name(&self, name: &str) -> Result<Option<Company>> {
        let conn = self.conn.lock().unwrap();
        let pattern = format!("%{}%", name.trim().to_lowercase());
        let company = conn
            .query_row(
                "SELECT symbol, name FROM companies
                 WHERE lower(name) LIKE ?1
                 ORDER BY rowid LIMIT 1",
                params![pattern],
                |row| {
                    Ok(Company {
                        symbol: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(company)
    }

    pub fn company_count(&self) -> usize {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM companies", [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
            .unwrap_or(0)
    }
}
