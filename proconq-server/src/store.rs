//! Pluggable credential storage, following the `SessionBackend` trait shape:
//! only a SQLite-backed implementation ships, matching the single
//! relational file the protocol requires, but callers depend on the trait.

use std::fmt;

use rusqlite::{params, Connection};

use crate::registry::GUEST;

/// A user's stored credential material.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub name: String,
    pub salt: String,
    pub hash: String,
}

/// Errors from the credential store.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Hash(bcrypt::BcryptError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(e) => write!(f, "sqlite error: {e}"),
            Self::Hash(e) => write!(f, "password hashing error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e)
    }
}

impl From<bcrypt::BcryptError> for StoreError {
    fn from(e: bcrypt::BcryptError) -> Self {
        Self::Hash(e)
    }
}

/// An abstraction over where and how credentials are persisted.
pub trait CredentialStore: Send {
    fn register(&mut self, name: &str, password: &str) -> Result<bool, StoreError>;
    fn verify(&mut self, name: &str, password: &str) -> Result<bool, StoreError>;
    fn delete(&mut self, name: &str) -> Result<bool, StoreError>;
    fn list(&mut self) -> Result<Vec<Credential>, StoreError>;
    fn exists(&mut self, name: &str) -> Result<bool, StoreError>;
}

/// The sole shipped backend: one SQLite file with a single `users` table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                name     TEXT PRIMARY KEY,
                salt     TEXT NOT NULL,
                password TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    /// Pre-seed `ADMIN` with `password` if it does not already exist.
    ///
    /// Resolves the "admin bootstrapping" open question: `ADMIN` is reserved
    /// and only ever created through this path, never through `register`.
    pub fn seed_admin(&mut self, password: &str) -> Result<(), StoreError> {
        if !self.exists("ADMIN")? {
            let salt = generate_salt();
            let hash = bcrypt::hash(format!("{salt}{password}"), bcrypt::DEFAULT_COST)?;
            self.conn.execute(
                "INSERT INTO users (name, salt, password) VALUES (?1, ?2, ?3)",
                params!["ADMIN", salt, hash],
            )?;
        }
        Ok(())
    }
}

fn generate_salt() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..16).map(|_| rng.sample(rand::distributions::Alphanumeric) as char).collect()
}

impl CredentialStore for SqliteStore {
    fn register(&mut self, name: &str, password: &str) -> Result<bool, StoreError> {
        if name == GUEST || self.exists(name)? {
            return Ok(false);
        }
        let salt = generate_salt();
        let hash = bcrypt::hash(format!("{salt}{password}"), bcrypt::DEFAULT_COST)?;
        self.conn.execute(
            "INSERT INTO users (name, salt, password) VALUES (?1, ?2, ?3)",
            params![name, salt, hash],
        )?;
        Ok(true)
    }

    fn verify(&mut self, name: &str, password: &str) -> Result<bool, StoreError> {
        if name == GUEST {
            return Ok(false);
        }
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT salt, password FROM users WHERE name = ?1",
                params![name],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .ok();
        let Some((salt, hash)) = row else { return Ok(false) };
        Ok(bcrypt::verify(format!("{salt}{password}"), &hash)?)
    }

    fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        let affected = self.conn.execute("DELETE FROM users WHERE name = ?1", params![name])?;
        Ok(affected > 0)
    }

    fn list(&mut self) -> Result<Vec<Credential>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT name, salt, password FROM users")?;
        let rows = stmt
            .query_map([], |r| {
                Ok(Credential { name: r.get(0)?, salt: r.get(1)?, hash: r.get(2)? })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    fn exists(&mut self, name: &str) -> Result<bool, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE name = ?1",
            params![name],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE users (name TEXT PRIMARY KEY, salt TEXT NOT NULL, password TEXT NOT NULL);",
        )
        .unwrap();
        SqliteStore { conn }
    }

    #[test]
    fn register_then_verify() {
        let mut store = in_memory();
        assert!(store.register("alice", "pw1").unwrap());
        assert!(store.verify("alice", "pw1").unwrap());
        assert!(!store.verify("alice", "wrong").unwrap());
    }

    #[test]
    fn duplicate_register_fails() {
        let mut store = in_memory();
        assert!(store.register("alice", "pw1").unwrap());
        assert!(!store.register("alice", "pw2").unwrap());
    }

    #[test]
    fn guest_cannot_register_or_verify() {
        let mut store = in_memory();
        assert!(!store.register("GUEST", "pw").unwrap());
        assert!(!store.verify("GUEST", "pw").unwrap());
    }

    #[test]
    fn delete_reports_whether_a_row_was_removed() {
        let mut store = in_memory();
        store.register("alice", "pw1").unwrap();
        assert!(store.delete("alice").unwrap());
        assert!(!store.delete("alice").unwrap());
    }

    #[test]
    fn admin_seeded_once() {
        let mut store = in_memory();
        store.seed_admin("secret").unwrap();
        assert!(store.verify("ADMIN", "secret").unwrap());
        // Re-seeding with a different password must not overwrite the first.
        store.seed_admin("different").unwrap();
        assert!(store.verify("ADMIN", "secret").unwrap());
    }
}
