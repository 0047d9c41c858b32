//! sqlite-adapter — SQLite implementation of the AddressRepository port.
//!
//! Purpose
//! - Provide a lightweight, file-based store for the address table.
//! - Implements the `AddressRepository` trait from the `domain` crate.
//!
//! Notes
//! - Uses `rusqlite` with the `bundled` feature for portability.
//! - The repo only remembers the database path. Every operation opens its own
//!   connection and drops it before returning, on success and on error alike.
//! - Ids come from `INTEGER PRIMARY KEY AUTOINCREMENT`, so deleted ids are
//!   never handed out again.

use std::path::{Path, PathBuf};
use std::time::Duration;

use domain::{Address, AddressId, AddressPatch, AddressRepository, CoreError, NewAddress};
use rusqlite::{params, Connection, OptionalExtension};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed address repository.
pub struct SqliteRepo {
    path: PathBuf,
}

impl SqliteRepo {
    /// Open (or create) a SQLite database at the given path and ensure schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| CoreError::Repository(format!("create {}: {e}", dir.display())))?;
        }
        let repo = Self { path };
        let conn = repo.connect()?;
        init_schema(&conn)?;
        tracing::debug!(path = %repo.path.display(), "sqlite schema ready");
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection scoped to the caller. It closes when dropped.
    fn connect(&self) -> Result<Connection, CoreError> {
        let conn = Connection::open(&self.path).map_err(map_sqerr)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(map_sqerr)?;
        Ok(conn)
    }
}

fn init_schema(conn: &Connection) -> Result<(), CoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS addresses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_addresses_name ON addresses(name);
        "#,
    )
    .map_err(map_sqerr)
}

fn map_sqerr<E: std::fmt::Display>(e: E) -> CoreError {
    CoreError::Repository(format!("sqlite error: {e}"))
}

fn row_to_address(row: &rusqlite::Row) -> rusqlite::Result<Address> {
    Ok(Address {
        id: AddressId::new(row.get(0)?),
        name: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
    })
}

fn select_one(conn: &Connection, id: AddressId) -> Result<Option<Address>, CoreError> {
    conn.query_row(
        "SELECT id, name, latitude, longitude FROM addresses WHERE id = ?1",
        params![id.get()],
        row_to_address,
    )
    .optional()
    .map_err(map_sqerr)
}

impl AddressRepository for SqliteRepo {
    fn create(&self, input: NewAddress) -> Result<Address, CoreError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO addresses(name, latitude, longitude) VALUES (?1, ?2, ?3)",
            params![input.name, input.latitude, input.longitude],
        )
        .map_err(map_sqerr)?;
        let id = AddressId::new(conn.last_insert_rowid());
        Ok(input.into_address(id))
    }

    fn list(&self) -> Result<Vec<Address>, CoreError> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, name, latitude, longitude FROM addresses ORDER BY id")
            .map_err(map_sqerr)?;
        let rows = stmt.query_map([], row_to_address).map_err(map_sqerr)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sqerr)
    }

    fn get(&self, id: AddressId) -> Result<Option<Address>, CoreError> {
        let conn = self.connect()?;
        select_one(&conn, id)
    }

    fn update(&self, id: AddressId, patch: &AddressPatch) -> Result<Option<Address>, CoreError> {
        let conn = self.connect()?;
        let Some(mut address) = select_one(&conn, id)? else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(address));
        }
        patch.apply_to(&mut address);
        let changed = conn
            .execute(
                "UPDATE addresses SET name = ?1, latitude = ?2, longitude = ?3 WHERE id = ?4",
                params![address.name, address.latitude, address.longitude, id.get()],
            )
            .map_err(map_sqerr)?;
        // Row vanished between read and write (concurrent delete).
        if changed == 0 {
            return Ok(None);
        }
        Ok(Some(address))
    }

    fn delete(&self, id: AddressId) -> Result<bool, CoreError> {
        let conn = self.connect()?;
        let removed = conn
            .execute("DELETE FROM addresses WHERE id = ?1", params![id.get()])
            .map_err(map_sqerr)?;
        Ok(removed > 0)
    }
}
