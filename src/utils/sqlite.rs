use rusqlite::{Connection, ErrorCode};
use crate::core::library::{LibraryError, LibraryResult};

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 1;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS books (
    isbn TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    publisher TEXT,
    category TEXT,
    date TEXT,
    language TEXT,
    summary TEXT
);

CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
CREATE INDEX IF NOT EXISTS idx_books_publisher ON books(publisher);

CREATE TABLE IF NOT EXISTS book_authors (
    isbn TEXT NOT NULL REFERENCES books(isbn) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    author TEXT NOT NULL,
    PRIMARY KEY (isbn, position)
);
"#;

/// Open or create a catalog database at the given path.
pub(crate) fn open_database(path: &str) -> LibraryResult<Connection> {
    if path == ":memory:" {
        return open_memory();
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    if schema_version(&conn)? < CURRENT_VERSION {
        create_schema(&conn)?;
    }
    Ok(conn)
}

/// Open an in-memory database with the full schema.
pub(crate) fn open_memory() -> LibraryResult<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

// idempotent
fn create_schema(conn: &Connection) -> LibraryResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [CURRENT_VERSION])?;
    Ok(())
}

fn schema_version(conn: &Connection) -> LibraryResult<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;
    if !exists {
        return Ok(0);
    }
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

impl From<rusqlite::Error> for LibraryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => {
                LibraryError::not_found("no rows returned")
            }
            rusqlite::Error::SqliteFailure(ref failure, _) => {
                let reason = Some(format!("{:?}", failure.code));
                match failure.code {
                    ErrorCode::ConstraintViolation => {
                        LibraryError::duplicate_key(format!("constraint violation {}", err).as_str())
                    }
                    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                        LibraryError::unavailable(format!("sqlite busy {}", err).as_str(), reason, true)
                    }
                    _ => LibraryError::database(format!("sqlite error {}", err).as_str(), reason, false),
                }
            }
            other => LibraryError::database(format!("sqlite error {}", other).as_str(), None, false),
        }
    }
}
