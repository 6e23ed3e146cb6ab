use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction};

use crate::books::domain::model::BookEntity;
use crate::books::repository::{BookRepository, PUBLISHER, TITLE};
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;

const SELECT_BOOKS: &str =
    "SELECT isbn, title, publisher, category, date, language, summary FROM books";

// Relational store for books. Authors live in their own table keyed by (isbn, position)
// so the list keeps its order; every write of a book and its authors is one transaction.
#[derive(Debug, Clone)]
pub struct SqliteBookRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBookRepository {
    pub(crate) fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    // Runs the closure on the blocking pool while holding the connection lock.
    async fn with_conn<T, F>(&self, f: F) -> LibraryResult<T>
        where
            F: FnOnce(&mut Connection) -> LibraryResult<T> + Send + 'static,
            T: Send + 'static {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock()
                .map_err(|err| LibraryError::runtime(format!("sqlite connection poisoned {}", err).as_str(), None))?;
            f(&mut conn)
        }).await.map_err(|err| LibraryError::runtime(format!("sqlite task failed {}", err).as_str(), None))?
    }
}

#[async_trait]
impl Repository<BookEntity> for SqliteBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let entity = entity.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            // the primary key rejects a second writer of the same isbn
            let inserted = tx.execute(
                "INSERT INTO books (isbn, title, publisher, category, date, language, summary)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    entity.isbn,
                    entity.title,
                    entity.publisher,
                    entity.category,
                    entity.date,
                    entity.language,
                    entity.summary,
                ],
            ).map_err(|err| match LibraryError::from(err) {
                LibraryError::DuplicateKey { .. } => {
                    LibraryError::duplicate_key(format!("book with isbn {} already exists", entity.isbn).as_str())
                }
                other => other,
            })?;
            insert_authors(&tx, entity.isbn.as_str(), &entity.authors)?;
            tx.commit()?;
            Ok(inserted)
        }).await
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let entity = entity.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let updated = tx.execute(
                "UPDATE books SET title = ?2, publisher = ?3, category = ?4, date = ?5,
                     language = ?6, summary = ?7
                 WHERE isbn = ?1",
                params![
                    entity.isbn,
                    entity.title,
                    entity.publisher,
                    entity.category,
                    entity.date,
                    entity.language,
                    entity.summary,
                ],
            )?;
            if updated == 0 {
                return Err(LibraryError::not_found(format!("book not found for {}", entity.isbn).as_str()));
            }
            tx.execute("DELETE FROM book_authors WHERE isbn = ?1", params![entity.isbn])?;
            insert_authors(&tx, entity.isbn.as_str(), &entity.authors)?;
            tx.commit()?;
            Ok(updated)
        }).await
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(format!("{} WHERE isbn = ?1", SELECT_BOOKS).as_str())?;
            let mut rows = stmt.query_map(params![id], row_to_book)?
                .collect::<Result<Vec<_>, _>>()?;
            let mut book = rows.pop()
                .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))?;
            book.authors = load_authors(conn, id.as_str())?;
            Ok(book)
        }).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            // author rows go with the book through ON DELETE CASCADE
            let deleted = conn.execute("DELETE FROM books WHERE isbn = ?1", params![id])?;
            if deleted == 0 {
                return Err(LibraryError::not_found(format!("book not found for {}", id).as_str()));
            }
            Ok(deleted)
        }).await
    }

    async fn query(&self, predicate: &HashMap<String, String>) -> LibraryResult<Vec<BookEntity>> {
        let (where_clause, values) = build_where_clause(predicate)?;
        self.with_conn(move |conn| {
            let sql = format!("{}{} ORDER BY isbn", SELECT_BOOKS, where_clause);
            let mut stmt = conn.prepare(sql.as_str())?;
            let mut books = stmt.query_map(params_from_iter(values.iter()), row_to_book)?
                .collect::<Result<Vec<_>, _>>()?;
            for book in books.iter_mut() {
                book.authors = load_authors(conn, book.isbn.as_str())?;
            }
            Ok(books)
        }).await
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {}

// Only known columns are accepted so attribute names never reach the SQL text unchecked.
// Keys are sorted to keep the generated statement stable.
fn build_where_clause(predicate: &HashMap<String, String>) -> LibraryResult<(String, Vec<SqlValue>)> {
    let mut keys: Vec<&String> = predicate.keys().collect();
    keys.sort();
    let mut clauses = vec![];
    let mut values = vec![];
    for k in keys {
        let column = match k.as_str() {
            TITLE => TITLE,
            PUBLISHER => PUBLISHER,
            other => {
                return Err(LibraryError::validation(
                    format!("unsupported book query attribute {}", other).as_str(), None));
            }
        };
        values.push(SqlValue::Text(predicate[k].to_string()));
        clauses.push(format!("{} = ?{}", column, values.len()));
    }
    if clauses.is_empty() {
        return Ok((String::new(), values));
    }
    Ok((format!(" WHERE {}", clauses.join(" AND ")), values))
}

fn insert_authors(tx: &Transaction<'_>, isbn: &str, authors: &[String]) -> LibraryResult<()> {
    let mut stmt = tx.prepare_cached(
        "INSERT INTO book_authors (isbn, position, author) VALUES (?1, ?2, ?3)")?;
    for (position, author) in authors.iter().enumerate() {
        stmt.execute(params![isbn, position as i64, author])?;
    }
    Ok(())
}

fn load_authors(conn: &Connection, isbn: &str) -> LibraryResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT author FROM book_authors WHERE isbn = ?1 ORDER BY position")?;
    let rows = stmt.query_map(params![isbn], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_book(row: &Row<'_>) -> rusqlite::Result<BookEntity> {
    Ok(BookEntity {
        isbn: row.get(0)?,
        title: row.get(1)?,
        publisher: row.get(2)?,
        category: row.get(3)?,
        authors: vec![],
        date: row.get(4)?,
        language: row.get(5)?,
        summary: row.get(6)?,
    })
}
