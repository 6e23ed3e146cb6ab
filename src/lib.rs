//! Book catalog service: CRUD and lookup of books over HTTP, backed by SQLite
//! or DynamoDB.

pub mod books;
pub mod catalog;
pub mod core;
pub mod utils;
