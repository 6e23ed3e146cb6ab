pub mod date;
pub mod ddb;
pub mod json;
pub mod logs;
pub mod sqlite;
