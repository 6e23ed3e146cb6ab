use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// BookEntity is the persisted form of a catalog entry. The isbn is the primary key and
// never changes once stored; every other attribute is replaced on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntity {
    pub isbn: String,
    pub title: String,
    pub publisher: Option<String>,
    pub category: Option<String>,
    pub authors: Vec<String>,
    pub date: Option<NaiveDate>,
    pub language: Option<String>,
    pub summary: Option<String>,
}

impl BookEntity {
    pub fn new(isbn: &str, title: &str) -> Self {
        Self {
            isbn: isbn.to_string(),
            title: title.to_string(),
            publisher: None,
            category: None,
            authors: vec![],
            date: None,
            language: None,
            summary: None,
        }
    }

    pub fn with_publisher(mut self, publisher: &str) -> Self {
        self.publisher = Some(publisher.to_string());
        self
    }
}
