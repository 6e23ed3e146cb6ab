use std::collections::BTreeMap;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::utils::date::serializer;

const MAX_ISBN_LEN: usize = 17;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    #[serde(default, deserialize_with = "crate::utils::json::null_as_default")]
    pub isbn: String,
    #[serde(default, deserialize_with = "crate::utils::json::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::json::null_as_default")]
    pub authors: Vec<String>,
    #[serde(default, with = "serializer")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl BookDto {
    pub fn new(isbn: &str, title: &str) -> BookDto {
        BookDto {
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

    pub fn with_publisher(mut self, publisher: &str) -> BookDto {
        self.publisher = Some(publisher.to_string());
        self
    }

    /// Checks the payload before it reaches the store.
    ///
    /// Returns one message per offending field. A field that fails more than one rule
    /// keeps the last message recorded for it.
    pub fn validate(&self) -> Result<(), BTreeMap<String, String>> {
        let mut errors = BTreeMap::new();
        if self.isbn.trim().is_empty() {
            errors.insert("isbn".to_string(), "must not be blank".to_string());
        } else if !is_well_formed_isbn(self.isbn.as_str()) {
            errors.insert("isbn".to_string(), format!(
                "must be at most {} digits or hyphens, optionally ending in X", MAX_ISBN_LEN));
        }
        if self.title.trim().is_empty() {
            errors.insert("title".to_string(), "must not be blank".to_string());
        }
        if errors.is_empty() {
            return Ok(());
        }
        for (field, message) in &errors {
            info!(field = field.as_str(), message = message.as_str(), "rejected book field");
        }
        Err(errors)
    }
}

// No checksum is enforced; only the shape of the identifier.
pub(crate) fn is_well_formed_isbn(isbn: &str) -> bool {
    if isbn.is_empty() || isbn.len() > MAX_ISBN_LEN {
        return false;
    }
    let body = isbn.strip_suffix(['X', 'x']).unwrap_or(isbn);
    body.chars().all(|c| c.is_ascii_digit() || c == '-') && body.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use crate::books::dto::{is_well_formed_isbn, BookDto};

    #[tokio::test]
    async fn test_should_build_books() {
        let book = BookDto::new("isbn", "title").with_publisher("publisher");
        assert_eq!("isbn", book.isbn.as_str());
        assert_eq!("title", book.title.as_str());
        assert_eq!(Some("publisher".to_string()), book.publisher);
    }

    #[tokio::test]
    async fn test_should_deserialize_full_payload() {
        let book: BookDto = serde_json::from_value(json!({
            "isbn": "978-0-13-110362-7",
            "title": "The C Programming Language",
            "publisher": "Prentice Hall",
            "category": "programming",
            "authors": ["Brian Kernighan", "Dennis Ritchie"],
            "date": "1988-04-01",
            "language": "en",
            "summary": "K&R",
        })).expect("should parse book");
        assert_eq!(vec!["Brian Kernighan".to_string(), "Dennis Ritchie".to_string()], book.authors);
        assert_eq!(NaiveDate::from_ymd_opt(1988, 4, 1), book.date);
        assert_eq!(Some("en".to_string()), book.language);
        assert!(book.validate().is_ok());
    }

    #[tokio::test]
    async fn test_should_default_missing_fields() {
        let book: BookDto = serde_json::from_value(json!({
            "publisher": "Bar",
            "authors": null,
            "date": "",
        })).expect("should parse book");
        assert_eq!("", book.isbn);
        assert_eq!("", book.title);
        assert!(book.authors.is_empty());
        assert_eq!(None, book.date);
        assert_eq!(None, book.summary);
    }

    #[tokio::test]
    async fn test_should_reject_malformed_date() {
        let res = serde_json::from_value::<BookDto>(json!({"isbn": "111", "title": "Foo", "date": "April 1st"}));
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_should_serialize_date_as_calendar_day() {
        let mut book = BookDto::new("111", "Foo");
        book.date = NaiveDate::from_ymd_opt(2001, 2, 3);
        let val = serde_json::to_value(&book).expect("should serialize");
        assert_eq!("2001-02-03", val["date"]);
        assert_eq!(json!([]), val["authors"]);
    }

    #[tokio::test]
    async fn test_should_report_one_error_per_field() {
        let errors = BookDto::new("  ", "\t").validate().expect_err("should fail");
        assert_eq!(2, errors.len());
        assert_eq!("must not be blank", errors["isbn"]);
        assert_eq!("must not be blank", errors["title"]);
    }

    #[tokio::test]
    async fn test_should_reject_malformed_isbn() {
        let errors = BookDto::new("abc-123", "Foo").validate().expect_err("should fail");
        assert_eq!(1, errors.len());
        assert!(errors.contains_key("isbn"));
    }

    #[tokio::test]
    async fn test_should_check_isbn_shape() {
        assert!(is_well_formed_isbn("111"));
        assert!(is_well_formed_isbn("0-306-40615-2"));
        assert!(is_well_formed_isbn("080442957X"));
        assert!(is_well_formed_isbn("978-3-16-148410-0"));
        assert!(!is_well_formed_isbn("---"));
        assert!(!is_well_formed_isbn("X"));
        assert!(!is_well_formed_isbn("12X4"));
        assert!(!is_well_formed_isbn("978 3 16 148410 0"));
        assert!(!is_well_formed_isbn("978-3-16-148410-0-1"));
    }
}
