pub mod ddb_book_repository;
pub mod sqlite_book_repository;

use std::collections::HashMap;
use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

// attributes that may appear in a book query predicate
pub(crate) const TITLE: &str = "title";
pub(crate) const PUBLISHER: &str = "publisher";

#[async_trait]
pub(crate) trait BookRepository: Repository<BookEntity> {
    async fn find_all(&self) -> LibraryResult<Vec<BookEntity>> {
        self.query(&HashMap::new()).await
    }

    async fn find_by_title(&self, title: &str) -> LibraryResult<Vec<BookEntity>> {
        let predicate = HashMap::from([
            (TITLE.to_string(), title.to_string()),
        ]);
        self.query(&predicate).await
    }

    async fn find_by_publisher(&self, publisher: &str) -> LibraryResult<Vec<BookEntity>> {
        let predicate = HashMap::from([
            (PUBLISHER.to_string(), publisher.to_string()),
        ]);
        self.query(&predicate).await
    }

    async fn find_by_title_and_publisher(&self, title: &str, publisher: &str) -> LibraryResult<Vec<BookEntity>> {
        let predicate = HashMap::from([
            (TITLE.to_string(), title.to_string()),
            (PUBLISHER.to_string(), publisher.to_string()),
        ]);
        self.query(&predicate).await
    }
}
