use async_trait::async_trait;
use tracing::{debug, info};
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::catalog::query::BookQuery;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};

pub(crate) struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(_config: &Configuration, book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            book_repository,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        let _ = self.book_repository.create(&BookEntity::from(book)).await?;
        info!(isbn = book.isbn.as_str(), "added book");
        Ok(book.clone())
    }

    async fn remove_book(&self, id: &str) -> LibraryResult<()> {
        let _ = self.book_repository.delete(id).await?;
        info!(isbn = id, "removed book");
        Ok(())
    }

    // Full replace: the stored record takes every mutable field of the payload, including
    // the absent ones. The isbn itself can never change through an update.
    async fn update_book(&self, id: &str, book: &BookDto) -> LibraryResult<BookDto> {
        if book.isbn != id {
            return Err(LibraryError::validation(
                format!("cannot update book {} with payload for isbn {}", id, book.isbn).as_str(),
                Some("isbn_mismatch".to_string())));
        }
        let _ = self.book_repository.update(&BookEntity::from(book)).await?;
        info!(isbn = id, "updated book");
        Ok(book.clone())
    }

    async fn find_book_by_id(&self, id: &str) -> LibraryResult<BookDto> {
        self.book_repository.get(id).await.map(|b| BookDto::from(&b))
    }

    async fn find_books(&self, query: &BookQuery) -> LibraryResult<Vec<BookDto>> {
        debug!(?query, "finding books");
        let res = match query {
            BookQuery::All => self.book_repository.find_all().await?,
            BookQuery::ByTitle(title) => self.book_repository.find_by_title(title).await?,
            BookQuery::ByPublisher(publisher) => self.book_repository.find_by_publisher(publisher).await?,
            BookQuery::ByTitleAndPublisher(title, publisher) => {
                self.book_repository.find_by_title_and_publisher(title, publisher).await?
            }
        };
        Ok(res.iter().map(BookDto::from).collect())
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            isbn: other.isbn.to_string(),
            title: other.title.to_string(),
            publisher: other.publisher.clone(),
            category: other.category.clone(),
            authors: other.authors.clone(),
            date: other.date,
            language: other.language.clone(),
            summary: other.summary.clone(),
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        Self {
            isbn: other.isbn.to_string(),
            title: other.title.to_string(),
            publisher: other.publisher.clone(),
            category: other.category.clone(),
            authors: other.authors.clone(),
            date: other.date,
            language: other.language.clone(),
            summary: other.summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crate::books::dto::BookDto;
    use crate::catalog::domain::CatalogService;
    use crate::catalog::factory;
    use crate::catalog::query::BookQuery;
    use crate::core::domain::Configuration;
    use crate::core::library::LibraryError;

    async fn new_service() -> Box<dyn CatalogService> {
        factory::create_catalog_service(&Configuration::in_memory("test")).await.expect("should create service")
    }

    #[tokio::test]
    async fn test_should_add_book() {
        let catalog_svc = new_service().await;

        let mut book = BookDto::new("111", "test book").with_publisher("test publisher");
        book.authors = vec!["first".to_string(), "second".to_string()];
        book.date = NaiveDate::from_ymd_opt(2010, 10, 10);
        let _ = catalog_svc.add_book(&book).await.expect("should add book");

        let loaded = catalog_svc.find_book_by_id("111").await.expect("should return book");
        assert_eq!(book, loaded);
    }

    #[tokio::test]
    async fn test_should_not_add_duplicate_book() {
        let catalog_svc = new_service().await;

        let book = BookDto::new("111", "original");
        let _ = catalog_svc.add_book(&book).await.expect("should add book");
        let err = catalog_svc.add_book(&BookDto::new("111", "impostor")).await.expect_err("should reject");
        assert!(matches!(err, LibraryError::DuplicateKey { .. }));

        let loaded = catalog_svc.find_book_by_id("111").await.expect("should return book");
        assert_eq!("original", loaded.title);
    }

    #[tokio::test]
    async fn test_should_update_book() {
        let catalog_svc = new_service().await;

        let mut book = BookDto::new("111", "test book").with_publisher("test publisher");
        book.summary = Some("summary".to_string());
        let _ = catalog_svc.add_book(&book).await.expect("should add book");

        let replacement = BookDto::new("111", "new title");
        let _ = catalog_svc.update_book("111", &replacement).await.expect("should update book");

        let loaded = catalog_svc.find_book_by_id("111").await.expect("should return book");
        assert_eq!(replacement, loaded);
        assert_eq!(None, loaded.publisher);
        assert_eq!(None, loaded.summary);
    }

    #[tokio::test]
    async fn test_should_not_change_identity_on_update() {
        let catalog_svc = new_service().await;

        let book = BookDto::new("111", "test book");
        let _ = catalog_svc.add_book(&book).await.expect("should add book");

        let err = catalog_svc.update_book("111", &BookDto::new("222", "other")).await.expect_err("should reject");
        assert!(matches!(err, LibraryError::Validation { .. }));

        let loaded = catalog_svc.find_book_by_id("111").await.expect("should return book");
        assert_eq!(book, loaded);
        let missing = catalog_svc.find_book_by_id("222").await;
        assert!(matches!(missing, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_not_update_missing_book() {
        let catalog_svc = new_service().await;
        let err = catalog_svc.update_book("404", &BookDto::new("404", "ghost")).await.expect_err("should fail");
        assert!(matches!(err, LibraryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_should_find_books_by_query() {
        let catalog_svc = new_service().await;
        catalog_svc.add_book(&BookDto::new("1", "Foo").with_publisher("Bar")).await.expect("should add book");
        catalog_svc.add_book(&BookDto::new("2", "Foo").with_publisher("Baz")).await.expect("should add book");
        catalog_svc.add_book(&BookDto::new("3", "Qux").with_publisher("Bar")).await.expect("should add book");
        catalog_svc.add_book(&BookDto::new("4", "Qux")).await.expect("should add book");

        let all = catalog_svc.find_books(&BookQuery::All).await.expect("should find books");
        assert_eq!(4, all.len());

        let by_title = catalog_svc.find_books(&BookQuery::ByTitle("Foo".to_string())).await.expect("should find books");
        assert_eq!(vec!["1", "2"], by_title.iter().map(|b| b.isbn.as_str()).collect::<Vec<_>>());

        let by_publisher = catalog_svc.find_books(&BookQuery::ByPublisher("Bar".to_string())).await.expect("should find books");
        assert_eq!(vec!["1", "3"], by_publisher.iter().map(|b| b.isbn.as_str()).collect::<Vec<_>>());

        let both = catalog_svc.find_books(&BookQuery::ByTitleAndPublisher("Foo".to_string(), "Bar".to_string()))
            .await.expect("should find books");
        assert_eq!(vec!["1"], both.iter().map(|b| b.isbn.as_str()).collect::<Vec<_>>());

        let none = catalog_svc.find_books(&BookQuery::ByTitle("Nope".to_string())).await.expect("should find books");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_should_remove_book() {
        let catalog_svc = new_service().await;

        let book = BookDto::new("123", "test book");
        let _ = catalog_svc.add_book(&book).await.expect("should add book");

        let _ = catalog_svc.remove_book("123").await.expect("should remove book");

        let loaded = catalog_svc.find_book_by_id("123").await;
        assert!(matches!(loaded, Err(LibraryError::NotFound { .. })));
        let err = catalog_svc.remove_book("123").await.expect_err("should not remove twice");
        assert!(matches!(err, LibraryError::NotFound { .. }));
    }
}
