use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct GetBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl GetBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetBookCommandRequest {
    pub(crate) book_id: String,
}

impl GetBookCommandRequest {
    pub fn new(book_id: String) -> Self {
        Self {
            book_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GetBookCommandResponse {
    pub book: BookDto,
}

impl GetBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<GetBookCommandRequest, GetBookCommandResponse> for GetBookCommand {
    async fn execute(&self, req: GetBookCommandRequest) -> Result<GetBookCommandResponse, CommandError> {
        self.catalog_service.find_book_by_id(req.book_id.as_str())
            .await.map_err(CommandError::from).map(GetBookCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::books::dto::BookDto;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
    use crate::catalog::domain::CatalogService;
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;

    #[tokio::test]
    async fn test_should_run_get_book() {
        let svc: Arc<dyn CatalogService> = Arc::from(factory::create_catalog_service(&Configuration::in_memory("test")).await.expect("should create service"));
        let add_cmd = AddBookCommand::new(Arc::clone(&svc));
        let get_cmd = GetBookCommand::new(svc);

        let book = BookDto::new("111", "test book");
        let res = add_cmd.execute(AddBookCommandRequest::new(book.clone())).await.expect("should add book");
        let loaded = get_cmd.execute(GetBookCommandRequest::new(res.book.isbn.to_string())).await.expect("should get book");
        assert_eq!(book.isbn, loaded.book.isbn);
        assert_eq!(book.title, loaded.book.title);

        let err = get_cmd.execute(GetBookCommandRequest::new("404".to_string())).await.expect_err("should not find book");
        assert!(matches!(err, CommandError::NotFound { .. }));
    }
}
