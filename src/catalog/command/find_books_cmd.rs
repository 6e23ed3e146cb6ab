use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::catalog::query::BookQuery;
use crate::core::command::{Command, CommandError};

pub(crate) struct FindBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl FindBooksCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct FindBooksCommandRequest {
    pub(crate) query: BookQuery,
}

impl FindBooksCommandRequest {
    pub fn new(query: BookQuery) -> Self {
        Self {
            query,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FindBooksCommandResponse {
    pub books: Vec<BookDto>,
}

impl FindBooksCommandResponse {
    pub fn new(books: Vec<BookDto>) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<FindBooksCommandRequest, FindBooksCommandResponse> for FindBooksCommand {
    async fn execute(&self, req: FindBooksCommandRequest) -> Result<FindBooksCommandResponse, CommandError> {
        self.catalog_service.find_books(&req.query).await
            .map_err(CommandError::from).map(FindBooksCommandResponse::new)
    }
}
