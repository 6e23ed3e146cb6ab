use axum::{
    body::HttpBody,
    extract::{Path, Query, State},
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::Json,
    routing::get,
    BoxError, Router,
};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::error;
use url::Url;
use crate::books::dto::BookDto;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
use crate::catalog::command::find_books_cmd::{FindBooksCommand, FindBooksCommandRequest};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest};
use crate::catalog::query::{BookQuery, BookQueryParams};
use crate::core::command::Command;
use crate::core::controller::{AppState, error_body, json_to_server_error, ServerError};

/// Book routes under `/api/books`, generic over the request body so the same router
/// serves both the Lambda runtime and a plain hyper server.
pub fn routes<B>(state: AppState) -> Router<(), B>
    where
        B: HttpBody + Send + 'static,
        B::Data: Send,
        B::Error: Into<BoxError> {
    Router::<AppState, B>::new()
        .route("/api/books", get(find_books).post(add_book))
        .route("/api/books/:id",
               get(find_book_by_id).put(update_book).delete(remove_book))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Decoded as raw pairs so repeated keys never turn into a rejection.
pub(crate) async fn find_books(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>) -> Result<Json<Vec<BookDto>>, ServerError> {
    let Query(pairs) = query.map_err(|rejection| error_body(rejection.status(), rejection.body_text().as_str()))?;
    let params = BookQueryParams::from_pairs(&pairs);
    let req = FindBooksCommandRequest::new(BookQuery::from(&params));
    let res = FindBooksCommand::new(state.catalog_service).execute(req).await?;
    Ok(Json(res.books))
}

pub(crate) async fn find_book_by_id(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> Result<Json<BookDto>, ServerError> {
    let req = GetBookCommandRequest::new(book_id);
    let res = GetBookCommand::new(state.catalog_service).execute(req).await?;
    Ok(Json(res.book))
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    json: Result<Json<Value>, JsonRejection>) -> Result<(StatusCode, [(HeaderName, HeaderValue); 1]), ServerError> {
    let book = parse_book(json)?;
    let res = AddBookCommand::new(state.catalog_service).execute(AddBookCommandRequest::new(book)).await?;
    // the book is already stored when the locator is built
    let location = book_location(state.config.base_url.as_str(), res.book.isbn.as_str())?;
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    json: Result<Json<Value>, JsonRejection>) -> Result<StatusCode, ServerError> {
    let book = parse_book(json)?;
    let req = UpdateBookCommandRequest::new(book_id.as_str(), book);
    let _ = UpdateBookCommand::new(state.catalog_service).execute(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> Result<StatusCode, ServerError> {
    let req = RemoveBookCommandRequest::new(book_id);
    let _ = RemoveBookCommand::new(state.catalog_service).execute(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_book(json: Result<Json<Value>, JsonRejection>) -> Result<BookDto, ServerError> {
    let Json(value) = json.map_err(|rejection| error_body(rejection.status(), rejection.body_text().as_str()))?;
    serde_json::from_value(value).map_err(json_to_server_error)
}

fn book_location(base_url: &str, isbn: &str) -> Result<HeaderValue, ServerError> {
    let locator_error = |reason: String| {
        error!(base_url, isbn, reason = reason.as_str(), "failed to build book locator");
        error_body(StatusCode::INTERNAL_SERVER_ERROR, format!("could not build location of book {}", isbn).as_str())
    };
    let mut url = Url::parse(base_url).map_err(|err| locator_error(err.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| locator_error("base url cannot carry a path".to_string()))?
        .pop_if_empty()
        .extend(&["api", "books", isbn]);
    HeaderValue::from_str(url.as_str()).map_err(|err| locator_error(err.to_string()))
}
