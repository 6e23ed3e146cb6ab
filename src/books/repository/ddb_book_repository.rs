use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::AttributeValue;

use crate::books::domain::model::BookEntity;
use crate::books::repository::{BookRepository, PUBLISHER, TITLE};
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{add_filter_expr, conditional_write_error, parse_date_attribute, parse_item, parse_string_attribute, parse_string_list_attribute};

#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }

    // puts the whole item; condition decides whether this is an insert or a replace
    async fn put(&self, entity: &BookEntity, condition: &str, on_condition_failed: LibraryError) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression(condition)
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1)
            .map_err(|err| conditional_write_error(err, PutItemError::is_conditional_check_failed_exception, on_condition_failed))
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        self.put(entity, "attribute_not_exists(isbn)",
                 LibraryError::duplicate_key(format!("book with isbn {} already exists", entity.isbn).as_str())).await
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        self.put(entity, "attribute_exists(isbn)",
                 LibraryError::not_found(format!("book not found for {}", entity.isbn).as_str())).await
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .get_item()
            .table_name(table_name)
            .key("isbn", AttributeValue::S(id.to_string()))
            .consistent_read(true)
            .send()
            .await.map_err(LibraryError::from).and_then(|out| {
            out.item().map(map_to_book)
                .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("isbn", AttributeValue::S(id.to_string()))
            .condition_expression("attribute_exists(isbn)")
            .send()
            .await.map(|_| 1)
            .map_err(|err| conditional_write_error(err, DeleteItemError::is_conditional_check_failed_exception,
                                                   LibraryError::not_found(format!("book not found for {}", id).as_str())))
    }

    // Scans every page; the catalog does not expose pagination to its callers.
    async fn query(&self, predicate: &HashMap<String, String>) -> LibraryResult<Vec<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let mut keys: Vec<&String> = predicate.keys().collect();
        keys.sort();
        let mut filter_expr = String::new();
        let mut filters = vec![];
        for k in keys {
            if k != TITLE && k != PUBLISHER {
                return Err(LibraryError::validation(
                    format!("unsupported book query attribute {}", k).as_str(), None));
            }
            let ks = add_filter_expr(k.as_str(), &mut filter_expr);
            filters.push((ks, predicate[k].to_string()));
        }

        let mut books = vec![];
        let mut exclusive_start_key = None;
        loop {
            let mut request = self.client
                .scan()
                .table_name(table_name)
                .consistent_read(true)
                .set_exclusive_start_key(exclusive_start_key.take());
            for (ks, v) in &filters {
                request = request
                    .expression_attribute_names(format!("#{}", ks), ks.to_string())
                    .expression_attribute_values(format!(":{}", ks), AttributeValue::S(v.to_string()));
            }
            if !filter_expr.is_empty() {
                request = request.filter_expression(filter_expr.as_str());
            }
            let out = request.send().await.map_err(LibraryError::from)?;
            books.extend(out.items().unwrap_or_default().iter().map(map_to_book));
            match out.last_evaluated_key() {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key.clone()),
                _ => break,
            }
        }
        books.sort_by(|a, b| a.isbn.cmp(&b.isbn));
        Ok(books)
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> BookEntity {
    BookEntity {
        isbn: parse_string_attribute("isbn", map).unwrap_or(String::from("")),
        title: parse_string_attribute("title", map).unwrap_or(String::from("")),
        publisher: parse_string_attribute("publisher", map),
        category: parse_string_attribute("category", map),
        authors: parse_string_list_attribute("authors", map),
        date: parse_date_attribute("date", map),
        language: parse_string_attribute("language", map),
        summary: parse_string_attribute("summary", map),
    }
}
