use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryResult;

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity, fails with DuplicateKey if the id is taken
    async fn create(&self, entity: &Entity) -> LibraryResult<usize>;

    // replaces an existing entity, fails with NotFound if it is absent
    async fn update(&self, entity: &Entity) -> LibraryResult<usize>;

    // get an entity
    async fn get(&self, id: &str) -> LibraryResult<Entity>;

    // delete an entity, fails with NotFound if it is absent
    async fn delete(&self, id: &str) -> LibraryResult<usize>;

    // exact-match on every attribute in predicate; an empty predicate returns everything
    async fn query(&self, predicate: &HashMap<String, String>) -> LibraryResult<Vec<Entity>>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    Sqlite,
    DynamoDB,
    LocalDynamoDB,
}

impl From<String> for RepositoryStore {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "dynamodb" => RepositoryStore::DynamoDB,
            "local-dynamodb" => RepositoryStore::LocalDynamoDB,
            _ => RepositoryStore::Sqlite,
        }
    }
}

impl Display for RepositoryStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RepositoryStore::Sqlite => write!(f, "sqlite"),
            RepositoryStore::DynamoDB => write!(f, "dynamodb"),
            RepositoryStore::LocalDynamoDB => write!(f, "local-dynamodb"),
        }
    }
}
