use std::env;
use serde::{Deserialize, Serialize};
use crate::core::repository::RepositoryStore;

// Configuration abstracts config options for the catalog service
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub environment: String,
    pub bind_addr: String,
    pub base_url: String,
    pub store: RepositoryStore,
    pub database_path: String,
    pub table_name: String,
    pub dynamodb_endpoint: String,
}

impl Configuration {
    pub fn new(environment: &str) -> Self {
        Configuration {
            environment: environment.to_string(),
            bind_addr: "0.0.0.0:8080".to_string(),
            base_url: "http://localhost:8080".to_string(),
            store: RepositoryStore::Sqlite,
            database_path: "books.db".to_string(),
            table_name: "books".to_string(),
            dynamodb_endpoint: "http://localhost:8000".to_string(),
        }
    }

    // in-memory sqlite, used by tests and throwaway local runs
    pub fn in_memory(environment: &str) -> Self {
        Configuration {
            database_path: ":memory:".to_string(),
            ..Configuration::new(environment)
        }
    }

    pub fn from_env() -> Self {
        let defaults = Configuration::new(env_or("CATALOG_ENV", "dev").as_str());
        Configuration {
            bind_addr: env_or("CATALOG_BIND_ADDR", defaults.bind_addr.as_str()),
            base_url: env_or("CATALOG_BASE_URL", defaults.base_url.as_str()),
            store: RepositoryStore::from(env_or("CATALOG_STORE", defaults.store.to_string().as_str())),
            database_path: env_or("CATALOG_DATABASE_PATH", defaults.database_path.as_str()),
            table_name: env_or("CATALOG_TABLE_NAME", defaults.table_name.as_str()),
            dynamodb_endpoint: env_or("CATALOG_DYNAMODB_ENDPOINT", defaults.dynamodb_endpoint.as_str()),
            ..defaults
        }
    }

    pub fn is_lambda(&self) -> bool {
        env::var("AWS_LAMBDA_RUNTIME_API").is_ok()
    }
}

fn env_or(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => default.to_string(),
    }
}
