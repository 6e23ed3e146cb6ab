use tracing::info;
use crate::books::repository::BookRepository;
use crate::books::repository::ddb_book_repository::DDBBookRepository;
use crate::books::repository::sqlite_book_repository::SqliteBookRepository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};
use crate::utils::sqlite::open_database;

pub(crate) async fn create_book_repository(config: &Configuration) -> LibraryResult<Box<dyn BookRepository>> {
    info!(store = %config.store, "creating book repository");
    match config.store {
        RepositoryStore::Sqlite => {
            let conn = open_database(config.database_path.as_str())?;
            Ok(Box::new(SqliteBookRepository::new(conn)))
        }
        RepositoryStore::DynamoDB => {
            let client = build_db_client(config).await;
            Ok(Box::new(DDBBookRepository::new(client, config.table_name.as_str())))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(config).await;
            // table may already exist
            let _ = create_table(&client, config.table_name.as_str(), "isbn").await;
            Ok(Box::new(DDBBookRepository::new(client, config.table_name.as_str())))
        }
    }
}
