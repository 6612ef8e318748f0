use crate::books::repository::BookRepository;
use crate::books::repository::sql_book_repository::SqlBookRepository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::utils::sql::{build_pool, ensure_schema};

pub(crate) async fn create_book_repository(config: &Configuration) -> LibraryResult<Box<dyn BookRepository>> {
    let pool = build_pool(config).await?;
    ensure_schema(&pool).await?;
    Ok(Box::new(SqlBookRepository::new(pool)))
}
