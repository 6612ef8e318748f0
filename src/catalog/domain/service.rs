use async_trait::async_trait;
use tracing::{error, info};
use crate::books::domain::model::BookEntity;
use crate::books::dto::{
    BookDto, BookSet, CreateBookRequest, DeleteBookRequest, DescribeBookRequest,
    QueryBooksRequest, UpdateBookRequest,
};
use crate::books::repository::{BookFilter, BookRepository};
use crate::catalog::domain::CatalogService;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};

pub(crate) struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
    operator: String,
}

impl CatalogServiceImpl {
    pub(crate) fn new(config: &Configuration, book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            book_repository,
            operator: config.operator.to_string(),
        }
    }

    async fn create(&self, req: &CreateBookRequest) -> LibraryResult<BookDto> {
        req.validate()?;
        let book = BookEntity::new(
            req.name.as_str(), req.author.as_str(), self.operator.as_str());
        self.book_repository.create(&book).await?;
        Ok(BookDto::from(&book))
    }

    async fn query(&self, req: &QueryBooksRequest) -> LibraryResult<BookSet> {
        req.validate()?;
        let filter = BookFilter::new(req.keyword.as_str(), req.author.as_str());
        let books = self.book_repository.query(&filter, &req.page).await?;
        let mut set = BookSet::new();
        for book in &books {
            set.add(BookDto::from(book));
        }
        Ok(set)
    }

    async fn describe(&self, req: &DescribeBookRequest) -> LibraryResult<BookDto> {
        req.validate()?;
        self.book_repository.get(req.id.as_str()).await.map(|book| BookDto::from(&book))
    }

    // Load, merge per the requested mode, revalidate, persist. A merge that
    // blanks a required field fails validation here and nothing is written.
    async fn update(&self, req: &UpdateBookRequest) -> LibraryResult<BookDto> {
        req.validate()?;
        let mut book = self.book_repository.get(req.id.as_str()).await?;
        req.update_mode.apply(&mut book, &req.data, self.operator.as_str());
        book.validate()?;
        self.book_repository.update(&book).await?;
        Ok(BookDto::from(&book))
    }

    // The response carries the record as it looked before deletion, so the
    // deletion stamps go only to the store.
    async fn delete(&self, req: &DeleteBookRequest) -> LibraryResult<BookDto> {
        req.validate()?;
        let book = self.book_repository.get(req.id.as_str()).await?;
        let mut stamped = book.clone();
        stamped.mark_deleted(self.operator.as_str());
        self.book_repository.delete(&stamped).await?;
        Ok(BookDto::from(&book))
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn create_book(&self, req: &CreateBookRequest) -> LibraryResult<BookDto> {
        self.create(req).await.map_err(|err| map_failure("create book", err))
    }

    async fn query_books(&self, req: &QueryBooksRequest) -> LibraryResult<BookSet> {
        self.query(req).await.map_err(|err| map_failure("query books", err))
    }

    async fn describe_book(&self, req: &DescribeBookRequest) -> LibraryResult<BookDto> {
        self.describe(req).await.map_err(|err| map_failure("describe book", err))
    }

    async fn update_book(&self, req: &UpdateBookRequest) -> LibraryResult<BookDto> {
        self.update(req).await.map_err(|err| map_failure("update book", err))
    }

    async fn delete_book(&self, req: &DeleteBookRequest) -> LibraryResult<BookDto> {
        self.delete(req).await.map_err(|err| map_failure("delete book", err))
    }
}

// Boundary mapping for every operation. Internal failures keep their cause in
// the logs but cross to the caller with a generic message; errors describing
// the caller's own input pass through unchanged.
fn map_failure(operation: &'static str, err: LibraryError) -> LibraryError {
    match err {
        LibraryError::Database { message, reason_code, retryable } => {
            error!(operation, error = %message, "database failure");
            LibraryError::database(
                format!("{} failed. Please contact the administrator", operation).as_str(),
                reason_code, retryable)
        }
        LibraryError::Runtime { message, reason_code } => {
            error!(operation, error = %message, "runtime failure");
            LibraryError::runtime(
                format!("{} failed. Please contact the administrator", operation).as_str(),
                reason_code)
        }
        other => {
            info!(operation, error = %other, "request rejected");
            other
        }
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            id: other.id.to_string(),
            status: other.status,
            created_at: other.created_at,
            created_by: other.created_by.to_string(),
            updated_at: other.updated_at,
            updated_by: other.updated_by.to_string(),
            deleted_at: other.deleted_at,
            deleted_by: other.deleted_by.clone(),
            name: other.name.to_string(),
            author: other.author.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::books::dto::{
        CreateBookRequest, DeleteBookRequest, DescribeBookRequest, QueryBooksRequest,
        UpdateBookRequest,
    };
    use crate::books::repository::sql_book_repository::SqlBookRepository;
    use crate::catalog::domain::CatalogService;
    use crate::catalog::domain::service::CatalogServiceImpl;
    use crate::catalog::factory;
    use crate::core::domain::Configuration;
    use crate::core::library::{BookStatus, LibraryError, PageRequest};
    use crate::utils::sql::{build_pool, ensure_schema};

    async fn test_service() -> Arc<dyn CatalogService> {
        factory::create_catalog_service(&Configuration::new("sqlite::memory:"))
            .await
            .expect("should create catalog service")
    }

    #[tokio::test]
    async fn test_should_create_book_with_fresh_identity() {
        let catalog_svc = test_service().await;

        let first = catalog_svc
            .create_book(&CreateBookRequest::new("Dream of the Red Chamber", "Cao Xueqin"))
            .await.expect("should create book");
        let second = catalog_svc
            .create_book(&CreateBookRequest::new("Journey to the West", "Wu Cheng'en"))
            .await.expect("should create book");

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
        assert_eq!(BookStatus::Active, first.status);
        assert_eq!("Dream of the Red Chamber", first.name.as_str());
        assert_eq!("Cao Xueqin", first.author.as_str());
        assert_eq!("system", first.created_by.as_str());
    }

    #[tokio::test]
    async fn test_should_describe_created_book() {
        let catalog_svc = test_service().await;

        let created = catalog_svc
            .create_book(&CreateBookRequest::new("Romance of the Three Kingdoms", "Luo Guanzhong"))
            .await.expect("should create book");
        let loaded = catalog_svc
            .describe_book(&DescribeBookRequest::new(created.id.as_str()))
            .await.expect("should describe book");

        assert_eq!(created, loaded);
    }

    #[tokio::test]
    async fn test_should_replace_all_fields_on_put() {
        let catalog_svc = test_service().await;

        let created = catalog_svc
            .create_book(&CreateBookRequest::new("first name", "first author"))
            .await.expect("should create book");

        let updated = catalog_svc
            .update_book(&UpdateBookRequest::put(
                created.id.as_str(), CreateBookRequest::new("second name", "second author")))
            .await.expect("should update book");
        assert_eq!("second name", updated.name.as_str());
        assert_eq!("second author", updated.author.as_str());

        let loaded = catalog_svc
            .describe_book(&DescribeBookRequest::new(created.id.as_str()))
            .await.expect("should describe book");
        assert_eq!("second name", loaded.name.as_str());
        assert_eq!("second author", loaded.author.as_str());
    }

    #[tokio::test]
    async fn test_should_reject_put_that_blanks_a_field() {
        let catalog_svc = test_service().await;

        let created = catalog_svc
            .create_book(&CreateBookRequest::new("keep name", "keep author"))
            .await.expect("should create book");

        let res = catalog_svc
            .update_book(&UpdateBookRequest::put(
                created.id.as_str(), CreateBookRequest::new("new name", "")))
            .await;
        assert!(matches!(res, Err(LibraryError::Validation { .. })));

        let loaded = catalog_svc
            .describe_book(&DescribeBookRequest::new(created.id.as_str()))
            .await.expect("should describe book");
        assert_eq!("keep name", loaded.name.as_str());
        assert_eq!("keep author", loaded.author.as_str());
    }

    #[tokio::test]
    async fn test_should_keep_omitted_fields_on_patch() {
        let catalog_svc = test_service().await;

        let created = catalog_svc
            .create_book(&CreateBookRequest::new("patch name", "patch author"))
            .await.expect("should create book");

        let updated = catalog_svc
            .update_book(&UpdateBookRequest::patch(
                created.id.as_str(), CreateBookRequest::new("renamed", "")))
            .await.expect("should update book");
        assert_eq!("renamed", updated.name.as_str());
        assert_eq!("patch author", updated.author.as_str());

        let loaded = catalog_svc
            .describe_book(&DescribeBookRequest::new(created.id.as_str()))
            .await.expect("should describe book");
        assert_eq!("renamed", loaded.name.as_str());
        assert_eq!("patch author", loaded.author.as_str());
    }

    #[tokio::test]
    async fn test_should_return_last_state_on_delete() {
        let catalog_svc = test_service().await;

        let created = catalog_svc
            .create_book(&CreateBookRequest::new("short lived", "author"))
            .await.expect("should create book");

        let removed = catalog_svc
            .delete_book(&DeleteBookRequest::new(created.id.as_str()))
            .await.expect("should delete book");
        assert_eq!(created, removed);
        assert_eq!(BookStatus::Active, removed.status);

        let res = catalog_svc
            .describe_book(&DescribeBookRequest::new(created.id.as_str()))
            .await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));

        let again = catalog_svc
            .delete_book(&DeleteBookRequest::new(created.id.as_str()))
            .await;
        assert!(matches!(again, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_page_query_results() {
        let catalog_svc = test_service().await;

        for i in 0..15 {
            let req = CreateBookRequest::new(
                format!("paged book {:02}", i).as_str(), "paging author");
            catalog_svc.create_book(&req).await.expect("should create book");
        }

        let first = catalog_svc
            .query_books(&QueryBooksRequest::new("paged book", "", PageRequest::new(10, 1)))
            .await.expect("should query books");
        assert_eq!(10, first.total);
        assert_eq!(10, first.items.len());

        let second = catalog_svc
            .query_books(&QueryBooksRequest::new("paged book", "", PageRequest::new(10, 2)))
            .await.expect("should query books");
        assert_eq!(5, second.total);
        assert_eq!(5, second.items.len());
    }

    #[tokio::test]
    async fn test_should_report_missing_book() {
        let catalog_svc = test_service().await;

        let res = catalog_svc
            .describe_book(&DescribeBookRequest::new("no-such-id"))
            .await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_pass_validation_details_to_caller() {
        let catalog_svc = test_service().await;

        let res = catalog_svc
            .create_book(&CreateBookRequest::new(" ", "author"))
            .await;
        match res {
            Err(LibraryError::Validation { message, field }) => {
                assert_eq!("name must not be blank", message.as_str());
                assert_eq!(Some("name".to_string()), field);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_should_apply_concurrent_updates_atomically() {
        let catalog_svc = test_service().await;

        let created = catalog_svc
            .create_book(&CreateBookRequest::new("base name", "base author"))
            .await.expect("should create book");

        let left = {
            let catalog_svc = catalog_svc.clone();
            let id = created.id.clone();
            tokio::spawn(async move {
                catalog_svc.update_book(&UpdateBookRequest::put(
                    id.as_str(), CreateBookRequest::new("left name", "left author"))).await
            })
        };
        let right = {
            let catalog_svc = catalog_svc.clone();
            let id = created.id.clone();
            tokio::spawn(async move {
                catalog_svc.update_book(&UpdateBookRequest::put(
                    id.as_str(), CreateBookRequest::new("right name", "right author"))).await
            })
        };
        left.await.expect("should join update").expect("should update book");
        right.await.expect("should join update").expect("should update book");

        let loaded = catalog_svc
            .describe_book(&DescribeBookRequest::new(created.id.as_str()))
            .await.expect("should describe book");
        let pair = (loaded.name.as_str(), loaded.author.as_str());
        assert!(pair == ("left name", "left author")
            || pair == ("right name", "right author"));
    }

    #[tokio::test]
    async fn test_should_scrub_internal_failures() {
        let config = Configuration::new("sqlite::memory:");
        let pool = build_pool(&config).await.expect("should build pool");
        ensure_schema(&pool).await.expect("should create schema");
        let catalog_svc = CatalogServiceImpl::new(
            &config, Box::new(SqlBookRepository::new(pool.clone())));

        sqlx::query("DROP TABLE books").execute(&pool).await.expect("should drop table");

        let res = catalog_svc
            .create_book(&CreateBookRequest::new("name", "author"))
            .await;
        match res {
            Err(LibraryError::Database { message, .. }) => {
                assert_eq!(
                    "create book failed. Please contact the administrator",
                    message.as_str());
            }
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_should_scrub_undecodable_row_failures() {
        let config = Configuration::new("sqlite::memory:");
        let pool = build_pool(&config).await.expect("should build pool");
        ensure_schema(&pool).await.expect("should create schema");
        let catalog_svc = CatalogServiceImpl::new(
            &config, Box::new(SqlBookRepository::new(pool.clone())));

        let created = catalog_svc
            .create_book(&CreateBookRequest::new("name", "author"))
            .await.expect("should create book");
        sqlx::query("UPDATE books SET create_at = 'garbage' WHERE id = ?")
            .bind(created.id.as_str())
            .execute(&pool).await.expect("should overwrite column");

        let res = catalog_svc
            .describe_book(&DescribeBookRequest::new(created.id.as_str()))
            .await;
        match res {
            Err(LibraryError::Database { message, .. }) => {
                assert_eq!(
                    "describe book failed. Please contact the administrator",
                    message.as_str());
            }
            other => panic!("expected database error, got {:?}", other),
        }
    }
}
