use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use sqlx::{Row, Sqlite, Transaction};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use tracing::{debug, error, warn};

use crate::books::domain::model::BookEntity;
use crate::books::repository::{BookFilter, BookRepository};
use crate::core::library::{BookStatus, LibraryError, LibraryResult, PageRequest};
use crate::core::repository::Repository;
use crate::utils::sql::like_pattern;

const INSERT_BOOK: &str = "INSERT INTO books (id, status, create_at, create_by, update_at, update_by, delete_at, delete_by, book_name, author) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

// Reads order by id; generated ids are time-ordered, so pages follow
// creation order and the offset stays stable between requests.
const QUERY_BOOKS: &str = "SELECT id, status, create_at, create_by, update_at, update_by, delete_at, delete_by, book_name, author \
     FROM books WHERE status > 0 AND book_name LIKE ? AND author LIKE ? ORDER BY id LIMIT ? OFFSET ?";

const DESCRIBE_BOOK: &str = "SELECT id, status, create_at, create_by, update_at, update_by, delete_at, delete_by, book_name, author \
     FROM books WHERE status > 0 AND id = ?";

const UPDATE_BOOK: &str = "UPDATE books SET update_at = ?, update_by = ?, book_name = ?, author = ? \
     WHERE status > 0 AND id = ?";

const DELETE_BOOK: &str = "UPDATE books SET status = 0, delete_at = ?, delete_by = ? \
     WHERE status > 0 AND id = ?";

#[derive(Debug)]
pub struct SqlBookRepository {
    pool: SqlitePool,
}

impl SqlBookRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Runs one unit of work: begin, execute the closure, then commit on Ok or
    // roll back on Err. A rollback failure is logged and the original error
    // is returned unchanged. Dropping the in-flight future drops the
    // transaction, which also rolls back.
    async fn within_tx<F, T>(&self, operation: &'static str, f: F) -> LibraryResult<T>
    where
        F: for<'a> FnOnce(
            &'a mut Transaction<'_, Sqlite>,
        ) -> Pin<Box<dyn Future<Output = LibraryResult<T>> + Send + 'a>>,
    {
        let mut tx = self.pool.begin().await
            .map_err(|err| to_database_error(operation, &err))?;
        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await
                    .map_err(|err| to_database_error(operation, &err))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(operation, error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

#[async_trait]
impl Repository<BookEntity> for SqlBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        debug!(operation = "create_book", sql = INSERT_BOOK, "executing statement");
        let book = entity.clone();
        self.within_tx("create_book", move |tx| {
            Box::pin(async move {
                let res = sqlx::query(INSERT_BOOK)
                    .bind(book.id.as_str())
                    .bind(book.status.as_i64())
                    .bind(book.created_at)
                    .bind(book.created_by.as_str())
                    .bind(book.updated_at)
                    .bind(book.updated_by.as_str())
                    .bind(book.deleted_at)
                    .bind(book.deleted_by.as_deref())
                    .bind(book.name.as_str())
                    .bind(book.author.as_str())
                    .execute(&mut **tx)
                    .await
                    .map_err(|err| {
                        if is_unique_violation(&err) {
                            LibraryError::duplicate_key(
                                format!("book already exists for {}", book.id).as_str())
                        } else {
                            to_database_error("create_book", &err)
                        }
                    })?;
                Ok(res.rows_affected() as usize)
            })
        }).await
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        debug!(operation = "update_book", sql = UPDATE_BOOK, "executing statement");
        let book = entity.clone();
        self.within_tx("update_book", move |tx| {
            Box::pin(async move {
                let res = sqlx::query(UPDATE_BOOK)
                    .bind(book.updated_at)
                    .bind(book.updated_by.as_str())
                    .bind(book.name.as_str())
                    .bind(book.author.as_str())
                    .bind(book.id.as_str())
                    .execute(&mut **tx)
                    .await
                    .map_err(|err| to_database_error("update_book", &err))?;
                if res.rows_affected() == 0 {
                    return Err(LibraryError::not_found(
                        format!("book not found for {}", book.id).as_str()));
                }
                Ok(res.rows_affected() as usize)
            })
        }).await
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        debug!(operation = "describe_book", sql = DESCRIBE_BOOK, "executing statement");
        let row = sqlx::query(DESCRIBE_BOOK)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| to_database_error("describe_book", &err))?;
        match row {
            Some(row) => row_to_book(&row),
            None => Err(LibraryError::not_found(
                format!("book not found for {}", id).as_str())),
        }
    }

    async fn delete(&self, entity: &BookEntity) -> LibraryResult<usize> {
        debug!(operation = "delete_book", sql = DELETE_BOOK, "executing statement");
        let book = entity.clone();
        self.within_tx("delete_book", move |tx| {
            Box::pin(async move {
                let res = sqlx::query(DELETE_BOOK)
                    .bind(book.deleted_at)
                    .bind(book.deleted_by.as_deref())
                    .bind(book.id.as_str())
                    .execute(&mut **tx)
                    .await
                    .map_err(|err| to_database_error("delete_book", &err))?;
                if res.rows_affected() == 0 {
                    return Err(LibraryError::not_found(
                        format!("book not found for {}", book.id).as_str()));
                }
                Ok(res.rows_affected() as usize)
            })
        }).await
    }
}

#[async_trait]
impl BookRepository for SqlBookRepository {
    async fn query(&self, filter: &BookFilter,
                   page: &PageRequest) -> LibraryResult<Vec<BookEntity>> {
        let name_pattern = like_pattern(filter.name.as_str());
        let author_pattern = like_pattern(filter.author.as_str());
        debug!(operation = "query_books", sql = QUERY_BOOKS,
            name_pattern = name_pattern.as_str(), author_pattern = author_pattern.as_str(),
            "executing statement");
        // LIMIT and OFFSET bind as i64; larger values clamp to the maximum,
        // so an out-of-range page comes back empty instead of unbounded.
        let rows = sqlx::query(QUERY_BOOKS)
            .bind(name_pattern.as_str())
            .bind(author_pattern.as_str())
            .bind(i64::try_from(page.page_size).unwrap_or(i64::MAX))
            .bind(i64::try_from(page.compute_offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| to_database_error("query_books", &err))?;
        rows.iter().map(row_to_book).collect()
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

fn to_database_error(operation: &str, err: &sqlx::Error) -> LibraryError {
    error!(operation, error = %err, "database operation failed");
    let reason_code = err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code.to_string());
    let retryable = matches!(err, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_));
    LibraryError::database(
        format!("{} failed: {}", operation, err).as_str(), reason_code, retryable)
}

// A column that fails to decode is a store fault, not caller input, so it
// surfaces as Database and the facade scrubs the diagnostic.
fn row_to_book(row: &SqliteRow) -> LibraryResult<BookEntity> {
    let decode = |err: sqlx::Error| {
        error!(error = %err, "failed to decode book row");
        LibraryError::database(
            format!("failed to decode book row: {}", err).as_str(), None, false)
    };
    Ok(BookEntity {
        id: row.try_get("id").map_err(decode)?,
        status: BookStatus::from(row.try_get::<i64, _>("status").map_err(decode)?),
        created_at: row.try_get("create_at").map_err(decode)?,
        created_by: row.try_get("create_by").map_err(decode)?,
        updated_at: row.try_get("update_at").map_err(decode)?,
        updated_by: row.try_get("update_by").map_err(decode)?,
        deleted_at: row.try_get("delete_at").map_err(decode)?,
        deleted_by: row.try_get("delete_by").map_err(decode)?,
        name: row.try_get("book_name").map_err(decode)?,
        author: row.try_get("author").map_err(decode)?,
    })
}
