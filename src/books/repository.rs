pub mod sql_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::{LibraryResult, PageRequest};
use crate::core::repository::Repository;

// Filter terms for paged catalog queries. Terms are prefix matches against
// the book name and author; an empty term matches every row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BookFilter {
    pub name: String,
    pub author: String,
}

impl BookFilter {
    pub fn new(name: &str, author: &str) -> Self {
        Self {
            name: name.to_string(),
            author: author.to_string(),
        }
    }
}

#[async_trait]
pub(crate) trait BookRepository: Repository<BookEntity> {
    async fn query(&self, filter: &BookFilter,
                   page: &PageRequest) -> LibraryResult<Vec<BookEntity>>;
}
