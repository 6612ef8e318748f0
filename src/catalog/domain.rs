pub mod service;

use async_trait::async_trait;
use crate::books::dto::{
    BookDto, BookSet, CreateBookRequest, DeleteBookRequest, DescribeBookRequest,
    QueryBooksRequest, UpdateBookRequest,
};
use crate::core::library::LibraryResult;

#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    async fn create_book(&self, req: &CreateBookRequest) -> LibraryResult<BookDto>;
    async fn query_books(&self, req: &QueryBooksRequest) -> LibraryResult<BookSet>;
    async fn describe_book(&self, req: &DescribeBookRequest) -> LibraryResult<BookDto>;
    async fn update_book(&self, req: &UpdateBookRequest) -> LibraryResult<BookDto>;
    async fn delete_book(&self, req: &DeleteBookRequest) -> LibraryResult<BookDto>;
}
