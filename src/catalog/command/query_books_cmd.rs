use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::{BookSet, QueryBooksRequest};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::{PageRequest, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

pub(crate) struct QueryBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl QueryBooksCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// Flat shape so the whole request can come straight from a query string.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryBooksCommandRequest {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default = "default_page_number")]
    pub page_number: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_page_number() -> u64 {
    DEFAULT_PAGE_NUMBER
}

impl QueryBooksCommandRequest {
    pub fn new(keyword: &str, author: &str, page_size: u64, page_number: u64) -> Self {
        Self {
            keyword: keyword.to_string(),
            author: author.to_string(),
            page_size,
            page_number,
        }
    }
    pub fn build_request(&self) -> QueryBooksRequest {
        QueryBooksRequest::new(
            self.keyword.as_str(), self.author.as_str(),
            PageRequest::new(self.page_size, self.page_number))
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct QueryBooksCommandResponse {
    pub books: BookSet,
}

impl QueryBooksCommandResponse {
    pub fn new(books: BookSet) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<QueryBooksCommandRequest, QueryBooksCommandResponse> for QueryBooksCommand {
    async fn execute(&self, req: QueryBooksCommandRequest) -> Result<QueryBooksCommandResponse, CommandError> {
        self.catalog_service.query_books(&req.build_request()).await
            .map_err(CommandError::from).map(QueryBooksCommandResponse::new)
    }
}
