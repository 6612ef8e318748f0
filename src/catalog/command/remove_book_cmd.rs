use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::{BookDto, DeleteBookRequest};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct RemoveBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl RemoveBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoveBookCommandRequest {
    pub(crate) id: String,
}

impl RemoveBookCommandRequest {
    pub fn new(id: String) -> Self {
        Self {
            id,
        }
    }
    pub fn build_request(&self) -> DeleteBookRequest {
        DeleteBookRequest::new(self.id.as_str())
    }
}


// The response echoes the record as it stood before removal.
#[derive(Debug, Serialize)]
pub(crate) struct RemoveBookCommandResponse {
    pub book: BookDto,
}

impl RemoveBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<RemoveBookCommandRequest, RemoveBookCommandResponse> for RemoveBookCommand {
    async fn execute(&self, req: RemoveBookCommandRequest) -> Result<RemoveBookCommandResponse, CommandError> {
        self.catalog_service.delete_book(&req.build_request()).await
            .map_err(CommandError::from).map(RemoveBookCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
    use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
    use crate::catalog::domain::CatalogService;
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;

    async fn test_service() -> Arc<dyn CatalogService> {
        factory::create_catalog_service(&Configuration::new("sqlite::memory:"))
            .await.expect("should create catalog service")
    }

    #[tokio::test]
    async fn test_should_run_remove_book() {
        let svc = test_service().await;
        let add_cmd = AddBookCommand::new(svc.clone());
        let get_cmd = GetBookCommand::new(svc.clone());
        let remove_cmd = RemoveBookCommand::new(svc);

        let added = add_cmd.execute(AddBookCommandRequest::new("test book", "test author"))
            .await.expect("should add book");
        let removed = remove_cmd.execute(RemoveBookCommandRequest::new(added.book.id.to_string()))
            .await.expect("should remove book");
        assert_eq!(added.book, removed.book);

        let res = get_cmd.execute(GetBookCommandRequest::new(added.book.id.to_string())).await;
        assert!(matches!(res, Err(CommandError::NotFound { .. })));
    }
}
