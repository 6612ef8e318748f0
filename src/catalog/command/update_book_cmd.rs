use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::{BookDto, CreateBookRequest, UpdateBookRequest, UpdateMode};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct UpdateBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl UpdateBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateBookCommandRequest {
    pub id: String,
    pub update_mode: UpdateMode,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
}

impl UpdateBookCommandRequest {
    pub fn put(id: &str, name: &str, author: &str) -> Self {
        Self {
            id: id.to_string(),
            update_mode: UpdateMode::FullReplace,
            name: name.to_string(),
            author: author.to_string(),
        }
    }
    pub fn patch(id: &str, name: &str, author: &str) -> Self {
        Self {
            id: id.to_string(),
            update_mode: UpdateMode::PartialMerge,
            name: name.to_string(),
            author: author.to_string(),
        }
    }
    pub fn build_request(&self) -> UpdateBookRequest {
        UpdateBookRequest {
            id: self.id.to_string(),
            update_mode: self.update_mode,
            data: CreateBookRequest::new(self.name.as_str(), self.author.as_str()),
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct UpdateBookCommandResponse {
    pub book: BookDto,
}

impl UpdateBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        self.catalog_service.update_book(&req.build_request()).await
            .map_err(CommandError::from).map(UpdateBookCommandResponse::new)
    }
}
