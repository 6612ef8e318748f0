use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::books::domain::model::BookEntity;
use crate::core::domain::Identifiable;
use crate::core::library::{BookStatus, LibraryError, LibraryResult, PageRequest};
use crate::utils::date::{option_serializer, serializer};

// BookDto is the wire shape of a catalog book, shared by every transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookDto {
    pub id: String,
    pub status: BookStatus,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    pub created_by: String,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
    pub updated_by: String,
    #[serde(default, with = "option_serializer")]
    pub deleted_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub deleted_by: Option<String>,
    pub name: String,
    pub author: String,
}

impl Identifiable for BookDto {
    fn id(&self) -> String {
        self.id.to_string()
    }
}

impl Book for BookDto {
    fn status(&self) -> BookStatus {
        self.status
    }
}

// BookSet is a query result page. `total` counts the items actually returned,
// not the full matching row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookSet {
    pub items: Vec<BookDto>,
    pub total: i64,
}

impl BookSet {
    pub fn new() -> BookSet {
        BookSet {
            items: vec![],
            total: 0,
        }
    }

    pub fn add(&mut self, book: BookDto) {
        self.items.push(book);
        self.total = self.items.len() as i64;
    }
}

impl Default for BookSet {
    fn default() -> Self {
        BookSet::new()
    }
}

// Payload for create, reused as the update body by both merge modes. Fields
// default to empty so a PATCH body may omit either one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct CreateBookRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
}

impl CreateBookRequest {
    pub fn new(name: &str, author: &str) -> Self {
        Self {
            name: name.to_string(),
            author: author.to_string(),
        }
    }

    pub fn validate(&self) -> LibraryResult<()> {
        if self.name.trim().is_empty() {
            return Err(LibraryError::validation(
                "name must not be blank", Some("name".to_string())));
        }
        if self.author.trim().is_empty() {
            return Err(LibraryError::validation(
                "author must not be blank", Some("author".to_string())));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct QueryBooksRequest {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub page: PageRequest,
}

impl QueryBooksRequest {
    pub fn new(keyword: &str, author: &str, page: PageRequest) -> Self {
        Self {
            keyword: keyword.to_string(),
            author: author.to_string(),
            page,
        }
    }

    pub fn validate(&self) -> LibraryResult<()> {
        self.page.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct DescribeBookRequest {
    pub id: String,
}

impl DescribeBookRequest {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }

    pub fn validate(&self) -> LibraryResult<()> {
        validate_id(self.id.as_str())
    }
}

// Update modes carry their own merge dispatch so callers never branch on a
// bare tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) enum UpdateMode {
    #[serde(rename = "PUT")]
    FullReplace,
    #[serde(rename = "PATCH")]
    PartialMerge,
}

impl UpdateMode {
    pub(crate) fn apply(&self, book: &mut BookEntity, data: &CreateBookRequest, operator: &str) {
        match self {
            UpdateMode::FullReplace => {
                book.update(data.name.as_str(), data.author.as_str(), operator)
            }
            UpdateMode::PartialMerge => {
                book.patch(data.name.as_str(), data.author.as_str(), operator)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct UpdateBookRequest {
    pub id: String,
    pub update_mode: UpdateMode,
    pub data: CreateBookRequest,
}

impl UpdateBookRequest {
    pub fn put(id: &str, data: CreateBookRequest) -> Self {
        Self {
            id: id.to_string(),
            update_mode: UpdateMode::FullReplace,
            data,
        }
    }

    pub fn patch(id: &str, data: CreateBookRequest) -> Self {
        Self {
            id: id.to_string(),
            update_mode: UpdateMode::PartialMerge,
            data,
        }
    }

    // The merged entity is revalidated after apply, so only the id is
    // checked up front.
    pub fn validate(&self) -> LibraryResult<()> {
        validate_id(self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct DeleteBookRequest {
    pub id: String,
}

impl DeleteBookRequest {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }

    pub fn validate(&self) -> LibraryResult<()> {
        validate_id(self.id.as_str())
    }
}

fn validate_id(id: &str) -> LibraryResult<()> {
    if id.trim().is_empty() {
        return Err(LibraryError::validation(
            "id must not be blank", Some("id".to_string())));
    }
    Ok(())
}
