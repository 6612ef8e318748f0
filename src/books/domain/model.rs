use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::core::library::{BookStatus, LibraryError, LibraryResult};
use crate::utils::date::{option_serializer, serializer};

// BookEntity is the persistence-side shape of a catalog book: the client
// payload (name, author) plus the lifecycle metadata stamped by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookEntity {
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

impl BookEntity {
    pub fn new(name: &str, author: &str, operator: &str) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            // system-assigned, time-ordered, never client-supplied
            id: Uuid::now_v7().to_string(),
            status: BookStatus::Active,
            created_at: now,
            created_by: operator.to_string(),
            updated_at: now,
            updated_by: operator.to_string(),
            deleted_at: None,
            deleted_by: None,
            name: name.to_string(),
            author: author.to_string(),
        }
    }

    // Full replacement of the payload: incoming values win even when empty,
    // so the caller must revalidate before persisting.
    pub fn update(&mut self, name: &str, author: &str, operator: &str) {
        self.name = name.to_string();
        self.author = author.to_string();
        self.touch(operator);
    }

    // Field-presence merge: only non-empty incoming values overwrite.
    pub fn patch(&mut self, name: &str, author: &str, operator: &str) {
        if !name.is_empty() {
            self.name = name.to_string();
        }
        if !author.is_empty() {
            self.author = author.to_string();
        }
        self.touch(operator);
    }

    pub fn mark_deleted(&mut self, operator: &str) {
        self.status = BookStatus::Deleted;
        self.deleted_at = Some(Utc::now().naive_utc());
        self.deleted_by = Some(operator.to_string());
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

    fn touch(&mut self, operator: &str) {
        self.updated_at = Utc::now().naive_utc();
        self.updated_by = operator.to_string();
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.id.to_string()
    }
}

impl Book for BookEntity {
    fn status(&self) -> BookStatus {
        self.status
    }
}
