use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug)]
pub enum LibraryError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    Validation {
        message: String,
        field: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn validation(message: &str, field: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), field }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } => { *retryable }
            LibraryError::DuplicateKey { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::Validation { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Validation { message, field } => {
                write!(f, "{} {:?}", message, field)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for the service and repository layers.
pub type LibraryResult<T> = Result<T, LibraryError>;

// Book lifecycle status persisted as an integer: 1 = active, 0 = soft
// deleted. Reads filter on `status > 0`, so only the zero value is ever
// treated as deleted.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BookStatus {
    Active,
    Deleted,
}

impl BookStatus {
    pub fn as_i64(&self) -> i64 {
        match self {
            BookStatus::Active => 1,
            BookStatus::Deleted => 0,
        }
    }
}

impl From<i64> for BookStatus {
    fn from(value: i64) -> Self {
        match value {
            0 => BookStatus::Deleted,
            _ => BookStatus::Active,
        }
    }
}

impl Display for BookStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BookStatus::Active => write!(f, "Active"),
            BookStatus::Deleted => write!(f, "Deleted"),
        }
    }
}

impl Serialize for BookStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for BookStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Ok(BookStatus::from(value))
    }
}

// Offset pagination over bounded reads. Pages are 1-based; a zero page size
// must be rejected by request validation before this type is consulted, and
// oversized values saturate rather than overflow.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    pub page_size: u64,
    pub page_number: u64,
}

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

impl PageRequest {
    pub fn new(page_size: u64, page_number: u64) -> Self {
        PageRequest { page_size, page_number }
    }

    pub fn compute_offset(&self) -> u64 {
        (self.page_number.max(1) - 1).saturating_mul(self.page_size)
    }

    pub fn validate(&self) -> LibraryResult<()> {
        if self.page_size == 0 {
            return Err(LibraryError::validation(
                "page_size must be greater than zero", Some("page_size".to_string())));
        }
        if self.page_number == 0 {
            return Err(LibraryError::validation(
                "page_number is 1-based and must be greater than zero", Some("page_number".to_string())));
        }
        Ok(())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(DEFAULT_PAGE_SIZE, DEFAULT_PAGE_NUMBER)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::{BookStatus, LibraryError, PageRequest};

    #[tokio::test]
    async fn test_should_create_database_error() {
        assert!(matches!(LibraryError::database("test", None, false), LibraryError::Database { message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_duplicate_key_error() {
        assert!(matches!(LibraryError::duplicate_key("test"), LibraryError::DuplicateKey { message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        assert!(matches!(LibraryError::not_found("test"), LibraryError::NotFound { message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_validation_error() {
        assert!(matches!(LibraryError::validation("test", None), LibraryError::Validation { message: _, field: _ }));
    }

    #[tokio::test]
    async fn test_should_create_serialization_error() {
        assert!(matches!(LibraryError::serialization("test"), LibraryError::Serialization { message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_runtime_error() {
        assert!(matches!(LibraryError::runtime("test", None), LibraryError::Runtime { message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert_eq!(false, LibraryError::database("test", None, false).retryable());
        assert_eq!(true, LibraryError::database("test", None, true).retryable());
        assert_eq!(false, LibraryError::duplicate_key("test").retryable());
        assert_eq!(false, LibraryError::not_found("test").retryable());
        assert_eq!(false, LibraryError::validation("test", None).retryable());
        assert_eq!(false, LibraryError::serialization("test").retryable());
        assert_eq!(false, LibraryError::runtime("test", None).retryable());
    }

    #[tokio::test]
    async fn test_should_map_book_status() {
        assert_eq!(1, BookStatus::Active.as_i64());
        assert_eq!(0, BookStatus::Deleted.as_i64());
        assert_eq!(BookStatus::Active, BookStatus::from(1));
        assert_eq!(BookStatus::Deleted, BookStatus::from(0));
    }

    #[tokio::test]
    async fn test_should_serialize_book_status_as_integer() {
        assert_eq!("1", serde_json::to_string(&BookStatus::Active).unwrap());
        assert_eq!("0", serde_json::to_string(&BookStatus::Deleted).unwrap());
        let status: BookStatus = serde_json::from_str("0").unwrap();
        assert_eq!(BookStatus::Deleted, status);
    }

    #[tokio::test]
    async fn test_should_compute_offset() {
        assert_eq!(0, PageRequest::new(10, 1).compute_offset());
        assert_eq!(10, PageRequest::new(10, 2).compute_offset());
        assert_eq!(40, PageRequest::new(20, 3).compute_offset());
        // page_number zero is clamped rather than underflowing
        assert_eq!(0, PageRequest::new(10, 0).compute_offset());
    }

    #[tokio::test]
    async fn test_should_saturate_offset_for_oversized_page() {
        assert_eq!(0, PageRequest::new(u64::MAX, 1).compute_offset());
        assert_eq!(u64::MAX, PageRequest::new(u64::MAX, 3).compute_offset());
        assert_eq!(u64::MAX, PageRequest::new(u64::MAX, u64::MAX).compute_offset());
    }

    #[tokio::test]
    async fn test_should_reject_invalid_page() {
        assert!(PageRequest::new(0, 1).validate().is_err());
        assert!(PageRequest::new(10, 0).validate().is_err());
        assert!(PageRequest::new(10, 1).validate().is_ok());
    }

    #[tokio::test]
    async fn test_should_default_page() {
        let page = PageRequest::default();
        assert_eq!(20, page.page_size);
        assert_eq!(1, page.page_number);
    }
}
