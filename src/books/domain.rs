use crate::core::domain::Identifiable;
use crate::core::library::BookStatus;

pub mod model;

pub(crate) trait Book: Identifiable {
    fn status(&self) -> BookStatus;

    fn is_active(&self) -> bool {
        self.status() == BookStatus::Active
    }
}
