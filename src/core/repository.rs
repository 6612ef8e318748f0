use async_trait::async_trait;
use crate::core::library::LibraryResult;

// Storage seam for a single entity type. Each method owns one unit of work
// against the store; mutating methods return the number of rows they touched.
#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // insert a new entity
    async fn create(&self, entity: &Entity) -> LibraryResult<usize>;

    // persist payload and update stamps of an existing, active entity
    async fn update(&self, entity: &Entity) -> LibraryResult<usize>;

    // fetch one active entity; zero rows is a NotFound error, never a
    // half-populated value
    async fn get(&self, id: &str) -> LibraryResult<Entity>;

    // soft-delete an active entity using the stamps already set on it
    async fn delete(&self, entity: &Entity) -> LibraryResult<usize>;
}
