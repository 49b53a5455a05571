//! Persistence for events and their embedded registrations.
//!
//! Routes only ever see [`SharedStore`]; the MongoDB implementation is wired
//! in by the binary and [`MemoryStore`] stands in for it in tests.

mod memory;
mod mongo;

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use crate::error::StoreResult;
use crate::models::event::{Event, EventDraft, EventPatch};
use crate::models::registration::Registration;

pub use memory::MemoryStore;
pub use mongo::MongoEventStore;

pub const EVENTS_COLLECTION: &str = "events";

/// Upper bound on events returned by list-style reads.
pub const LIST_LIMIT: usize = 100;

pub type SharedStore = Arc<dyn EventStore>;

#[rocket::async_trait]
pub trait EventStore: Send + Sync {
    /// Up to `limit` events ordered by `date`, newest first.
    async fn list(&self, limit: usize) -> StoreResult<Vec<Event>>;

    /// Stores a new event; the store assigns its id.
    async fn insert(&self, draft: EventDraft) -> StoreResult<Event>;

    async fn find(&self, id: ObjectId) -> StoreResult<Option<Event>>;

    /// Merges `patch` into the event and returns the result, or `None` if no
    /// event has this id.
    async fn update(&self, id: ObjectId, patch: EventPatch) -> StoreResult<Option<Event>>;

    /// Returns `false` if nothing was deleted.
    async fn delete(&self, id: ObjectId) -> StoreResult<bool>;

    /// Appends to the event's registrations in a single conditional write.
    /// Returns `false` if no event has this id.
    async fn append_registration(
        &self,
        id: ObjectId,
        registration: Registration,
    ) -> StoreResult<bool>;

    /// Only the registrations of an event, or `None` if it does not exist.
    async fn registrations(&self, id: ObjectId) -> StoreResult<Option<Vec<Registration>>>;
}
