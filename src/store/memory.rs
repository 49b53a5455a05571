use std::cmp::Ordering;

use mongodb::bson::{oid::ObjectId, Bson};
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::models::event::{Event, EventDraft, EventPatch};
use crate::models::registration::Registration;
use crate::store::EventStore;

/// Event store kept in process memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[rocket::async_trait]
impl EventStore for MemoryStore {
    async fn list(&self, limit: usize) -> StoreResult<Vec<Event>> {
        let mut events = self.events.read().await.clone();
        // stable, so equal dates keep insertion order
        events.sort_by(|a, b| compare_sort_keys(b.date.as_ref(), a.date.as_ref()));
        events.truncate(limit);
        Ok(events)
    }

    async fn insert(&self, draft: EventDraft) -> StoreResult<Event> {
        let event = draft.assign(ObjectId::new());
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn find(&self, id: ObjectId) -> StoreResult<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|event| event.id == id).cloned())
    }

    async fn update(&self, id: ObjectId, patch: EventPatch) -> StoreResult<Option<Event>> {
        let mut events = self.events.write().await;
        let Some(event) = events.iter_mut().find(|event| event.id == id) else {
            return Ok(None);
        };
        *event = event.apply(&patch)?;
        Ok(Some(event.clone()))
    }

    async fn delete(&self, id: ObjectId) -> StoreResult<bool> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|event| event.id != id);
        Ok(events.len() < before)
    }

    async fn append_registration(
        &self,
        id: ObjectId,
        registration: Registration,
    ) -> StoreResult<bool> {
        let mut events = self.events.write().await;
        match events.iter_mut().find(|event| event.id == id) {
            Some(event) => {
                event.registrations.push(registration);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn registrations(&self, id: ObjectId) -> StoreResult<Option<Vec<Registration>>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .find(|event| event.id == id)
            .map(|event| event.registrations.clone()))
    }
}

/// MongoDB's cross-type sort order, with a missing value sorting as null.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => 1,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_)) => 2,
        Some(Bson::String(_) | Bson::Symbol(_)) => 3,
        Some(Bson::Document(_)) => 4,
        Some(Bson::Array(_)) => 5,
        Some(Bson::Binary(_)) => 6,
        Some(Bson::ObjectId(_)) => 7,
        Some(Bson::Boolean(_)) => 8,
        Some(Bson::DateTime(_)) => 9,
        Some(Bson::Timestamp(_)) => 10,
        Some(Bson::RegularExpression(_)) => 11,
        Some(_) => 12,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(number) => Some(f64::from(*number)),
        Bson::Int64(number) => Some(*number as f64),
        Bson::Double(number) => Some(*number),
        _ => None,
    }
}

fn compare_sort_keys(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let by_type = type_rank(a).cmp(&type_rank(b));
    if by_type != Ordering::Equal {
        return by_type;
    }

    match (a, b) {
        (Some(Bson::String(a)), Some(Bson::String(b))) => a.cmp(b),
        (Some(Bson::DateTime(a)), Some(Bson::DateTime(b))) => a.cmp(b),
        (Some(Bson::Boolean(a)), Some(Bson::Boolean(b))) => a.cmp(b),
        (Some(Bson::ObjectId(a)), Some(Bson::ObjectId(b))) => a.cmp(b),
        (Some(Bson::Timestamp(a)), Some(Bson::Timestamp(b))) => {
            (a.time, a.increment).cmp(&(b.time, b.increment))
        }
        (Some(a), Some(b)) => match (as_f64(a), as_f64(b)) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}
