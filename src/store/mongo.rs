use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOneOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::models::event::{read_registrations, Event, EventDraft, EventPatch};
use crate::models::registration::Registration;
use crate::store::{EventStore, EVENTS_COLLECTION};

#[derive(Debug, Clone)]
pub struct MongoEventStore {
    events: Collection<Document>,
}

impl MongoEventStore {
    pub fn new(db: &Database) -> Self {
        MongoEventStore {
            events: db.collection(EVENTS_COLLECTION),
        }
    }

    pub fn collection(&self) -> &Collection<Document> {
        &self.events
    }
}

#[rocket::async_trait]
impl EventStore for MongoEventStore {
    async fn list(&self, limit: usize) -> StoreResult<Vec<Event>> {
        let find_options = FindOptions::builder()
            .sort(doc! { "date": -1 })
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let mut cursor = self.events.find(doc! {}, find_options).await?;
        let mut events = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            match Event::try_from(document) {
                Ok(event) => events.push(event),
                Err(err) => warn!(%err, "skipping unreadable event document"),
            }
        }
        Ok(events)
    }

    async fn insert(&self, draft: EventDraft) -> StoreResult<Event> {
        let result = self.events.insert_one(draft.to_document(), None).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Malformed("inserted `_id` is not an ObjectId".to_string()))?;
        Ok(draft.assign(id))
    }

    async fn find(&self, id: ObjectId) -> StoreResult<Option<Event>> {
        self.events
            .find_one(doc! { "_id": id }, None)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn update(&self, id: ObjectId, patch: EventPatch) -> StoreResult<Option<Event>> {
        if patch.is_empty() {
            return self.find(id).await;
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.events
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": patch.into_document() },
                options,
            )
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn delete(&self, id: ObjectId) -> StoreResult<bool> {
        let result = self.events.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn append_registration(
        &self,
        id: ObjectId,
        registration: Registration,
    ) -> StoreResult<bool> {
        let result = self
            .events
            .update_one(
                doc! { "_id": id },
                doc! { "$push": { "registrations": registration.into_document() } },
                None,
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn registrations(&self, id: ObjectId) -> StoreResult<Option<Vec<Registration>>> {
        let options = FindOneOptions::builder()
            .projection(doc! { "registrations": 1 })
            .build();

        match self.events.find_one(doc! { "_id": id }, options).await? {
            Some(mut document) => Ok(Some(read_registrations(id, document.remove("registrations")))),
            None => Ok(None),
        }
    }
}
