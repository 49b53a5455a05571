use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::registration::Registration;

pub const UNTITLED_EVENT: &str = "Untitled Event";

/// Fields of an event that has not been stored yet.
///
/// `title`, `name`, `date` and `registrations` are the fields the service
/// reasons about; everything else the caller sent is carried in `extra`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventDraft {
    pub title: Option<String>,
    pub name: Option<String>,
    pub date: Option<Bson>,
    pub registrations: Vec<Registration>,
    pub extra: Document,
}

/// A stored event document.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: ObjectId,
    pub title: Option<String>,
    pub name: Option<String>,
    pub date: Option<Bson>,
    pub registrations: Vec<Registration>,
    pub extra: Document,
}

/// A field-level merge applied to an existing event.
///
/// Never carries `_id` or `registrations`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventPatch(Document);

impl EventDraft {
    /// Builds a draft from a JSON request body. A client-supplied `_id` is ignored.
    pub fn from_json(fields: Map<String, Value>) -> Result<Self, StoreError> {
        let mut document = bson::to_document(&fields)?;
        document.remove("_id");
        Self::try_from(document)
    }

    pub fn assign(self, id: ObjectId) -> Event {
        Event {
            id,
            title: self.title,
            name: self.name,
            date: self.date,
            registrations: self.registrations,
            extra: self.extra,
        }
    }

    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        write_known_fields(
            &mut document,
            self.title.as_ref(),
            self.name.as_ref(),
            self.date.as_ref(),
        );
        for (key, value) in &self.extra {
            document.insert(key.clone(), value.clone());
        }
        document.insert("registrations", registrations_to_bson(&self.registrations));
        document
    }
}

impl TryFrom<Document> for EventDraft {
    type Error = StoreError;

    fn try_from(mut document: Document) -> Result<Self, Self::Error> {
        let title = take_text(&mut document, "title")?;
        let name = take_text(&mut document, "name")?;
        let date = document.remove("date").filter(|date| *date != Bson::Null);
        let registrations = parse_registrations(document.remove("registrations"))?;

        Ok(EventDraft {
            title,
            name,
            date,
            registrations,
            extra: document,
        })
    }
}

impl Event {
    /// `title`, then `name`, then [`UNTITLED_EVENT`]. An empty `title` counts as absent.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .or(self.name.as_deref())
            .unwrap_or(UNTITLED_EVENT)
    }

    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.insert("_id", self.id);
        write_known_fields(
            &mut document,
            self.title.as_ref(),
            self.name.as_ref(),
            self.date.as_ref(),
        );
        for (key, value) in &self.extra {
            document.insert(key.clone(), value.clone());
        }
        document.insert("registrations", registrations_to_bson(&self.registrations));
        document
    }

    /// Applies a patch the way `$set` does: mentioned fields are overwritten,
    /// the rest are left alone.
    pub fn apply(&self, patch: &EventPatch) -> Result<Event, StoreError> {
        let mut document = self.to_document();
        for (key, value) in patch.as_document() {
            document.insert(key.clone(), value.clone());
        }
        Event::try_from(document)
    }

    /// JSON view of the event with `_id` rendered as its hex string.
    pub fn into_json(self) -> Value {
        let mut document = self.to_document();
        document.insert("_id", self.id.to_hex());
        Bson::Document(document).into_relaxed_extjson()
    }
}

impl TryFrom<Document> for Event {
    type Error = StoreError;

    /// Reads a stored document. Only a missing or non-ObjectId `_id` is an
    /// error; mistyped known fields are kept as extension fields instead.
    fn try_from(mut document: Document) -> Result<Self, Self::Error> {
        let id = match document.remove("_id") {
            Some(Bson::ObjectId(id)) => id,
            Some(other) => {
                return Err(StoreError::Malformed(format!(
                    "event `_id` must be an ObjectId, found {other}"
                )))
            }
            None => return Err(StoreError::Malformed("event has no `_id`".to_string())),
        };

        let mut extra = Document::new();
        let title = read_text(&mut document, &mut extra, id, "title");
        let name = read_text(&mut document, &mut extra, id, "name");
        let date = document.remove("date").filter(|date| *date != Bson::Null);
        let registrations = read_registrations(id, document.remove("registrations"));
        for (key, value) in document {
            extra.insert(key, value);
        }

        Ok(Event {
            id,
            title,
            name,
            date,
            registrations,
            extra,
        })
    }
}

impl EventPatch {
    /// Builds a patch from a JSON request body. A top-level `_id` or
    /// `registrations` is dropped; a dotted path into either is rejected,
    /// as are non-text values for the known text fields.
    pub fn from_json(fields: Map<String, Value>) -> Result<Self, StoreError> {
        let mut document = bson::to_document(&fields)?;
        document.remove("_id");
        if document.remove("registrations").is_some() {
            debug!("ignoring `registrations` in event update");
        }
        if let Some(key) = document.keys().find(|key| is_protected_path(key)) {
            return Err(StoreError::Malformed(format!("`{key}` cannot be updated")));
        }
        for key in ["title", "name"] {
            match document.get(key) {
                None | Some(Bson::String(_)) | Some(Bson::Null) => {}
                Some(other) => {
                    return Err(StoreError::Malformed(format!(
                        "`{key}` must be text, found {other}"
                    )))
                }
            }
        }
        Ok(EventPatch(document))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }
}

/// Checks a `registrations` value sent by a client. Missing and null both mean empty.
fn parse_registrations(value: Option<Bson>) -> Result<Vec<Registration>, StoreError> {
    match value {
        None | Some(Bson::Null) => Ok(Vec::new()),
        Some(Bson::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Bson::Document(fields) => Ok(Registration::from(fields)),
                other => Err(StoreError::Malformed(format!(
                    "registration must be an object, found {other}"
                ))),
            })
            .collect(),
        Some(other) => Err(StoreError::Malformed(format!(
            "`registrations` must be an array, found {other}"
        ))),
    }
}

/// Stored counterpart of [`parse_registrations`]: a non-array value reads as
/// empty and non-object items are skipped.
pub(crate) fn read_registrations(event_id: ObjectId, value: Option<Bson>) -> Vec<Registration> {
    match value {
        None | Some(Bson::Null) => Vec::new(),
        Some(Bson::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Bson::Document(fields) => Some(Registration::from(fields)),
                other => {
                    warn!(%event_id, value = %other, "skipping registration that is not an object");
                    None
                }
            })
            .collect(),
        Some(other) => {
            warn!(%event_id, value = %other, "ignoring `registrations` that is not an array");
            Vec::new()
        }
    }
}

fn is_protected_path(key: &str) -> bool {
    ["_id", "registrations"]
        .iter()
        .any(|field| key.strip_prefix(field).is_some_and(|rest| rest.starts_with('.')))
}

fn read_text(
    document: &mut Document,
    extra: &mut Document,
    event_id: ObjectId,
    key: &str,
) -> Option<String> {
    match document.remove(key) {
        None | Some(Bson::Null) => None,
        Some(Bson::String(text)) => Some(text),
        Some(other) => {
            warn!(%event_id, field = key, value = %other, "stored field is not text");
            extra.insert(key, other);
            None
        }
    }
}

fn take_text(document: &mut Document, key: &str) -> Result<Option<String>, StoreError> {
    match document.remove(key) {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::String(text)) => Ok(Some(text)),
        Some(other) => Err(StoreError::Malformed(format!(
            "`{key}` must be text, found {other}"
        ))),
    }
}

fn write_known_fields(
    document: &mut Document,
    title: Option<&String>,
    name: Option<&String>,
    date: Option<&Bson>,
) {
    if let Some(title) = title {
        document.insert("title", title.clone());
    }
    if let Some(name) = name {
        document.insert("name", name.clone());
    }
    if let Some(date) = date {
        document.insert("date", date.clone());
    }
}

fn registrations_to_bson(registrations: &[Registration]) -> Bson {
    Bson::Array(
        registrations
            .iter()
            .map(|registration| Bson::Document(registration.as_document().clone()))
            .collect(),
    )
}
