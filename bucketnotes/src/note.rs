//! Core types of Bucketnotes.
use crate::errors::NoteStoreError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use uuid::Uuid;

/// ID of notes.
///
/// In a given note store ([`crate::notestore`]),
/// [`NoteID`] uniquely identifies a note.
/// How the id is produced is the store's business:
/// file-backed stores mint one from a millisecond timestamp at creation time,
/// while document-backed stores return whatever the backend generated.
/// Callers never make up an id of their own.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Hash)]
#[serde(into = "String", from = "String")]
pub struct NoteID {
    id: String,
}

impl From<NoteID> for String {
    fn from(id: NoteID) -> String {
        id.id
    }
}

impl From<String> for NoteID {
    fn from(id: String) -> NoteID {
        NoteID::new(id)
    }
}

impl From<&str> for NoteID {
    fn from(id: &str) -> NoteID {
        NoteID::new(id.to_owned())
    }
}

impl NoteID {
    pub fn new(id: String) -> Self {
        NoteID { id }
    }

    /// Parse the id in the uuid form used by document-backed stores.
    pub fn try_to_uuid(&self) -> Result<Uuid, NoteStoreError> {
        Uuid::parse_str(&self.id).map_err(|_| NoteStoreError::NotUuid(self.id.clone()))
    }
}

impl Display for NoteID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl AsRef<str> for NoteID {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

/// A single bucket-list note.
///
/// `image_url` is a durable download URL produced by an
/// [`crate::attachment::AttachmentStore`], not a path on the device that
/// picked the image. Notes written before attachments existed simply lack
/// the field, so it is optional on the wire.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Note {
    pub id: NoteID,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Note {
    pub fn from_draft(id: NoteID, draft: NoteDraft) -> Self {
        Note {
            id,
            title: draft.title,
            content: draft.content,
            image_url: draft.image_url,
        }
    }
}

/// What a form hands over when the user saves.
///
/// A draft carries no id. Whether saving creates a note or replaces one is
/// decided by the current [`crate::session::Selection`], never by anything
/// inside the draft.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

impl NoteDraft {
    pub fn new(title: String, content: String) -> Self {
        NoteDraft {
            title,
            content,
            ..Default::default()
        }
    }

    pub fn with_image_url(mut self, image_url: String) -> Self {
        self.image_url = Some(image_url);
        self
    }
}
