//! In-memory storage of notes
use crate::errors::NoteStoreError;
use crate::note::{Note, NoteDraft, NoteID};
use crate::notestore::NoteStore;
use futures::future::BoxFuture;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory storage.
///
/// This is mostly designed for development and tests, because there is no
/// persistence layer. It follows the document-store id policy: ids are
/// assigned inside the store and handed back to the caller, never minted
/// outside.
#[derive(Debug, Default)]
struct InMemoryStoreInner {
    notes: Vec<Note>,
}

impl InMemoryStoreInner {
    fn new() -> Self {
        Default::default()
    }

    /// Generate a new [`NoteID`].
    ///
    /// We use the UUID V4 scheme, standing in for a backend-generated
    /// document id.
    fn get_new_noteid(&self) -> NoteID {
        NoteID::new(Uuid::new_v4().to_string())
    }

    fn load_notes(&self) -> Result<Vec<Note>, NoteStoreError> {
        Ok(self.notes.clone())
    }

    fn new_note(&mut self, draft: NoteDraft) -> Result<Note, NoteStoreError> {
        let id = self.get_new_noteid();
        // sanity check
        assert!(!self.notes.iter().any(|note| note.id == id));
        let note = Note::from_draft(id, draft);
        self.notes.push(note.clone());
        Ok(note)
    }

    fn update_note(&mut self, id: &NoteID, draft: NoteDraft) -> Result<Note, NoteStoreError> {
        let stored = self
            .notes
            .iter_mut()
            .find(|note| &note.id == id)
            .ok_or_else(|| NoteStoreError::NoteNotExist(id.clone()))?;
        *stored = Note::from_draft(id.clone(), draft);
        Ok(stored.clone())
    }

    fn delete_note(&mut self, id: &NoteID) -> Result<(), NoteStoreError> {
        // An id that is not stored matches nothing, which is fine
        self.notes.retain(|note| &note.id != id);
        Ok(())
    }
}

pub struct InMemoryStore {
    ims: RwLock<InMemoryStoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore {
            ims: RwLock::new(InMemoryStoreInner::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore for InMemoryStore {
    fn load_notes(&self) -> BoxFuture<Result<Vec<Note>, NoteStoreError>> {
        Box::pin(async move {
            let ims = self.ims.read().await;
            ims.load_notes()
        })
    }

    fn new_note(&self, draft: NoteDraft) -> BoxFuture<Result<Note, NoteStoreError>> {
        Box::pin(async move {
            let mut ims = self.ims.write().await;
            ims.new_note(draft)
        })
    }

    fn update_note<'a>(
        &'a self,
        id: &'a NoteID,
        draft: NoteDraft,
    ) -> BoxFuture<'a, Result<Note, NoteStoreError>> {
        Box::pin(async move {
            let mut ims = self.ims.write().await;
            ims.update_note(id, draft)
        })
    }

    fn delete_note<'a>(&'a self, id: &'a NoteID) -> BoxFuture<'a, Result<(), NoteStoreError>> {
        Box::pin(async move {
            let mut ims = self.ims.write().await;
            ims.delete_note(id)
        })
    }
}
