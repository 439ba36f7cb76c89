//! The in-memory note collection and its synchronization with a backend.
use crate::errors::NoteStoreError;
use crate::note::{Note, NoteDraft, NoteID};
use crate::notestore::BoxedNoteStore;

/// Owns the rendered note collection and the storage backend it mirrors.
///
/// The collection is what a UI lists. After every completed operation it
/// equals the last known backend state: mutations are confirmed by the
/// backend first and applied to the collection second, so a failed call
/// changes nothing in memory and there is no optimistic state to roll
/// back. The backend is the durable side; the collection is a faithful
/// cache of it.
///
/// Operations take `&mut self` because one editing surface drives them,
/// awaiting each to completion before issuing the next.
pub struct NoteRepository {
    store: BoxedNoteStore,
    notes: Vec<Note>,
}

impl NoteRepository {
    /// An empty collection over the given backend. Call
    /// [`NoteRepository::load_all`] to fill it.
    pub fn new(store: BoxedNoteStore) -> Self {
        NoteRepository {
            store,
            notes: vec![],
        }
    }

    /// The collection, in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &NoteID) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    /// Fetch the full backend state and replace the collection with it.
    ///
    /// The fetched sequence is never merged with what is in memory: it
    /// wins wholesale, and enumeration order is the backend's insertion
    /// order. On failure the collection keeps its previous contents,
    /// which on a first load means it stays empty.
    pub async fn load_all(&mut self) -> Result<&[Note], NoteStoreError> {
        match self.store.load_notes().await {
            Ok(notes) => {
                debug!("Loaded {} notes from the store", notes.len());
                self.notes = notes;
                Ok(&self.notes)
            }
            Err(e) => {
                error!("Failed to load notes from the store: {}", e);
                Err(e)
            }
        }
    }

    /// Save a draft: create when `selected` is `None`, otherwise replace
    /// the selected note.
    ///
    /// A creation appends the note the backend hands back, so the final
    /// id exists before the collection ever sees the note. An update
    /// keeps the note's id and position and leaves every other note
    /// untouched. Either way the collection only changes after the
    /// backend confirms.
    #[instrument(skip(self, draft))]
    pub async fn save(
        &mut self,
        selected: Option<&NoteID>,
        draft: NoteDraft,
    ) -> Result<Note, NoteStoreError> {
        match selected {
            None => {
                let note = self.store.new_note(draft).await?;
                self.notes.push(note.clone());
                debug!("Created note {}", note.id);
                Ok(note)
            }
            Some(id) => {
                // Updating requires membership. Reject before consulting
                // the backend, so a stale selection cannot touch it.
                let position = self
                    .notes
                    .iter()
                    .position(|note| &note.id == id)
                    .ok_or_else(|| NoteStoreError::NoteNotExist(id.clone()))?;
                let note = self.store.update_note(id, draft).await?;
                self.notes[position] = note.clone();
                debug!("Updated note {}", note.id);
                Ok(note)
            }
        }
    }

    /// Delete by id.
    ///
    /// The backend call is issued whether or not the id is in the
    /// collection. Backends treat an unknown id as a successful no-op,
    /// and the removal below then matches nothing, so deleting twice is
    /// as good as deleting once. Attachments referenced by the note are
    /// not cleaned up.
    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: &NoteID) -> Result<(), NoteStoreError> {
        self.store.delete_note(id).await?;
        self.notes.retain(|note| &note.id != id);
        debug!("Deleted note {}", id);
        Ok(())
    }
}
