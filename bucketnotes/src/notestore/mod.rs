//! Storage backends of notes.
use crate::errors::NoteStoreError;
use crate::note::{Note, NoteDraft, NoteID};
use futures::future::BoxFuture;

mod in_memory;
mod local;
mod postgresql;
pub mod util;


pub use in_memory::InMemoryStore;
pub use local::LocalStore;
pub use postgresql::{PostgreSQLStore, PostgreSQLStoreBuilder};

/// An abstraction for storage backends.
///
/// A backend exposes exactly the operations the
/// [`crate::repository::NoteRepository`] synchronizes against: fetch
/// everything, create, replace by id, delete by id. There is no point read,
/// because lookups are served from the repository's in-memory collection.
pub trait NoteStore {
    /// Fetch every stored note, in insertion order.
    ///
    /// A backend that holds nothing yields an empty `Vec`. "No notes yet"
    /// is a valid initial state, not an error.
    fn load_notes(&self) -> BoxFuture<Result<Vec<Note>, NoteStoreError>>;
    /// Create a new note from a draft.
    ///
    /// The storage backend assigns the [`NoteID`]. The returned [`Note`] is
    /// the stored entity, carrying the final id.
    fn new_note(&self, draft: NoteDraft) -> BoxFuture<Result<Note, NoteStoreError>>;
    /// Replace the title, content and image URL of the note with this id.
    ///
    /// The id and the note's position in the stored sequence are preserved.
    /// Updating an id that is not stored fails with
    /// [`NoteStoreError::NoteNotExist`].
    fn update_note<'a>(
        &'a self,
        id: &'a NoteID,
        draft: NoteDraft,
    ) -> BoxFuture<'a, Result<Note, NoteStoreError>>;
    /// Delete the note with this id.
    ///
    /// Deleting an id that is not stored succeeds without touching
    /// anything, so repeating a delete stays harmless.
    fn delete_note<'a>(&'a self, id: &'a NoteID) -> BoxFuture<'a, Result<(), NoteStoreError>>;
}

pub type BoxedNoteStore = Box<dyn NoteStore + Sync + Send>;
