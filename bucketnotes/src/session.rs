//! Selection state and the editing loop over a repository.
use crate::errors::{NoteStoreError, SessionError};
use crate::note::{Note, NoteDraft, NoteID};
use crate::notestore::BoxedNoteStore;
use crate::repository::NoteRepository;

/// Which note, if any, the next save targets.
///
/// Everything branches on this single value: saving from `Idle` creates,
/// saving from `Editing` replaces the held note. Form-driven UIs that
/// track "editing" with a leftover id instead are prone to a cancelled
/// edit bleeding into the next create; an explicit state makes that
/// unrepresentable as long as transitions go through [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Idle,
    Editing(Note),
}

/// One user's editing loop: open a form, save or cancel, delete.
///
/// Wraps a [`NoteRepository`] and layers the selection lifecycle on top.
/// Persistence outcomes are the repository's; the session only decides
/// what the save targets and where the selection goes afterwards.
pub struct Session {
    repository: NoteRepository,
    selection: Selection,
}

impl Session {
    pub fn new(store: BoxedNoteStore) -> Self {
        Session {
            repository: NoteRepository::new(store),
            selection: Selection::Idle,
        }
    }

    /// The rendered collection, in insertion order.
    pub fn notes(&self) -> &[Note] {
        self.repository.notes()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The note an `Editing` selection holds.
    pub fn selected(&self) -> Option<&Note> {
        match &self.selection {
            Selection::Editing(note) => Some(note),
            Selection::Idle => None,
        }
    }

    /// Fetch everything from the backend, typically once at startup.
    pub async fn load_all(&mut self) -> Result<&[Note], SessionError> {
        Ok(self.repository.load_all().await?)
    }

    /// Open the form for a brand-new note.
    ///
    /// Drops any previous selection, so a save can only create.
    pub fn open_create(&mut self) {
        self.selection = Selection::Idle;
    }

    /// Open the form prefilled with an existing note.
    ///
    /// The note must currently be in the collection.
    pub fn open_edit(&mut self, id: &NoteID) -> Result<(), SessionError> {
        let note = self
            .repository
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::Store(NoteStoreError::NoteNotExist(id.clone())))?;
        self.selection = Selection::Editing(note);
        Ok(())
    }

    /// Close the form without saving. The draft is discarded and the next
    /// save starts from a clean `Idle`.
    pub fn cancel(&mut self) {
        self.selection = Selection::Idle;
    }

    /// Save the draft against the current selection.
    ///
    /// On success the selection returns to `Idle`. On failure it stays
    /// where it was, so the user can retry the same form contents.
    pub async fn save(&mut self, draft: NoteDraft) -> Result<Note, SessionError> {
        let selected_id = match &self.selection {
            Selection::Idle => None,
            Selection::Editing(note) => Some(note.id.clone()),
        };
        let note = self.repository.save(selected_id.as_ref(), draft).await?;
        self.selection = Selection::Idle;
        Ok(note)
    }

    /// Delete the note currently being edited.
    ///
    /// Only valid in `Editing`. On success the selection returns to
    /// `Idle`; on failure the note is still stored, so the selection is
    /// kept for a retry.
    pub async fn delete_selected(&mut self) -> Result<(), SessionError> {
        let id = match &self.selection {
            Selection::Editing(note) => note.id.clone(),
            Selection::Idle => return Err(SessionError::NoSelection),
        };
        self.repository.delete(&id).await?;
        self.selection = Selection::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notestore::tests::FlakyStore;
    use crate::notestore::InMemoryStore;
    use std::sync::atomic::Ordering;

    fn session() -> Session {
        Session::new(Box::new(InMemoryStore::new()))
    }

    fn draft(title: &str) -> NoteDraft {
        NoteDraft::new(title.to_owned(), format!("{} content", title))
    }

    #[tokio::test]
    async fn save_from_idle_creates() {
        let mut session = session();
        assert_eq!(session.selection(), &Selection::Idle);
        let note = session.save(draft("Visit the Uyuni salt flats")).await.unwrap();
        assert_eq!(session.notes(), vec![note]);
        assert_eq!(session.selection(), &Selection::Idle);
    }

    #[tokio::test]
    async fn edit_then_save_updates_in_place() {
        let mut session = session();
        let first = session.save(draft("First")).await.unwrap();
        let second = session.save(draft("Second")).await.unwrap();

        session.open_edit(&first.id).unwrap();
        assert_eq!(session.selected(), Some(&first));
        let updated = session.save(draft("First, revised")).await.unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(session.notes(), vec![updated, second]);
        assert_eq!(session.selection(), &Selection::Idle);
    }

    #[tokio::test]
    async fn cancelled_edit_does_not_leak_into_create() {
        let mut session = session();
        let existing = session.save(draft("Existing")).await.unwrap();

        // Open the existing note, think better of it, then write a new one
        session.open_edit(&existing.id).unwrap();
        session.cancel();
        session.open_create();
        let fresh = session.save(draft("Fresh")).await.unwrap();

        assert_ne!(fresh.id, existing.id);
        assert_eq!(session.notes()[0], existing);
        assert_eq!(session.notes()[1], fresh);
    }

    #[tokio::test]
    async fn open_edit_requires_membership() {
        let mut session = session();
        let result = session.open_edit(&NoteID::from("nope"));
        assert!(matches!(
            result,
            Err(SessionError::Store(NoteStoreError::NoteNotExist(_)))
        ));
        assert_eq!(session.selection(), &Selection::Idle);
    }

    #[tokio::test]
    async fn delete_selected_requires_a_selection() {
        let mut session = session();
        session.save(draft("Some note")).await.unwrap();
        let result = session.delete_selected().await;
        assert!(matches!(result, Err(SessionError::NoSelection)));
        assert_eq!(session.notes().len(), 1);
    }

    #[tokio::test]
    async fn delete_selected_removes_and_idles() {
        let mut session = session();
        let keep = session.save(draft("Keep")).await.unwrap();
        let doomed = session.save(draft("Doomed")).await.unwrap();

        session.open_edit(&doomed.id).unwrap();
        session.delete_selected().await.unwrap();
        assert_eq!(session.notes(), vec![keep]);
        assert_eq!(session.selection(), &Selection::Idle);
    }

    #[tokio::test]
    async fn failed_save_keeps_the_selection() {
        let (store, fail) = FlakyStore::new();
        let mut session = Session::new(Box::new(store));
        let note = session.save(draft("Original")).await.unwrap();
        session.open_edit(&note.id).unwrap();

        fail.store(true, Ordering::SeqCst);
        assert!(session.save(draft("Retry me")).await.is_err());
        // Still editing the same note, ready for a retry
        assert_eq!(session.selected().map(|n| &n.id), Some(&note.id));

        fail.store(false, Ordering::SeqCst);
        let updated = session.save(draft("Retry me")).await.unwrap();
        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, "Retry me");
        assert_eq!(session.selection(), &Selection::Idle);
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_selection() {
        let (store, fail) = FlakyStore::new();
        let mut session = Session::new(Box::new(store));
        let note = session.save(draft("Sticky")).await.unwrap();
        session.open_edit(&note.id).unwrap();

        fail.store(true, Ordering::SeqCst);
        assert!(session.delete_selected().await.is_err());
        assert_eq!(session.selected().map(|n| &n.id), Some(&note.id));
        assert_eq!(session.notes().len(), 1);

        fail.store(false, Ordering::SeqCst);
        session.delete_selected().await.unwrap();
        assert!(session.notes().is_empty());
        assert_eq!(session.selection(), &Selection::Idle);
    }
}
