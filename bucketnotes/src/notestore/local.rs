//! Single-slot file storage of notes.
use crate::errors::NoteStoreError;
use crate::note::{Note, NoteDraft, NoteID};
use crate::notestore::NoteStore;
use chrono::Utc;
use futures::future::BoxFuture;
use std::fs;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// File-backed storage, mirroring a device key-value store.
///
/// The entire note sequence is serialized under a single slot. There is no
/// per-note addressing in the file: every mutation reads the slot, rewrites
/// the sequence in memory and writes the slot back.
///
/// Unlike the document-backed stores, ids are minted here on the client,
/// from the creation time in milliseconds.
struct LocalStoreInner {
    path: PathBuf,
    /// Largest id issued by this instance, for bumping same-millisecond
    /// creations.
    last_id: i64,
}

impl LocalStoreInner {
    fn new(path: PathBuf) -> Self {
        LocalStoreInner { path, last_id: 0 }
    }

    /// Read the whole slot.
    ///
    /// A slot file that doesn't exist yet is the empty sequence, because
    /// nothing has ever been saved. Any other read failure is an error.
    fn read_slot(&self) -> Result<Vec<Note>, NoteStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(NoteStoreError::IOError(e)),
        };
        serde_json::from_str(&contents).map_err(NoteStoreError::SerdeError)
    }

    /// Serialize the whole sequence back into the slot.
    fn write_slot(&self, notes: &[Note]) -> Result<(), NoteStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(NoteStoreError::IOError)?;
        }
        let mut f = File::create(&self.path).map_err(NoteStoreError::IOError)?;
        f.write_all(&serde_json::to_vec(notes).map_err(NoteStoreError::SerdeError)?)
            .map_err(NoteStoreError::IOError)?;
        Ok(())
    }

    /// Generate a new [`NoteID`].
    ///
    /// The starting point is the current time in milliseconds. The raw
    /// clock value alone is not unique: two creations within the same
    /// millisecond, or a clock that stepped backwards, would repeat it. The
    /// candidate is bumped past every id this instance has issued and past
    /// every id already in the slot, so the ids actually stored are unique
    /// and strictly increasing.
    fn get_new_noteid(&mut self, notes: &[Note]) -> NoteID {
        let mut candidate = Utc::now().timestamp_millis();
        if candidate <= self.last_id {
            candidate = self.last_id + 1;
        }
        loop {
            let id = candidate.to_string();
            if !notes.iter().any(|note| note.id.as_ref() == id) {
                self.last_id = candidate;
                return NoteID::new(id);
            }
            candidate += 1;
        }
    }

    fn load_notes(&self) -> Result<Vec<Note>, NoteStoreError> {
        self.read_slot()
    }

    fn new_note(&mut self, draft: NoteDraft) -> Result<Note, NoteStoreError> {
        let mut notes = self.read_slot()?;
        let id = self.get_new_noteid(&notes);
        let note = Note::from_draft(id, draft);
        notes.push(note.clone());
        self.write_slot(&notes)?;
        Ok(note)
    }

    fn update_note(&mut self, id: &NoteID, draft: NoteDraft) -> Result<Note, NoteStoreError> {
        let mut notes = self.read_slot()?;
        let stored = notes
            .iter_mut()
            .find(|note| &note.id == id)
            .ok_or_else(|| NoteStoreError::NoteNotExist(id.clone()))?;
        *stored = Note::from_draft(id.clone(), draft);
        let updated = stored.clone();
        self.write_slot(&notes)?;
        Ok(updated)
    }

    fn delete_note(&mut self, id: &NoteID) -> Result<(), NoteStoreError> {
        let mut notes = self.read_slot()?;
        let stored_count = notes.len();
        notes.retain(|note| &note.id != id);
        if notes.len() == stored_count {
            // Nothing matched, so there is nothing to rewrite
            return Ok(());
        }
        self.write_slot(&notes)
    }
}

pub struct LocalStore {
    inner: RwLock<LocalStoreInner>,
}

impl LocalStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        LocalStore {
            inner: RwLock::new(LocalStoreInner::new(path.as_ref().to_path_buf())),
        }
    }
}

impl NoteStore for LocalStore {
    fn load_notes(&self) -> BoxFuture<Result<Vec<Note>, NoteStoreError>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            inner.load_notes()
        })
    }

    fn new_note(&self, draft: NoteDraft) -> BoxFuture<Result<Note, NoteStoreError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            inner.new_note(draft)
        })
    }

    fn update_note<'a>(
        &'a self,
        id: &'a NoteID,
        draft: NoteDraft,
    ) -> BoxFuture<'a, Result<Note, NoteStoreError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            inner.update_note(id, draft)
        })
    }

    fn delete_note<'a>(&'a self, id: &'a NoteID) -> BoxFuture<'a, Result<(), NoteStoreError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            inner.delete_note(id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notestore::tests as common_tests;
    use tempfile::TempDir;

    fn slot_store(dir: &TempDir) -> LocalStore {
        LocalStore::new(dir.path().join("notes.json"))
    }

    #[tokio::test]
    async fn unique_id() {
        let dir = TempDir::new().unwrap();
        common_tests::unique_id(slot_store(&dir)).await;
    }

    #[tokio::test]
    async fn load_empty() {
        let dir = TempDir::new().unwrap();
        common_tests::load_empty(slot_store(&dir)).await;
    }

    #[tokio::test]
    async fn new_note_retrieve() {
        let dir = TempDir::new().unwrap();
        common_tests::new_note_retrieve(slot_store(&dir)).await;
    }

    #[tokio::test]
    async fn notes_in_creation_order() {
        let dir = TempDir::new().unwrap();
        common_tests::notes_in_creation_order(slot_store(&dir)).await;
    }

    #[tokio::test]
    async fn update_note() {
        let dir = TempDir::new().unwrap();
        common_tests::update_note(slot_store(&dir)).await;
    }

    #[tokio::test]
    async fn update_nonexistent_note() {
        let dir = TempDir::new().unwrap();
        common_tests::update_nonexistent_note(slot_store(&dir)).await;
    }

    #[tokio::test]
    async fn delete_note() {
        let dir = TempDir::new().unwrap();
        common_tests::delete_note(slot_store(&dir)).await;
    }

    #[tokio::test]
    async fn delete_nonexistent_note() {
        let dir = TempDir::new().unwrap();
        common_tests::delete_nonexistent_note(slot_store(&dir)).await;
    }

    #[tokio::test]
    async fn image_url_retained() {
        let dir = TempDir::new().unwrap();
        common_tests::image_url_retained(slot_store(&dir)).await;
    }

    #[tokio::test]
    async fn ids_strictly_increase() {
        let dir = TempDir::new().unwrap();
        let store = slot_store(&dir);
        let mut previous = 0i64;
        // Rapid creations land within the same millisecond; the bump must
        // keep them apart anyway
        for i in 0..5 {
            let note = store
                .new_note(NoteDraft::new(format!("Note {}", i), "".into()))
                .await
                .unwrap();
            let numeric: i64 = note.id.as_ref().parse().unwrap();
            assert!(numeric > previous);
            previous = numeric;
        }
    }

    #[tokio::test]
    async fn ids_unique_across_instances() {
        let dir = TempDir::new().unwrap();
        let note1 = slot_store(&dir)
            .new_note(NoteDraft::new("First".into(), "".into()))
            .await
            .unwrap();
        // A fresh instance has no issued-id memory; only the slot scan
        // keeps it from reusing a same-millisecond id
        let note2 = slot_store(&dir)
            .new_note(NoteDraft::new("Second".into(), "".into()))
            .await
            .unwrap();
        assert_ne!(note1.id, note2.id);
        let first: i64 = note1.id.as_ref().parse().unwrap();
        let second: i64 = note2.id.as_ref().parse().unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let store = slot_store(&dir);
        store
            .new_note(NoteDraft::new("Ride a hot air balloon".into(), "".into()))
            .await
            .unwrap();
        store
            .new_note(NoteDraft::new("Learn glassblowing".into(), "".into()))
            .await
            .unwrap();

        let reopened = slot_store(&dir);
        let notes = reopened.load_notes().await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].title, "Ride a hot air balloon");
        assert_eq!(notes[1].title, "Learn glassblowing");
    }

    #[tokio::test]
    async fn corrupt_slot_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, "not json at all").unwrap();
        let store = LocalStore::new(&path);
        assert!(matches!(
            store.load_notes().await,
            Err(NoteStoreError::SerdeError(_))
        ));
    }

    #[tokio::test]
    async fn slot_predating_image_urls_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        // Slots written before attachments existed carry no image_url key
        fs::write(
            &path,
            r#"[{"id":"1690000000000","title":"Old","content":"From before"}]"#,
        )
        .unwrap();
        let store = LocalStore::new(&path);
        let notes = store.load_notes().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, NoteID::from("1690000000000"));
        assert_eq!(notes[0].image_url, None);
    }

    #[tokio::test]
    async fn unreadable_slot_errors() {
        let store = LocalStore::new("/dev/null/notes.json");
        assert!(matches!(
            store.load_notes().await,
            Err(NoteStoreError::IOError(_))
        ));
    }
}
