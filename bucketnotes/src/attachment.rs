//! Image attachments for notes.
//!
//! Picking an image is someone else's job; what arrives here is a path to
//! a local file. Uploading exchanges that short-lived reference for a
//! durable download URL, which is what gets stored in a note's
//! `image_url`. Blobs are write-once: nothing in the crate deletes them,
//! so removing a note leaves its image behind in the blob store.
use crate::errors::AttachmentError;
use chrono::Utc;
use futures::future::BoxFuture;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use url::Url;

/// An abstraction for blob stores holding uploaded images.
pub trait AttachmentStore {
    /// Upload the file at `source` and return its durable download URL.
    ///
    /// The store picks the blob key; the source file name plays no part
    /// in it.
    fn upload<'a>(&'a self, source: &'a Path) -> BoxFuture<'a, Result<String, AttachmentError>>;
}

pub type BoxedAttachmentStore = Box<dyn AttachmentStore + Sync + Send>;

/// Blob store rooted at a local directory.
///
/// Blobs land under `images/` inside the root, keyed by the upload time
/// in milliseconds. A key that is already taken is bumped, the same way
/// [`crate::notestore::LocalStore`] keeps its timestamp ids apart.
struct DirAttachmentStoreInner {
    root: PathBuf,
    /// Largest key millis issued by this instance, for bumping
    /// same-millisecond uploads.
    last_key_millis: i64,
}

impl DirAttachmentStoreInner {
    fn new(root: PathBuf) -> Self {
        DirAttachmentStoreInner {
            root,
            last_key_millis: 0,
        }
    }

    fn get_new_key(&mut self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        if millis <= self.last_key_millis {
            millis = self.last_key_millis + 1;
        }
        loop {
            let key = format!("images/{}.jpg", millis);
            if !self.root.join(&key).exists() {
                self.last_key_millis = millis;
                return key;
            }
            millis += 1;
        }
    }

    fn upload(&mut self, source: &Path) -> Result<String, AttachmentError> {
        let bytes = fs::read(source).map_err(AttachmentError::IOError)?;
        let key = self.get_new_key();
        let target = self.root.join(&key);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(AttachmentError::IOError)?;
        }
        let mut f = File::create(&target).map_err(AttachmentError::IOError)?;
        f.write_all(&bytes).map_err(AttachmentError::IOError)?;
        // Resolve to an absolute path, since file URLs cannot carry a
        // relative one
        let target = fs::canonicalize(&target).map_err(AttachmentError::IOError)?;
        let url = Url::from_file_path(&target)
            .map_err(|_| AttachmentError::RootNotUrl(self.root.clone()))?;
        debug!("Uploaded attachment {}", key);
        Ok(url.to_string())
    }
}

pub struct DirAttachmentStore {
    inner: RwLock<DirAttachmentStoreInner>,
}

impl DirAttachmentStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        DirAttachmentStore {
            inner: RwLock::new(DirAttachmentStoreInner::new(root.as_ref().to_path_buf())),
        }
    }
}

impl AttachmentStore for DirAttachmentStore {
    fn upload<'a>(&'a self, source: &'a Path) -> BoxFuture<'a, Result<String, AttachmentError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            inner.upload(source)
        })
    }
}
