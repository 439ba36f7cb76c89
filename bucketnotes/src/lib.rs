//! Bucketnotes: a bucket-list notebook over interchangeable storage backends.
#[macro_use]
extern crate tracing;
#[macro_use]
extern crate lazy_static;

pub mod attachment;
pub mod configuration;
pub mod errors;
pub mod note;
pub mod notestore;
pub mod repository;
pub mod session;
pub mod telemetry;

pub use note::{Note, NoteDraft, NoteID};
pub use notestore::{BoxedNoteStore, InMemoryStore, LocalStore, NoteStore, PostgreSQLStoreBuilder};
pub use repository::NoteRepository;
pub use session::{Selection, Session};
