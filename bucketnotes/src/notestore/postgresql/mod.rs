//! PostgreSQL-backed storage of notes.
//!
//! This is the self-hosted stand-in for a hosted document store: one row
//! per note, ids generated by the database, never by the client. The
//! `seq` column keeps enumeration in insertion order, which is the order
//! the collection renders in.
use crate::errors::NoteStoreError;
use crate::note::{Note, NoteDraft, NoteID};
use crate::notestore::NoteStore;
use futures::future::BoxFuture;
use sqlx::postgres::PgConnectOptions;
use sqlx::PgPool;

mod queries;
use queries::*;


pub struct PostgreSQLStoreBuilder {
    db_options: PgConnectOptions,
}

impl PostgreSQLStoreBuilder {
    pub fn new(db_options: PgConnectOptions) -> Self {
        Self { db_options }
    }

    pub async fn build(self) -> PostgreSQLStore {
        let connection_pool = PgPool::connect_with(self.db_options)
            .await
            .expect("Failed to connect to Postgres.");
        sqlx::migrate!("./migrations")
            .run(&connection_pool)
            .await
            .expect("Failed to migrate the database");
        PostgreSQLStore {
            db_pool: connection_pool,
        }
    }
}

pub struct PostgreSQLStore {
    db_pool: PgPool,
}

impl NoteStore for PostgreSQLStore {
    fn load_notes(&self) -> BoxFuture<Result<Vec<Note>, NoteStoreError>> {
        Box::pin(async move {
            let rows = select_notes(&self.db_pool).await?;
            Ok(rows.into_iter().map(|row| row.into_note()).collect())
        })
    }

    fn new_note(&self, draft: NoteDraft) -> BoxFuture<Result<Note, NoteStoreError>> {
        Box::pin(async move {
            let row = insert_note(&self.db_pool, &draft).await?;
            Ok(row.into_note())
        })
    }

    fn update_note<'a>(
        &'a self,
        id: &'a NoteID,
        draft: NoteDraft,
    ) -> BoxFuture<'a, Result<Note, NoteStoreError>> {
        Box::pin(async move {
            let uuid = id.try_to_uuid()?;
            let row = update_note_row(&self.db_pool, uuid, &draft)
                .await?
                .ok_or_else(|| NoteStoreError::NoteNotExist(id.clone()))?;
            Ok(row.into_note())
        })
    }

    fn delete_note<'a>(&'a self, id: &'a NoteID) -> BoxFuture<'a, Result<(), NoteStoreError>> {
        Box::pin(async move {
            let uuid = id.try_to_uuid()?;
            // Zero affected rows means the note was already gone, which is
            // an acceptable outcome of a delete
            delete_note_row(&self.db_pool, uuid).await?;
            Ok(())
        })
    }
}
