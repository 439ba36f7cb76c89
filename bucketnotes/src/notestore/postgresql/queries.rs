use crate::errors::NoteStoreError;
use crate::note::{Note, NoteDraft, NoteID};
use sqlx::{query, query_as, PgPool};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(super) struct PostgreSQLNoteRow {
    pub(super) id: Uuid,
    pub(super) title: String,
    pub(super) content: String,
    pub(super) image_url: Option<String>,
}

impl PostgreSQLNoteRow {
    pub(super) fn into_note(self) -> Note {
        Note {
            id: NoteID::new(self.id.to_string()),
            title: self.title,
            content: self.content,
            image_url: self.image_url,
        }
    }
}

pub(super) async fn select_notes(pool: &PgPool) -> Result<Vec<PostgreSQLNoteRow>, NoteStoreError> {
    let rows = query_as::<_, PostgreSQLNoteRow>(
        r#"
        SELECT id, title, content, image_url
        FROM note
        ORDER BY seq
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(NoteStoreError::PostgreSQLError)?;
    Ok(rows)
}

pub(super) async fn insert_note(
    pool: &PgPool,
    draft: &NoteDraft,
) -> Result<PostgreSQLNoteRow, NoteStoreError> {
    let row = query_as::<_, PostgreSQLNoteRow>(
        r#"
        INSERT INTO note(title, content, image_url)
        VALUES ($1, $2, $3)
        RETURNING id, title, content, image_url
        "#,
    )
    .bind(&draft.title)
    .bind(&draft.content)
    .bind(&draft.image_url)
    .fetch_one(pool)
    .await
    .map_err(NoteStoreError::PostgreSQLError)?;
    Ok(row)
}

/// Replace the row in place.
///
/// Returns `None` when no row carries the id. `seq` is untouched, so the
/// note keeps its place in the enumeration order.
pub(super) async fn update_note_row(
    pool: &PgPool,
    id: Uuid,
    draft: &NoteDraft,
) -> Result<Option<PostgreSQLNoteRow>, NoteStoreError> {
    let row = query_as::<_, PostgreSQLNoteRow>(
        r#"
        UPDATE note
        SET title = $2, content = $3, image_url = $4
        WHERE id = $1
        RETURNING id, title, content, image_url
        "#,
    )
    .bind(id)
    .bind(&draft.title)
    .bind(&draft.content)
    .bind(&draft.image_url)
    .fetch_optional(pool)
    .await
    .map_err(NoteStoreError::PostgreSQLError)?;
    Ok(row)
}

pub(super) async fn delete_note_row(pool: &PgPool, id: Uuid) -> Result<u64, NoteStoreError> {
    let res = query(
        r#"
        DELETE FROM note
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(NoteStoreError::PostgreSQLError)?;
    Ok(res.rows_affected())
}
