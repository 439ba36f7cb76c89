use crate::attachment::{BoxedAttachmentStore, DirAttachmentStore};
use crate::notestore::{BoxedNoteStore, InMemoryStore, LocalStore, PostgreSQLStoreBuilder};
use sqlx::postgres::PgConnectOptions;
use std::path::PathBuf;

#[derive(serde::Deserialize, Debug)]
pub enum NoteStoreType {
    InMemory,
    Local,
    PostgreSQL,
}

#[derive(serde::Deserialize, Debug)]
pub struct Settings {
    database: Option<DatabaseSettings>,
    slotpath: Option<PathBuf>,
    attachmentpath: Option<PathBuf>,
    pub debug: bool,
    notestoretype: NoteStoreType,
    populateinmemorystore: bool,
    populatepostgresqlstore: bool,
}

impl Settings {
    pub async fn get_note_store(&self) -> BoxedNoteStore {
        match self.notestoretype {
            NoteStoreType::InMemory => {
                let store: BoxedNoteStore = Box::new(InMemoryStore::new());
                if self.populateinmemorystore {
                    crate::notestore::util::populate_test_data(&store).await;
                }
                store
            }
            NoteStoreType::Local => {
                let slotpath = self.slotpath.as_ref().expect(
                    "When notestoretype is set to Local, you must configure slotpath",
                );
                Box::new(LocalStore::new(slotpath))
            }
            NoteStoreType::PostgreSQL => {
                let db_options = self
                    .database
                    .as_ref()
                    .expect("When notestoretype is set to PostgreSQL, you must configure the keys under database")
                    .options();
                let store: BoxedNoteStore =
                    Box::new(PostgreSQLStoreBuilder::new(db_options).build().await);
                if self.populatepostgresqlstore {
                    crate::notestore::util::populate_test_data(&store).await;
                }
                store
            }
        }
    }

    pub fn get_attachment_store(&self) -> BoxedAttachmentStore {
        let attachmentpath = self
            .attachmentpath
            .as_ref()
            .expect("When using image attachments, you must configure attachmentpath");
        Box::new(DirAttachmentStore::new(attachmentpath))
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub port: String,
    pub host: String,
    pub name: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl DatabaseSettings {
    pub fn options(&self) -> PgConnectOptions {
        self.options_without_db().database(&self.name)
    }

    pub fn options_without_db(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port.parse().expect("Failed to parse port number"));
        if let Some(ref username) = self.username {
            let password = self
                .password
                .as_ref()
                .expect("Password expected when a username is set");
            options.username(username).password(password)
        } else {
            options
        }
    }
}

lazy_static! {
    pub static ref CONFIGURATION: Settings =
        get_configuration().expect("Failed to read configuration.yml.");
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let config = config::Config::builder()
        .set_default("debug", false)?
        .set_default("notestoretype", "InMemory")?
        .set_default("populateinmemorystore", false)?
        .set_default("populatepostgresqlstore", false)?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::default()
                .prefix("bucketnotes")
                .separator("_"),
        )
        .build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_no_configuration_file() {
        let settings = get_configuration().unwrap();
        assert!(matches!(settings.notestoretype, NoteStoreType::InMemory));
        assert!(!settings.debug);
        assert!(!settings.populateinmemorystore);
    }

    #[tokio::test]
    async fn default_store_starts_empty() {
        let settings = get_configuration().unwrap();
        let store = settings.get_note_store().await;
        assert!(store.load_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn populate_fills_the_store() {
        let mut settings = get_configuration().unwrap();
        settings.populateinmemorystore = true;
        let store = settings.get_note_store().await;
        assert!(!store.load_notes().await.unwrap().is_empty());
    }
}
