use std::time::Duration;

use mongodb::{bson::doc, options::ClientOptions, Client, Collection};

use crate::{config::Config, errors::AppResult};

/// Collection names, one per repository.
pub mod collections {
    pub const USERS: &str = "users";
    pub const REFRESH_TOKENS: &str = "refresh_tokens";
    pub const SUBJECTS: &str = "subjects";
    pub const UNITS: &str = "units";
    pub const COURSES: &str = "courses";
    pub const EXERCISES: &str = "exercises";
    pub const ANSWER_RECORDS: &str = "answer_records";
    pub const UNIT_PROGRESS: &str = "unit_progress";
    pub const ERROR_BOOK: &str = "error_book";
    pub const STUDY_TASKS: &str = "study_tasks";
}

/// Handle to the platform database. Cheap to clone; the driver pools connections.
#[derive(Clone)]
pub struct Database {
    client: Client,
    inner: mongodb::Database,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.mongo_conn_string).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(Duration::from_secs(5));
        options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(options)?;
        let database = Self {
            inner: client.database(&config.mongo_db_name),
            client,
        };
        database.ping().await?;

        log::info!(
            "Connected to MongoDB database '{}'",
            database.inner.name()
        );
        Ok(database)
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.inner.collection(name)
    }

    /// Round-trip to the server; backs the readiness probe.
    pub async fn ping(&self) -> AppResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
