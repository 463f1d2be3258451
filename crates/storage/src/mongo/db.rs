//! Database façade binding one wrapped collection per known name

use crate::config::DatabaseConfig;
use crate::error::{Result, StorageError};
use crate::mongo::collection::Collection;
use crate::mongo::dispatch::ChangeDispatcher;
use crate::mongo::processor::Processor;
use crate::mongo::projection::Projection;
use crate::samples;
use mongodb::bson::doc;
use mongodb::{Client, Database};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// The lowest server release the backend supports.
const MINIMUM_SERVER_VERSION: (u32, u32) = (3, 6);

/// Per-collection configuration consumed when the façade is built.
///
/// Silent bindings get no dispatch handle, so none of their operations emit
/// change events.
pub struct CollectionBinding {
    pub name: String,
    pub projection: Option<Projection>,
    pub processor: Option<Arc<dyn Processor>>,
    pub silent: bool,
}

impl CollectionBinding {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            projection: None,
            processor: None,
            silent: false,
        }
    }

    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn processor(mut self, processor: Arc<dyn Processor>) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }
}

/// The default binding registry.
pub fn default_bindings() -> Vec<CollectionBinding> {
    vec![
        CollectionBinding::new("analyses"),
        CollectionBinding::new("caches"),
        CollectionBinding::new("coverage"),
        CollectionBinding::new("files"),
        CollectionBinding::new("groups"),
        CollectionBinding::new("history"),
        CollectionBinding::new("hmm"),
        CollectionBinding::new("indexes"),
        CollectionBinding::new("jobs"),
        CollectionBinding::new("keys"),
        CollectionBinding::new("kinds"),
        CollectionBinding::new("labels"),
        CollectionBinding::new("otus"),
        CollectionBinding::new("processes"),
        CollectionBinding::new("references"),
        CollectionBinding::new("samples").projection(samples::list_projection()),
        CollectionBinding::new("sequences"),
        CollectionBinding::new("sessions"),
        CollectionBinding::new("settings"),
        CollectionBinding::new("status"),
        CollectionBinding::new("subtraction"),
        CollectionBinding::new("tasks"),
        CollectionBinding::new("users"),
    ]
}

/// Main interface to the backend database.
///
/// One wrapped [`Collection`] per registered name. Collections not covered
/// by the supplied registry are bound with defaults.
#[derive(Clone)]
pub struct Db {
    pub analyses: Collection,
    pub caches: Collection,
    pub coverage: Collection,
    pub files: Collection,
    pub groups: Collection,
    pub history: Collection,
    pub hmm: Collection,
    pub indexes: Collection,
    pub jobs: Collection,
    pub keys: Collection,
    pub kinds: Collection,
    pub labels: Collection,
    pub otus: Collection,
    pub processes: Collection,
    pub references: Collection,
    pub samples: Collection,
    pub sequences: Collection,
    pub sessions: Collection,
    pub settings: Collection,
    pub status: Collection,
    pub subtraction: Collection,
    pub tasks: Collection,
    pub users: Collection,
}

impl Db {
    /// Builds the façade from a connected database handle.
    pub fn new(
        database: Database,
        dispatcher: Option<Arc<ChangeDispatcher>>,
        bindings: Vec<CollectionBinding>,
    ) -> Self {
        let mut bindings: HashMap<String, CollectionBinding> = bindings
            .into_iter()
            .map(|binding| (binding.name.clone(), binding))
            .collect();

        let mut bind = |name: &str| {
            let binding = bindings
                .remove(name)
                .unwrap_or_else(|| CollectionBinding::new(name));

            let dispatcher = if binding.silent {
                None
            } else {
                dispatcher.clone()
            };

            Collection::new(
                name,
                database.collection(name),
                dispatcher,
                binding.processor,
                binding.projection,
            )
        };

        Self {
            analyses: bind("analyses"),
            caches: bind("caches"),
            coverage: bind("coverage"),
            files: bind("files"),
            groups: bind("groups"),
            history: bind("history"),
            hmm: bind("hmm"),
            indexes: bind("indexes"),
            jobs: bind("jobs"),
            keys: bind("keys"),
            kinds: bind("kinds"),
            labels: bind("labels"),
            otus: bind("otus"),
            processes: bind("processes"),
            references: bind("references"),
            samples: bind("samples"),
            sequences: bind("sequences"),
            sessions: bind("sessions"),
            settings: bind("settings"),
            status: bind("status"),
            subtraction: bind("subtraction"),
            tasks: bind("tasks"),
            users: bind("users"),
        }
    }

    /// Connects to the configured server and builds the façade with the
    /// default binding registry.
    #[instrument(skip_all)]
    pub async fn connect(
        config: &DatabaseConfig,
        dispatcher: Option<Arc<ChangeDispatcher>>,
    ) -> Result<Db> {
        info!("Connecting to MongoDB...");

        let client = Client::with_uri_str(&config.connection_string).await?;
        let database = client.database(&config.database_name);

        let version = check_server_version(&database).await?;

        info!(version = %version, "Connected to MongoDB");

        Ok(Db::new(database, dispatcher, default_bindings()))
    }
}

/// Queries the server build info and refuses versions below the floor.
///
/// Returns the reported version string.
pub async fn check_server_version(database: &Database) -> Result<String> {
    let info = database.run_command(doc! { "buildInfo": 1 }).await?;

    let version = info.get_str("version").unwrap_or("unknown").to_string();

    if parse_major_minor(&version) < MINIMUM_SERVER_VERSION {
        return Err(StorageError::UnsupportedServerVersion {
            found: version,
            floor: format!(
                "{}.{}",
                MINIMUM_SERVER_VERSION.0, MINIMUM_SERVER_VERSION.1
            ),
        });
    }

    Ok(version)
}

/// Parses the leading `major.minor` pair of a server version string.
///
/// Unparseable components count as zero, which fails the floor check.
fn parse_major_minor(version: &str) -> (u32, u32) {
    let mut parts = version.split('.');

    let major = parts.next().and_then(|part| part.parse().ok()).unwrap_or(0);
    let minor = parts.next().and_then(|part| part.parse().ok()).unwrap_or(0);

    (major, minor)
}
