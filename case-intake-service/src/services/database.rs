use async_trait::async_trait;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client as MongoClient, Collection,
};
use service_core::error::AppError;

/// Dials the backing store. One instance lives for the whole process; every
/// call to [`CaseStore::connect`] opens a fresh, independent session.
#[async_trait]
pub trait CaseStore: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn CaseSession>, AppError>;

    /// Opens and closes a session, for readiness probes.
    async fn ping(&self) -> Result<(), AppError> {
        let session = self.connect().await?;
        session.close().await
    }
}

/// A single request's connection to the store.
#[async_trait]
pub trait CaseSession: Send + Sync {
    /// Appends one document and returns the store-assigned id.
    async fn insert_case(&self, document: Document) -> Result<String, AppError>;

    async fn close(self: Box<Self>) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct MongoCaseStore {
    options: ClientOptions,
    database: String,
    collection: String,
}

impl MongoCaseStore {
    /// Parses the connection string once; no connection is made here.
    pub async fn new(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        tracing::info!(
            database = %database,
            collection = %collection,
            "MongoDB case store configured"
        );

        Ok(Self {
            options,
            database: database.to_string(),
            collection: collection.to_string(),
        })
    }
}

#[async_trait]
impl CaseStore for MongoCaseStore {
    async fn connect(&self) -> Result<Box<dyn CaseSession>, AppError> {
        let client = MongoClient::with_options(self.options.clone())?;

        // The driver dials lazily; ping forces the handshake so connect
        // failures surface here rather than at insert time.
        if let Err(e) = client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
        {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            client.shutdown().await;
            return Err(AppError::from(e));
        }

        let cases = client
            .database(&self.database)
            .collection::<Document>(&self.collection);

        Ok(Box::new(MongoCaseSession { client, cases }))
    }
}

struct MongoCaseSession {
    client: MongoClient,
    cases: Collection<Document>,
}

#[async_trait]
impl CaseSession for MongoCaseSession {
    async fn insert_case(&self, document: Document) -> Result<String, AppError> {
        let result = self.cases.insert_one(document, None).await.map_err(|e| {
            tracing::error!("Failed to insert case into {}: {}", self.cases.name(), e);
            AppError::from(e)
        })?;

        Ok(match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        })
    }

    async fn close(self: Box<Self>) -> Result<(), AppError> {
        self.client.shutdown().await;
        Ok(())
    }
}
