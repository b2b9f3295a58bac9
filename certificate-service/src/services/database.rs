use crate::error::AppError;
use crate::models::Certificate;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{ClientOptions, FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};
use std::future::Future;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const OPERATION_TIMEOUT: Duration = Duration::from_secs(5);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB URI {}: {}", uri, e);
            AppError::from(e)
        })?;
        options.connect_timeout = Some(CONNECT_TIMEOUT);
        options.server_selection_timeout = Some(CONNECT_TIMEOUT);

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client for {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        with_timeout("ping", async {
            self.client
                .database("admin")
                .run_command(doc! { "ping": 1 }, None)
                .await
        })
        .await?;
        Ok(())
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for certificate-service");

        // Index on name for the list endpoint's substring filter
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("name_lookup".to_string())
                    .build(),
            )
            .build();

        with_timeout("create index", async {
            self.certificates().create_index(name_index, None).await
        })
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to create name index on certificates collection: {}",
                e
            );
            e
        })?;
        tracing::info!("Created index on certificates.name");

        Ok(())
    }

    /// Inserts the default template when the collection is empty so the UI
    /// always has at least one record to display. Returns whether it seeded.
    pub async fn seed_default_certificate(&self) -> Result<bool, AppError> {
        let count = self.count_certificates().await?;
        if count > 0 {
            return Ok(false);
        }

        tracing::info!("No certificates found, inserting default certificate");
        let certificate = Certificate::default_template();
        let id = self.insert_certificate(&certificate).await?;
        tracing::info!(certificate_id = %id, "Default certificate inserted");
        Ok(true)
    }

    pub async fn list_certificates(&self, filter: Document) -> Result<Vec<Certificate>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "updatedAt": -1 })
            .build();

        with_timeout("list certificates", async {
            let mut cursor = self.certificates().find(filter, options).await?;
            let mut certificates = Vec::new();
            while let Some(certificate) = cursor.try_next().await? {
                certificates.push(certificate);
            }
            Ok(certificates)
        })
        .await
    }

    pub async fn insert_certificate(&self, certificate: &Certificate) -> Result<ObjectId, AppError> {
        let result = with_timeout("insert certificate", async {
            self.certificates().insert_one(certificate, None).await
        })
        .await?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!("Inserted ID is not an ObjectId"))
        })
    }

    /// Applies `update` to the certificate with the given id and returns the
    /// post-update document, or `None` when no document matches.
    pub async fn update_certificate(
        &self,
        id: ObjectId,
        update: Document,
    ) -> Result<Option<Certificate>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        with_timeout("update certificate", async {
            self.certificates()
                .find_one_and_update(doc! { "_id": id }, update, options)
                .await
        })
        .await
    }

    pub async fn find_certificate(&self, id: ObjectId) -> Result<Option<Certificate>, AppError> {
        with_timeout("find certificate", async {
            self.certificates().find_one(doc! { "_id": id }, None).await
        })
        .await
    }

    pub async fn count_certificates(&self) -> Result<u64, AppError> {
        with_timeout("count certificates", async {
            self.certificates().count_documents(doc! {}, None).await
        })
        .await
    }

    pub fn certificates(&self) -> Collection<Certificate> {
        self.db.collection("certificates")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Bounded-time disconnect used during process shutdown.
    pub async fn close(self) {
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, self.client.shutdown())
            .await
            .is_err()
        {
            tracing::warn!(
                "MongoDB shutdown did not complete within {}s",
                SHUTDOWN_TIMEOUT.as_secs()
            );
        }
    }
}

/// Every store call is bounded; a timeout is terminal for that request and
/// surfaces as a database error, never a retry.
async fn with_timeout<T>(
    operation: &str,
    fut: impl Future<Output = Result<T, mongodb::error::Error>>,
) -> Result<T, AppError> {
    match tokio::time::timeout(OPERATION_TIMEOUT, fut).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::DatabaseError(anyhow::anyhow!(
            "{} timed out after {}s",
            operation,
            OPERATION_TIMEOUT.as_secs()
        ))),
    }
}
