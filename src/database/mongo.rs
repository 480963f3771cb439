//! MongoDB connection.

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, IndexModel};
use tracing::{debug, info};

use crate::error::StoreError;

/// Handle to the database holding one collection per entity kind.
#[derive(Debug, Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Connect and ping, so a bad URI fails at startup rather than on the
    /// first dispatch.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("Connected to MongoDB database {}", db_name);

        Ok(Self {
            db: client.database(db_name),
        })
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Index `(owner, id)` on a collection keyed by owner-scoped ids so
    /// range deletes do not scan it.
    pub async fn ensure_owner_index(&self, name: &str) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "owner": 1, "id": 1 })
            .build();
        self.db
            .collection::<mongodb::bson::Document>(name)
            .create_index(index)
            .await?;
        debug!("Ensured owner index on {}", name);
        Ok(())
    }
}
