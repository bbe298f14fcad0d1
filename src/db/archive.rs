use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use serde_json::Value;

use crate::db::models::{DeleteAck, HistoryDeleteRequest, InsertAck, SearchHistoryEntry};
use crate::error::AppError;

/// Name of the post-search ledger collection.
pub const SEARCH_HISTORY: &str = "search_history";

/// Archive operations over the document store.
///
/// Collections are created implicitly on first write. No schema is enforced
/// and there is no dedup key — repeated identical searches insert duplicate
/// documents.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Insert a single payload into the named collection.
    async fn insert_one(&self, collection: &str, document: Value) -> Result<InsertAck, AppError>;

    /// Insert a sequence of payloads into the named collection, preserving order.
    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Value>,
    ) -> Result<InsertAck, AppError>;

    /// Append one entry to the search-history ledger.
    async fn record_search(&self, entry: SearchHistoryEntry) -> Result<InsertAck, AppError>;

    /// Fetch one page from the named collection; `skip = (page - 1) * limit`.
    async fn find_page(
        &self,
        collection: &str,
        page: u64,
        limit: u64,
    ) -> Result<Vec<Value>, AppError>;

    /// Count the documents in the named collection.
    async fn count(&self, collection: &str) -> Result<u64, AppError>;

    /// List the collection names in the bound database.
    async fn list_collections(&self) -> Result<Vec<String>, AppError>;

    /// Drop the whole ledger, or delete exactly the listed ids from it.
    async fn delete_history(&self, request: HistoryDeleteRequest) -> Result<DeleteAck, AppError>;
}

/// Open the store connection and bind the named database.
///
/// The driver connects lazily, so a ping is issued to surface unreachable
/// hosts and auth failures at startup instead of on the first request.
pub async fn connect(uri: &str, db_name: &str) -> Result<mongodb::Database, AppError> {
    let client = mongodb::Client::with_uri_str(uri)
        .await
        .map_err(|e| AppError::StoreConnection(e.to_string()))?;

    let db = client.database(db_name);
    db.run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| AppError::StoreConnection(e.to_string()))?;

    Ok(db)
}

/// MongoDB implementation of the [`ArchiveStore`].
pub struct MongoArchiveStore {
    db: mongodb::Database,
}

impl MongoArchiveStore {
    pub fn new(db: mongodb::Database) -> Self {
        Self { db }
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

fn to_document(value: &Value) -> Result<Document, AppError> {
    bson::to_document(value)
        .map_err(|e| AppError::Validation(format!("payload is not a document: {e}")))
}

fn id_hex(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ArchiveStore for MongoArchiveStore {
    async fn insert_one(&self, collection: &str, document: Value) -> Result<InsertAck, AppError> {
        let document = to_document(&document)?;

        let result = self
            .collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| AppError::StoreOperation(e.to_string()))?;

        Ok(InsertAck {
            inserted_count: 1,
            inserted_ids: vec![id_hex(&result.inserted_id)],
        })
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Value>,
    ) -> Result<InsertAck, AppError> {
        // The driver rejects an empty batch; an empty upstream result is a
        // valid no-op.
        if documents.is_empty() {
            return Ok(InsertAck {
                inserted_count: 0,
                inserted_ids: vec![],
            });
        }

        let documents: Vec<Document> = documents
            .iter()
            .map(to_document)
            .collect::<Result<_, _>>()?;

        let result = self
            .collection(collection)
            .insert_many(documents)
            .await
            .map_err(|e| AppError::StoreOperation(e.to_string()))?;

        let mut ids: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        ids.sort_by_key(|(index, _)| *index);

        Ok(InsertAck {
            inserted_count: ids.len() as u64,
            inserted_ids: ids.into_iter().map(|(_, id)| id_hex(&id)).collect(),
        })
    }

    async fn record_search(&self, entry: SearchHistoryEntry) -> Result<InsertAck, AppError> {
        let result = self
            .db
            .collection::<SearchHistoryEntry>(SEARCH_HISTORY)
            .insert_one(&entry)
            .await
            .map_err(|e| AppError::StoreOperation(e.to_string()))?;

        Ok(InsertAck {
            inserted_count: 1,
            inserted_ids: vec![id_hex(&result.inserted_id)],
        })
    }

    async fn find_page(
        &self,
        collection: &str,
        page: u64,
        limit: u64,
    ) -> Result<Vec<Value>, AppError> {
        let options = FindOptions::builder()
            .skip(page.saturating_sub(1) * limit)
            .limit(limit as i64)
            .build();

        let mut cursor = self
            .collection(collection)
            .find(doc! {})
            .with_options(options)
            .await
            .map_err(|e| AppError::StoreOperation(e.to_string()))?;

        let mut documents = Vec::new();
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::StoreOperation(e.to_string()))?
        {
            let value = serde_json::to_value(&document)
                .map_err(|e| AppError::StoreOperation(e.to_string()))?;
            documents.push(value);
        }

        Ok(documents)
    }

    async fn count(&self, collection: &str) -> Result<u64, AppError> {
        self.collection(collection)
            .count_documents(doc! {})
            .await
            .map_err(|e| AppError::StoreOperation(e.to_string()))
    }

    async fn list_collections(&self) -> Result<Vec<String>, AppError> {
        self.db
            .list_collection_names()
            .await
            .map_err(|e| AppError::StoreOperation(e.to_string()))
    }

    async fn delete_history(&self, request: HistoryDeleteRequest) -> Result<DeleteAck, AppError> {
        if request.history_options.drop {
            self.collection(SEARCH_HISTORY)
                .drop()
                .await
                .map_err(|e| AppError::StoreOperation(e.to_string()))?;

            return Ok(DeleteAck {
                dropped: true,
                deleted_count: 0,
            });
        }

        // Ids recorded by the gateway are ObjectId hex strings, but string
        // `_id` values inserted by other tooling are matched too.
        let ids: Vec<Bson> = request
            .ids
            .iter()
            .map(|id| match ObjectId::parse_str(id) {
                Ok(oid) => Bson::ObjectId(oid),
                Err(_) => Bson::String(id.clone()),
            })
            .collect();

        let result = self
            .collection(SEARCH_HISTORY)
            .delete_many(doc! { "_id": { "$in": ids } })
            .await
            .map_err(|e| AppError::StoreOperation(e.to_string()))?;

        Ok(DeleteAck {
            dropped: false,
            deleted_count: result.deleted_count,
        })
    }
}
