use std::{path::PathBuf, sync::Arc};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::errors::ServiceError;
use crate::records::{store::RecordStore, Record};
use crate::storage::json_list_store::JsonListStore;

struct State {
    records: Vec<Record>,
    /// Always greater than every id in `records`; `None` once `u64::MAX` is taken.
    next_id: Option<u64>,
}

/// File-backed record collection.
///
/// The whole collection lives in memory and is rewritten to disk after every
/// mutation. The write lock is held across "mutate + persist", and changes are
/// staged on a copy that only replaces the live collection once the file
/// write succeeded, so memory never runs ahead of disk.
pub struct FileRecordStore {
    state: RwLock<State>,
    file: JsonListStore<Record>,
}

impl FileRecordStore {
    /// Load the collection from `path`. A missing file is an empty collection
    /// and is not created until the first mutation.
    pub async fn new<P: Into<PathBuf>>(path: P, pretty: bool) -> Result<Arc<Self>, ServiceError> {
        let file = JsonListStore::<Record>::new(path, pretty);
        let records = file.load().await?;
        let next_id = next_id_after(&records);
        info!(path = %file.path().display(), count = records.len(), ?next_id, "record store loaded");
        Ok(Arc::new(Self { state: RwLock::new(State { records, next_id }), file }))
    }

    async fn persist(&self, records: &[Record]) -> Result<(), ServiceError> {
        self.file.save(records).await.inspect_err(|e| {
            error!(path = %self.file.path().display(), error = %e, "failed to persist records");
        })
    }

    /// List all records in insertion order.
    pub async fn list(&self) -> Vec<Record> {
        self.state.read().await.records.clone()
    }

    pub async fn get(&self, id: u64) -> Option<Record> {
        let state = self.state.read().await;
        state.records.iter().find(|r| r.id() == Some(id)).cloned()
    }

    /// Create a record from a JSON object body; any supplied `id` is replaced.
    pub async fn create(&self, fields: Value) -> Result<Record, ServiceError> {
        let mut record = Record::from_value(fields)?;
        let mut state = self.state.write().await;

        let id = state.next_id.ok_or_else(|| ServiceError::Storage("record ids exhausted".into()))?;
        record.set_id(id);
        let mut staged = state.records.clone();
        staged.push(record.clone());
        self.persist(&staged).await?;

        state.records = staged;
        state.next_id = id.checked_add(1);
        info!(id, "record_created");
        Ok(record)
    }

    /// Shallow-merge a JSON object body into an existing record.
    pub async fn update(&self, id: u64, fields: Value) -> Result<Record, ServiceError> {
        let patch = Record::from_value(fields)?;
        if patch.get(crate::records::ID_FIELD).is_some() {
            debug!(id, "ignoring id field in update payload");
        }
        let mut state = self.state.write().await;

        let idx = state
            .records
            .iter()
            .position(|r| r.id() == Some(id))
            .ok_or_else(|| ServiceError::not_found("entry"))?;
        let mut staged = state.records.clone();
        staged[idx].merge(patch);
        let updated = staged[idx].clone();
        self.persist(&staged).await?;

        state.records = staged;
        info!(id, "record_updated");
        Ok(updated)
    }

    /// Remove all records with `id` and persist, whether or not any matched.
    pub async fn delete(&self, id: u64) -> Result<bool, ServiceError> {
        let mut state = self.state.write().await;

        let staged: Vec<Record> = state.records.iter().filter(|r| r.id() != Some(id)).cloned().collect();
        let removed = state.records.len() - staged.len();
        self.persist(&staged).await?;

        state.records = staged;
        info!(id, removed, "record_deleted");
        Ok(removed > 0)
    }
}

fn next_id_after(records: &[Record]) -> Option<u64> {
    records.iter().filter_map(Record::id).max().map_or(Some(1), |max| max.checked_add(1))
}

#[async_trait::async_trait]
impl RecordStore for FileRecordStore {
    async fn list(&self) -> Vec<Record> { self.list().await }
    async fn get(&self, id: u64) -> Option<Record> { self.get(id).await }
    async fn create(&self, fields: Value) -> Result<Record, ServiceError> { self.create(fields).await }
    async fn update(&self, id: u64, fields: Value) -> Result<Record, ServiceError> { self.update(id, fields).await }
    async fn delete(&self, id: u64) -> Result<bool, ServiceError> { self.delete(id).await }
}
