use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;
use crate::records::Record;

/// Trait abstraction for record storage.
/// Implementations can be file-backed, database-backed, or remote KV.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whole collection in insertion order.
    async fn list(&self) -> Vec<Record>;
    async fn get(&self, id: u64) -> Option<Record>;
    /// Assign the next id to `fields` and append it.
    async fn create(&self, fields: Value) -> Result<Record, ServiceError>;
    /// Merge `fields` into the record with `id`.
    async fn update(&self, id: u64, fields: Value) -> Result<Record, ServiceError>;
    /// Remove every record with `id`; returns whether any existed.
    async fn delete(&self, id: u64) -> Result<bool, ServiceError>;
}
