use std::{marker::PhantomData, path::{Path, PathBuf}};
use tokio::fs;
use tracing::warn;

use crate::errors::ServiceError;

/// Generic JSON file codec for a whole collection persisted as one array.
///
/// Holds no data itself; callers own the in-memory copy and decide when to
/// write it back. Saves go through a sibling `.tmp` file and a rename so a
/// crash mid-write never leaves a truncated collection behind.
#[derive(Debug, Clone)]
pub struct JsonListStore<T> {
    file_path: PathBuf,
    pretty: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonListStore<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    pub fn new<P: Into<PathBuf>>(path: P, pretty: bool) -> Self {
        Self { file_path: path.into(), pretty, _marker: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read the whole collection.
    ///
    /// A missing or blank file is an empty collection. Content that does not
    /// parse as an array of `T` is logged and also treated as empty.
    pub async fn load(&self) -> Result<Vec<T>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ServiceError::storage(e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        match serde_json::from_slice::<Vec<T>>(&bytes) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "data file is not a valid JSON array; starting empty");
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the file with `items`.
    pub async fn save(&self, items: &[T]) -> Result<(), ServiceError> {
        let data = if self.pretty {
            serde_json::to_vec_pretty(items)
        } else {
            serde_json::to_vec(items)
        }
        .map_err(ServiceError::storage)?;

        let tmp = self.tmp_path();
        fs::write(&tmp, data).await.map_err(ServiceError::storage)?;
        fs::rename(&tmp, &self.file_path).await.map_err(ServiceError::storage)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.file_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }
}
