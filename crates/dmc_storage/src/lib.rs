use std::sync::Arc;

use async_trait::async_trait;
use dmc_core::{Error, NewsStorage, Result};

pub mod backends;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn get_error_message() -> &'static str;
    async fn new() -> Result<Self>
    where
        Self: Sized;
}

async fn init_backend<T: StorageBackend + NewsStorage + 'static>() -> Result<Arc<dyn NewsStorage>> {
    let storage = <T as StorageBackend>::new()
        .await
        .map_err(|e| Error::Storage(format!("{}: {}", T::get_error_message(), e)))?;
    Ok(Arc::new(storage))
}

/// Creates a storage backend by name. `url` is backend-specific: the SQLite
/// backend treats it as a database path.
pub async fn create_storage(kind: &str, url: Option<&str>) -> Result<Arc<dyn NewsStorage>> {
    match kind {
        "memory" => init_backend::<backends::memory::MemoryStorage>().await,
        #[cfg(feature = "sqlite")]
        "sqlite" => match url {
            Some(path) => {
                let path = std::path::PathBuf::from(path);
                Ok(Arc::new(
                    backends::sqlite::SqliteStorage::new_with_path(&path).await?,
                ))
            }
            None => init_backend::<backends::sqlite::SqliteStorage>().await,
        },
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => {
            let _ = url;
            Err(Error::Storage(
                "sqlite backend not enabled; rebuild with --features sqlite".to_string(),
            ))
        }
        other => Err(Error::Storage(format!(
            "Unknown storage backend: {}",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageBackend};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_storage() {
        let storage = create_storage("memory", None).await.unwrap();
        assert!(!storage.get_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_backend_is_rejected() {
        assert!(create_storage("postgres", None).await.is_err());
    }
}
