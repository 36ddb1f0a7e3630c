use crate::config::{StorageBackend, StorageConfig};
use anyhow::{Context, Result};
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::{ClientOptions, ObjectStore};
use std::fs;
use std::sync::Arc;
use std::time::Duration;

/// Builds the object store client uploads are written to.
///
/// `gcs` talks to the Cloud Storage bucket behind a Firebase project using a
/// service account file. `local` writes below a directory and `memory` keeps
/// everything in process, which is only useful for development and tests.
pub fn create_object_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::Gcs => {
            let client_options =
                ClientOptions::default().with_timeout(Duration::from_secs(config.timeout_secs));

            GoogleCloudStorageBuilder::new()
                .with_client_options(client_options)
                .with_bucket_name(&config.bucket)
                .with_service_account_path(&config.credentials_path)
                .build()
                .map(|s| Arc::new(s) as Arc<dyn ObjectStore>)
                .context("Failed to create GCS store")
        }
        StorageBackend::Local => {
            fs::create_dir_all(&config.local_path)
                .with_context(|| format!("Cannot create directory '{}'", config.local_path))?;

            LocalFileSystem::new_with_prefix(&config.local_path)
                .map(|s| Arc::new(s) as Arc<dyn ObjectStore>)
                .context("Failed to create file store")
        }
        StorageBackend::Memory => Ok(Arc::new(InMemory::new())),
    }
}
