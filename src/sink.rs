//! Where finished page records go once a crawl hands them over.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::crawler::PageRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPage {
    pub id: Uuid,
    #[serde(flatten)]
    pub record: PageRecord,
    pub folder: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("page {0} not found")]
    NotFound(Uuid),

    #[error("storage backend failed: {0}")]
    Backend(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageSink: Send + Sync {
    async fn store(
        &self,
        record: PageRecord,
        folder: Option<String>,
    ) -> Result<StoredPage, StorageError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<StoredPage>, StorageError>;

    async fn move_to_folder(&self, id: Uuid, folder: String) -> Result<StoredPage, StorageError>;
}

/// Process-local sink. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemorySink {
    pages: RwLock<Vec<StoredPage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageSink for MemorySink {
    async fn store(
        &self,
        record: PageRecord,
        folder: Option<String>,
    ) -> Result<StoredPage, StorageError> {
        let page = StoredPage {
            id: Uuid::new_v4(),
            record,
            folder,
            created_at: Utc::now(),
        };
        self.pages.write().await.push(page.clone());
        Ok(page)
    }

    async fn list(&self) -> Result<Vec<StoredPage>, StorageError> {
        // reversed first so the stable sort breaks timestamp ties newest first
        let mut pages: Vec<StoredPage> = self.pages.read().await.iter().rev().cloned().collect();
        pages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pages)
    }

    async fn move_to_folder(&self, id: Uuid, folder: String) -> Result<StoredPage, StorageError> {
        let mut pages = self.pages.write().await;
        let page = pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StorageError::NotFound(id))?;
        page.folder = Some(folder);
        Ok(page.clone())
    }
}
