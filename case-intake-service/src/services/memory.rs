//! In-process [`CaseStore`] used by tests and local runs without MongoDB.

use super::database::{CaseSession, CaseStore};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use service_core::error::AppError;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct MemoryState {
    unreachable: AtomicBool,
    fail_inserts: AtomicBool,
    records: Mutex<Vec<Document>>,
    open_sessions: AtomicUsize,
    connect_count: AtomicU64,
}

#[derive(Clone, Default)]
pub struct InMemoryCaseStore {
    state: Arc<MemoryState>,
}

impl InMemoryCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `connect` fails, as if the server were down.
    pub fn unreachable() -> Self {
        let store = Self::new();
        store.set_unreachable(true);
        store
    }

    /// Connections succeed but every insert is rejected.
    pub fn failing_inserts() -> Self {
        let store = Self::new();
        store.state.fail_inserts.store(true, Ordering::SeqCst);
        store
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub async fn records(&self) -> Vec<Document> {
        self.state.records.lock().await.clone()
    }

    pub fn open_sessions(&self) -> usize {
        self.state.open_sessions.load(Ordering::SeqCst)
    }

    pub fn connect_count(&self) -> u64 {
        self.state.connect_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaseStore for InMemoryCaseStore {
    async fn connect(&self) -> Result<Box<dyn CaseSession>, AppError> {
        self.state.connect_count.fetch_add(1, Ordering::SeqCst);

        if self.state.unreachable.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "in-memory store is unreachable"
            )));
        }

        self.state.open_sessions.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        Ok(Box::new(MemorySession {
            state: self.state.clone(),
        }))
    }
}

struct MemorySession {
    state: Arc<MemoryState>,
}

#[async_trait]
impl CaseSession for MemorySession {
    async fn insert_case(&self, mut document: Document) -> Result<String, AppError> {
        if self.state.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "in-memory store rejected the insert"
            )));
        }

        let id = match document.get_object_id("_id") {
            Ok(oid) => oid,
            Err(_) => {
                let oid = ObjectId::new();
                document.insert("_id", oid);
                oid
            }
        };

        self.state.records.lock().await.push(document);
        Ok(id.to_hex())
    }

    async fn close(self: Box<Self>) -> Result<(), AppError> {
        self.state.open_sessions.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
