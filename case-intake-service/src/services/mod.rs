pub mod database;
pub mod memory;
pub mod metrics;

pub use database::{CaseSession, CaseStore, MongoCaseStore};
pub use memory::InMemoryCaseStore;
pub use metrics::{get_metrics, init_metrics};
