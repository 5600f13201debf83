// Library root, shared by the `worker-db` binary and the integration tests.

pub mod config;
pub mod error;
pub mod ids;
pub mod logger;
pub mod mount;
pub mod properties;
pub mod worker_db;

pub use error::AppError;
pub use worker_db::{BlockWorkerDb, CLUSTER_ID_KEY, DefaultBlockWorkerDb};
