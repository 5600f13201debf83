//! Cluster identifiers.

use uuid::Uuid;

/// Returned when no cluster id has ever been persisted.
pub const INVALID_CLUSTER_ID: &str = "INVALID_CLUSTER_ID";

/// Mint a fresh, random cluster id.
pub fn create_cluster_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn is_valid_cluster_id(id: &str) -> bool {
    !id.is_empty() && id != INVALID_CLUSTER_ID
}
