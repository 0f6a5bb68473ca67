//! Storage for uploaded payment proofs.

mod local;
mod service;

pub use local::LocalProofStorage;
pub use service::{ProofStorage, StorageError};

#[cfg(test)]
pub use service::MockProofStorage;
