//! Admin credentials: issued admin keys and the bootstrap administrator.

mod authority;
pub mod keys;

use async_trait::async_trait;

use crate::errors::Result;

pub use authority::CredentialAuthority;

/// Result of storing a freshly generated key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInsertOutcome {
    Inserted,
    /// The prefix is already in use; the caller draws new material.
    PrefixTaken,
}

/// Persistence seam for admin keys.
#[async_trait]
pub trait AdminKeyStore: Send + Sync {
    async fn insert_key(&self, prefix: &str, hashed_secret: &str) -> Result<KeyInsertOutcome>;

    /// Hash of the non-revoked key with this prefix, if any.
    async fn active_key_hash(&self, prefix: &str) -> Result<Option<String>>;

    /// Revoke the non-revoked key with this prefix; returns rows affected.
    async fn revoke_key(&self, prefix: &str) -> Result<u64>;
}
