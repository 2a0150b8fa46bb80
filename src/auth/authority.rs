use std::sync::Arc;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use super::keys::{KeyMaterial, split_key};
use super::{AdminKeyStore, KeyInsertOutcome};
use crate::config::{AdminCredential, CredentialsConfig};
use crate::context::CallContext;
use crate::errors::{Result, ShortcutError};
use crate::utils::password::SecretHasher;

/// Issues, validates and revokes admin keys, and authenticates the
/// bootstrap administrator.
///
/// Key material comes from the authority's own seeded generator; the only
/// shared state is that generator and the key store.
pub struct CredentialAuthority {
    store: Arc<dyn AdminKeyStore>,
    hasher: SecretHasher,
    rng: Mutex<StdRng>,
    admin: AdminCredential,
}

impl CredentialAuthority {
    pub fn new(
        store: Arc<dyn AdminKeyStore>,
        credentials: &CredentialsConfig,
        admin: AdminCredential,
    ) -> Result<Self> {
        let rng = StdRng::from_rng(&mut rand::rng());
        Self::with_rng(store, credentials, admin, rng)
    }

    /// Same as [`new`](Self::new) with an injected generator.
    pub fn with_rng(
        store: Arc<dyn AdminKeyStore>,
        credentials: &CredentialsConfig,
        admin: AdminCredential,
        rng: StdRng,
    ) -> Result<Self> {
        let hasher = SecretHasher::new(credentials.hash_params(), credentials.salt.clone())?;
        Ok(Self {
            store,
            hasher,
            rng: Mutex::new(rng),
            admin,
        })
    }

    fn draw_material(&self) -> KeyMaterial {
        KeyMaterial::draw(&mut self.rng.lock())
    }

    /// Create and store a new admin key, returning `prefix.secret`.
    ///
    /// The plaintext is only ever returned here. Prefix collisions are
    /// retried with fresh material until an insert succeeds.
    pub async fn generate_key(&self, ctx: &CallContext) -> Result<String> {
        ctx.run("generate_key", async {
            loop {
                let material = self.draw_material();
                let hash = self
                    .hasher
                    .hash_with_salt_bytes(&material.secret, material.hash_salt.as_bytes())?;

                match self.store.insert_key(&material.prefix, &hash).await? {
                    KeyInsertOutcome::Inserted => {
                        info!("Admin key issued: {}", material.prefix);
                        return Ok(material.wire_format());
                    }
                    KeyInsertOutcome::PrefixTaken => {
                        debug!("Prefix {} already taken, regenerating", material.prefix);
                    }
                }
            }
        })
        .await
    }

    /// Accept a presented key or fail with `Unauthorized`.
    pub async fn validate_key(&self, ctx: &CallContext, candidate: &str) -> Result<()> {
        let (prefix, secret) = split_key(candidate)
            .ok_or_else(|| ShortcutError::unauthorized("malformed admin key"))?;

        ctx.run("validate_key", async {
            let hash = self
                .store
                .active_key_hash(prefix)
                .await?
                .ok_or_else(|| ShortcutError::unauthorized("unknown or revoked admin key"))?;

            if self.hasher.verify(secret, &hash)? {
                Ok(())
            } else {
                Err(ShortcutError::unauthorized("invalid admin key"))
            }
        })
        .await
    }

    pub async fn revoke_key(&self, ctx: &CallContext, prefix: &str) -> Result<()> {
        let prefix = prefix.trim();
        ctx.run("revoke_key", async {
            if self.store.revoke_key(prefix).await? == 0 {
                return Err(ShortcutError::prefix_not_found(format!(
                    "no active admin key with prefix '{}'",
                    prefix
                )));
            }
            info!("Admin key revoked: {}", prefix);
            Ok(())
        })
        .await
    }

    /// Check the bootstrap administrator's username and password.
    pub fn authenticate_admin(&self, username: &str, password: &str) -> Result<()> {
        if self.admin.password_hash.is_empty() {
            warn!("Administrator login attempted but no password hash is configured");
            return Err(ShortcutError::unauthorized(
                "administrator password is not configured",
            ));
        }

        let username_ok: bool = self
            .admin
            .username
            .as_bytes()
            .ct_eq(username.as_bytes())
            .into();
        // 用户名不匹配时也完成密码校验，避免时间差泄露
        let password_ok = self.hasher.verify(password, &self.admin.password_hash)?;

        if username_ok && password_ok {
            Ok(())
        } else {
            Err(ShortcutError::unauthorized("invalid administrator credentials"))
        }
    }

    /// PHC string for `admin.password_hash` in the configuration.
    pub fn hash_admin_password(&self, password: &str) -> Result<String> {
        Ok(self.hasher.hash(password)?)
    }
}
