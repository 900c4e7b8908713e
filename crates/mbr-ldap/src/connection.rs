//! LDAP connection pool management.
//!
//! ## Security Requirements
//!
//! All connections use LDAPS (TLS from connection start).
//! STARTTLS is NOT supported to prevent downgrade attacks.

use std::sync::Arc;

use ldap3::{Ldap, LdapConnAsync, LdapConnSettings};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

use crate::config::LdapConfig;
use crate::error::{LdapError, LdapResult};

/// Connection pool for LDAP connections.
///
/// A semaphore bounds concurrent use; one bound connection is kept for
/// reuse between checkouts.
pub struct LdapConnectionPool {
    config: Arc<LdapConfig>,
    semaphore: Arc<Semaphore>,
    idle: Arc<Mutex<Option<Ldap>>>,
}

impl LdapConnectionPool {
    /// Creates a new connection pool.
    ///
    /// ## Security
    ///
    /// The configuration must use LDAPS. This is validated at config build time.
    #[must_use]
    pub fn new(config: LdapConfig) -> Self {
        let max_size = config.pool_max_size;
        Self {
            config: Arc::new(config),
            semaphore: Arc::new(Semaphore::new(max_size)),
            idle: Arc::new(Mutex::new(None)),
        }
    }

    /// Gets a connection from the pool.
    ///
    /// Returns a connection handle that releases back to the pool when dropped.
    pub async fn get(&self) -> LdapResult<LdapConnection> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| LdapError::PoolExhausted)?;

        let reused = self.idle.lock().await.take();
        let ldap = match reused {
            Some(ldap) => ldap,
            None => self.create_connection().await?,
        };

        Ok(LdapConnection {
            ldap,
            pool: self.idle.clone(),
            reusable: true,
            _permit: permit,
        })
    }

    /// Creates a new LDAPS connection bound as the service account.
    async fn create_connection(&self) -> LdapResult<Ldap> {
        let settings = LdapConnSettings::new()
            .set_conn_timeout(self.config.connection_timeout)
            .set_no_tls_verify(!self.config.validate_certificates);

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.config.connection_url)
            .await
            .map_err(|e| LdapError::connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!("LDAP connection driver error: {}", e);
            }
        });

        ldap.simple_bind(&self.config.bind_dn, &self.config.bind_credential)
            .await
            .map_err(|e| LdapError::Bind(e.to_string()))?
            .success()
            .map_err(|e| LdapError::Bind(format!("Bind failed: {e}")))?;

        tracing::debug!(url = %self.config.connection_url, "opened LDAP connection");
        Ok(ldap)
    }

    /// Tests the connection to the LDAP server.
    pub async fn test_connection(&self) -> LdapResult<()> {
        let mut conn = self.get().await?;
        let timeout = self.config.read_timeout;

        let result = conn
            .ldap_mut()
            .with_timeout(timeout)
            .search(
                &self.config.base_dn,
                ldap3::Scope::Base,
                "(objectClass=*)",
                vec!["dn"],
            )
            .await
            .and_then(ldap3::SearchResult::success);

        match result {
            Ok(_) => Ok(()),
            Err(ldap3::LdapError::Timeout { .. }) => {
                conn.discard().await;
                Err(LdapError::Timeout)
            }
            Err(e) => {
                conn.discard().await;
                Err(LdapError::connection(format!("Test search failed: {e}")))
            }
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LdapConfig {
        &self.config
    }
}

/// A connection from the pool.
///
/// When dropped, the connection is returned to the pool unless it was
/// discarded.
pub struct LdapConnection {
    ldap: Ldap,
    pool: Arc<Mutex<Option<Ldap>>>,
    reusable: bool,
    _permit: OwnedSemaphorePermit,
}

impl LdapConnection {
    /// Returns a mutable reference to the LDAP connection.
    #[must_use]
    pub fn ldap_mut(&mut self) -> &mut Ldap {
        &mut self.ldap
    }

    /// Closes the connection without returning it to the pool.
    ///
    /// Use this after a transport failure.
    pub async fn discard(mut self) {
        self.reusable = false;
        let _ = self.ldap.unbind().await;
    }
}

impl Drop for LdapConnection {
    fn drop(&mut self) {
        if !self.reusable {
            return;
        }
        // A concurrent checkout holding the lock means the slot is busy;
        // this connection is then simply dropped.
        if let Ok(mut slot) = self.pool.try_lock() {
            if slot.is_none() {
                *slot = Some(self.ldap.clone());
            }
        }
    }
}
