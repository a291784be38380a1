use crate::{Error, ErrorContext, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

#[derive(Debug, Clone)]
pub struct HostLimiterSnapshot {
    pub max_per_host: usize,
    /// (host key, permits in use)
    pub in_use: Vec<(String, usize)>,
}

/// Caps concurrent in-flight requests per `host:port`.
///
/// Semaphores are created lazily on first use of a host. Idle ones are
/// dropped whenever a new host is added, so the map tracks the hosts in use
/// rather than every host ever contacted.
pub struct HostLimiter {
    max_per_host: usize,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl HostLimiter {
    pub fn new(max_per_host: usize) -> Self {
        Self {
            max_per_host: max_per_host.max(1),
            hosts: Mutex::new(HashMap::new()),
        }
    }

    fn host_key(url: &Url) -> String {
        format!(
            "{}:{}",
            url.host_str().unwrap_or_default(),
            url.port_or_known_default().unwrap_or_default()
        )
    }

    fn semaphore(&self, key: String) -> Result<Arc<Semaphore>> {
        let mut hosts = self.hosts.lock().map_err(|_| {
            Error::unknown_with_context(
                "host limiter poisoned",
                ErrorContext::new().with_source("host_limiter"),
            )
        })?;
        if let Some(sem) = hosts.get(&key) {
            return Ok(sem.clone());
        }
        // A semaphore only the map references has no holders and no waiters.
        hosts.retain(|_, sem| Arc::strong_count(sem) > 1);
        let sem = Arc::new(Semaphore::new(self.max_per_host));
        hosts.insert(key, sem.clone());
        Ok(sem)
    }

    /// Wait for a slot on the URL's host. The slot is released when the
    /// permit drops.
    pub async fn acquire(&self, url: &Url) -> Result<OwnedSemaphorePermit> {
        let sem = self.semaphore(Self::host_key(url))?;
        sem.acquire_owned().await.map_err(|_| {
            Error::unknown_with_context(
                "host limiter semaphore closed",
                ErrorContext::new().with_source("host_limiter"),
            )
        })
    }

    pub fn snapshot(&self) -> HostLimiterSnapshot {
        let mut in_use = match self.hosts.lock() {
            Ok(hosts) => hosts
                .iter()
                .map(|(k, sem)| {
                    (
                        k.clone(),
                        self.max_per_host.saturating_sub(sem.available_permits()),
                    )
                })
                .collect::<Vec<_>>(),
            Err(_) => Vec::new(),
        };
        in_use.sort();
        HostLimiterSnapshot {
            max_per_host: self.max_per_host,
            in_use,
        }
    }
}
