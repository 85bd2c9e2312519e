//! One in-flight sleep.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::sync::Notify;

use crate::http::handle::ConnectionHandle;

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// Metadata of a registered sleep. Never modified after construction.
#[derive(Debug)]
pub struct ConnectionEntry {
    id: String,
    serial: u64,
    started_at: Instant,
    timeout: Duration,
    ends_at: Instant,
    owner: ConnectionHandle,
    preemption: Preemption,
}

impl ConnectionEntry {
    /// Creates an entry starting now. Fails if the deadline is not
    /// representable.
    pub fn new(
        id: impl Into<String>,
        timeout_ms: u64,
        owner: ConnectionHandle,
    ) -> anyhow::Result<Self> {
        let started_at = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);
        let ends_at = started_at
            .checked_add(timeout)
            .with_context(|| format!("timeout of {timeout_ms} ms is out of range"))?;

        Ok(Self {
            id: id.into(),
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
            started_at,
            timeout,
            ends_at,
            owner,
            preemption: Preemption::default(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Unique per registration, even when an id is reused.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn ends_at(&self) -> Instant {
        self.ends_at
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis().try_into().unwrap_or(u64::MAX)
    }

    /// The connection that gets this entry's final response.
    pub fn owner(&self) -> &ConnectionHandle {
        &self.owner
    }

    pub fn preemption(&self) -> Preemption {
        self.preemption.clone()
    }

    /// Milliseconds until the deadline; negative once it has passed.
    pub fn remaining_ms_at(&self, now: Instant) -> i64 {
        if now <= self.ends_at {
            millis(self.ends_at - now)
        } else {
            -millis(now - self.ends_at)
        }
    }
}

fn millis(d: Duration) -> i64 {
    d.as_millis().try_into().unwrap_or(i64::MAX)
}

/// Wake-up signal from a kill to the sleeping task.
///
/// Backed by [`Notify`], so a signal fired before the sleeper starts
/// waiting is not lost.
#[derive(Debug, Clone, Default)]
pub struct Preemption {
    notify: Arc<Notify>,
}

impl Preemption {
    pub fn fire(&self) {
        self.notify.notify_one();
    }

    pub async fn fired(&self) {
        self.notify.notified().await;
    }
}
