//! `v1/sleep?connid=<id>&timeout=<ms>`
//!
//! Registers the caller under `connid`, then waits until the timeout elapses
//! or a kill preempts it. Only the expiry path answers the caller; after a
//! kill the killer has already answered it.

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::http::handle::ConnectionHandle;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::registry::{ConnectionEntry, Registry};
use crate::routes::required_arg;

pub async fn handle(
    registry: &Registry,
    request: &Request,
    conn: &ConnectionHandle,
) -> anyhow::Result<Option<Response>> {
    let id = required_arg(request, "connid")?;
    let timeout_ms: u64 = required_arg(request, "timeout")?
        .parse()
        .context("timeout must be a non-negative integer")?;

    let entry = ConnectionEntry::new(id, timeout_ms, conn.clone())?;
    let serial = entry.serial();
    let deadline = entry.ends_at();
    let preemption = entry.preemption();

    if !registry.try_register(entry) {
        // The caller is dropped unanswered; its connection closes.
        warn!(connid = id, "Connection id already registered");
        return Ok(None);
    }

    info!(connid = id, timeout_ms, "Sleeping");

    tokio::select! {
        _ = tokio::time::sleep_until(deadline.into()) => {}
        _ = preemption.fired() => {
            debug!(connid = id, "Sleep preempted by kill");
            return Ok(None);
        }
    }

    match registry.complete(id, serial) {
        Some(entry) => {
            info!(
                connid = id,
                slept = ?entry.started_at().elapsed(),
                "Sleep finished, entry removed"
            );
            Response::stat(StatusCode::Ok, "ok").map(Some)
        }
        None => {
            debug!(connid = id, "Entry already removed by kill");
            Ok(None)
        }
    }
}
