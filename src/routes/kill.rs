//! `POST v1/kill?connid=<id>`
//!
//! The one handler that writes to a connection other than its caller's:
//! the killed sleeper is answered through the handle stored in its entry.

use tracing::{info, warn};

use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::registry::Registry;
use crate::routes::required_arg;

pub async fn handle(registry: &Registry, request: &Request) -> anyhow::Result<Response> {
    let id = required_arg(request, "connid")?;

    let Some(entry) = registry.remove(id) else {
        warn!(connid = id, "Connection id doesn't exist");
        return Response::stat(StatusCode::Ok, "connection_not_found");
    };

    // A preempted sleeper never answers; the write below is the only one.
    entry.preemption().fire();

    let killed = Response::stat(StatusCode::Ok, "killed")?;
    match entry.owner().send(&killed).await {
        Ok(true) => {}
        Ok(false) => warn!(connid = id, "Killed connection was already answered"),
        Err(e) => warn!(connid = id, error = %e, "Failed to notify killed connection"),
    }

    info!(connid = id, "Closed connection");
    Response::stat(StatusCode::Ok, "ok")
}
