//! `v1/server-status`

use serde::Serialize;
use std::collections::BTreeMap;

use crate::http::response::{Response, StatusCode};
use crate::registry::Registry;

#[derive(Debug, Serialize)]
struct RemainingTime {
    remaining_time: i64,
}

pub fn handle(registry: &Registry) -> anyhow::Result<Response> {
    let status: BTreeMap<String, RemainingTime> = registry
        .snapshot()
        .into_iter()
        .map(|(id, remaining_time)| (id, RemainingTime { remaining_time }))
        .collect();

    tracing::info!(sleeping = status.len(), "Reporting server status");
    Response::json(StatusCode::Ok, &status)
}
