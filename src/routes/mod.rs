//! Request routing.
//!
//! Maps a parsed request onto the sleep, server-status and kill handlers.
//! Handlers return the response for the calling connection, or `None` when
//! that connection must not be answered from here.

pub mod kill;
pub mod sleep;
pub mod status;

use crate::http::handle::ConnectionHandle;
use crate::http::parser::ParseError;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::registry::Registry;

/// Query keys a request may carry. Any other key rejects the request.
pub const ALLOWED_QUERY_KEYS: [&str; 2] = ["timeout", "connid"];

pub const SLEEP_ROUTE: &str = "v1/sleep";
pub const STATUS_ROUTE: &str = "v1/server-status";
pub const KILL_ROUTE: &str = "v1/kill";

pub const ROUTE_NOT_FOUND: &str = "route_not_found";
pub const USE_POST: &str = "Use the POST method instead";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Sleep,
    ServerStatus,
    Kill,
    /// `v1/kill` with arguments but a method other than POST
    KillRequiresPost,
    NotFound,
}

impl Route {
    pub fn resolve(request: &Request) -> Self {
        let allowed = request
            .query
            .keys()
            .all(|key| ALLOWED_QUERY_KEYS.contains(&key.as_str()));
        if !allowed {
            return Route::NotFound;
        }

        match request.route() {
            Some(SLEEP_ROUTE) if request.has_query() => Route::Sleep,
            Some(STATUS_ROUTE) => Route::ServerStatus,
            Some(KILL_ROUTE) if request.has_query() => {
                if request.method == Method::POST {
                    Route::Kill
                } else {
                    Route::KillRequiresPost
                }
            }
            _ => Route::NotFound,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    registry: Registry,
}

impl Router {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handles one request for the connection behind `conn`.
    ///
    /// Handler failures become a 500 response here and go no further.
    pub async fn respond(
        &self,
        parsed: Result<Request, ParseError>,
        conn: &ConnectionHandle,
    ) -> Option<Response> {
        match self.dispatch(parsed, conn).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(peer = ?conn.peer(), error = ?e, "Request handling failed");
                Some(Response::internal_error())
            }
        }
    }

    async fn dispatch(
        &self,
        parsed: Result<Request, ParseError>,
        conn: &ConnectionHandle,
    ) -> anyhow::Result<Option<Response>> {
        let request = match parsed {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(peer = ?conn.peer(), error = %e, "Unparseable request");
                return route_not_found().map(Some);
            }
        };

        let route = Route::resolve(&request);
        tracing::debug!(
            peer = ?conn.peer(),
            method = request.method.as_str(),
            target = %request.target,
            ?route,
            "Routing request"
        );

        match route {
            Route::Sleep => sleep::handle(&self.registry, &request, conn).await,
            Route::ServerStatus => status::handle(&self.registry).map(Some),
            Route::Kill => kill::handle(&self.registry, &request).await.map(Some),
            Route::KillRequiresPost => Response::stat(StatusCode::NotFound, USE_POST).map(Some),
            Route::NotFound => route_not_found().map(Some),
        }
    }
}

fn route_not_found() -> anyhow::Result<Response> {
    Response::stat(StatusCode::NotFound, ROUTE_NOT_FOUND)
}

/// Reads a required query argument.
fn required_arg<'a>(request: &'a Request, key: &str) -> anyhow::Result<&'a str> {
    request
        .query_arg(key)
        .ok_or_else(|| anyhow::anyhow!("missing query argument '{key}'"))
}
