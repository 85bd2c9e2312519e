use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::HashMap;
use std::time::SystemTime;

/// Value of the `Server` header on every response.
pub const SERVER_NAME: &str = "Simulated Server v1";

/// Value of the `Content-Type` header on every response.
pub const CONTENT_TYPE: &str = "application/json; encoding=utf-8";

/// Body of the internal error response, pre-rendered so that producing it
/// can never fail.
const FAILED_BODY: &str = "{\n    \"stat\": \"failed\"\n}";

/// HTTP status codes the server answers with.
///
/// - `Ok` (200): the request was handled (including "connection not found")
/// - `NotFound` (404): unknown route, disallowed argument or wrong method
/// - `InternalServerError` (500): a handler failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use snooze::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response ready to be sent to a client.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds the Content-Length header based on body size if not already present.
    pub fn build(mut self) -> Response {
        self.headers
            .entry("Content-Length".to_string())
            .or_insert_with(|| self.body.len().to_string());

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates a JSON response carrying the standard server headers.
    ///
    /// The body is pretty-printed with a four space indent.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> anyhow::Result<Self> {
        Ok(Self::with_json_body(status, render_json(value)?))
    }

    /// Creates a `{"stat": ...}` response.
    pub fn stat(status: StatusCode, stat: &str) -> anyhow::Result<Self> {
        #[derive(Serialize)]
        struct Stat<'a> {
            stat: &'a str,
        }

        Self::json(status, &Stat { stat })
    }

    /// Creates the 500 response used when a handler fails.
    pub fn internal_error() -> Self {
        Self::with_json_body(StatusCode::InternalServerError, FAILED_BODY.as_bytes().to_vec())
    }

    fn with_json_body(status: StatusCode, body: Vec<u8>) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", CONTENT_TYPE)
            .header("Date", httpdate::fmt_http_date(SystemTime::now()))
            .header("Server", SERVER_NAME)
            .header("Connection", "close")
            .body(body)
            .build()
    }
}

/// Serializes `value` as JSON with a four space indent.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}
