use std::collections::HashMap;

use crate::http::parser::split_target;

/// HTTP request methods.
///
/// Only POST carries meaning for routing (it is required by `v1/kill`).
/// GET is what clients send for everything else; any other token is kept
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    Other(String),
}

/// A request as far as this server understands it: the request line, with
/// the target split into a route type and query arguments.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target (e.g. "/v1/sleep?connid=1&timeout=500")
    pub target: String,
    /// Protocol token from the request line (typically "HTTP/1.1")
    pub version: String,
    /// Path after the leading '/', without the query string.
    /// `None` when the target does not start with '/'.
    pub route: Option<String>,
    /// Query arguments; a repeated key keeps its last value
    pub query: HashMap<String, String>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
}

impl Method {
    /// Parses GET or POST; method tokens are case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use snooze::http::request::Method;
    /// assert_eq!(Method::from_str("POST"), Some(Method::POST));
    /// assert_eq!(Method::from_str("post"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            _ => None,
        }
    }

    /// Like [`Method::from_str`], but keeps any other token as `Other`.
    pub fn from_token(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| Method::Other(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(token) => token,
        }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            target: None,
            version: None,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let target = self.target.ok_or("target missing")?;
        let (route, query) = split_target(&target);

        Ok(Request {
            method: self.method.ok_or("method missing")?,
            target,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            route,
            query,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// The route type, if the target could be split into one.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Retrieves a query argument by exact key.
    pub fn query_arg(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(|v| v.as_str())
    }

    /// Whether the target carried at least one query argument.
    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }
}
