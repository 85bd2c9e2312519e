use crate::http::request::{Method, Request};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The request line is not `METHOD TARGET PROTOCOL`
    InvalidRequest,
    /// The request line is not valid UTF-8
    InvalidEncoding,
    /// No line terminator within the size limit
    TooLarge,
    Incomplete,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidRequest => write!(f, "malformed request line"),
            ParseError::InvalidEncoding => write!(f, "request line is not valid UTF-8"),
            ParseError::TooLarge => write!(f, "request line exceeds the size limit"),
            ParseError::Incomplete => write!(f, "request line is incomplete"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses the request line at the start of `buf`.
///
/// Returns the request and the number of bytes consumed (the line and its
/// terminator). Anything after the first line is left to the caller; headers
/// and bodies carry no meaning for this server.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let line_end = buf
        .iter()
        .position(|b| *b == b'\n')
        .ok_or(ParseError::Incomplete)?;

    let request = parse_request_line(&buf[..line_end])?;
    Ok((request, line_end + 1))
}

/// Parses a single request line, with or without its trailing `\r`.
pub fn parse_request_line(line: &[u8]) -> Result<Request, ParseError> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)?;

    let mut parts = line.split(' ');
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::InvalidRequest);
    };

    if method.is_empty() || target.is_empty() || version.is_empty() {
        return Err(ParseError::InvalidRequest);
    }

    let (route, query) = split_target(target);

    Ok(Request {
        method: Method::from_token(method),
        target: target.to_string(),
        version: version.to_string(),
        route,
        query,
    })
}

/// Splits a request target into its route type and query arguments.
///
/// The route type is the path after the leading '/'. A target without that
/// prefix has no route type (and no arguments).
pub fn split_target(target: &str) -> (Option<String>, HashMap<String, String>) {
    let Some(rest) = target.strip_prefix('/') else {
        return (None, HashMap::new());
    };

    match rest.split_once('?') {
        Some((route, query)) => (Some(route.to_string()), parse_query(query)),
        None => (Some(rest.to_string()), HashMap::new()),
    }
}

/// Splits `key=value` pairs on `&`, then on the first `=`. Keys and values
/// are taken literally, without percent-decoding.
fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key.to_string(), value.to_string())
        })
        .collect()
}
