//! Response status capture and the collected outbound response.

use serde_json::{Value, json};

use crate::domain::{DomainError, HeaderMap};

/// Status line and headers as passed to the start-response callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseStatus {
    pub line: String,
    pub headers: Vec<(String, String)>,
}

impl ResponseStatus {
    pub fn new(line: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        Self {
            line: line.into(),
            headers,
        }
    }

    /// Numeric code of the status line.
    pub fn code(&self) -> Result<u16, DomainError> {
        parse_status_code(&self.line)
    }
}

/// Parse the leading whitespace-delimited token of a status line.
///
/// The token must be a three digit code in `100..=599`.
pub fn parse_status_code(line: &str) -> Result<u16, DomainError> {
    let invalid = || DomainError::InvalidStatusLine {
        line: line.to_string(),
    };

    let token = line.split_whitespace().next().ok_or_else(invalid)?;
    if token.len() != 3 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let code: u16 = token.parse().map_err(|_| invalid())?;
    if !(100..=599).contains(&code) {
        return Err(invalid());
    }
    Ok(code)
}

/// A fully drained application response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundResponse {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl OutboundResponse {
    pub const PLAIN_TEXT: &'static str = "text/plain; charset=utf-8";

    pub fn new(status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A plain-text response carrying only `message`.
    pub fn plain_text(status: u16, message: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", Self::PLAIN_TEXT);
        Self::new(status, headers, message.into().into_bytes())
    }

    /// The 500 response used for every failure path.
    pub fn server_error(message: impl AsRef<str>) -> Self {
        Self::plain_text(500, format!("A server error occurred: {}", message.as_ref()))
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_parts(self) -> (u16, HeaderMap, Vec<u8>) {
        (self.status, self.headers, self.body)
    }

    /// `statusCode` / `headers` / `body` mapping. The body is decoded as UTF-8
    /// with invalid sequences replaced.
    pub fn to_mapping(&self) -> Value {
        json!({
            "statusCode": self.status,
            "headers": self.headers,
            "body": String::from_utf8_lossy(&self.body),
        })
    }
}
