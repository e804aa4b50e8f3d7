//! The canonical inbound request.

use crate::domain::HeaderMap;

/// A request after boundary normalization.
///
/// Every field is populated; the defaults for anything the host left out are
/// applied by [`InboundRequestBuilder::build`]. There are no setters: a request
/// is built once per host call and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    method: String,
    path: String,
    query_string: String,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl InboundRequest {
    pub const DEFAULT_METHOD: &'static str = "GET";
    pub const DEFAULT_PATH: &'static str = "/";

    pub fn builder() -> InboundRequestBuilder {
        InboundRequestBuilder::default()
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string, without the leading `?`.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Builder for [`InboundRequest`].
#[derive(Debug, Default)]
pub struct InboundRequestBuilder {
    method: Option<String>,
    path: Option<String>,
    query_string: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl InboundRequestBuilder {
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn query_string(mut self, query: impl Into<String>) -> Self {
        self.query_string = Some(query.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> InboundRequest {
        InboundRequest {
            method: self
                .method
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| InboundRequest::DEFAULT_METHOD.to_string()),
            path: self
                .path
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| InboundRequest::DEFAULT_PATH.to_string()),
            query_string: self
                .query_string
                .map(|q| q.trim_start_matches('?').to_string())
                .unwrap_or_default(),
            headers: self.headers,
            body: self.body,
        }
    }
}
