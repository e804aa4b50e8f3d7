//! Host-facing request and response shapes.
//!
//! Hosts hand us either a typed request object or a loose key/value mapping
//! (a JSON event). Both are folded into one [`InboundRequest`] by
//! [`HostRequest::normalize`]; nothing past that function knows which shape
//! arrived. On the way out a collected [`OutboundResponse`] becomes either a
//! structured response or a `statusCode`/`headers`/`body` mapping.

use std::collections::BTreeMap;

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::domain::{HeaderMap, InboundRequest, OutboundResponse, QueryParams, QueryValue};

// ── Payload ──────────────────────────────────────────────────────────────────

/// Bytes or text, as hosts deliver bodies and query strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Bytes(Vec<u8>),
}

impl Payload {
    /// Text is encoded as UTF-8.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    /// Bytes are decoded as UTF-8, replacing invalid sequences.
    pub fn into_text_lossy(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

// ── RawHeaders ───────────────────────────────────────────────────────────────

/// Headers in either of the shapes hosts use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawHeaders {
    Map(BTreeMap<String, String>),
    Pairs(Vec<(String, String)>),
}

impl RawHeaders {
    fn into_header_map(self) -> HeaderMap {
        match self {
            Self::Map(map) => map.into_iter().collect(),
            Self::Pairs(pairs) => HeaderMap::from_pairs(pairs),
        }
    }
}

// ── RequestObject ────────────────────────────────────────────────────────────

/// Typed request object, as an in-process host library exposes it.
///
/// Every field is optional; [`HostRequest::normalize`] supplies the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestObject {
    pub method: Option<String>,
    pub path: Option<String>,
    /// Full or origin-relative URL. Supplies the path when `path` is absent
    /// and the query when nothing else does.
    pub url: Option<String>,
    pub query_string: Option<Payload>,
    pub query_params: Option<QueryParams>,
    pub headers: Option<RawHeaders>,
    pub body: Option<Payload>,
}

// ── HostRequest ──────────────────────────────────────────────────────────────

/// Every inbound shape the gateway accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    Object(RequestObject),
    Mapping(Map<String, Value>),
}

impl HostRequest {
    /// Wrap a decoded JSON event. Anything that is not an object is treated as
    /// an empty mapping.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Mapping(map),
            other => {
                debug!(kind = json_kind(&other), "Host event is not an object; using defaults");
                Self::Mapping(Map::new())
            }
        }
    }

    /// Fold any host shape into the canonical request. Never fails.
    pub fn normalize(self) -> InboundRequest {
        let object = match self {
            Self::Object(object) => object,
            Self::Mapping(map) => object_from_mapping(map),
        };
        normalize_object(object)
    }
}

impl From<RequestObject> for HostRequest {
    fn from(object: RequestObject) -> Self {
        Self::Object(object)
    }
}

impl From<Map<String, Value>> for HostRequest {
    fn from(map: Map<String, Value>) -> Self {
        Self::Mapping(map)
    }
}

const METHOD_KEYS: &[&str] = &["method", "httpMethod"];
const PATH_KEYS: &[&str] = &["path", "rawPath"];
const QUERY_STRING_KEYS: &[&str] = &["query_string", "queryString", "rawQueryString"];
const QUERY_PARAM_KEYS: &[&str] = &[
    "queryStringParameters",
    "multiValueQueryStringParameters",
    "query",
];

fn normalize_object(object: RequestObject) -> InboundRequest {
    let (path_field, path_query) = match object.path.as_deref().filter(|p| !p.is_empty()) {
        Some(raw) => {
            let (path, query) = split_path(raw);
            (Some(path), query)
        }
        None => (None, None),
    };
    let (url_path, url_query) = match object.url.as_deref().and_then(split_url) {
        Some((path, query)) => (Some(path), query),
        None => (None, None),
    };

    let path = path_field
        .or(url_path)
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| InboundRequest::DEFAULT_PATH.to_string());

    // explicit field, then structured params, then `path?query`, then the URL
    let query = object
        .query_string
        .map(Payload::into_text_lossy)
        .map(|q| q.trim_start_matches('?').to_string())
        .filter(|q| !q.is_empty())
        .or_else(|| {
            object
                .query_params
                .map(|params| params.to_query_string())
                .filter(|q| !q.is_empty())
        })
        .or(path_query.filter(|q| !q.is_empty()))
        .or(url_query.filter(|q| !q.is_empty()))
        .unwrap_or_default();

    let mut builder = InboundRequest::builder()
        .path(path)
        .query_string(query)
        .headers(
            object
                .headers
                .map(RawHeaders::into_header_map)
                .unwrap_or_default(),
        )
        .body(object.body.map(Payload::into_bytes).unwrap_or_default());

    if let Some(method) = object.method {
        builder = builder.method(method);
    }

    builder.build()
}

/// Split `path?query`; a bare path has no query.
fn split_path(raw: &str) -> (String, Option<String>) {
    match raw.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (raw.to_string(), None),
    }
}

/// Path and query of a full or origin-relative URL, taken verbatim.
///
/// Like a `path` field, the URL's path is neither normalized nor
/// percent-decoded; the application sees what the client sent.
fn split_url(raw: &str) -> Option<(String, Option<String>)> {
    let raw = raw.split_once('#').map_or(raw, |(before, _)| before);

    let target = match raw.split_once("://") {
        Some((_, rest)) => {
            if let Err(e) = Url::parse(raw) {
                debug!(url = raw, error = %e, "Ignoring unparseable request URL");
                return None;
            }
            rest.find(['/', '?']).map_or("", |start| &rest[start..])
        }
        None => raw,
    };

    let (path, query) = split_path(target);
    let path = if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    };
    Some((path, query))
}

fn object_from_mapping(map: Map<String, Value>) -> RequestObject {
    let base64_body = map
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    RequestObject {
        method: first_present(&map, METHOD_KEYS).and_then(scalar_string),
        path: first_present(&map, PATH_KEYS).and_then(scalar_string),
        url: map.get("url").and_then(scalar_string),
        query_string: first_present(&map, QUERY_STRING_KEYS).and_then(payload_from_value),
        query_params: first_present(&map, QUERY_PARAM_KEYS).and_then(query_params_from_value),
        headers: map.get("headers").and_then(headers_from_value),
        body: map
            .get("body")
            .and_then(payload_from_value)
            .map(|body| if base64_body { decode_base64(body) } else { body }),
    }
}

/// The first key whose value is present and not `null`.
fn first_present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            debug!(kind = json_kind(other), "Ignoring non-scalar request field");
            None
        }
    }
}

fn payload_from_value(value: &Value) -> Option<Payload> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Payload::Text(s.clone())),
        Value::Array(items) => {
            let bytes: Option<Vec<u8>> = items
                .iter()
                .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
                .collect();
            if bytes.is_none() {
                debug!("Ignoring array payload that is not a byte list");
            }
            bytes.map(Payload::Bytes)
        }
        other => scalar_string(other).map(Payload::Text),
    }
}

fn query_params_from_value(value: &Value) -> Option<QueryParams> {
    let Value::Object(map) = value else {
        debug!(kind = json_kind(value), "Ignoring non-object query parameters");
        return None;
    };

    Some(
        map.iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    Value::Array(items) => QueryValue::Multi(
                        items.iter().filter_map(scalar_string).collect(),
                    ),
                    Value::Null => return None,
                    other => QueryValue::Single(scalar_string(other)?),
                };
                Some((key.clone(), value))
            })
            .collect(),
    )
}

fn headers_from_value(value: &Value) -> Option<RawHeaders> {
    match value {
        Value::Object(map) => Some(RawHeaders::Pairs(
            map.iter()
                .filter_map(|(name, value)| {
                    let value = match value {
                        // multi-value header shapes fold into one comma-joined value
                        Value::Array(items) => items
                            .iter()
                            .filter_map(scalar_string)
                            .collect::<Vec<_>>()
                            .join(", "),
                        other => scalar_string(other)?,
                    };
                    Some((name.clone(), value))
                })
                .collect(),
        )),
        Value::Array(items) => Some(RawHeaders::Pairs(
            items
                .iter()
                .filter_map(|item| match item.as_array().map(Vec::as_slice) {
                    Some([name, value]) => Some((scalar_string(name)?, scalar_string(value)?)),
                    _ => {
                        debug!("Ignoring malformed header pair");
                        None
                    }
                })
                .collect(),
        )),
        Value::Null => None,
        other => {
            debug!(kind = json_kind(other), "Ignoring headers of unexpected shape");
            None
        }
    }
}

fn decode_base64(body: Payload) -> Payload {
    let Payload::Text(text) = body else {
        return body;
    };
    match base64::engine::general_purpose::STANDARD.decode(text.as_bytes()) {
        Ok(bytes) => Payload::Bytes(bytes),
        Err(e) => {
            warn!(error = %e, "Body flagged as base64 but failed to decode; using it verbatim");
            Payload::Text(text)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── HostResponse ─────────────────────────────────────────────────────────────

/// Which outbound shape the host expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    /// A response object carrying status, headers and raw body bytes.
    #[default]
    Structured,
    /// A `statusCode` / `headers` / `body` mapping with a text body.
    Mapping,
}

/// A response in the shape handed back to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostResponse {
    Structured(OutboundResponse),
    Mapping(Value),
}

impl HostResponse {
    pub fn from_outbound(response: OutboundResponse, shape: ResponseShape) -> Self {
        match shape {
            ResponseShape::Structured => Self::Structured(response),
            ResponseShape::Mapping => Self::Mapping(response.to_mapping()),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Structured(response) => Some(response.status()),
            Self::Mapping(value) => value
                .get("statusCode")
                .and_then(Value::as_u64)
                .and_then(|code| u16::try_from(code).ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> InboundRequest {
        HostRequest::from_json(value).normalize()
    }

    #[test]
    fn empty_mapping_gets_defaults() {
        let request = normalize(json!({}));
        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/");
        assert_eq!(request.query_string(), "");
        assert!(request.body().is_empty());
    }

    #[test]
    fn non_object_event_gets_defaults() {
        let request = normalize(json!("not a request"));
        assert_eq!(request.path(), "/");
    }

    #[test]
    fn url_supplies_path_and_query() {
        let request = normalize(json!({ "url": "https://example.com/news/?page=2" }));
        assert_eq!(request.path(), "/news/");
        assert_eq!(request.query_string(), "page=2");
    }

    #[test]
    fn relative_url_is_accepted() {
        let request = normalize(json!({ "url": "/contact?ref=home" }));
        assert_eq!(request.path(), "/contact");
        assert_eq!(request.query_string(), "ref=home");
    }

    #[test]
    fn explicit_query_string_beats_params_and_url() {
        let request = normalize(json!({
            "url": "/x?from=url",
            "queryString": "from=explicit",
            "queryStringParameters": { "from": "params" },
        }));
        assert_eq!(request.query_string(), "from=explicit");
    }

    #[test]
    fn params_beat_url_query() {
        let request = normalize(json!({
            "url": "/x?from=url",
            "queryStringParameters": { "tag": ["a", "b"], "page": 3 },
        }));
        assert_eq!(request.query_string(), "page=3&tag=a&tag=b");
    }

    #[test]
    fn url_query_applies_when_path_is_given() {
        let request = normalize(json!({
            "path": "/news",
            "url": "https://example.com/news?page=2",
        }));
        assert_eq!(request.path(), "/news");
        assert_eq!(request.query_string(), "page=2");
    }

    #[test]
    fn path_query_beats_url_query() {
        let request = normalize(json!({ "path": "/news?page=3", "url": "/news?page=2" }));
        assert_eq!(request.query_string(), "page=3");
    }

    #[test]
    fn empty_params_fall_back_to_url_query() {
        let request = normalize(json!({
            "url": "/x?from=url",
            "queryStringParameters": { "a": [] },
        }));
        assert_eq!(request.query_string(), "from=url");
    }

    #[test]
    fn url_and_path_fields_are_kept_verbatim() {
        let from_url = normalize(json!({ "url": "https://example.com/a/../b c?x=1#top" }));
        let from_path = normalize(json!({ "path": "/a/../b c?x=1" }));
        assert_eq!(from_url.path(), "/a/../b c");
        assert_eq!(from_url.path(), from_path.path());
        assert_eq!(from_url.query_string(), "x=1");
    }

    #[test]
    fn bare_origin_url_is_root() {
        let request = normalize(json!({ "url": "https://example.com" }));
        assert_eq!(request.path(), "/");
        assert_eq!(normalize(json!({ "url": "contact" })).path(), "/contact");
    }

    #[test]
    fn unparseable_absolute_url_is_ignored() {
        let request = normalize(json!({ "url": "http://[::1/broken?x=1" }));
        assert_eq!(request.path(), "/");
        assert_eq!(request.query_string(), "");
    }

    #[test]
    fn path_with_query_is_split() {
        let request = normalize(json!({ "path": "/about?x=1" }));
        assert_eq!(request.path(), "/about");
        assert_eq!(request.query_string(), "x=1");
    }

    #[test]
    fn aliases_are_honoured() {
        let request = normalize(json!({ "httpMethod": "POST", "rawPath": "/submit" }));
        assert_eq!(request.method(), "POST");
        assert_eq!(request.path(), "/submit");
    }

    #[test]
    fn header_pairs_collapse_last_wins() {
        let request = normalize(json!({
            "headers": [["X-Token", "one"], ["x-token", "two"]],
        }));
        assert_eq!(request.header("X-TOKEN"), Some("two"));
    }

    #[test]
    fn multi_value_headers_are_joined() {
        let request = normalize(json!({ "headers": { "accept": ["text/html", "*/*"] } }));
        assert_eq!(request.header("Accept"), Some("text/html, */*"));
    }

    #[test]
    fn body_shapes() {
        assert_eq!(normalize(json!({ "body": "héllo" })).body(), "héllo".as_bytes());
        assert_eq!(normalize(json!({ "body": [104, 105] })).body(), b"hi");
        assert!(normalize(json!({ "body": null })).body().is_empty());
    }

    #[test]
    fn base64_body_is_decoded() {
        let request = normalize(json!({ "body": "aGk=", "isBase64Encoded": true }));
        assert_eq!(request.body(), b"hi");
    }

    #[test]
    fn object_shape_matches_mapping_shape() {
        let object = RequestObject {
            method: Some("PUT".into()),
            url: Some("https://example.com/a?b=c".into()),
            headers: Some(RawHeaders::Map(BTreeMap::from([(
                "Host".to_string(),
                "example.com".to_string(),
            )]))),
            body: Some(Payload::from(b"raw".as_slice())),
            ..RequestObject::default()
        };
        let from_object = HostRequest::from(object).normalize();
        let from_mapping = normalize(json!({
            "method": "PUT",
            "url": "https://example.com/a?b=c",
            "headers": { "Host": "example.com" },
            "body": [114, 97, 119],
        }));
        assert_eq!(from_object, from_mapping);
    }

    #[test]
    fn byte_query_string_is_decoded() {
        let object = RequestObject {
            query_string: Some(Payload::Bytes(b"q=%C3%A9".to_vec())),
            ..RequestObject::default()
        };
        assert_eq!(HostRequest::from(object).normalize().query_string(), "q=%C3%A9");
    }

    #[test]
    fn mapping_shape_status_is_readable() {
        let response = OutboundResponse::new(404, HeaderMap::new(), b"nope".to_vec());
        let shaped = HostResponse::from_outbound(response, ResponseShape::Mapping);
        assert_eq!(shaped.status(), Some(404));
    }
}
