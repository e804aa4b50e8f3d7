//! The per-request environ handed to the application.
//!
//! CGI-style string variables live in one map; the gateway extensions
//! (protocol version, URL scheme, input and error streams, process model
//! flags) are typed fields next to it.

use std::collections::BTreeMap;
use std::io::{self, Cursor, Write};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Variable names defined by the calling convention.
pub mod keys {
    pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
    pub const SCRIPT_NAME: &str = "SCRIPT_NAME";
    pub const PATH_INFO: &str = "PATH_INFO";
    pub const QUERY_STRING: &str = "QUERY_STRING";
    pub const CONTENT_TYPE: &str = "CONTENT_TYPE";
    pub const CONTENT_LENGTH: &str = "CONTENT_LENGTH";
    pub const SERVER_NAME: &str = "SERVER_NAME";
    pub const SERVER_PORT: &str = "SERVER_PORT";
    pub const SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";

    /// Prefix for every header other than the two content headers.
    pub const HTTP_PREFIX: &str = "HTTP_";
}

/// Concurrency model advertised to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessModel {
    pub multithread: bool,
    pub multiprocess: bool,
    pub run_once: bool,
}

impl Default for ProcessModel {
    fn default() -> Self {
        Self {
            multithread: false,
            multiprocess: true,
            run_once: false,
        }
    }
}

/// Environ key for an HTTP header name.
///
/// Uppercase, `-` becomes `_`, and everything except `CONTENT_TYPE` and
/// `CONTENT_LENGTH` is prefixed with `HTTP_`.
pub fn header_key(name: &str) -> String {
    let key = name.to_ascii_uppercase().replace('-', "_");
    if key == keys::CONTENT_TYPE || key == keys::CONTENT_LENGTH {
        key
    } else {
        format!("{}{key}", keys::HTTP_PREFIX)
    }
}

/// Request environment for one application call.
#[derive(Debug)]
pub struct Environ {
    vars: BTreeMap<String, String>,
    url_scheme: String,
    input: Cursor<Vec<u8>>,
    errors: ErrorStream,
    process: ProcessModel,
}

impl Environ {
    /// Calling-convention version advertised to applications.
    pub const VERSION: (u8, u8) = (1, 0);

    pub fn new(url_scheme: impl Into<String>, input: Vec<u8>, process: ProcessModel) -> Self {
        Self {
            vars: BTreeMap::new(),
            url_scheme: url_scheme.into(),
            input: Cursor::new(input),
            errors: ErrorStream::default(),
            process,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Look up a request header by its HTTP name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.get(&header_key(name))
    }

    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn method(&self) -> &str {
        self.get(keys::REQUEST_METHOD).unwrap_or("GET")
    }

    pub fn path_info(&self) -> &str {
        self.get(keys::PATH_INFO).unwrap_or("/")
    }

    pub fn url_scheme(&self) -> &str {
        &self.url_scheme
    }

    pub fn version(&self) -> (u8, u8) {
        Self::VERSION
    }

    pub fn process_model(&self) -> ProcessModel {
        self.process
    }

    /// Request body stream.
    pub fn input(&mut self) -> &mut Cursor<Vec<u8>> {
        &mut self.input
    }

    /// Diagnostic stream; lines written here go to the operational log.
    pub fn errors(&mut self) -> &mut ErrorStream {
        &mut self.errors
    }
}

/// Line-buffered writer that forwards application diagnostics to `tracing`.
#[derive(Debug, Default)]
pub struct ErrorStream {
    pending: Vec<u8>,
}

impl ErrorStream {
    fn emit(line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            warn!(target: "pylon::app", "{line}");
        }
    }
}

impl Write for ErrorStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            Self::emit(&line[..line.len() - 1]);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            Self::emit(&rest);
        }
        Ok(())
    }
}

impl Drop for ErrorStream {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn header_naming_law() {
        assert_eq!(header_key("X-Custom-Token"), "HTTP_X_CUSTOM_TOKEN");
        assert_eq!(header_key("Content-Type"), "CONTENT_TYPE");
        assert_eq!(header_key("content-length"), "CONTENT_LENGTH");
        assert_eq!(header_key("host"), "HTTP_HOST");
    }

    #[test]
    fn input_stream_reads_body() {
        let mut environ = Environ::new("https", b"payload".to_vec(), ProcessModel::default());
        let mut body = String::new();
        environ.input().read_to_string(&mut body).unwrap();
        assert_eq!(body, "payload");
    }

    #[test]
    fn header_lookup_uses_naming_law() {
        let mut environ = Environ::new("https", Vec::new(), ProcessModel::default());
        environ.insert("HTTP_X_TRACE", "abc");
        assert_eq!(environ.header("x-trace"), Some("abc"));
    }

    #[test]
    fn error_stream_buffers_partial_lines() {
        let mut stream = ErrorStream::default();
        stream.write_all(b"first line\nsecond").unwrap();
        assert_eq!(stream.pending, b"second");
        stream.flush().unwrap();
        assert!(stream.pending.is_empty());
    }

    #[test]
    fn default_process_model() {
        let model = ProcessModel::default();
        assert!(!model.multithread);
        assert!(model.multiprocess);
        assert!(!model.run_once);
    }
}
