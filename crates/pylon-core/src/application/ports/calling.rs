//! The application calling convention.
//!
//! An application is called once per request with the [`Environ`] and a
//! [`StartResponse`] callback. It reports its status and headers through the
//! callback and returns a [`ResponseBody`]: a lazy sequence of chunks with a
//! release hook. This contract is fixed; the gateway adapts to it, not the
//! other way round.

use std::sync::Arc;

use crate::application::Settings;
use crate::domain::Environ;

/// Error type applications report failures with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What an application call returns.
pub type AppResult = Result<Box<dyn ResponseBody>, BoxError>;

/// One piece of response output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Bytes(Vec<u8>),
    Text(String),
}

impl Chunk {
    /// Text chunks are encoded as UTF-8.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.into_bytes(),
        }
    }
}

impl From<&str> for Chunk {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Chunk {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for Chunk {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Chunk {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

/// Status-setter callback handed to the application.
///
/// `status` is a status line such as `"404 Not Found"`; `headers` are ordered
/// `(name, value)` pairs.
pub trait StartResponse {
    fn start_response(&mut self, status: &str, headers: Vec<(String, String)>);
}

/// Lazily produced response output.
///
/// Items are pulled until `None` or the first error. [`ResponseBody::close`]
/// is called exactly once afterwards, whatever happened while draining.
pub trait ResponseBody: Iterator<Item = Result<Chunk, BoxError>> + Send {
    /// Release resources held by the body.
    fn close(&mut self) {}
}

/// A body backed by chunks that are already in memory.
pub struct ChunkBody {
    chunks: std::vec::IntoIter<Result<Chunk, BoxError>>,
}

impl ChunkBody {
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Chunk>,
    {
        Self::from_results(chunks.into_iter().map(|c| Ok(c.into())))
    }

    pub fn empty() -> Self {
        Self::from_results(std::iter::empty())
    }

    /// Chunks interleaved with failures, for bodies that error part way.
    pub fn from_results(results: impl IntoIterator<Item = Result<Chunk, BoxError>>) -> Self {
        Self {
            chunks: results.into_iter().collect::<Vec<_>>().into_iter(),
        }
    }

    pub fn boxed(self) -> Box<dyn ResponseBody> {
        Box::new(self)
    }
}

impl Iterator for ChunkBody {
    type Item = Result<Chunk, BoxError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next()
    }
}

impl ResponseBody for ChunkBody {}

/// The application callable.
pub trait Application: Send + Sync {
    fn call(&self, environ: &mut Environ, start_response: &mut dyn StartResponse) -> AppResult;
}

impl<F> Application for F
where
    F: Fn(&mut Environ, &mut dyn StartResponse) -> AppResult + Send + Sync,
{
    fn call(&self, environ: &mut Environ, start_response: &mut dyn StartResponse) -> AppResult {
        self(environ, start_response)
    }
}

/// Builds the application callable from settings.
///
/// Called at most once per gateway; the outcome is cached either way.
pub trait ApplicationFactory: Send + Sync {
    fn build(&self, settings: &Settings) -> Result<Arc<dyn Application>, BoxError>;
}

impl<F> ApplicationFactory for F
where
    F: Fn(&Settings) -> Result<Arc<dyn Application>, BoxError> + Send + Sync,
{
    fn build(&self, settings: &Settings) -> Result<Arc<dyn Application>, BoxError> {
        self(settings)
    }
}
