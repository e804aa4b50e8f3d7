//! Response Collector - drives one application call to a complete response.
//!
//! The collector captures whatever the application reports through the
//! start-response callback, drains the body, and guarantees the body's
//! `close` hook runs exactly once. Anything that goes wrong along the way,
//! including a panic inside the application, becomes a 500.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, warn};

use crate::{
    application::{
        error::ApplicationError,
        ports::{Application, ResponseBody, StartResponse},
    },
    domain::{Environ, HeaderMap, OutboundResponse, ResponseStatus},
};

/// Status used when the application never calls start-response.
const DEFAULT_STATUS: u16 = 200;

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseCollector;

impl ResponseCollector {
    pub fn new() -> Self {
        Self
    }

    /// Call `app` and collect its complete response.
    ///
    /// Never fails and never panics outward: every failure is logged and
    /// turned into [`OutboundResponse::server_error`].
    pub fn invoke(&self, environ: &mut Environ, app: &dyn Application) -> OutboundResponse {
        match panic::catch_unwind(AssertUnwindSafe(|| self.try_invoke(environ, app))) {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(error = %e, "Application request failed");
                OutboundResponse::server_error(e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(panic = %message, "Application panicked");
                OutboundResponse::server_error(format!("application panicked: {message}"))
            }
        }
    }

    fn try_invoke(
        &self,
        environ: &mut Environ,
        app: &dyn Application,
    ) -> Result<OutboundResponse, ApplicationError> {
        let mut recorder = StatusRecorder::default();
        let body = app
            .call(environ, &mut recorder)
            .map_err(|e| application_failed(&*e))?;

        let bytes = drain(BodyGuard { body })?;
        let (status, headers) = recorder.finish()?;

        debug!(status, bytes = bytes.len(), "Response collected");
        Ok(OutboundResponse::new(
            status,
            HeaderMap::from_pairs(headers),
            bytes,
        ))
    }
}

/// Start-response callback that keeps the most recent call.
#[derive(Debug, Default)]
struct StatusRecorder {
    status: Option<ResponseStatus>,
    calls: usize,
}

impl StatusRecorder {
    fn finish(self) -> Result<(u16, Vec<(String, String)>), ApplicationError> {
        match self.status {
            Some(status) => Ok((status.code()?, status.headers)),
            None => Ok((DEFAULT_STATUS, Vec::new())),
        }
    }
}

impl StartResponse for StatusRecorder {
    fn start_response(&mut self, status: &str, headers: Vec<(String, String)>) {
        self.calls += 1;
        if self.calls > 1 {
            debug!(calls = self.calls, status, "start_response called again, last call wins");
        }
        self.status = Some(ResponseStatus::new(status, headers));
    }
}

/// Owns the response body and closes it when dropped.
struct BodyGuard {
    body: Box<dyn ResponseBody>,
}

impl Drop for BodyGuard {
    fn drop(&mut self) {
        // may run while unwinding; a second panic here would abort
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.body.close())) {
            warn!(panic = %panic_message(payload.as_ref()), "Response body close panicked");
        }
    }
}

fn drain(mut guard: BodyGuard) -> Result<Vec<u8>, ApplicationError> {
    let mut out = Vec::new();
    while let Some(item) = guard.body.next() {
        let chunk = item.map_err(|e| application_failed(&*e))?;
        out.extend(chunk.into_bytes());
    }
    Ok(out)
}

fn application_failed(e: &(dyn std::error::Error + Send + Sync + 'static)) -> ApplicationError {
    let mut reason = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        debug!(cause = %cause, "Application error cause");
        source = cause.source();
    }
    if reason.is_empty() {
        reason = "unknown error".into();
    }
    ApplicationError::ApplicationFailed { reason }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
