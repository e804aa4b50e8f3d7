//! Request Adapter - projects a canonical request into the environ.

use tracing::{debug, instrument};

use crate::{
    application::config::{GatewayConfig, ServerConfig},
    domain::{Environ, HeaderMap, InboundRequest, ProcessModel, header_key, keys},
};

/// Builds a fresh [`Environ`] for every request.
///
/// Holds only read-only configuration, so one adapter can serve any number of
/// concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct RequestAdapter {
    server: ServerConfig,
    process: ProcessModel,
}

impl RequestAdapter {
    pub fn new(server: ServerConfig, process: ProcessModel) -> Self {
        Self { server, process }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.server.clone(), config.process)
    }

    /// Project `request` into the environ consumed by the application.
    ///
    /// Never fails: every variable has a default. `CONTENT_LENGTH` is the body
    /// length and never comes from the request headers.
    #[instrument(level = "debug", skip_all, fields(method = request.method(), path = request.path()))]
    pub fn adapt(&self, request: &InboundRequest) -> Environ {
        let headers = request.headers();

        let scheme = non_empty(headers.get("x-forwarded-proto"))
            .unwrap_or(self.server.default_scheme.as_str());
        let (server_name, server_port) = self.server_address(headers);

        let mut environ = Environ::new(scheme, request.body().to_vec(), self.process);
        environ.insert(keys::REQUEST_METHOD, request.method());
        environ.insert(keys::SCRIPT_NAME, self.server.script_name.as_str());
        environ.insert(keys::PATH_INFO, request.path());
        environ.insert(keys::QUERY_STRING, request.query_string());
        environ.insert(
            keys::CONTENT_TYPE,
            headers.get("content-type").unwrap_or_default(),
        );
        environ.insert(keys::CONTENT_LENGTH, request.body().len().to_string());
        environ.insert(keys::SERVER_NAME, server_name);
        environ.insert(keys::SERVER_PORT, server_port);
        environ.insert(keys::SERVER_PROTOCOL, self.server.protocol.as_str());

        for (name, value) in headers.iter() {
            let key = header_key(name);
            // both already set above under their bare names
            if key == keys::CONTENT_TYPE || key == keys::CONTENT_LENGTH {
                continue;
            }
            environ.insert(key, value);
        }

        debug!(vars = environ.len(), scheme, "Environ built");
        environ
    }

    /// `(SERVER_NAME, SERVER_PORT)` from the `host` header and fallbacks.
    fn server_address(&self, headers: &HeaderMap) -> (String, String) {
        let fallback_port = || {
            non_empty(headers.get("x-forwarded-port"))
                .unwrap_or(self.server.default_port.as_str())
                .to_string()
        };

        match non_empty(headers.get("host").map(str::trim)) {
            Some(host) => {
                let (name, port) = split_host(host);
                let name = if name.is_empty() {
                    self.server.default_name.clone()
                } else {
                    name.to_string()
                };
                (name, port.map(str::to_string).unwrap_or_else(fallback_port))
            }
            None => (self.server.default_name.clone(), fallback_port()),
        }
    }
}

/// Split a host header on its first colon.
///
/// A bracketed IPv6 literal keeps its brackets and splits after `]`.
fn split_host(host: &str) -> (&str, Option<&str>) {
    if host.starts_with('[') {
        if let Some(end) = host.find(']') {
            let port = host[end + 1..].strip_prefix(':');
            return (&host[..=end], port.filter(|p| !p.is_empty()));
        }
    }
    match host.split_once(':') {
        Some((name, port)) => (name, Some(port).filter(|p| !p.is_empty())),
        None => (host, None),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
