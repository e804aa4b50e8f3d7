//! Gateway - the entry point the hosting platform calls per event.
//!
//! Owns the lazily built application, and for every request runs
//! normalize → adapt → invoke → shape.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use crate::{
    application::{
        config::GatewayConfig,
        error::ApplicationError,
        ports::{Application, ApplicationFactory},
        services::{
            request_adapter::RequestAdapter,
            response_collector::{ResponseCollector, panic_message},
        },
    },
    domain::{HostRequest, HostResponse, InboundRequest, OutboundResponse},
};

type InitOutcome = Result<Arc<dyn Application>, ApplicationError>;

/// Gateway between host events and the application callable.
///
/// The application is built on first use and the outcome, success or
/// failure, is kept for the gateway's lifetime. Concurrent first requests
/// wait for a single initialization. Request handling itself shares no
/// mutable state.
pub struct Gateway {
    config: GatewayConfig,
    factory: Box<dyn ApplicationFactory>,
    application: OnceLock<InitOutcome>,
    adapter: RequestAdapter,
    collector: ResponseCollector,
}

impl Gateway {
    pub fn new(config: GatewayConfig, factory: Box<dyn ApplicationFactory>) -> Self {
        let adapter = RequestAdapter::from_config(&config);
        Self {
            config,
            factory,
            application: OnceLock::new(),
            adapter,
            collector: ResponseCollector::new(),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The application, building it on first call.
    ///
    /// A failed build is returned again on every later call; the factory is
    /// never retried.
    pub fn application(&self) -> InitOutcome {
        self.application.get_or_init(|| self.initialize()).clone()
    }

    /// Whether the application has been built (or failed to build).
    pub fn is_initialized(&self) -> bool {
        self.application.get().is_some()
    }

    fn initialize(&self) -> InitOutcome {
        let settings = &self.config.settings;
        info!(settings = %settings.module, "Initializing application");

        match panic::catch_unwind(AssertUnwindSafe(|| self.factory.build(settings))) {
            Ok(Ok(app)) => {
                info!("Application ready");
                Ok(app)
            }
            Ok(Err(e)) => {
                error!(error = %e, "Application initialization failed");
                Err(ApplicationError::Initialization {
                    reason: e.to_string(),
                })
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(panic = %message, "Application factory panicked");
                Err(ApplicationError::Initialization {
                    reason: format!("factory panicked: {message}"),
                })
            }
        }
    }

    /// Handle one host event and answer in the configured shape.
    pub fn handle(&self, request: HostRequest) -> HostResponse {
        let inbound = request.normalize();
        let response = self.handle_inbound(&inbound);
        HostResponse::from_outbound(response, self.config.response_shape)
    }

    /// Handle an already normalized request.
    ///
    /// Always produces a response; failures come back as 500s.
    pub fn handle_inbound(&self, request: &InboundRequest) -> OutboundResponse {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "request",
            id = %request_id,
            method = request.method(),
            path = request.path()
        );
        let _entered = span.enter();

        let app = match self.application() {
            Ok(app) => app,
            Err(e) => {
                warn!(error = %e, "Application unavailable");
                return OutboundResponse::server_error(e.to_string());
            }
        };

        let mut environ = self.adapter.adapt(request);
        let response = self.collector.invoke(&mut environ, app.as_ref());

        info!(
            status = response.status(),
            bytes = response.body().len(),
            "Request handled"
        );
        response
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}
