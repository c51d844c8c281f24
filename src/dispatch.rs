//! Dispatcher: validate, resolve, invoke once, classify

use crate::{Error, GenerationRequest, GenerationResponse, Registry, Result};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};

/// Orchestrates one generation request end to end.
///
/// Holds no mutable state; a single instance serves concurrent requests.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Validate raw caller fields, then dispatch
    pub async fn generate(
        &self,
        input: &str,
        provider: &str,
        model: &str,
    ) -> Result<GenerationResponse> {
        let request = GenerationRequest::new(input, provider, model)
            .inspect_err(|e| warn!("Rejected request before dispatch: {}", e))?;
        self.dispatch(&request).await
    }

    /// Resolve the adapter and make exactly one bounded call.
    ///
    /// When the bound expires the call future is dropped, which releases its
    /// connection. A panic inside the adapter is reported as `Unexpected`.
    pub async fn dispatch(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let provider = request.provider();
        let adapter = self.registry.resolve(provider)?;
        let bound = adapter.timeout();

        let span = info_span!("dispatch", provider = provider.as_str(), model = request.model());
        async move {
            let started = Instant::now();
            let call = AssertUnwindSafe(adapter.generate(request.input(), request.model()))
                .catch_unwind();

            let outcome = match tokio::time::timeout(bound, call).await {
                Err(_) => Err(Error::Timeout {
                    provider,
                    after: bound,
                }),
                Ok(Err(panic)) => Err(Error::Unexpected(format!(
                    "{} adapter panicked: {}",
                    provider,
                    panic_message(panic.as_ref())
                ))),
                Ok(Ok(result)) => result,
            };

            let elapsed = started.elapsed();
            match outcome {
                Ok(output) => {
                    info!("Generation succeeded in {:?} ({} chars)", elapsed, output.len());
                    Ok(GenerationResponse { output })
                }
                Err(e @ Error::Unexpected(_)) => {
                    error!("Generation failed after {:?}: {}", elapsed, e);
                    Err(e)
                }
                Err(e) => {
                    warn!(
                        "Generation failed after {:?} [{}]: {}",
                        elapsed,
                        e.classification(),
                        e
                    );
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
