pub mod admin;
pub mod health;
pub mod legacy;
pub mod metrics;
pub mod orders;

pub use admin::*;
pub use health::*;
pub use legacy::*;
pub use metrics::*;
pub use orders::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use worker::Env;

use crate::services::core::infrastructure::D1Service;
use crate::services::core::metrics::MetricsResolver;
use crate::services::core::orders::OrderOverlayService;
use crate::utils::EngineConfig;

static SCHEMA_READY: AtomicBool = AtomicBool::new(false);

/// Build the D1 service, running the schema migration once per isolate
pub(crate) async fn init_d1(env: &Env) -> worker::Result<Arc<D1Service>> {
    let service = D1Service::new(env, EngineConfig::from_env(env))?;
    if !SCHEMA_READY.load(Ordering::Relaxed) {
        service.ensure_schema().await.map_err(worker::Error::from)?;
        SCHEMA_READY.store(true, Ordering::Relaxed);
    }
    Ok(Arc::new(service))
}

/// All callers resolve metrics through this one engine so the precedence
/// order stays identical on every endpoint.
pub(crate) fn build_resolver(d1: &Arc<D1Service>, env: &Env) -> MetricsResolver {
    MetricsResolver::new(
        d1.clone(),
        d1.clone(),
        d1.clone(),
        d1.clone(),
        EngineConfig::from_env(env),
    )
}

pub(crate) fn build_order_overlay(d1: &Arc<D1Service>, env: &Env) -> OrderOverlayService {
    OrderOverlayService::new(d1.clone(), d1.clone(), EngineConfig::from_env(env))
}
