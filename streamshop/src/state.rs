// streamshop/src/state.rs

use crate::config::AppConfig;
use crate::errors::Result;
use crate::gateway::PaymentGateway;
use crate::pipelines::Flows;
use crate::reconciler::ReconcileQueue;
use crate::store::Store;
use std::sync::Arc;

/// External collaborators, constructed once at boot and injected everywhere.
#[derive(Clone)]
pub struct Services {
  pub store: Arc<dyn Store>,
  /// `None` puts checkout in mock mode.
  pub gateway: Option<Arc<dyn PaymentGateway>>,
}

impl Services {
  pub fn is_mock(&self) -> bool {
    self.gateway.is_none()
  }
}

#[derive(Clone)]
pub struct AppState {
  pub services: Services,
  pub config: Arc<AppConfig>,
  pub flows: Arc<Flows>,
  pub reconciler: ReconcileQueue,
}

impl AppState {
  /// Builds the pipelines and starts the reconcile worker. Must be called
  /// from within a tokio runtime.
  pub fn build(config: AppConfig, services: Services) -> Result<Self> {
    let flows = Arc::new(Flows::build()?);
    let reconciler = ReconcileQueue::start(services.clone(), flows.clone());
    Ok(Self {
      services,
      config: Arc::new(config),
      flows,
      reconciler,
    })
  }
}
