// streamshop/src/reconciler.rs

//! Background queue for webhook-triggered payment reconciliation.
//!
//! Webhook handlers enqueue a payment id and return immediately. A single
//! worker task drains the queue and runs the reconcile pipeline for each id.
//! Failures are logged and dropped: there is no retry.

use crate::pipelines::contexts::{ReconcileCtxData, ReconcileOutcome};
use crate::pipelines::Flows;
use crate::state::Services;
use shopflow::ContextData;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, info_span, warn, Instrument};

const QUEUE_CAPACITY: usize = 1024;

struct ReconcileJob {
  payment_id: String,
  reply: oneshot::Sender<ReconcileOutcome>,
}

/// Resolves to the outcome of one enqueued reconciliation.
///
/// Dropping the receipt does not cancel the job.
pub struct ReconcileReceipt(oneshot::Receiver<ReconcileOutcome>);

impl ReconcileReceipt {
  pub async fn outcome(self) -> ReconcileOutcome {
    self
      .0
      .await
      .unwrap_or_else(|_| ReconcileOutcome::Failed("reconcile worker stopped".to_string()))
  }
}

#[derive(Clone)]
pub struct ReconcileQueue {
  tx: mpsc::Sender<ReconcileJob>,
}

impl ReconcileQueue {
  /// Spawns the worker on the current tokio runtime.
  pub fn start(services: Services, flows: Arc<Flows>) -> Self {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    let worker = ReconcileWorker { services, flows };
    tokio::spawn(worker.run(rx));
    Self { tx }
  }

  pub fn enqueue(&self, payment_id: impl Into<String>) -> ReconcileReceipt {
    let (reply, receipt) = oneshot::channel();
    let job = ReconcileJob {
      payment_id: payment_id.into(),
      reply,
    };
    if let Err(e) = self.tx.try_send(job) {
      let (reason, job) = match e {
        mpsc::error::TrySendError::Full(job) => ("queue full", job),
        mpsc::error::TrySendError::Closed(job) => ("worker stopped", job),
      };
      warn!(payment_id = %job.payment_id, reason, "Dropping reconcile job.");
      let _ = job.reply.send(ReconcileOutcome::Failed(reason.to_string()));
    }
    ReconcileReceipt(receipt)
  }
}

struct ReconcileWorker {
  services: Services,
  flows: Arc<Flows>,
}

impl ReconcileWorker {
  async fn run(self, mut rx: mpsc::Receiver<ReconcileJob>) {
    info!("Reconcile worker started.");
    while let Some(job) = rx.recv().await {
      let span = info_span!("reconcile", payment_id = %job.payment_id);
      let outcome = self.process(&job.payment_id).instrument(span).await;
      let _ = job.reply.send(outcome);
    }
    info!("Reconcile worker stopped.");
  }

  async fn process(&self, payment_id: &str) -> ReconcileOutcome {
    if self.services.is_mock() {
      info!("No payment gateway configured, skipping reconciliation.");
      return ReconcileOutcome::Skipped;
    }

    let ctx = ContextData::new(ReconcileCtxData::new(self.services.clone(), payment_id));
    let outcome = match self.flows.reconcile.run(ctx.clone()).await {
      Ok(_) => ctx
        .read()
        .outcome
        .clone()
        .unwrap_or_else(|| ReconcileOutcome::Failed("pipeline finished without an outcome".to_string())),
      Err(e) => ReconcileOutcome::Failed(e.to_string()),
    };

    match &outcome {
      ReconcileOutcome::Updated { order_id, status } => {
        info!(%order_id, status = status.as_str(), "Reconciliation applied.")
      }
      ReconcileOutcome::Failed(reason) => error!(%reason, "Reconciliation failed."),
      other => warn!(outcome = ?other, "Reconciliation dropped."),
    }
    outcome
  }
}
