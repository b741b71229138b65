//! Simulated confirmation timers.
//!
//! Stand-ins for waiting on a chain: each pending flow step sleeps for its
//! configured delay and then reports a random transaction hash. Timers are
//! keyed by flow id so leaving a screen can cancel what it started.

use crate::app::event::{AppEvent, FlowId};
use crate::app::flow::PendingStep;
use crate::config::model::FlowConfig;
use rand::RngExt;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Random 32-byte transaction hash, `0x`-prefixed.
pub fn random_tx_hash() -> String {
    let mut rng = rand::rng();
    let digits: String = (0..64).map(|_| HEX[rng.random_range(0..HEX.len())] as char).collect();
    format!("0x{}", digits)
}

/// Shorten a hash for display: `0x1234...cdef`.
pub fn short_hash(hash: &str) -> String {
    if hash.len() <= 13 {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..6], &hash[hash.len() - 4..])
}

pub struct FlowTimers {
    event_tx: mpsc::UnboundedSender<AppEvent>,
    delays: FlowConfig,
    active: HashMap<FlowId, CancellationToken>,
    shutdown: CancellationToken,
}

impl FlowTimers {
    pub fn new(event_tx: mpsc::UnboundedSender<AppEvent>, delays: FlowConfig) -> Self {
        Self {
            event_tx,
            delays,
            active: HashMap::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn delay_for(&self, step: PendingStep) -> Duration {
        let ms = match step {
            PendingStep::Approve => self.delays.approve_ms,
            PendingStep::Deposit => self.delays.deposit_ms,
            PendingStep::Borrow => self.delays.borrow_ms,
        };
        Duration::from_millis(ms)
    }

    /// Confirm `step` of `flow_id` after its delay.
    pub fn schedule(&mut self, flow_id: FlowId, step: PendingStep) {
        let delay = self.delay_for(step);
        let token = self
            .active
            .entry(flow_id)
            .or_insert_with(|| self.shutdown.child_token())
            .clone();
        let event_tx = self.event_tx.clone();
        tracing::debug!(flow_id, step = step.label(), ?delay, "flow step scheduled");
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = event_tx.send(AppEvent::FlowStepCompleted {
                        flow_id,
                        step,
                        tx_hash: random_tx_hash(),
                    });
                }
            }
        });
    }

    /// Drop every pending step of `flow_id`.
    pub fn cancel(&mut self, flow_id: FlowId) {
        if let Some(token) = self.active.remove(&flow_id) {
            tracing::debug!(flow_id, "flow timers cancelled");
            token.cancel();
        }
    }

    #[cfg(test)]
    pub fn is_active(&self, flow_id: FlowId) -> bool {
        self.active.contains_key(&flow_id)
    }

    /// Report [`AppEvent::IdentityMinted`] after the identity delay.
    pub fn schedule_identity(&self) {
        let delay = Duration::from_millis(self.delays.identity_ms);
        let token = self.shutdown.child_token();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = event_tx.send(AppEvent::IdentityMinted);
                }
            }
        });
    }

    pub fn shutdown(&mut self) {
        self.active.clear();
        self.shutdown.cancel();
    }
}

impl Drop for FlowTimers {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    fn fast() -> FlowConfig {
        FlowConfig {
            identity_ms: 10,
            approve_ms: 10,
            deposit_ms: 10,
            borrow_ms: 10,
        }
    }

    #[test]
    fn test_tx_hash_shape() {
        let hash = random_tx_hash();
        assert_eq!(hash.len(), 66);
        assert!(hash.starts_with("0x"));
        assert!(hash[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(short_hash(&hash).len(), 13);
        assert_eq!(short_hash("0x12"), "0x12");
    }

    #[tokio::test]
    async fn test_step_completes_with_hash() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = FlowTimers::new(tx, fast());
        timers.schedule(3, PendingStep::Approve);
        let event = timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
        match event {
            AppEvent::FlowStepCompleted { flow_id, step, tx_hash } => {
                assert_eq!(flow_id, 3);
                assert_eq!(step, PendingStep::Approve);
                assert_eq!(tx_hash.len(), 66);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_step_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = FlowTimers::new(
            tx,
            FlowConfig {
                deposit_ms: 50,
                ..fast()
            },
        );
        timers.schedule(9, PendingStep::Deposit);
        assert!(timers.is_active(9));
        timers.cancel(9);
        assert!(!timers.is_active(9));
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_identity_mint() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timers = FlowTimers::new(tx, fast());
        timers.schedule_identity();
        let event = timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
        assert!(matches!(event, AppEvent::IdentityMinted));
    }
}
