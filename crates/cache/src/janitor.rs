use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::watch;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::debug;

use crate::cache::Shared;

/// Estado observável do janitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JanitorState {
    /// Aguardando o próximo tick, sem tocar no store.
    Running,
    /// Varrendo o store com acesso exclusivo.
    Sweeping,
    /// Encerrado via `close()` ou drop do último handle. Terminal.
    Stopped,
}

#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub fn new(state: JanitorState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub fn load(&self) -> JanitorState {
        match self.0.load(Ordering::Acquire) {
            0 => JanitorState::Running,
            1 => JanitorState::Sweeping,
            _ => JanitorState::Stopped,
        }
    }

    pub fn store(&self, state: JanitorState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Background task que purga chaves expiradas a cada `interval`.
///
/// Guarda apenas um `Weak` do estado compartilhado: o janitor nunca mantém o
/// cache vivo. Termina quando recebe o sinal de shutdown ou quando o último
/// handle some.
pub(crate) async fn run<K, V>(
    shared: Weak<Shared<K, V>>,
    state: Arc<StateCell>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    K: Eq + Hash,
{
    debug!(?interval, "janitor iniciado");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // O primeiro tick é imediato; a primeira varredura espera um intervalo.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                state.store(JanitorState::Sweeping);
                let removed = shared.sweep();
                state.store(JanitorState::Running);
                if removed > 0 {
                    debug!(removed, remaining = shared.data.len(), "chaves expiradas removidas");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    state.store(JanitorState::Stopped);
    debug!("janitor encerrado");
}
