use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::{Duration, Instant};
use tracing::trace;

use ttlcache_common::{CacheError, CacheResult, MAX_TTL};

use crate::config::CacheConfig;
use crate::entry::{Entry, Lookup};
use crate::janitor::{self, JanitorState, StateCell};

/// Estado compartilhado entre os handles e o janitor.
pub(crate) struct Shared<K, V> {
    pub data: DashMap<K, Entry<V>>,
    pub state: Arc<StateCell>,
    shutdown_tx: watch::Sender<bool>,
}

impl<K: Eq + Hash, V> Shared<K, V> {
    /// Remove todas as entradas expiradas em relação a um único `now`.
    ///
    /// `retain` trava cada shard exclusivamente enquanto itera, então a
    /// remoção durante a iteração é segura.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.data.retain(|_, entry| {
            let expired = entry.is_expired_at(now);
            if expired {
                removed += 1;
            }
            !expired
        });
        removed
    }
}

impl<K, V> Drop for Shared<K, V> {
    fn drop(&mut self) {
        // Último handle sumiu: avisa o janitor
        self.shutdown_tx.send_replace(true);
    }
}

/// Cache in-memory genérico com TTL por entrada.
///
/// Handle barato de clonar; todos os clones compartilham o mesmo store. Toda
/// operação roda sob o lock exclusivo do shard que contém a chave, então
/// operações na mesma chave são linearizadas. Um janitor em background
/// remove entradas expiradas a cada `sweep_interval`; entradas expiradas que
/// ainda não foram varridas já são invisíveis para `get` e `pop`.
///
/// ```rust,no_run
/// use std::time::Duration;
/// use ttlcache::TtlCache;
///
/// #[tokio::main]
/// async fn main() {
///     let cache = TtlCache::new();
///     cache.set("a", 1, Duration::from_millis(100));
///     assert_eq!(cache.get("a"), Some(1));
///     assert_eq!(cache.pop("a"), Some(1));
///     assert_eq!(cache.get("a"), None);
/// }
/// ```
pub struct TtlCache<K, V> {
    shared: Arc<Shared<K, V>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Cria um cache com a configuração padrão e inicia o janitor.
    ///
    /// # Panics
    ///
    /// Entra em pânico fora de um runtime Tokio. Use
    /// [`TtlCache::with_config`] para receber um erro no lugar.
    pub fn new() -> Self {
        let (cache, janitor) = Self::build(CacheConfig::default());
        tokio::spawn(janitor);
        cache
    }

    /// Cria um cache com configuração customizada.
    ///
    /// Falha se a configuração for inválida ou se não houver runtime Tokio
    /// para hospedar o janitor.
    pub fn with_config(config: CacheConfig) -> CacheResult<Self> {
        config.validate()?;
        let handle = Handle::try_current().map_err(|_| CacheError::RuntimeUnavailable)?;
        let (cache, janitor) = Self::build(config);
        handle.spawn(janitor);
        Ok(cache)
    }

    fn build(config: CacheConfig) -> (Self, impl Future<Output = ()> + Send + 'static) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let state = Arc::new(StateCell::new(JanitorState::Running));
        let shared = Arc::new(Shared {
            data: DashMap::with_capacity(config.initial_capacity),
            state: Arc::clone(&state),
            shutdown_tx,
        });

        let janitor = janitor::run(
            Arc::downgrade(&shared),
            state,
            config.sweep_interval,
            shutdown_rx,
        );
        (TtlCache { shared }, janitor)
    }
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    /// Insere ou sobrescreve `key`, expirando em `now + ttl`.
    ///
    /// Sobrescrever descarta o TTL restante da entrada anterior. TTL zero gera
    /// uma entrada que expira assim que o relógio avançar. TTLs acima de
    /// [`MAX_TTL`] são truncados.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        let expires_at = Instant::now() + ttl.min(MAX_TTL);
        self.set_until(key, value, expires_at);
    }

    /// Como [`set`](Self::set), mas com instante absoluto de expiração.
    ///
    /// Um `deadline` no passado equivale a um TTL negativo: a entrada já
    /// nasce expirada.
    pub fn set_until(&self, key: K, value: V, deadline: Instant) {
        self.shared.data.insert(key, Entry::new(value, deadline));
    }

    /// Retorna o valor se presente e válido. Nunca renova o TTL.
    ///
    /// Entradas expiradas são removidas na própria leitura (lazy eviction),
    /// no mesmo lock que decidiu a expiração.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let mut live = None;
        let evicted = self.shared.data.remove_if(key, |_, entry| {
            if entry.is_expired() {
                return true;
            }
            live = Some(entry.value.clone());
            false
        });
        if evicted.is_some() {
            trace!("chave expirada removida na leitura");
        }
        live
    }

    /// Remove a chave incondicionalmente e devolve o valor só se ainda era
    /// válido. Uma entrada expirada também sai do store, mas retorna `None`.
    pub fn pop<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(key).live()
    }

    /// Igual a [`pop`](Self::pop), mas informa se o valor removido já tinha
    /// expirado.
    pub fn take<Q>(&self, key: &Q) -> Lookup<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.shared.data.remove(key) {
            None => Lookup::Absent,
            Some((_, entry)) if entry.is_expired() => Lookup::Expired(entry.value),
            Some((_, entry)) => Lookup::Live(entry.value),
        }
    }

    /// Remove a chave se existir. Idempotente.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.data.remove(key);
    }

    /// Executa uma varredura imediata, a mesma que o janitor faz a cada tick.
    /// Retorna quantas entradas foram removidas.
    pub fn sweep(&self) -> usize {
        self.shared.sweep()
    }

    /// Número de entradas no store, incluindo expiradas ainda não varridas.
    pub fn len(&self) -> usize {
        self.shared.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.data.is_empty()
    }
}

impl<K, V> TtlCache<K, V> {
    /// Sinaliza o janitor para parar. O cache continua utilizável; só a
    /// limpeza em background é encerrada. Idempotente.
    pub fn close(&self) {
        self.shared.shutdown_tx.send_replace(true);
    }

    pub fn janitor_state(&self) -> JanitorState {
        self.shared.state.load()
    }
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("len", &self.len())
            .field("janitor", &self.janitor_state())
            .finish()
    }
}
