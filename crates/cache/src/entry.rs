use tokio::time::Instant;

/// Entrada no store: valor + instante absoluto de expiração.
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    pub value: V,
    pub expires_at: Instant,
}

impl<V> Entry<V> {
    pub fn new(value: V, expires_at: Instant) -> Self {
        Self { value, expires_at }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Expirada só quando `now` passou estritamente de `expires_at`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Resultado de [`TtlCache::take`](crate::TtlCache::take).
///
/// Diferente de `pop`, distingue "não havia nada" de "havia um valor, mas já
/// expirado". Nos dois casos a chave sai do store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    /// Valor ainda válido no momento da remoção.
    Live(V),
    /// Valor existia mas o TTL já tinha passado.
    Expired(V),
    /// Chave ausente.
    Absent,
}

impl<V> Lookup<V> {
    /// Converte para o contrato de `pop`: só valores válidos contam.
    pub fn live(self) -> Option<V> {
        match self {
            Lookup::Live(value) => Some(value),
            Lookup::Expired(_) | Lookup::Absent => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Lookup::Live(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }
}
