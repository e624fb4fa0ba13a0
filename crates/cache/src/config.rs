use std::time::Duration;

use ttlcache_common::{ConfigError, DEFAULT_SWEEP_INTERVAL};

/// Configuração do cache.
///
/// ```rust
/// use std::time::Duration;
/// use ttlcache::CacheConfig;
///
/// let config = CacheConfig::default()
///     .with_sweep_interval(Duration::from_secs(1))
///     .with_initial_capacity(1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Intervalo entre varreduras do janitor (padrão: 5s).
    pub sweep_interval: Duration,
    /// Capacidade inicial do store. Não é um limite.
    pub initial_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            initial_capacity: 0,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// `tokio::time::interval` entra em pânico com período zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::ZeroSweepInterval);
        }
        Ok(())
    }
}
