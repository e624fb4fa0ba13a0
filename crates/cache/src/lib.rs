//! Cache in-memory genérico com TTL por entrada e janitor em background.
//!
//! O janitor roda num runtime Tokio. [`TtlCache::new`] e `Default` entram em
//! pânico fora de um runtime; quem não tem certeza de estar dentro de um deve
//! usar [`TtlCache::with_config`], que devolve
//! [`CacheError::RuntimeUnavailable`] no lugar:
//!
//! ```rust
//! use ttlcache::{CacheConfig, CacheError, TtlCache};
//!
//! let result = TtlCache::<String, u32>::with_config(CacheConfig::default());
//! assert!(matches!(result, Err(CacheError::RuntimeUnavailable)));
//! ```

#![forbid(unsafe_code)]

mod cache;
mod config;
mod entry;
mod janitor;

pub use cache::TtlCache;
pub use config::CacheConfig;
pub use entry::Lookup;
pub use janitor::JanitorState;
pub use ttlcache_common::{CacheError, CacheResult, ConfigError, DEFAULT_SWEEP_INTERVAL, MAX_TTL};
