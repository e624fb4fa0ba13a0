#![forbid(unsafe_code)]

mod error;

pub use error::*;

use std::time::Duration;

/// Intervalo padrão entre varreduras do janitor.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// TTL máximo aceito (~100 anos). Valores maiores são truncados para
/// evitar overflow em `Instant + Duration`.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);
