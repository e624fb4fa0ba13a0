/// Erros de validação da configuração do cache.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("intervalo de varredura não pode ser zero")]
    ZeroSweepInterval,
}

/// Erros de construção do cache.
///
/// As operações de acesso (set/get/pop/remove) são totais e nunca falham;
/// só a construção pode falhar.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("nenhum runtime Tokio disponível para o janitor")]
    RuntimeUnavailable,
}

/// Result type alias.
pub type CacheResult<T> = Result<T, CacheError>;
