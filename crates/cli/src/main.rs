use std::fmt::Display;

use anyhow::Context;
use clap::Parser;
use tokio::time::Duration;
use tracing::info;

use ttlcache::{CacheConfig, JanitorState, Lookup, TtlCache};
use ttlcache_common::DEFAULT_SWEEP_INTERVAL;

/// Teto de `--scale-ms` (1 dia por unidade).
const MAX_SCALE_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Parser, Debug)]
#[command(name = "ttlcache-cli", about = "Demonstração do cache in-memory com TTL")]
struct Args {
    /// Intervalo entre varreduras do janitor, em milissegundos
    #[arg(
        long,
        default_value_t = DEFAULT_SWEEP_INTERVAL.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    sweep_interval_ms: u64,

    /// Duração de uma unidade da demonstração, em milissegundos
    #[arg(
        long,
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..=MAX_SCALE_MS)
    )]
    scale_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttlcache=debug,ttlcache_cli=info".into()),
        )
        .init();

    let args = Args::parse();
    let config =
        CacheConfig::default().with_sweep_interval(Duration::from_millis(args.sweep_interval_ms));
    let scale = Duration::from_millis(args.scale_ms);

    let cache = TtlCache::with_config(config)?;
    info!(interval_ms = args.sweep_interval_ms, "cache criado");

    for line in staggered_demo(&cache, scale).await? {
        println!("{line}");
    }
    for line in short_ttl_demo(&cache, scale).await? {
        println!("{line}");
    }

    cache.close();
    tokio::time::sleep(Duration::from_millis(10)).await;
    if cache.janitor_state() == JanitorState::Stopped {
        info!("janitor encerrado");
    }

    Ok(())
}

/// `scale * n / div`, com erro em vez de pânico no overflow.
fn units(scale: Duration, n: u32, div: u32) -> anyhow::Result<Duration> {
    let total = scale
        .checked_mul(n)
        .with_context(|| format!("duração fora do intervalo: {scale:?} * {n}"))?;
    Ok(total / div)
}

/// one/two/three com TTLs de 5/10/15 unidades; lê depois de 11.
async fn staggered_demo(
    cache: &TtlCache<String, i64>,
    scale: Duration,
) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::new();
    cache.set("one".into(), 1, units(scale, 5, 1)?);
    cache.set("two".into(), 2, units(scale, 10, 1)?);
    cache.set("three".into(), 3, units(scale, 15, 1)?);

    out.push(describe("get", "two", cache.get("two")));

    tokio::time::sleep(units(scale, 11, 1)?).await;
    out.push(describe("get", "one", cache.get("one")));
    out.push(describe("pop", "two", cache.pop("two")));

    cache.remove("three");
    info!(len = cache.len(), "'three' removida");
    Ok(out)
}

/// a (0.1 unidade) e b (10 unidades); lê depois de 0.15. "c" expira junto
/// com "a" e mostra o resultado de `take` para um valor vencido.
async fn short_ttl_demo(
    cache: &TtlCache<String, i64>,
    scale: Duration,
) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::new();
    cache.set("a".into(), 1, units(scale, 1, 10)?);
    cache.set("b".into(), 2, units(scale, 10, 1)?);
    cache.set("c".into(), 3, units(scale, 1, 10)?);

    tokio::time::sleep(units(scale, 3, 20)?).await;
    out.push(describe("get", "a", cache.get("a")));
    out.push(describe("get", "b", cache.get("b")));
    out.push(describe("pop", "b", cache.pop("b")));
    out.push(describe("get", "b", cache.get("b")));

    out.push(match cache.take("c") {
        Lookup::Live(v) => format!("take 'c': {v} (válido)"),
        Lookup::Expired(v) => format!("take 'c': {v} (expirado)"),
        Lookup::Absent => "take 'c': ausente".to_string(),
    });
    Ok(out)
}

fn describe<V: Display>(op: &str, key: &str, result: Option<V>) -> String {
    match result {
        Some(v) => format!("{op} '{key}': {v}"),
        None => format!("{op} '{key}': não encontrada ou expirada"),
    }
}
