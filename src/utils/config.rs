// src/utils/config.rs

use worker::Env;

/// Tunables for the metrics resolution engine and the order overlay.
///
/// Values come from worker environment variables when present, with safe
/// defaults otherwise. None of these are request state; the engine itself
/// stays pure and stateless.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Margin applied to summed sales to estimate profit
    pub profit_margin: f64,
    /// Bounded lookback for the `total` timeframe, in days
    pub total_window_days: u32,
    /// Upper bound on synthetic orders fetched per list request
    pub max_synthetic_fetch: usize,
    /// Concurrency bound when resolving many timeframes at once
    pub resolve_concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profit_margin: 0.2,
            total_window_days: 365,
            max_synthetic_fetch: 500,
            resolve_concurrency: 4,
        }
    }
}

impl EngineConfig {
    pub fn from_env(env: &Env) -> Self {
        let defaults = Self::default();
        Self {
            profit_margin: env_f64(env, "PROFIT_MARGIN").unwrap_or(defaults.profit_margin),
            total_window_days: env_u32(env, "TOTAL_WINDOW_DAYS")
                .unwrap_or(defaults.total_window_days),
            max_synthetic_fetch: env_u32(env, "MAX_SYNTHETIC_FETCH")
                .map(|v| v as usize)
                .unwrap_or(defaults.max_synthetic_fetch),
            resolve_concurrency: env_u32(env, "RESOLVE_CONCURRENCY")
                .map(|v| v as usize)
                .unwrap_or(defaults.resolve_concurrency),
        }
    }
}

fn env_f64(env: &Env, name: &str) -> Option<f64> {
    env.var(name).ok().and_then(|v| v.to_string().parse().ok())
}

fn env_u32(env: &Env, name: &str) -> Option<u32> {
    env.var(name).ok().and_then(|v| v.to_string().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.profit_margin, 0.2);
        assert_eq!(config.total_window_days, 365);
        assert_eq!(config.max_synthetic_fetch, 500);
        assert_eq!(config.resolve_concurrency, 4);
    }
}
