use std::env;

/// Background analysis of a fixed watchlist.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Whether the scheduler task is spawned at startup.
    pub enabled: bool,
    /// Seconds between analysis cycles.
    pub interval_secs: u64,
    /// Symbols analyzed on every cycle.
    pub watchlist: Vec<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 300,
            watchlist: vec!["AAPL".into(), "MSFT".into(), "GOOGL".into()],
        }
    }
}

/// Remote classifier endpoint. Absent URL disables AI verdicts.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 10,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite database file.
    pub database_path: String,
    /// Bearer token lifetime.
    pub token_ttl_minutes: i64,
    /// Upper bound on a single price-history fetch.
    pub fetch_timeout_secs: u64,
    /// Company directory CSV (`Symbol,Name`) imported at startup.
    pub company_csv: Option<String>,
    /// Maximum directory symbols scanned per screener request.
    pub screener_max_symbols: usize,
    pub classifier: ClassifierConfig,
    pub scheduler: SchedulerConfig,
}

/// Split a comma-separated symbol list, uppercasing and dropping blanks.
pub fn parse_symbol_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(value: &str) -> bool {
    value == "true" || value == "1"
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SchedulerConfig::default();

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            database_path: lookup("DATABASE_PATH")
                .unwrap_or_else(|| "tickerlens.db".to_string()),
            token_ttl_minutes: lookup("TOKEN_TTL_MINUTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            fetch_timeout_secs: lookup("FETCH_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            company_csv: lookup("COMPANY_CSV").filter(|v| !v.is_empty()),
            screener_max_symbols: lookup("SCREENER_MAX_SYMBOLS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            classifier: ClassifierConfig {
                url: lookup("CLASSIFIER_URL").filter(|v| !v.is_empty()),
                timeout_secs: lookup("CLASSIFIER_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            },
            scheduler: SchedulerConfig {
                enabled: lookup("SCHEDULER_ENABLED")
                    .map(|v| parse_flag(&v))
                    .unwrap_or(defaults.enabled),
                interval_secs: lookup("SCHEDULER_INTERVAL_SECS")
                    .and_then(|v| v.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(defaults.interval_secs),
                watchlist: lookup("WATCHLIST")
                    .map(|v| parse_symbol_list(&v))
                    .filter(|list| !list.is_empty())
                    .unwrap_or(defaults.watchlist),
            },
        }
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
