use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

/// How the status sweep treats tenders that are already `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// A closed tender stays closed until someone reopens it explicitly.
    #[default]
    StickyClosed,
    /// Status is always re-derived from the current deadline.
    Rederive,
}

impl FromStr for StatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sticky" | "sticky_closed" => Ok(StatusPolicy::StickyClosed),
            "rederive" => Ok(StatusPolicy::Rederive),
            other => Err(format!("unknown status policy '{other}'")),
        }
    }
}

pub const DEFAULT_CLOSING_SOON_FENCE_DAYS: i64 = 3;
/// Upper bound on the closing-soon fence (about ten years).
pub const MAX_CLOSING_SOON_FENCE_DAYS: i64 = 3650;

/// Shortest period the status sweeper will run at.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Engine tunables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub closing_soon_fence_days: i64,
    pub default_min_bid_decrement: Option<Decimal>,
    pub status_policy: StatusPolicy,
    pub sweep_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            closing_soon_fence_days: DEFAULT_CLOSING_SOON_FENCE_DAYS,
            default_min_bid_decrement: None,
            status_policy: StatusPolicy::StickyClosed,
            sweep_interval: Duration::from_secs(3600), // hourly
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let fence = parse_env::<i64>("CLOSING_SOON_FENCE_DAYS")
            .filter(|days| *days > 0)
            .map(|days| {
                if days > MAX_CLOSING_SOON_FENCE_DAYS {
                    tracing::warn!(
                        "CLOSING_SOON_FENCE_DAYS={days} capped at {MAX_CLOSING_SOON_FENCE_DAYS}"
                    );
                }
                days.min(MAX_CLOSING_SOON_FENCE_DAYS)
            })
            .unwrap_or(DEFAULT_CLOSING_SOON_FENCE_DAYS);

        Self {
            closing_soon_fence_days: fence,
            default_min_bid_decrement: parse_env::<Decimal>("DEFAULT_MIN_BID_DECREMENT")
                .filter(|d| *d > Decimal::ZERO),
            status_policy: parse_env("STATUS_POLICY").unwrap_or_default(),
            sweep_interval: parse_duration_secs("STATUS_SWEEP_INTERVAL_SECS", 3600),
        }
    }

    /// Fence in days, treating a non-positive value as unset and capping large ones.
    pub fn fence_days(&self) -> i64 {
        if self.closing_soon_fence_days > 0 {
            self.closing_soon_fence_days.min(MAX_CLOSING_SOON_FENCE_DAYS)
        } else {
            DEFAULT_CLOSING_SOON_FENCE_DAYS
        }
    }
}

/// Process-level settings read at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub viewer_cache_ttl: Duration,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;

        Ok(Self {
            database_url,
            jwt_secret,
            port: parse_env("PORT").unwrap_or(8080),
            viewer_cache_ttl: parse_duration_secs("VIEWER_CACHE_TTL_SECS", 60),
            engine: EngineConfig::from_env(),
        })
    }
}

fn parse_env<T: FromStr>(env_var: &str) -> Option<T> {
    let raw = std::env::var(env_var).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {env_var}={raw}");
            None
        }
    }
}

fn parse_duration_secs(env_var: &str, default: u64) -> Duration {
    let secs = match parse_env::<u64>(env_var) {
        Some(0) => {
            tracing::warn!("Ignoring zero {env_var}, using {default}s");
            default
        }
        Some(secs) => secs,
        None => default,
    };
    Duration::from_secs(secs)
}
