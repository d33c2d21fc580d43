use std::{env, path::PathBuf, str::FromStr, time::Duration};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/local-storage.json";
const DEFAULT_LATENCY_MS: u64 = 1000;
const DEFAULT_HIGHLIGHT_MS: u64 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    /// Simulated round-trip for login and signup.
    pub latency: Duration,
    /// How long a fresh suggestion stays highlighted.
    pub highlight: Duration,
    /// Seed the journal and admin activity with sample entries.
    pub demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            highlight: Duration::from_millis(DEFAULT_HIGHLIGHT_MS),
            demo: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            data_path: lookup("MICROMOOD_DATA_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            latency: Duration::from_millis(parse_or(
                &lookup,
                "MICROMOOD_LATENCY_MS",
                DEFAULT_LATENCY_MS,
            )),
            highlight: Duration::from_millis(parse_or(
                &lookup,
                "MICROMOOD_HIGHLIGHT_MS",
                DEFAULT_HIGHLIGHT_MS,
            )),
            demo: parse_or(&lookup, "MICROMOOD_DEMO", defaults.demo),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable setting");
            default
        }
    }
}
