use std::env;

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "event_ease";
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://eventease-pn73.vercel.app",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub database: String,
    pub allowed_origins: Vec<String>,
    /// Overrides Rocket's configured port when set.
    pub port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            port: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        let port = lookup("PORT").and_then(|port| match port.trim().parse() {
            Ok(port) => Some(port),
            Err(err) => {
                tracing::warn!(%port, %err, "ignoring invalid PORT");
                None
            }
        });

        Config {
            mongo_uri: lookup("MONGO_URI").unwrap_or(defaults.mongo_uri),
            database: lookup("MONGO_DB").unwrap_or(defaults.database),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or(defaults.allowed_origins),
            port,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}
