use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds. Must exceed the dispatch timeout or
    /// long executions are cut off before their record is returned.
    pub request_timeout_secs: u64,
    /// Ceiling on one whole dispatch round trip, independent of the
    /// command's own script timeout.
    pub dispatch_timeout_secs: u64,
    /// Base URL of the co-located agent, registered as `node-local`.
    pub daemon_url: String,
    /// YAML file of commands to import at startup.
    pub commands_file: Option<PathBuf>,
    /// PostgreSQL URL. When unset the in-memory store is used.
    pub database_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `8080`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `660`                    |
    /// | `DISPATCH_TIMEOUT_SECS` | `600`                    |
    /// | `DAEMON_URL`            | `http://127.0.0.1:9081`  |
    /// | `COMMANDS_FILE`         | unset                    |
    /// | `DATABASE_URL`          | unset (in-memory store)  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "660".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let dispatch_timeout_secs: u64 = std::env::var("DISPATCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("DISPATCH_TIMEOUT_SECS must be a valid u64");

        let daemon_url = non_empty_var("DAEMON_URL")
            .unwrap_or_else(|| "http://127.0.0.1:9081".into());

        let commands_file = non_empty_var("COMMANDS_FILE").map(PathBuf::from);
        let database_url = non_empty_var("DATABASE_URL");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            dispatch_timeout_secs,
            daemon_url,
            commands_file,
            database_url,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
