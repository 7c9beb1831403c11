use bastion_core::scripting::shell::DEFAULT_SHELL;

/// Agent configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `9081`).
    pub port: u16,
    /// Interpreter invoked as `<shell> -c <script>` (default: `bash`).
    pub shell: String,
}

impl AgentConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var        | Default     |
    /// |----------------|-------------|
    /// | `DAEMON_HOST`  | `127.0.0.1` |
    /// | `DAEMON_PORT`  | `9081`      |
    /// | `DAEMON_SHELL` | `bash`      |
    pub fn from_env() -> Self {
        let host = std::env::var("DAEMON_HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let port: u16 = std::env::var("DAEMON_PORT")
            .unwrap_or_else(|_| "9081".into())
            .parse()
            .expect("DAEMON_PORT must be a valid u16");

        let shell = std::env::var("DAEMON_SHELL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SHELL.into());

        Self { host, port, shell }
    }
}
