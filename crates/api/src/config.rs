use rota_events::WorkerConfig;

/// How a past, never-started scheduled occurrence is displayed in read
/// models. Never stored; purely a projection choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissedDisplay {
    /// Show `PENDING`, leaving interpretation to the viewer.
    Pending,
    /// Show a distinct `MISSED` marker.
    Missed,
}

impl MissedDisplay {
    fn from_env_value(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "missed" => MissedDisplay::Missed,
            _ => MissedDisplay::Pending,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Geofence acceptance radius in meters, global for all sites.
    pub geofence_radius_meters: f64,
    /// Read-model policy for past never-started occurrences.
    pub missed_display: MissedDisplay,
    /// Notification worker pool tuning.
    pub notify: WorkerConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `GEOFENCE_RADIUS_METERS`  | `20`                    |
    /// | `MISSED_DISPLAY`          | `pending`               |
    ///
    /// Notification knobs (`NOTIFY_*`) are documented on
    /// [`WorkerConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let geofence_radius_meters: f64 = std::env::var("GEOFENCE_RADIUS_METERS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("GEOFENCE_RADIUS_METERS must be a valid f64");

        let missed_display = MissedDisplay::from_env_value(
            &std::env::var("MISSED_DISPLAY").unwrap_or_else(|_| "pending".into()),
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            geofence_radius_meters,
            missed_display,
            notify: WorkerConfig::from_env(),
        }
    }
}
