use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Take client addresses from `X-Forwarded-For`. Set `TRUST_PROXY=false`
    /// when the server is exposed directly. Defaults to `true`.
    pub trust_proxy: bool,
    /// Append pixel records as JSON lines to this file instead of logging them.
    pub pixel_log_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT").ok().map_or(8080, |s| {
            match s.parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => {
                    tracing::warn!(
                        "PORT env var {s:?} is not a valid port number (1-65535), defaulting to 8080"
                    );
                    8080
                }
            }
        });
        let trust_proxy = std::env::var("TRUST_PROXY")
            .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);
        let pixel_log_path = std::env::var("PIXEL_LOG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        Self {
            port,
            trust_proxy,
            pixel_log_path,
        }
    }
}
