use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::scroll::{DEFAULT_THRESHOLDS, DEFAULT_THROTTLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Parse an environment name (case-insensitive). Anything other than
    /// `production`/`prod` is development.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// A configuration value that parsed but cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ThresholdOutOfRange(u8),
    NoThresholds,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThresholdOutOfRange(t) => {
                write!(f, "scroll threshold {t} is outside 1..=100")
            }
            Self::NoThresholds => write!(f, "at least one scroll threshold is required"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Client analytics configuration merged from an optional TOML file and
/// environment variables.
///
/// Environment variables take precedence over the file:
/// - `ROSETRACK_GA_ID`: Google tag measurement id
/// - `ROSETRACK_CONVERSION_ID`: ads conversion `send_to` target
/// - `ROSETRACK_FB_PIXEL`: Facebook pixel id
/// - `ROSETRACK_ENV`: `production` or `development`
/// - `ROSETRACK_PIXEL_BASE`: absolute base url of the pixel server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub measurement_id: Option<String>,
    pub conversion_id: Option<String>,
    pub facebook_pixel: Option<String>,
    pub environment: Environment,
    pub scroll_thresholds: Vec<u8>,
    pub scroll_throttle_ms: u64,
    pub pixel_base_url: Option<String>,
}

impl Default for AnalyticsConfig {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            measurement_id: None,
            conversion_id: None,
            facebook_pixel: None,
            environment: Environment::default(),
            scroll_thresholds: DEFAULT_THRESHOLDS.to_vec(),
            scroll_throttle_ms: DEFAULT_THROTTLE.as_millis() as u64,
            pixel_base_url: None,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn apply_toml(config: &mut AnalyticsConfig, table: &toml::Table) {
    let Some(analytics) = table.get("analytics").and_then(toml::Value::as_table) else {
        return;
    };
    let string = |key: &str| analytics.get(key).and_then(toml::Value::as_str);

    if let Some(id) = string("measurement_id") {
        config.measurement_id = non_empty(id);
    }
    if let Some(id) = string("conversion_id") {
        config.conversion_id = non_empty(id);
    }
    if let Some(id) = string("facebook_pixel") {
        config.facebook_pixel = non_empty(id);
    }
    if let Some(env) = string("environment") {
        config.environment = Environment::parse(env);
    }
    if let Some(base) = string("pixel_base_url") {
        config.pixel_base_url = non_empty(base);
    }
    if let Some(list) = analytics
        .get("scroll_thresholds")
        .and_then(toml::Value::as_array)
    {
        config.scroll_thresholds = list
            .iter()
            .filter_map(toml::Value::as_integer)
            .filter_map(|n| u8::try_from(n).ok())
            .collect();
    }
    if let Some(ms) = analytics
        .get("scroll_throttle_ms")
        .and_then(toml::Value::as_integer)
        .and_then(|n| u64::try_from(n).ok())
    {
        config.scroll_throttle_ms = ms;
    }
}

fn apply_env(config: &mut AnalyticsConfig) {
    if let Ok(val) = std::env::var("ROSETRACK_GA_ID") {
        config.measurement_id = non_empty(&val);
    }
    if let Ok(val) = std::env::var("ROSETRACK_CONVERSION_ID") {
        config.conversion_id = non_empty(&val);
    }
    if let Ok(val) = std::env::var("ROSETRACK_FB_PIXEL") {
        config.facebook_pixel = non_empty(&val);
    }
    if let Ok(val) = std::env::var("ROSETRACK_ENV") {
        config.environment = Environment::parse(&val);
    }
    if let Ok(val) = std::env::var("ROSETRACK_PIXEL_BASE") {
        config.pixel_base_url = non_empty(&val);
    }
}

impl AnalyticsConfig {
    /// Load from the `[analytics]` table of `path` (if given), then apply
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be read or is not valid TOML.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
            let table: toml::Table = content
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;
            apply_toml(&mut config, &table);
        }
        apply_env(&mut config);
        Ok(config)
    }

    /// Check values the loaders accept but the monitors cannot use.
    ///
    /// # Errors
    ///
    /// Returns the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scroll_thresholds.is_empty() {
            return Err(ConfigError::NoThresholds);
        }
        if let Some(&t) = self
            .scroll_thresholds
            .iter()
            .find(|&&t| t == 0 || t > 100)
        {
            return Err(ConfigError::ThresholdOutOfRange(t));
        }
        Ok(())
    }

    pub const fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::io::Write;

    use super::*;

    const ENV_VARS: [&str; 5] = [
        "ROSETRACK_GA_ID",
        "ROSETRACK_CONVERSION_ID",
        "ROSETRACK_FB_PIXEL",
        "ROSETRACK_ENV",
        "ROSETRACK_PIXEL_BASE",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            // SAFETY: single-threaded via serial_test.
            unsafe { std::env::remove_var(var) };
        }
    }

    #[test]
    fn test_default_config() {
        let config = AnalyticsConfig::default();
        assert!(config.measurement_id.is_none());
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.scroll_thresholds, vec![25, 50, 75, 90]);
        assert_eq!(config.scroll_throttle(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("PROD"), Environment::Production);
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse("staging"), Environment::Development);
    }

    #[test]
    fn test_apply_toml_analytics_section() {
        let toml_str = r#"
[analytics]
measurement_id = "G-ROSE123"
conversion_id = "AW-999/abc"
facebook_pixel = ""
environment = "production"
scroll_thresholds = [10, 50, 100]
scroll_throttle_ms = 250
pixel_base_url = "https://rose.example"
"#;
        let table: toml::Table = toml_str.parse().expect("valid toml");
        let mut config = AnalyticsConfig::default();
        apply_toml(&mut config, &table);

        assert_eq!(config.measurement_id.as_deref(), Some("G-ROSE123"));
        assert_eq!(config.conversion_id.as_deref(), Some("AW-999/abc"));
        assert!(config.facebook_pixel.is_none());
        assert!(config.environment.is_production());
        assert_eq!(config.scroll_thresholds, vec![10, 50, 100]);
        assert_eq!(config.scroll_throttle_ms, 250);
        assert_eq!(config.pixel_base_url.as_deref(), Some("https://rose.example"));
    }

    #[test]
    fn test_apply_toml_missing_section() {
        let table: toml::Table = "[other]\nkey = \"val\"\n".parse().expect("valid toml");
        let mut config = AnalyticsConfig::default();
        apply_toml(&mut config, &table);
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_apply_toml_drops_thresholds_that_do_not_fit() {
        let table: toml::Table = "[analytics]\nscroll_thresholds = [-5, 300, 40]\n"
            .parse()
            .expect("valid toml");
        let mut config = AnalyticsConfig::default();
        apply_toml(&mut config, &table);
        assert_eq!(config.scroll_thresholds, vec![40]);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = AnalyticsConfig {
            scroll_thresholds: vec![25, 0],
            ..AnalyticsConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ThresholdOutOfRange(0)));
        config.scroll_thresholds = vec![101];
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "scroll threshold 101 is outside 1..=100"
        );
        config.scroll_thresholds.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoThresholds));
    }

    // -----------------------------------------------------------------------
    // load() touches env vars; serialised to avoid cross-test contamination
    // -----------------------------------------------------------------------

    #[test]
    #[serial_test::serial]
    fn test_load_without_file_uses_env() {
        clear_env();
        // SAFETY: single-threaded via serial_test.
        unsafe {
            std::env::set_var("ROSETRACK_GA_ID", "G-ENV");
            std::env::set_var("ROSETRACK_ENV", "production");
        }
        let config = AnalyticsConfig::load(None).unwrap();
        assert_eq!(config.measurement_id.as_deref(), Some("G-ENV"));
        assert!(config.environment.is_production());
        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_env_overrides_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[analytics]\nmeasurement_id = \"G-FILE\"\nfacebook_pixel = \"123\""
        )
        .unwrap();
        // SAFETY: single-threaded via serial_test.
        unsafe { std::env::set_var("ROSETRACK_GA_ID", "G-ENV") };
        let config = AnalyticsConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.measurement_id.as_deref(), Some("G-ENV"));
        assert_eq!(config.facebook_pixel.as_deref(), Some("123"));
        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_empty_env_var_unsets_value() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analytics]\nconversion_id = \"AW-1\"").unwrap();
        // SAFETY: single-threaded via serial_test.
        unsafe { std::env::set_var("ROSETRACK_CONVERSION_ID", "") };
        let config = AnalyticsConfig::load(Some(file.path())).unwrap();
        assert!(config.conversion_id.is_none());
        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_load_reports_bad_files() {
        clear_env();
        let missing = AnalyticsConfig::load(Some(Path::new("/nonexistent/rosetrack.toml")));
        assert!(missing.unwrap_err().to_string().contains("cannot read"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analytics\nbroken").unwrap();
        let invalid = AnalyticsConfig::load(Some(file.path()));
        assert!(invalid.unwrap_err().to_string().contains("invalid config"));
    }
}
