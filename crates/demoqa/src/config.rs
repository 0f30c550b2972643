//! Suite configuration.
//!
//! Layered like the runner configs it replaces: built-in profile defaults,
//! then an optional YAML file, then environment variables. The CLI applies
//! its flags last.

use crate::result::{SuiteError, SuiteResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default application under test
pub const DEFAULT_BASE_URL: &str = "https://demoqa.com/";

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "demoqa.yaml";

/// Which group of suites a configuration is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Desktop browser suites
    #[default]
    Desktop,
    /// BookStore API suite
    Api,
}

impl Profile {
    /// Profile name as used in config files and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Api => "api",
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Profile {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" | "chromium" | "chrome" => Ok(Self::Desktop),
            "api" => Ok(Self::Api),
            other => Err(SuiteError::config(format!("unknown profile '{other}'"))),
        }
    }
}

/// Browser capabilities handed to the CDP driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Run without a visible window
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Chromium sandbox (disable in containers)
    pub sandbox: bool,
    /// Path to the chromium binary (None = auto-detect)
    pub chromium_path: Option<PathBuf>,
    /// Extra command line switches
    pub args: Vec<String>,
    /// Directory downloads are written to
    pub download_dir: Option<PathBuf>,
    /// Return from navigation at DOMContentLoaded instead of load
    pub page_load_eager: bool,
    /// Concurrent sessions the runner may start
    pub max_instances: u32,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::desktop()
    }
}

impl Capabilities {
    /// Desktop chromium capabilities
    #[must_use]
    pub fn desktop() -> Self {
        Self {
            headless: true,
            window_width: 1900,
            window_height: 1000,
            sandbox: false,
            chromium_path: None,
            args: [
                "--start-maximized",
                "--disable-gpu",
                "--disable-dev-shm-usage",
                "--allow-insecure-localhost",
                "--ignore-certificate-errors",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            download_dir: None,
            page_load_eager: false,
            max_instances: 3,
        }
    }

    /// Capabilities for the API profile (the browser is only a formality there)
    #[must_use]
    pub fn api() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 800,
            sandbox: false,
            chromium_path: None,
            args: ["--disable-gpu", "--disable-dev-shm-usage"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            download_dir: None,
            page_load_eager: true,
            max_instances: 1,
        }
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set window size
    #[must_use]
    pub const fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set the download directory
    #[must_use]
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }
}

/// Full configuration for a suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Application base URL; page paths are resolved against it
    pub base_url: String,
    /// Profile the defaults came from
    pub profile: Profile,
    /// Browser capabilities
    pub browser: Capabilities,
    /// Default timeout for element waits
    pub wait_timeout_ms: u64,
    /// Per-test timeout
    pub test_timeout_ms: u64,
    /// Timeout for connecting to the browser
    pub connection_retry_timeout_ms: u64,
    /// Attempts at launching/connecting to the browser
    pub connection_retry_count: u32,
    /// Stop after this many failed tests (0 = run everything)
    pub bail: usize,
    /// Upload sources and download target
    pub fixtures_dir: PathBuf,
    /// JUnit XML output directory
    pub junit_dir: PathBuf,
    /// Screenshots and page sources of test runs
    pub artifacts_dir: PathBuf,
    /// Budget for each artifact capture after a test
    pub artifact_timeout_ms: u64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self::for_profile(Profile::Desktop)
    }
}

impl SuiteConfig {
    /// Built-in defaults for a profile
    #[must_use]
    pub fn for_profile(profile: Profile) -> Self {
        let browser = match profile {
            Profile::Desktop => Capabilities::desktop(),
            Profile::Api => Capabilities::api(),
        };
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile,
            browser,
            wait_timeout_ms: 10_000,
            test_timeout_ms: 60_000,
            connection_retry_timeout_ms: 120_000,
            connection_retry_count: 3,
            bail: 0,
            fixtures_dir: PathBuf::from("fixtures"),
            junit_dir: PathBuf::from("junit-report"),
            artifacts_dir: PathBuf::from("artifacts"),
            artifact_timeout_ms: 10_000,
        }
    }

    /// Parse a YAML document on top of the desktop defaults.
    ///
    /// A `profile` key in the document selects which defaults the remaining
    /// keys override.
    pub fn from_yaml(yaml: &str) -> SuiteResult<Self> {
        Self::from_yaml_for(yaml, Profile::default())
    }

    /// Parse a YAML document on top of `fallback`'s defaults, unless the
    /// document names its own `profile`
    pub fn from_yaml_for(yaml: &str, fallback: Profile) -> SuiteResult<Self> {
        let raw: serde_yaml_ng::Value = serde_yaml_ng::from_str(yaml)?;
        let profile = raw
            .get("profile")
            .and_then(serde_yaml_ng::Value::as_str)
            .map(str::parse)
            .transpose()?
            .unwrap_or(fallback);

        let mut merged = serde_yaml_ng::to_value(Self::for_profile(profile))?;
        merge_yaml(&mut merged, raw);
        let config: Self = serde_yaml_ng::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> SuiteResult<Self> {
        Self::from_file_for(path, Profile::default())
    }

    /// Load from a YAML file on top of `fallback`'s defaults
    pub fn from_file_for(path: impl AsRef<Path>, fallback: Profile) -> SuiteResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SuiteError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_for(&text, fallback)
    }

    /// Resolve the configuration the way the runner does: the explicit file
    /// if given, else `demoqa.yaml` when present, else profile defaults; then
    /// environment overrides.
    pub fn load(path: Option<&Path>, profile: Profile) -> SuiteResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file_for(p, profile)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file_for(DEFAULT_CONFIG_FILE, profile)?
            }
            None => Self::for_profile(profile),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `DEMOQA_*` / `CHROMIUM_PATH` overrides from a variable lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DEMOQA_BASE_URL") {
            self.base_url = url;
        }
        if let Some(headless) = lookup("DEMOQA_HEADLESS") {
            self.browser.headless = !matches!(
                headless.to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        if let Some(path) = lookup("CHROMIUM_PATH") {
            self.browser.chromium_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = lookup("DEMOQA_FIXTURES_DIR") {
            self.fixtures_dir = PathBuf::from(dir);
        }
    }

    /// Check invariants the runner relies on
    pub fn validate(&self) -> SuiteResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SuiteError::config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.wait_timeout_ms == 0 || self.test_timeout_ms == 0 || self.artifact_timeout_ms == 0 {
            return Err(SuiteError::config("timeouts must be greater than zero"));
        }
        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(SuiteError::config("window size must be non-zero"));
        }
        Ok(())
    }

    /// Resolve a page path against the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Directory the browser downloads into (capability override or fixtures)
    #[must_use]
    pub fn download_dir(&self) -> PathBuf {
        self.browser
            .download_dir
            .clone()
            .unwrap_or_else(|| self.fixtures_dir.clone())
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> SuiteResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

fn merge_yaml(base: &mut serde_yaml_ng::Value, overlay: serde_yaml_ng::Value) {
    use serde_yaml_ng::Value;
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
