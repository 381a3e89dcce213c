// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use feeling_app::Resource;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "feeling-admin";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_DEBOUNCE: &str = "500ms";
const MAX_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_DEBOUNCE: Duration = Duration::from_secs(10);
const CONFIG_PATH_ENV: &str = "FEELING_ADMIN_CONFIG_PATH";
const API_URL_ENV: &str = "FEELING_ADMIN_API_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
    pub local_resources: Option<Vec<String>>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            local_resources: Some(vec![Resource::Plans.as_str().to_owned()]),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub rows_per_page: Option<usize>,
    pub debounce: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            rows_per_page: None,
            debounce: Some(DEFAULT_DEBOUNCE.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put settings under [api] and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.api.base_url
            && base_url.trim().is_empty()
        {
            bail!(
                "api.base_url in {} is empty; remove it or set a URL such as {}",
                path.display(),
                DEFAULT_API_BASE_URL
            );
        }

        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
            if parsed > MAX_TIMEOUT {
                bail!(
                    "api.timeout in {} must be at most {}s, got {}",
                    path.display(),
                    MAX_TIMEOUT.as_secs(),
                    timeout
                );
            }
        }

        self.local_resources()
            .with_context(|| format!("invalid api.local_resources in {}", path.display()))?;

        if let Some(rows) = self.ui.rows_per_page
            && rows == 0
        {
            bail!("ui.rows_per_page in {} must be positive", path.display());
        }

        if let Some(debounce) = &self.ui.debounce
            && parse_duration(debounce)? > MAX_DEBOUNCE
        {
            bail!(
                "ui.debounce in {} must be at most {}s, got {}",
                path.display(),
                MAX_DEBOUNCE.as_secs(),
                debounce
            );
        }

        Ok(())
    }

    /// The config file wins; the environment fills in when the file is
    /// silent.
    pub fn api_base_url(&self) -> String {
        let configured = self
            .api
            .base_url
            .clone()
            .or_else(|| env::var(API_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        configured.trim().trim_end_matches('/').to_owned()
    }

    pub fn api_timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn local_resources(&self) -> Result<Vec<Resource>> {
        let Some(names) = &self.api.local_resources else {
            return Ok(vec![Resource::Plans]);
        };
        names
            .iter()
            .map(|name| {
                Resource::parse(name).ok_or_else(|| {
                    anyhow!(
                        "unknown resource {name:?}; expected one of events, users, complaints, plans"
                    )
                })
            })
            .collect()
    }

    pub fn rows_per_page(&self) -> Option<usize> {
        self.ui.rows_per_page
    }

    pub fn debounce(&self) -> Result<Duration> {
        parse_duration(self.ui.debounce.as_deref().unwrap_or(DEFAULT_DEBOUNCE))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# {APP_NAME} config\n# Place this file at: {}\n\nversion = 1\n\n[api]\n# Optional. Falls back to ${API_URL_ENV}, then {DEFAULT_API_BASE_URL}\n# base_url = \"{DEFAULT_API_BASE_URL}\"\ntimeout = \"{DEFAULT_TIMEOUT}\"\n# Resources served from in-process data instead of the API\nlocal_resources = [\"plans\"]\n\n[ui]\n# rows_per_page = 10\ndebounce = \"{DEFAULT_DEBOUNCE}\"\n",
            path.display(),
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use <N>ms or <N>s (for example 500ms or 10s)")
}

#[cfg(test)]
mod tests {
    use super::{API_URL_ENV, CONFIG_PATH_ENV, Config, parse_duration};
    use anyhow::Result;
    use feeling_app::Resource;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.local_resources()?, vec![Resource::Plans]);
        assert_eq!(config.debounce()?, Duration::from_millis(500));
        assert_eq!(config.rows_per_page(), None);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[api]\nbase_url=\"http://localhost:9000\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[api] and [ui]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[api]\nbase_url = \"http://admin.feeling.app/api/\"\ntimeout = \"3s\"\nlocal_resources = [\"plans\", \"complaints\"]\n[ui]\nrows_per_page = 25\ndebounce = \"250ms\"\n",
        )?;
        let config = Config::load(&path)?;
        assert_eq!(config.api_base_url(), "http://admin.feeling.app/api");
        assert_eq!(config.api_timeout()?, Duration::from_secs(3));
        assert_eq!(
            config.local_resources()?,
            vec![Resource::Plans, Resource::Complaints]
        );
        assert_eq!(config.rows_per_page(), Some(25));
        assert_eq!(config.debounce()?, Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn unknown_local_resource_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\nlocal_resources = [\"matches\"]\n")?;
        let error = Config::load(&path).expect_err("unknown resource should fail");
        let message = format!("{error:#}");
        assert!(message.contains("api.local_resources"), "{message}");
        assert!(message.contains("\"matches\""), "{message}");
        Ok(())
    }

    #[test]
    fn zero_rows_and_timeout_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nrows_per_page = 0\n")?;
        let error = Config::load(&path).expect_err("zero rows should fail");
        assert!(error.to_string().contains("must be positive"));

        let (_temp, path) = write_config("version = 1\n[api]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn huge_durations_are_rejected() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[ui]\ndebounce = \"18446744073709551615s\"\n")?;
        let error = Config::load(&path).expect_err("unbounded debounce should fail");
        assert!(error.to_string().contains("ui.debounce"), "{error}");

        let (_temp, path) = write_config("version = 1\n[api]\ntimeout = \"601s\"\n")?;
        let error = Config::load(&path).expect_err("unbounded timeout should fail");
        assert!(error.to_string().contains("at most 600s"), "{error}");

        let (_temp, path) =
            write_config("version = 1\n[api]\ntimeout = \"600s\"\n[ui]\ndebounce = \"10s\"\n")?;
        let config = Config::load(&path)?;
        assert_eq!(config.api_timeout()?, Duration::from_secs(600));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn base_url_prefers_config_over_env() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) =
            write_config("version = 1\n[api]\nbase_url = \"http://from-config/api\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(API_URL_ENV, "http://from-env/api");
        }
        let config = Config::load(&path)?;
        let resolved = config.api_base_url();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(API_URL_ENV);
        }
        assert_eq!(resolved, "http://from-config/api");
        Ok(())
    }

    #[test]
    fn base_url_uses_env_when_config_is_silent() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(API_URL_ENV, "http://from-env/api/");
        }
        let config = Config::load(&path)?;
        let resolved = config.api_base_url();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(API_URL_ENV);
        }
        assert_eq!(resolved, "http://from-env/api");
        Ok(())
    }

    #[test]
    fn durations_parse_ms_and_seconds() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        let error = parse_duration("2m").expect_err("minutes are not supported");
        assert!(error.to_string().contains("invalid duration"));
        Ok(())
    }

    #[test]
    fn example_config_parses_as_valid_config() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[api]"));
        assert!(example.contains("[ui]"));
        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.local_resources()?, vec![Resource::Plans]);
        Ok(())
    }
}
