use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::global::utils::{get_default_cache_root, get_default_config_file};

/// Environment variable overriding the access token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Environment variable overriding the cache root.
pub const HOME_ENV: &str = "DHUB_HOME";

/// Network deadline used when the file does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Access token baked in at build time, used when nothing else supplies one.
const BUILD_TOKEN: Option<&str> = option_env!("DHUB_TOKEN");

/// Represents the contents of a `config.toml` file.
///
/// Every field has a default, so an empty or partial file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Access token sent as `Authorization: token <token>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Overrides the cache root (`~/.dhub`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,
    /// Deadline for the whole network fetch, in seconds. `0` means the default.
    pub timeout_secs: u64,
    /// Where the dataset archive is published.
    pub remote: Remote,
}

/// Location of the dataset archive on the content host.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Remote {
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub path: String,
}

impl Default for Remote {
    fn default() -> Self {
        Self {
            host: "https://api.github.com".to_string(),
            owner: "janiltonmaciel".to_string(),
            repo: "version-gen".to_string(),
            path: "data/data.tar.gz".to_string(),
        }
    }
}

impl Remote {
    /// `<host>/repos/<owner>/<repo>/contents/<path>`
    pub fn url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.host.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.path.trim_start_matches('/')
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            home: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            remote: Remote::default(),
        }
    }
}

impl Config {
    /// Loads a `Config` from a file path.
    ///
    /// # Errors
    /// Returns an error if the file can't be read or deserialized.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the explicitly given file, or the default `config.toml` when `path` is `None`.
    ///
    /// A missing default file yields [`Config::default`]; a missing explicit file is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Config::load(path),
            None => {
                let path = get_default_config_file()?;
                if path.exists() {
                    Config::load(path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    /// Saves the `Config` to the given file path in pretty TOML format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// `GITHUB_TOKEN` replaces the token and `DHUB_HOME` the cache root. Without any
    /// token, the build-time `DHUB_TOKEN` is used.
    pub fn apply_env<F>(mut self, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }
        if let Some(home) = lookup(HOME_ENV).filter(|h| !h.is_empty()) {
            self.home = Some(PathBuf::from(home));
        }
        if self.token.is_none() {
            self.token = BUILD_TOKEN.filter(|t| !t.is_empty()).map(str::to_string);
        }
        self
    }

    /// Applies overrides from the process environment.
    pub fn with_process_env(self) -> Config {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// The directory holding the unpacked dataset and the staleness marker.
    pub fn cache_root(&self) -> Result<PathBuf> {
        match &self.home {
            Some(home) => Ok(home.clone()),
            None => get_default_cache_root(),
        }
    }

    /// A zero deadline would fail every fetch immediately, so it falls back to the default.
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_remote_url() {
        let remote = Remote::default();
        assert_eq!(
            remote.url(),
            "https://api.github.com/repos/janiltonmaciel/version-gen/contents/data/data.tar.gz"
        );
    }

    #[test]
    fn test_remote_url_trims_slashes() {
        let remote = Remote {
            host: "http://127.0.0.1:8080/".to_string(),
            owner: "o".to_string(),
            repo: "r".to_string(),
            path: "/d.tar.gz".to_string(),
        };
        assert_eq!(remote.url(), "http://127.0.0.1:8080/repos/o/r/contents/d.tar.gz");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = 3\n[remote]\nowner = \"someone\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.remote.owner, "someone");
        assert_eq!(config.remote.repo, "version-gen");
        assert!(config.home.is_none());
    }

    #[test]
    fn test_default_timeout_is_fifteen_seconds() {
        assert_eq!(Config::default().timeout(), Duration::from_secs(15));

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(Config::load(&path).unwrap().timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = 0\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            token: Some("secret".to_string()),
            home: Some(dir.path().join("cache")),
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load_or_default(Some(&missing)).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let config = Config {
            token: Some("from-file".to_string()),
            ..Config::default()
        };
        let config = config.apply_env(|key| match key {
            TOKEN_ENV => Some("from-env".to_string()),
            HOME_ENV => Some("/tmp/dhub-home".to_string()),
            _ => None,
        });
        assert_eq!(config.token.as_deref(), Some("from-env"));
        assert_eq!(config.cache_root().unwrap(), PathBuf::from("/tmp/dhub-home"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let config = Config {
            token: Some("from-file".to_string()),
            ..Config::default()
        };
        let config = config.apply_env(|_| Some(String::new()));
        assert_eq!(config.token.as_deref(), Some("from-file"));
        assert!(config.home.is_none());
    }
}
