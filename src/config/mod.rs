use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

const CONFIG_DIR: &str = ".praiselog";
const CONFIG_FILE: &str = "config.yml";

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "url", alias = "web_app_url")]
    pub endpoint: Option<String>,
    pub timeout: Option<u64>,
    pub export_dir: Option<String>,
    pub no_color: Option<bool>,
    pub full_text: Option<bool>,
    pub column_width: Option<usize>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write config '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What `load_config` does when the file does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IfMissing {
    /// The implicit default location: an absent file means an empty config.
    UseDefaults,
    /// A path the user named explicitly.
    Fail,
}

fn home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .into_iter()
        .find_map(env::var_os)
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

pub fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Resolves a leading `~` against the home directory; other paths pass through.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with(['/', '\\']) => &rest[1..],
        _ => return PathBuf::from(path),
    };
    match home_dir() {
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

pub fn load_config(path: &Path, if_missing: IfMissing) -> Result<ConfigFile, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return match if_missing {
                IfMissing::UseDefaults => Ok(ConfigFile::default()),
                IfMissing::Fail => Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                }),
            };
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_config(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_config(contents: &str) -> Result<ConfigFile, serde_yaml::Error> {
    // A file holding only comments parses as null.
    if contents.lines().all(|l| {
        let l = l.trim();
        l.is_empty() || l.starts_with('#')
    }) {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents)
}

fn default_config_yaml() -> &'static str {
    r#"# praiselog config
#
# Location (default):
#   ~/.praiselog/config.yml

# Record store web app URL (required). Answers GET with the record list and
# accepts POSTed submissions.
# endpoint: https://script.google.com/macros/s/<deployment-id>/exec

# Request timeout in seconds. Unset leaves the HTTP client default in place.
# timeout: 30

# Directory my_praise_records.xlsx is written to.
export_dir: .

# Output styling
no_color: false
full_text: false
column_width: 40
"#
}

/// Writes the commented default config unless a file is already there.
/// Returns whether a new file was written.
pub fn ensure_default_config_file(path: &Path) -> Result<bool, ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(write_err(e)),
    };
    file.write_all(default_config_yaml().as_bytes())
        .map_err(write_err)?;
    Ok(true)
}
