//! CLI configuration resolved from arguments and the environment.
use std::env;
use std::path::PathBuf;

/// Environment variable naming the default content directory.
pub const DATA_DIR_ENV: &str = "ATTRS_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "data";

/// Settings shared by every command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    pub data_dir: PathBuf,
}

impl CliConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ATTRS_DATA_DIR` - Content directory (default: `data`)
    pub fn from_env() -> Self {
        let data_dir = env::var(DATA_DIR_ENV)
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_owned());

        Self {
            data_dir: PathBuf::from(data_dir),
        }
    }

    /// Explicit `--data-dir` wins over the environment.
    pub fn resolve(data_dir: Option<PathBuf>) -> Self {
        match data_dir {
            Some(data_dir) => Self { data_dir },
            None => Self::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let config = CliConfig::resolve(Some(PathBuf::from("/srv/content")));
        assert_eq!(config.data_dir, PathBuf::from("/srv/content"));
    }
}
