use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, path::PathBuf, str::FromStr};

use crate::errors::SyndiffError;

/// Which line-diff implementation renders the hunks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiffEngine {
    /// Run the external `diff -C 1` utility and rewrite its output.
    #[default]
    External,
    /// Render the context diff in-process with a Myers line diff.
    Embedded,
}

impl fmt::Display for DiffEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiffEngine::External => "external",
            DiffEngine::Embedded => "embedded",
        })
    }
}

impl FromStr for DiffEngine {
    type Err = SyndiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "external" => Ok(DiffEngine::External),
            "embedded" => Ok(DiffEngine::Embedded),
            other => Err(SyndiffError::InvalidArgument(format!(
                "unknown diff engine `{other}`"
            ))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SyndiffConfig {
    pub engine: DiffEngine,
    pub diff_program: PathBuf,
    /// Parent of the per-call scratch directory; the system temp dir when unset.
    pub scratch_root: Option<PathBuf>,
    /// Leave the scratch directory on disk after the call, for debugging.
    pub keep_scratch: bool,
}

impl Default for SyndiffConfig {
    fn default() -> Self {
        Self {
            engine: DiffEngine::External,
            diff_program: PathBuf::from("diff"),
            scratch_root: None,
            keep_scratch: false,
        }
    }
}

impl SyndiffConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, SyndiffError> {
        toml::from_str(content).map_err(|e| SyndiffError::InvalidConfig(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, SyndiffError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{DiffEngine, SyndiffConfig};
    use crate::errors::SyndiffError;

    #[test]
    fn missing_keys_take_defaults() {
        let config = SyndiffConfig::from_toml_str("engine = \"embedded\"\n").unwrap();
        assert_eq!(config.engine, DiffEngine::Embedded);
        assert_eq!(config.diff_program, PathBuf::from("diff"));
        assert!(config.scratch_root.is_none());
        assert!(!config.keep_scratch);
    }

    #[test]
    fn full_config() {
        let config = SyndiffConfig::from_toml_str(
            "engine = \"external\"\n\
             diff_program = \"/usr/bin/diff\"\n\
             scratch_root = \"/var/tmp\"\n\
             keep_scratch = true\n",
        )
        .unwrap();
        assert_eq!(config.engine, DiffEngine::External);
        assert_eq!(config.diff_program, PathBuf::from("/usr/bin/diff"));
        assert_eq!(config.scratch_root, Some(PathBuf::from("/var/tmp")));
        assert!(config.keep_scratch);
    }

    #[test]
    fn unknown_engine_is_rejected() {
        assert!(matches!(
            SyndiffConfig::from_toml_str("engine = \"patience\"\n"),
            Err(SyndiffError::InvalidConfig(_))
        ));
        assert!("Embedded".parse::<DiffEngine>().is_ok());
        assert!("patience".parse::<DiffEngine>().is_err());
    }
}
