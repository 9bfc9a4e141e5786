use std::{fs, path::Path};

use miette::Diagnostic;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    errors::{FileFormat, FileOperation, IoError, ParseError},
    utils::is_c_identifier,
};

pub const DEFAULT_BLOB_PREFIX: &str = "filerom";
pub const DEFAULT_HEADERS: [&str; 2] = ["filesystem.h", "assertions.h"];

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(ramfs_gen::config::io))]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid exclude pattern: {pattern}")]
    #[diagnostic(
        code(ramfs_gen::config::invalid_exclude),
        help("Exclude patterns use the `regex` crate syntax and match virtual paths like `/sub/b.bin`")
    )]
    InvalidExclude {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("blob prefix `{prefix}` is not a valid C identifier")]
    #[diagnostic(
        code(ramfs_gen::config::invalid_blob_prefix),
        help("Use letters, digits and underscores only, not starting with a digit")
    )]
    InvalidBlobPrefix { prefix: String },

    #[error("header name `{header}` cannot be placed in an #include line")]
    #[diagnostic(code(ramfs_gen::config::invalid_header))]
    InvalidHeader { header: String },
}

/// Settings read from an optional TOML file. Every key may be left out.
///
/// ```toml
/// headers = ["filesystem.h", "assertions.h"]
/// blob_prefix = "filerom"
/// sort = true
/// exclude = ['(^|/)\.git$']
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Headers pulled in with `#include "..."` after the standard ones.
    pub headers: Vec<String>,
    /// Name prefix of the generated byte arrays.
    pub blob_prefix: String,
    /// Sort directory entries by name instead of keeping the host's order.
    pub sort: bool,
    /// Regexes matched against virtual paths. Matching entries are skipped, directories with
    /// their whole subtree.
    pub exclude: Vec<String>,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            headers: DEFAULT_HEADERS.iter().map(|header| header.to_string()).collect(),
            blob_prefix: DEFAULT_BLOB_PREFIX.to_string(),
            sort: true,
            exclude: Vec::new(),
        }
    }
}
impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let parsed: Config = toml::from_str(&content)
            .map_err(|error| ParseError::new(FileFormat::Toml, path.to_path_buf(), error))?;

        parsed.validate()?;

        log::debug!("loaded config from {}: {:?}", path.display(), parsed);

        Ok(parsed)
    }
    /// Checks everything that ends up verbatim in the generated C source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_c_identifier(&self.blob_prefix) {
            return Err(ConfigError::InvalidBlobPrefix {
                prefix: self.blob_prefix.clone(),
            });
        }

        if let Some(header) = self
            .headers
            .iter()
            .find(|header| header.is_empty() || header.contains(['"', '\n', '\r']))
        {
            return Err(ConfigError::InvalidHeader {
                header: header.clone(),
            });
        }

        self.exclude_patterns().map(|_| ())
    }
    pub fn exclude_patterns(&self) -> Result<Vec<Regex>, ConfigError> {
        self.exclude
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|error| ConfigError::InvalidExclude {
                    pattern: pattern.clone(),
                    source: error,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let file = write_config("");
        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.headers, vec!["filesystem.h", "assertions.h"]);
        assert_eq!(config.blob_prefix, "filerom");
        assert!(config.sort);
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn test_overrides() {
        let file = write_config(
            r#"
            headers = ["vfs.h"]
            blob_prefix = "romdata"
            sort = false
            exclude = ['\.swp$']
            "#,
        );
        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.headers, vec!["vfs.h"]);
        assert_eq!(config.blob_prefix, "romdata");
        assert!(!config.sort);
        assert_eq!(config.exclude_patterns().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_key_is_a_parse_error() {
        let file = write_config("blob_perfix = \"oops\"");

        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let file = write_config("blob_prefix = \"9lives\"");
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::InvalidBlobPrefix { .. })
        ));

        let file = write_config("exclude = ['(unclosed']");
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::InvalidExclude { .. })
        ));

        let file = write_config("headers = ['bad\"header.h']");
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            Config::from_file(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
