//! Config-file layer: location search and line parsing.
//!
//! The file format is deliberately minimal: `#` starts a comment to end of
//! line, blank lines are skipped, and every remaining line is a
//! `KEY<whitespace>VALUE` pair. No quoting, no sections, no multi-line
//! values.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;

use crate::error::ConfError;

/// Settings for the config-file layer.
///
/// Locations are directories tried in order; the empty string means the
/// current working directory. The first location whose joined path exists
/// wins. A missing config file is not an error, a found-but-unreadable or
/// malformed one is.
pub struct FileConfig {
    /// The config file name, e.g. `myproject-params.conf`. `None` disables
    /// the layer entirely.
    pub name: Option<String>,
    /// Directories to search, in order.
    pub locations: Vec<Utf8PathBuf>,
    /// Inline file content for tests, bypassing the disk search.
    pub inline: Option<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            name: None,
            locations: vec![Utf8PathBuf::new(), Utf8PathBuf::from("/etc/")],
            inline: None,
        }
    }
}

/// Builder for [`FileConfig`].
#[derive(Default)]
pub struct FileConfigBuilder {
    config: FileConfig,
}

impl FileConfigBuilder {
    /// Create a new file config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the config file name to search for.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// Set the directories to search, in order. `""` means the current
    /// working directory.
    pub fn locations<I, P>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        self.config.locations = locations.into_iter().map(|p| p.into()).collect();
        self
    }

    /// Set inline content for testing (avoids disk I/O).
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.config.inline = Some(content.into());
        self
    }

    pub(crate) fn build(self) -> FileConfig {
        self.config
    }
}

/// The parsed config-file layer.
pub struct FileLayer {
    /// The file that was actually read, if any was found.
    pub path: Option<Utf8PathBuf>,
    /// Raw values keyed by config-file key. Duplicate keys in the file keep
    /// the last occurrence.
    pub entries: IndexMap<String, String>,
}

impl FileLayer {
    fn empty() -> Self {
        Self {
            path: None,
            entries: IndexMap::new(),
        }
    }
}

/// Locate and parse the config file described by `config`.
///
/// `name_override` replaces the configured file name for this call only.
/// When no file exists at any location the layer is empty, not an error.
pub fn read_file(config: &FileConfig, name_override: Option<&str>) -> Result<FileLayer, ConfError> {
    if let Some(content) = &config.inline {
        let path = Utf8PathBuf::from("<inline>");
        let entries = parse_content(content, &path)?;
        return Ok(FileLayer {
            path: Some(path),
            entries,
        });
    }

    let Some(name) = name_override.or(config.name.as_deref()) else {
        return Ok(FileLayer::empty());
    };

    for location in &config.locations {
        let path = location.join(name);
        if !path.is_file() {
            continue;
        }
        tracing::debug!(%path, "reading config file");
        let content = std::fs::read_to_string(&path).map_err(|e| ConfError::FileRead {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let entries = parse_content(&content, &path)?;
        return Ok(FileLayer {
            path: Some(path),
            entries,
        });
    }

    tracing::debug!(name, "no config file found at any location");
    Ok(FileLayer::empty())
}

fn parse_content(content: &str, path: &Utf8Path) -> Result<IndexMap<String, String>, ConfError> {
    let mut entries = IndexMap::new();

    for (idx, raw_line) in content.lines().enumerate() {
        // Strip everything from the first '#' onward.
        let line = raw_line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let (key, value) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(key), Some(value), None) => (key, value),
            _ => {
                return Err(ConfError::MalformedLine {
                    path: path.to_owned(),
                    line: idx + 1,
                })
            }
        };

        // Last occurrence of a duplicate key wins.
        entries.insert(key.to_string(), value.to_string());
    }

    Ok(entries)
}
