//! Reading and writing the configuration record on disk.

use crate::model::Config;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Location of the record, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/ai_scientist_config.json";

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

/// Load the record at `path`. A missing file is `Ok(None)`; a file that
/// exists but cannot be read or parsed is an error.
pub fn load(path: &Path) -> Result<Option<Config>> {
    let data = match std::fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    let config: Config =
        serde_json::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(Some(config))
}

/// Serialize with 4-space indentation.
pub fn to_pretty_json(config: &Config) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut ser).context("serialize configuration")?;
    String::from_utf8(buf).context("configuration is not valid UTF-8")
}

/// Write the record, creating parent directories. The content goes to a
/// sibling temp file first and is renamed over `path`, so readers never see a
/// partial record.
pub fn save(path: &Path, config: &Config) -> Result<()> {
    let json = to_pretty_json(config)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;

    let file_name = path
        .file_name()
        .with_context(|| format!("{} has no file name", path.display()))?;
    let tmp_path = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));

    {
        let mut f = std::fs::File::create(&tmp_path)
            .with_context(|| format!("create {}", tmp_path.display()))?;
        f.write_all(json.as_bytes())
            .and_then(|_| f.write_all(b"\n"))
            .and_then(|_| f.sync_all())
            .with_context(|| format!("write {}", tmp_path.display()))?;
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e).with_context(|| format!("replace {}", path.display()));
    }
    debug!(path = %path.display(), "saved configuration");
    Ok(())
}
