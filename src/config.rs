//! User configuration (`config.toml`).
//!
//! Every key is optional. Problems with the file are reported as warnings and
//! the built-in defaults are used instead.

use directories::ProjectDirs;
use serde::Deserialize;
use sheetxfer_core::{Limits, Operation};
use sheetxfer_engine::engine::DEFAULT_PREVIEW_ROWS;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// Resolved settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub preview_rows: usize,
    pub operation: Operation,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            operation: Operation::default(),
            limits: Limits::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    preview: Option<PreviewSection>,
    transfer: Option<TransferSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PreviewSection {
    rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TransferSection {
    operation: Option<String>,
    max_rows: Option<usize>,
    max_cols: Option<usize>,
}

/// Load the config from `config_file`, or the user config dir when `None`.
///
/// A missing default file is not an error; a missing explicit file is.
pub fn load_config(config_file: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let Some(path) = config_file.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match read_config_file(&path) {
        Ok(content) => {
            let (config, parse_warnings) = parse_config(&content, &path.display().to_string());
            warnings.extend(parse_warnings);
            (config, warnings)
        }
        Err(err) => {
            warnings.push(err);
            (Config::default(), warnings)
        }
    }
}

fn read_config_file(path: &Path) -> Result<String, String> {
    let meta = std::fs::metadata(path)
        .map_err(|err| format!("Failed to read {}: {}", path.display(), err))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(format!(
            "Refusing to read {}: config file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        ));
    }
    std::fs::read_to_string(path).map_err(|err| format!("Failed to read {}: {}", path.display(), err))
}

/// Parse config text. `origin` names the file in warnings.
pub fn parse_config(content: &str, origin: &str) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let mut config = Config::default();

    let file = match toml::from_str::<ConfigFile>(content) {
        Ok(file) => file,
        Err(err) => {
            warnings.push(format!("Failed to parse {}: {}", origin, err));
            return (config, warnings);
        }
    };

    if let Some(rows) = file.preview.and_then(|p| p.rows) {
        if rows == 0 {
            warnings.push(format!("{}: preview.rows must be at least 1", origin));
        } else {
            config.preview_rows = rows;
        }
    }

    if let Some(transfer) = file.transfer {
        if let Some(name) = transfer.operation {
            match name.parse::<Operation>() {
                Ok(op) => config.operation = op,
                Err(err) => warnings.push(format!("{}: {}", origin, err)),
            }
        }
        match transfer.max_rows {
            Some(0) => warnings.push(format!("{}: transfer.max_rows must be at least 1", origin)),
            Some(n) => config.limits.max_rows = n,
            None => {}
        }
        match transfer.max_cols {
            Some(0) => warnings.push(format!("{}: transfer.max_cols must be at least 1", origin)),
            Some(n) => config.limits.max_cols = n,
            None => {}
        }
    }

    (config, warnings)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sheetxfer")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
