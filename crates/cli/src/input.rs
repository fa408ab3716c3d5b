//! `--params` argument loading: inline JSON or `@path` (tilde-expanded)

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

pub fn load<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let text = match raw.strip_prefix('@') {
        Some(path) => {
            let path = shellexpand::tilde(path);
            std::fs::read_to_string(path.as_ref())
                .with_context(|| format!("Failed to read params file {}", path))?
        }
        None => raw.to_string(),
    };

    serde_json::from_str(&text).context("Invalid JSON params")
}

/// Like [`load`], defaulting to `T::default()` when no params were given
pub fn load_or_default<T: DeserializeOwned + Default>(raw: Option<&str>) -> Result<T> {
    raw.map(load).transpose().map(Option::unwrap_or_default)
}
