//! Persisting the annotation array.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::types::Annotation;

/// Write annotations as pretty-printed JSON with a trailing newline.
pub fn write_annotations(path: &Path, annotations: &[Annotation]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let mut payload = serde_json::to_string_pretty(annotations).context("serialize annotations")?;
    payload.push('\n');
    fs::write(path, payload).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn read_annotations(path: &Path) -> Result<Vec<Annotation>> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}
