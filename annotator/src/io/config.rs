//! Annotator configuration, optionally stored in `annotator.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "annotator.toml";

/// Input and output locations for an annotation run (TOML).
///
/// Missing fields default to the layout the solving pipeline writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Dataset of `{id, question, answer}` records.
    pub dataset: PathBuf,

    /// Evaluation results with per-problem correctness details.
    pub evaluation: PathBuf,

    /// Prediction index mapping problem ids to trace logs.
    pub predictions: PathBuf,

    /// Where the annotation array is written.
    pub output: PathBuf,

    /// Base directory for relative `trace_file` entries.
    pub traces_root: PathBuf,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/processed/olympiadbench_test_sampled_50.json"),
            evaluation: PathBuf::from("outputs/analysis/agent_evaluation.json"),
            predictions: PathBuf::from("outputs/agents/predictions_sample50_mt.json"),
            output: PathBuf::from("outputs/analysis/manual_annotations.json"),
            traces_root: PathBuf::from("."),
        }
    }
}

impl AnnotatorConfig {
    pub fn validate(&self) -> Result<()> {
        for (label, path) in [
            ("dataset", &self.dataset),
            ("evaluation", &self.evaluation),
            ("predictions", &self.predictions),
            ("output", &self.output),
            ("traces_root", &self.traces_root),
        ] {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("{label} must be a non-empty path"));
            }
        }
        Ok(())
    }

    /// Resolve a prediction's `trace_file` against `traces_root`.
    pub fn trace_path(&self, trace_file: &str) -> PathBuf {
        let path = Path::new(trace_file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.traces_root.join(path)
        }
    }
}

/// Per-field overrides, typically from CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub dataset: Option<PathBuf>,
    pub evaluation: Option<PathBuf>,
    pub predictions: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub traces_root: Option<PathBuf>,
}

/// Apply overrides to the base config and validate the result.
pub fn apply_overrides(
    mut base: AnnotatorConfig,
    overrides: &ConfigOverrides,
) -> Result<AnnotatorConfig> {
    if let Some(dataset) = &overrides.dataset {
        base.dataset = dataset.clone();
    }
    if let Some(evaluation) = &overrides.evaluation {
        base.evaluation = evaluation.clone();
    }
    if let Some(predictions) = &overrides.predictions {
        base.predictions = predictions.clone();
    }
    if let Some(output) = &overrides.output {
        base.output = output.clone();
    }
    if let Some(traces_root) = &overrides.traces_root {
        base.traces_root = traces_root.clone();
    }
    base.validate()?;
    Ok(base)
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AnnotatorConfig::default()`.
pub fn load_config(path: &Path) -> Result<AnnotatorConfig> {
    if !path.exists() {
        let cfg = AnnotatorConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AnnotatorConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, AnnotatorConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("annotator.toml");
        fs::write(&path, "output = \"out/annotations.json\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.output, PathBuf::from("out/annotations.json"));
        assert_eq!(cfg.dataset, AnnotatorConfig::default().dataset);
    }

    #[test]
    fn rejects_empty_paths() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("annotator.toml");
        fs::write(&path, "dataset = \"\"\n").expect("write");
        let err = load_config(&path).expect_err("empty dataset");
        assert!(err.to_string().contains("dataset"));
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let overrides = ConfigOverrides {
            traces_root: Some(PathBuf::from("/runs/7")),
            ..ConfigOverrides::default()
        };
        let merged = apply_overrides(AnnotatorConfig::default(), &overrides).expect("merge");
        assert_eq!(merged.traces_root, PathBuf::from("/runs/7"));
        assert_eq!(merged.output, AnnotatorConfig::default().output);
    }

    #[test]
    fn trace_paths_resolve_against_root() {
        let cfg = AnnotatorConfig {
            traces_root: PathBuf::from("/runs"),
            ..AnnotatorConfig::default()
        };
        assert_eq!(cfg.trace_path("t/p1.jsonl"), PathBuf::from("/runs/t/p1.jsonl"));
        assert_eq!(cfg.trace_path("/abs/p1.jsonl"), PathBuf::from("/abs/p1.jsonl"));
    }
}
