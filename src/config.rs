use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Dashboard type driven by the `load-dashboard` command.
pub const TREE_CELLSCAPE: &str = "TREE_CELLSCAPE";

/// One dashboard load described in YAML: analysis metadata plus the input
/// files for each record type.
#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    pub analysis_id: String,
    pub title: String,
    pub jira_id: String,
    #[serde(default)]
    pub library_ids: Vec<String>,
    #[serde(default)]
    pub sample_ids: Vec<String>,
    pub project: String,
    pub description: String,
    #[serde(default)]
    pub files: FilesConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilesConfig {
    pub tree: Option<PathBuf>,
    pub tree_order: Option<PathBuf>,
    pub tree_root: Option<String>,
    pub tree_edges: Option<PathBuf>,
    #[serde(default)]
    pub segs: Vec<PathBuf>,
    #[serde(default)]
    pub metrics: Vec<PathBuf>,
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Index name for one record type of one analysis:
    /// `<dashboard>_<analysis_id>_<suffix>`, lowercased throughout.
    pub fn index_name(&self, dashboard: &str, suffix: &str) -> String {
        format!(
            "{}_{}_{}",
            dashboard.to_lowercase(),
            self.analysis_id.to_lowercase(),
            suffix.to_lowercase()
        )
    }

    /// The analysis index record announcing this dashboard load.
    pub fn analysis_entry(&self, dashboard: &str) -> Value {
        json!({
            "analysis_id": self.analysis_id,
            "title": self.title,
            "jira_id": self.jira_id,
            "library_ids": self.library_ids,
            "sample_ids": self.sample_ids,
            "project": self.project,
            "description": self.description,
            "dashboard": dashboard
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
analysis_id: SC-123
title: Patient 9 clonal decomposition
jira_id: AN-42
library_ids:
  - A9618
sample_ids:
  - SA609
project: DLP
description: Re-run with corrected ordering
files:
  tree: /data/sc123/tree.gml
  tree_order: /data/sc123/ordering.tsv
  segs:
    - /data/sc123/segs.csv
"#;

    fn sample_config() -> DashboardConfig {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        DashboardConfig::load(file.path()).unwrap()
    }

    #[test]
    fn config_parsed_from_yaml() {
        let config = sample_config();
        assert_eq!(config.analysis_id, "SC-123");
        assert_eq!(config.files.tree.as_deref(), Some(Path::new("/data/sc123/tree.gml")));
        assert_eq!(config.files.segs.len(), 1);
        assert!(config.files.tree_edges.is_none());
        assert!(config.files.metrics.is_empty());
    }

    #[test]
    fn index_name_lowercased() {
        let config = sample_config();
        assert_eq!(
            config.index_name(TREE_CELLSCAPE, "tree"),
            "tree_cellscape_sc-123_tree"
        );
    }

    #[test]
    fn analysis_entry_record_shape() {
        let config = sample_config();
        let entry = config.analysis_entry(TREE_CELLSCAPE);
        assert_eq!(entry["analysis_id"], "SC-123");
        assert_eq!(entry["dashboard"], "TREE_CELLSCAPE");
        assert_eq!(entry["library_ids"][0], "A9618");
    }
}
