//! # Scroll Tree
//!
//! Virtue evolution paths loaded from a JSON file:
//!
//! ```json
//! { "alpha01": { "honor": ["oath", "trial"] }, "defaults": { "honor": ["vow"] } }
//! ```
//!
//! Lookup order is the user's entry, then `defaults`, then a synthesized
//! three-stage path. Empty lists fall through to the next source.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Key of the fallback section in the scroll file.
pub const DEFAULTS_KEY: &str = "defaults";

/// Ordered evolution stages per user and virtue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScrollTree {
    paths: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl ScrollTree {
    /// Load a scroll file. A missing or malformed file yields an empty tree.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    event = "scroll_tree_unavailable",
                    path = %path.display(),
                    error = %e,
                    "Scroll tree not loaded; using synthesized paths"
                );
                return Self::default();
            }
        };
        match Self::from_json(&contents) {
            Ok(tree) => {
                tracing::info!(path = %path.display(), users = tree.paths.len(), "Scroll tree loaded");
                tree
            }
            Err(e) => {
                tracing::warn!(
                    event = "scroll_tree_invalid",
                    path = %path.display(),
                    error = %e,
                    "Scroll tree is not valid JSON; using synthesized paths"
                );
                Self::default()
            }
        }
    }

    /// Parse a scroll tree from JSON text.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    fn lookup(&self, section: &str, virtue: &str) -> Option<&Vec<String>> {
        self.paths
            .get(section)
            .and_then(|virtues| virtues.get(virtue))
            .filter(|stages| !stages.is_empty())
    }

    /// Evolution path for a user and virtue.
    pub fn path_for(&self, user_id: &str, virtue: &str) -> Vec<String> {
        self.lookup(user_id, virtue)
            .or_else(|| self.lookup(DEFAULTS_KEY, virtue))
            .cloned()
            .unwrap_or_else(|| {
                vec![
                    format!("{virtue}_init"),
                    format!("{virtue}_path"),
                    format!("{virtue}_trial"),
                ]
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "alpha01": { "honor": ["oath", "trial", "crown"], "truth": [] },
        "defaults": { "honor": ["vow"], "truth": ["mirror", "lantern"] }
    }"#;

    #[test]
    fn user_then_defaults_then_synthesized() {
        let tree = ScrollTree::from_json(SAMPLE).expect("parse");
        assert_eq!(tree.path_for("alpha01", "honor"), ["oath", "trial", "crown"]);
        assert_eq!(tree.path_for("beta02", "honor"), ["vow"]);
        assert_eq!(
            tree.path_for("alpha01", "grace"),
            ["grace_init", "grace_path", "grace_trial"]
        );
    }

    #[test]
    fn empty_user_list_falls_through() {
        let tree = ScrollTree::from_json(SAMPLE).expect("parse");
        assert_eq!(tree.path_for("alpha01", "truth"), ["mirror", "lantern"]);
    }

    #[test]
    fn missing_file_is_empty_tree() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tree = ScrollTree::load(&dir.path().join("absent.json"));
        assert_eq!(tree, ScrollTree::default());
        assert_eq!(tree.path_for("x", "hope").len(), 3);
    }

    #[test]
    fn malformed_file_is_empty_tree() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert_eq!(ScrollTree::load(&path), ScrollTree::default());
    }
}
