//! Configuration trees and the walker that flattens them.
//!
//! A tree describes the folders and template files of a project:
//!
//! ```yaml
//! src:
//!   path: src
//!   files:
//!     - src/app.ts
//!   config:
//!     path: src/config
//!     files:
//!       - src/config/routes.json
//! ```
//!
//! `path` and `files` entries are relative to the project root. The walker
//! never joins `path` segments across levels; callers pre-compose the
//! destination they want every entry to land under.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;

/// Key marking a folder entry.
pub const PATH_KEY: &str = "path";
/// Key marking a list of template file stems.
pub const FILES_KEY: &str = "files";

/// One entry of a [`ConfigTree`], in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    Path(String),
    Files(Vec<String>),
    Child(String, ConfigTree),
}

/// An ordered configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTree {
    entries: Vec<TreeEntry>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.entries.push(TreeEntry::Path(path.into()));
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .push(TreeEntry::Files(files.into_iter().map(Into::into).collect()));
        self
    }

    pub fn with_child(mut self, name: impl Into<String>, child: ConfigTree) -> Self {
        self.entries.push(TreeEntry::Child(name.into(), child));
        self
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Look up a named sub-tree.
    pub fn child(&self, name: &str) -> Option<&ConfigTree> {
        self.entries.iter().find_map(|entry| match entry {
            TreeEntry::Child(key, tree) if key == name => Some(tree),
            _ => None,
        })
    }

    /// Total number of `files` entries across all levels.
    pub fn file_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                TreeEntry::Files(files) => files.len(),
                TreeEntry::Child(_, tree) => tree.file_count(),
                TreeEntry::Path(_) => 0,
            })
            .sum()
    }
}

impl<'de> Deserialize<'de> for ConfigTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TreeVisitor)
    }
}

struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = ConfigTree;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of `path`, `files` and named sub-trees")
    }

    fn visit_unit<E: de::Error>(self) -> Result<ConfigTree, E> {
        Ok(ConfigTree::new())
    }

    fn visit_map<A>(self, mut map: A) -> Result<ConfigTree, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut tree = ConfigTree::new();
        while let Some(key) = map.next_key::<String>()? {
            let entry = match key.as_str() {
                PATH_KEY => TreeEntry::Path(map.next_value()?),
                FILES_KEY => TreeEntry::Files(map.next_value()?),
                _ => {
                    let child = map.next_value::<ConfigTree>()?;
                    TreeEntry::Child(key, child)
                }
            };
            tree.entries.push(entry);
        }
        Ok(tree)
    }
}

/// A template-to-target record produced by [`flatten_files`].
#[derive(Debug, Clone, PartialEq)]
pub struct FileMapRecord {
    /// Template resource, relative to the renderer's root.
    pub template: String,
    /// Destination, relative to the generation root.
    pub target: String,
    /// Data bound into the template.
    pub props: Option<Value>,
}

/// Flatten every `files` entry of `tree` into file-map records.
///
/// `source` prefixes the template path and `extension` is appended to it;
/// `destination` prefixes the target.
pub fn flatten_files(
    source: Option<&str>,
    destination: Option<&str>,
    extension: &str,
    tree: &ConfigTree,
    props: Option<&Value>,
) -> Vec<FileMapRecord> {
    let mut records = Vec::with_capacity(tree.file_count());
    collect_files(source, destination, extension, tree, props, &mut records);
    records
}

fn collect_files(
    source: Option<&str>,
    destination: Option<&str>,
    extension: &str,
    tree: &ConfigTree,
    props: Option<&Value>,
    out: &mut Vec<FileMapRecord>,
) {
    for entry in &tree.entries {
        match entry {
            TreeEntry::Files(files) => {
                out.extend(files.iter().map(|file| FileMapRecord {
                    template: format!("{}.{extension}", join(source, file)),
                    target: join(destination, file),
                    props: props.cloned(),
                }));
            }
            TreeEntry::Child(_, child) => {
                collect_files(source, destination, extension, child, props, out)
            }
            TreeEntry::Path(_) => {}
        }
    }
}

/// Flatten every `path` entry of `tree` into destination folders.
pub fn flatten_folders(destination: Option<&str>, tree: &ConfigTree) -> Vec<String> {
    let mut folders = Vec::new();
    collect_folders(destination, tree, &mut folders);
    folders
}

fn collect_folders(destination: Option<&str>, tree: &ConfigTree, out: &mut Vec<String>) {
    for entry in &tree.entries {
        match entry {
            TreeEntry::Path(path) => out.push(join(destination, path)),
            TreeEntry::Child(_, child) => collect_folders(destination, child, out),
            TreeEntry::Files(_) => {}
        }
    }
}

fn join(prefix: Option<&str>, segment: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}/{segment}"),
        _ => segment.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend_tree() -> ConfigTree {
        ConfigTree::new()
            .with_child(
                "root",
                ConfigTree::new().with_files(["package.json", ".gitignore"]),
            )
            .with_child(
                "src",
                ConfigTree::new()
                    .with_path("src")
                    .with_files(["src/app.ts"])
                    .with_child(
                        "config",
                        ConfigTree::new()
                            .with_path("src/config")
                            .with_files(["src/config/routes.json"]),
                    )
                    .with_child(
                        "migrations",
                        ConfigTree::new().with_path("src/database/migrations"),
                    ),
            )
    }

    #[test]
    fn one_record_per_file_entry() {
        let tree = backend_tree();
        let records = flatten_files(Some("express"), Some("demo"), "jinja", &tree, None);

        assert_eq!(records.len(), tree.file_count());
        assert_eq!(records.len(), 4);
        for record in &records {
            assert!(record.target.starts_with("demo/"));
            let stem = record.target.trim_start_matches("demo/");
            assert_eq!(record.template, format!("express/{stem}.jinja"));
        }
    }

    #[test]
    fn records_follow_declaration_order() {
        let records = flatten_files(None, None, "jinja", &backend_tree(), None);
        let targets: Vec<_> = records.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(
            targets,
            [
                "package.json",
                ".gitignore",
                "src/app.ts",
                "src/config/routes.json"
            ]
        );
        assert_eq!(records[0].template, "package.json.jinja");
    }

    #[test]
    fn props_are_attached_to_every_record() {
        let props = json!({ "projectName": "Demo" });
        let records = flatten_files(None, Some("demo"), "jinja", &backend_tree(), Some(&props));
        assert!(records.iter().all(|r| r.props.as_ref() == Some(&props)));
    }

    #[test]
    fn folders_are_not_accumulated_across_levels() {
        let folders = flatten_folders(Some("demo"), &backend_tree());
        assert_eq!(
            folders,
            ["demo/src", "demo/src/config", "demo/src/database/migrations"]
        );
    }

    #[test]
    fn empty_destination_yields_bare_paths() {
        let folders = flatten_folders(Some(""), &backend_tree());
        assert_eq!(folders[0], "src");
    }

    #[test]
    fn files_may_coexist_with_children() {
        let tree = ConfigTree::new()
            .with_child("a", ConfigTree::new().with_files(["a/one"]))
            .with_files(["top"]);
        let records = flatten_files(None, None, "jinja", &tree, None);
        let targets: Vec<_> = records.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, ["a/one", "top"]);
    }

    #[test]
    fn deserializes_in_mapping_order() {
        let yaml = r#"
src:
  files: [src/b.ts]
  path: src
  nested:
    path: src/nested
    files: [src/nested/a.ts]
"#;
        let tree: ConfigTree = serde_yaml::from_str(yaml).unwrap();
        let src = tree.child("src").unwrap();
        assert!(matches!(src.entries()[0], TreeEntry::Files(_)));
        assert!(matches!(src.entries()[1], TreeEntry::Path(_)));
        assert_eq!(tree.file_count(), 2);
        assert_eq!(
            flatten_folders(None, &tree),
            ["src", "src/nested"]
        );
    }

    #[test]
    fn rejects_scalar_sub_trees() {
        let yaml = "src: not-a-tree\n";
        assert!(serde_yaml::from_str::<ConfigTree>(yaml).is_err());
    }
}
