//! Dependency manifest merging (`package.json` style).
//!
//! Existing entries are never overwritten, whatever their version. Every
//! group named by a request is re-sorted by package name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// A dependency to add to a manifest group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Dependencies to add to one manifest group (`dependencies`,
/// `devDependencies`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGroup {
    pub group: String,
    pub packages: Vec<Dependency>,
}

/// Outcome of merging one group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupReport {
    pub group: String,
    pub added: Vec<Dependency>,
    pub skipped: Vec<Dependency>,
}

/// Outcome of a merge across all groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub groups: Vec<GroupReport>,
}

impl MergeReport {
    pub fn added_count(&self) -> usize {
        self.groups.iter().map(|g| g.added.len()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.groups.iter().map(|g| g.skipped.len()).sum()
    }

    /// `true` when the manifest has to be persisted.
    pub fn changed(&self) -> bool {
        self.added_count() > 0
    }
}

/// Merge `groups` into `manifest` in place.
///
/// Missing groups are created empty. The manifest must be a JSON object and
/// each touched group must be an object of name to version.
pub fn merge_dependencies(
    manifest: &mut Value,
    groups: &[DependencyGroup],
) -> Result<MergeReport, DomainError> {
    let root = manifest
        .as_object_mut()
        .ok_or_else(|| DomainError::MalformedManifest("root is not an object".into()))?;

    let mut report = MergeReport::default();

    for DependencyGroup { group, packages } in groups {
        let entries = root
            .entry(group.clone())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| DomainError::MalformedManifest(format!("'{group}' is not an object")))?;

        let mut group_report = GroupReport {
            group: group.clone(),
            ..GroupReport::default()
        };

        for dependency in packages {
            if entries.contains_key(&dependency.name) {
                group_report.skipped.push(dependency.clone());
            } else {
                entries.insert(
                    dependency.name.clone(),
                    Value::String(dependency.version.clone()),
                );
                group_report.added.push(dependency.clone());
            }
        }

        sort_object(entries);
        report.groups.push(group_report);
    }

    Ok(report)
}

fn sort_object(object: &mut Map<String, Value>) {
    let mut sorted: Vec<(String, Value)> = std::mem::take(object).into_iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    object.extend(sorted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn auth_groups() -> Vec<DependencyGroup> {
        vec![
            DependencyGroup {
                group: "dependencies".into(),
                packages: vec![
                    Dependency::new("jsonwebtoken", "^8.5.1"),
                    Dependency::new("bcrypt", "^5.0.0"),
                ],
            },
            DependencyGroup {
                group: "devDependencies".into(),
                packages: vec![Dependency::new("@types/bcrypt", "^3.0.0")],
            },
        ]
    }

    fn manifest() -> Value {
        json!({
            "name": "demo",
            "dependencies": { "express": "^4.17.1", "bcrypt": "^3.0.0" },
            "devDependencies": { "mocha": "^6.0.0" }
        })
    }

    #[test]
    fn existing_entries_are_skipped_regardless_of_version() {
        let mut doc = manifest();
        let report = merge_dependencies(&mut doc, &auth_groups()).unwrap();

        assert_eq!(report.groups[0].added, [Dependency::new("jsonwebtoken", "^8.5.1")]);
        assert_eq!(report.groups[0].skipped, [Dependency::new("bcrypt", "^5.0.0")]);
        assert_eq!(doc["dependencies"]["bcrypt"], "^3.0.0");
        assert!(report.changed());
    }

    #[test]
    fn groups_are_sorted_after_merge() {
        let mut doc = manifest();
        merge_dependencies(&mut doc, &auth_groups()).unwrap();

        let keys: Vec<_> = doc["dependencies"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["bcrypt", "express", "jsonwebtoken"]);
        let dev: Vec<_> = doc["devDependencies"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(dev, ["@types/bcrypt", "mocha"]);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut doc = manifest();
        merge_dependencies(&mut doc, &auth_groups()).unwrap();
        let after_first = doc.clone();

        let second = merge_dependencies(&mut doc, &auth_groups()).unwrap();
        assert!(!second.changed());
        assert_eq!(second.skipped_count(), 3);
        assert_eq!(doc, after_first);
    }

    #[test]
    fn missing_group_is_created() {
        let mut doc = json!({ "name": "demo" });
        let report = merge_dependencies(&mut doc, &auth_groups()).unwrap();
        assert_eq!(report.added_count(), 3);
        assert_eq!(doc["devDependencies"]["@types/bcrypt"], "^3.0.0");
    }

    #[test]
    fn non_object_manifest_is_rejected() {
        let mut doc = json!([]);
        assert!(matches!(
            merge_dependencies(&mut doc, &auth_groups()),
            Err(DomainError::MalformedManifest(_))
        ));

        let mut doc = json!({ "dependencies": "nope" });
        assert!(merge_dependencies(&mut doc, &auth_groups()).is_err());
    }

    #[test]
    fn unrelated_keys_keep_their_position() {
        let mut doc = manifest();
        merge_dependencies(&mut doc, &auth_groups()).unwrap();
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["name", "dependencies", "devDependencies"]);
    }
}
