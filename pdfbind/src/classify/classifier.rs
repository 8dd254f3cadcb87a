//! File-name classification.
//!
//! Each role is described by a [`RolePattern`]: a list of synonym phrases and
//! a case-sensitivity flag. A name matches a role when it contains any of the
//! synonyms as a substring. Roles are matched independently, so one name can
//! match several roles; conflicts are left to the resolver.

use serde::Serialize;
use std::collections::BTreeMap;

use super::Role;
use crate::source::SourceFile;

/// How case sensitivity of role patterns is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CasePolicy {
    /// Each pattern keeps its own flag (title page and changes table are
    /// case-insensitive, info sheet and main body are case-sensitive).
    #[default]
    PerRole,
    /// Every pattern is matched case-insensitively.
    Insensitive,
}

/// Synonym phrases recognising one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolePattern {
    /// Phrases searched for as substrings of the file name.
    pub synonyms: Vec<String>,
    /// Whether the search is case-sensitive.
    pub case_sensitive: bool,
}

impl RolePattern {
    /// Create a case-sensitive pattern.
    pub fn sensitive<S: Into<String>>(synonyms: impl IntoIterator<Item = S>) -> Self {
        Self {
            synonyms: synonyms.into_iter().map(Into::into).collect(),
            case_sensitive: true,
        }
    }

    /// Create a case-insensitive pattern.
    pub fn insensitive<S: Into<String>>(synonyms: impl IntoIterator<Item = S>) -> Self {
        Self {
            synonyms: synonyms.into_iter().map(Into::into).collect(),
            case_sensitive: false,
        }
    }

    /// Check whether `name` contains any synonym.
    pub fn matches(&self, name: &str, policy: CasePolicy) -> bool {
        let case_sensitive = self.case_sensitive && policy == CasePolicy::PerRole;

        if case_sensitive {
            self.synonyms.iter().any(|s| name.contains(s.as_str()))
        } else {
            let name = name.to_lowercase();
            self.synonyms
                .iter()
                .any(|s| name.contains(s.to_lowercase().as_str()))
        }
    }
}

/// Patterns for every role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolePatterns {
    patterns: BTreeMap<Role, RolePattern>,
}

impl RolePatterns {
    /// Pattern for a role, if one is configured.
    pub fn get(&self, role: Role) -> Option<&RolePattern> {
        self.patterns.get(&role)
    }

    /// Replace the pattern of one role.
    pub fn with(mut self, role: Role, pattern: RolePattern) -> Self {
        self.patterns.insert(role, pattern);
        self
    }

    /// Iterate over `(role, pattern)` pairs in canonical role order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &RolePattern)> {
        self.patterns.iter().map(|(role, pattern)| (*role, pattern))
    }
}

impl Default for RolePatterns {
    fn default() -> Self {
        let patterns = BTreeMap::from([
            (
                Role::TitlePage,
                RolePattern::insensitive(["титул", "обложка", "title", "cover"]),
            ),
            (
                Role::InfoCertificationSheet,
                RolePattern::sensitive(["ИУЛ", "Информационно-удостоверяющий лист"]),
            ),
            (
                Role::ChangesTable,
                RolePattern::insensitive([
                    "таблица регистрации изменений",
                    "change registration table",
                ]),
            ),
            (
                Role::MainBody,
                RolePattern::sensitive(["ПЗ", "Пояснительная записка"]),
            ),
        ]);
        Self { patterns }
    }
}

/// All files matching each role, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    matches: BTreeMap<Role, Vec<SourceFile>>,
}

impl Classification {
    /// Files matching a role, sorted by name then path.
    pub fn matches(&self, role: Role) -> &[SourceFile] {
        self.matches.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over every role with its matches, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &[SourceFile])> {
        Role::ALL.into_iter().map(|role| (role, self.matches(role)))
    }
}

/// Matches file names against role patterns.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    patterns: RolePatterns,
    policy: CasePolicy,
}

impl Classifier {
    /// Create a classifier.
    pub fn new(patterns: RolePatterns, policy: CasePolicy) -> Self {
        Self { patterns, policy }
    }

    /// Classify candidate files.
    ///
    /// Pure: the result depends only on the set of files, not their order.
    /// Files matching no role are dropped.
    pub fn classify(&self, files: &[SourceFile]) -> Classification {
        let mut sorted = files.to_vec();
        sorted.sort();
        sorted.dedup();

        let mut matches = BTreeMap::new();
        for (role, pattern) in self.patterns.iter() {
            let found: Vec<SourceFile> = sorted
                .iter()
                .filter(|file| pattern.matches(&file.name, self.policy))
                .cloned()
                .collect();

            log::debug!("{} file(s) match {}", found.len(), role);
            matches.insert(role, found);
        }

        Classification { matches }
    }
}
