//! Role resolution.
//!
//! Picks one representative file per role out of the classifier's matches.
//! The policy is "first in sorted order"; the other matches stay available
//! through [`RoleAssignment::matches`] so callers can surface ambiguity.
//! Roles are resolved independently, so one file may serve several roles;
//! that is reported as well.

use serde::Serialize;
use std::collections::BTreeMap;

use super::{Classification, Role};
use crate::error::{PdfBindError, Result};
use crate::events::{AssemblyEvent, EventSink};
use crate::source::SourceFile;

/// The resolved file of every role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleAssignment {
    chosen: BTreeMap<Role, SourceFile>,
    candidates: BTreeMap<Role, Vec<SourceFile>>,
}

impl RoleAssignment {
    /// File chosen for a role, if the role is present.
    pub fn get(&self, role: Role) -> Option<&SourceFile> {
        self.chosen.get(&role)
    }

    /// Whether a role resolved to a file.
    pub fn is_present(&self, role: Role) -> bool {
        self.chosen.contains_key(&role)
    }

    /// File chosen for a role, or `MissingRequiredDocument`.
    pub fn require(&self, role: Role) -> Result<&SourceFile> {
        self.get(role).ok_or_else(|| PdfBindError::missing(role))
    }

    /// Every file that matched a role, in resolution order.
    pub fn matches(&self, role: Role) -> &[SourceFile] {
        self.candidates
            .get(&role)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Roles matched by more than one file.
    pub fn ambiguous_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.matches(*role).len() > 1)
            .collect()
    }

    /// Files chosen for more than one role, with those roles.
    pub fn shared_sources(&self) -> Vec<(SourceFile, Vec<Role>)> {
        let mut by_file: BTreeMap<&SourceFile, Vec<Role>> = BTreeMap::new();
        for (role, file) in &self.chosen {
            by_file.entry(file).or_default().push(*role);
        }

        by_file
            .into_iter()
            .filter(|(_, roles)| roles.len() > 1)
            .map(|(file, roles)| (file.clone(), roles))
            .collect()
    }

    /// Roles that resolved to a file, in canonical order.
    pub fn present_roles(&self) -> Vec<Role> {
        self.chosen.keys().copied().collect()
    }
}

/// Resolves a classification into a role assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleResolver;

impl RoleResolver {
    /// Create a resolver.
    pub fn new() -> Self {
        Self
    }

    /// Choose the first match of every role.
    ///
    /// Never fails: a missing required role is reported later by
    /// [`RoleAssignment::require`], so a dry run can still show what was found.
    pub fn resolve(
        &self,
        classification: &Classification,
        sink: &mut dyn EventSink,
    ) -> RoleAssignment {
        let mut assignment = RoleAssignment::default();

        for (role, found) in classification.iter() {
            let mut found = found.to_vec();
            found.sort();

            let chosen = found.first().cloned();

            sink.emit(&AssemblyEvent::RoleResolved {
                role,
                file: chosen.clone(),
                candidates: found.len(),
            });

            if let Some(chosen) = chosen {
                if found.len() > 1 {
                    sink.emit(&AssemblyEvent::AmbiguousRole {
                        role,
                        chosen: chosen.clone(),
                        ignored: found[1..].to_vec(),
                    });
                }
                assignment.chosen.insert(role, chosen);
            }

            assignment.candidates.insert(role, found);
        }

        for (file, roles) in assignment.shared_sources() {
            sink.emit(&AssemblyEvent::SharedSource { file, roles });
        }

        assignment
    }
}
