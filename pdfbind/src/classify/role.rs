//! Section roles of an assembled explanatory note.

use serde::Serialize;
use std::fmt;

/// The part a source PDF plays in the assembled document.
///
/// Variants are declared in canonical order, which is also the iteration
/// order of [`Role::ALL`] and the key order of every per-role map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Cover or title page.
    TitlePage,
    /// Information-certification sheet ("ИУЛ").
    InfoCertificationSheet,
    /// Change registration table.
    ChangesTable,
    /// Explanatory note body ("ПЗ"). Required.
    MainBody,
}

impl Role {
    /// Every role, in canonical order.
    pub const ALL: [Role; 4] = [
        Role::TitlePage,
        Role::InfoCertificationSheet,
        Role::ChangesTable,
        Role::MainBody,
    ];

    /// Stable machine-readable key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::TitlePage => "title-page",
            Self::InfoCertificationSheet => "info-certification-sheet",
            Self::ChangesTable => "changes-table",
            Self::MainBody => "main-body",
        }
    }

    /// Human-readable label used in status lines and errors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TitlePage => "title page",
            Self::InfoCertificationSheet => "information-certification sheet",
            Self::ChangesTable => "change registration table",
            Self::MainBody => "explanatory note",
        }
    }

    /// Whether assembly cannot proceed without this role.
    pub fn is_required(&self) -> bool {
        matches!(self, Self::MainBody)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
