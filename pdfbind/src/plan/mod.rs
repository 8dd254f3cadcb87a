//! Merge planning.
//!
//! Turns a [`RoleAssignment`] plus the page count of every loaded section
//! into an ordered [`MergePlan`]:
//!
//! 1. title page in full, then the explanatory note without its first
//!    `title pages` pages (or the whole note when there is no title page)
//! 2. change registration table in full, when present
//! 3. information-certification sheet in full, only when enabled
//!
//! Page indices are zero-based and ranges are end-exclusive throughout.
//!
//! Dropping the note's leading pages is a positional heuristic: the note is
//! assumed to embed a copy of the title page as its first pages. Nothing
//! checks that those pages actually match.

mod range;

pub use range::PageRange;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::classify::{Role, RoleAssignment};
use crate::error::{PdfBindError, Result};
use crate::source::SourceFile;

/// Default title of the change registration table bookmark.
pub const CHANGES_TABLE_LABEL: &str = "Таблица регистрации изменений";

/// Options that alter the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanOptions {
    /// Append the information-certification sheet as the last section.
    pub include_info_sheet: bool,
    /// Title of the change registration table bookmark.
    pub bookmark_label: String,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            include_info_sheet: false,
            bookmark_label: CHANGES_TABLE_LABEL.to_string(),
        }
    }
}

impl PlanOptions {
    /// Roles whose documents take part in the merge.
    pub fn merged_roles(&self) -> Vec<Role> {
        let mut roles = vec![Role::TitlePage, Role::MainBody, Role::ChangesTable];
        if self.include_info_sheet {
            roles.push(Role::InfoCertificationSheet);
        }
        roles
    }
}

/// Page count of every loaded section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCounts(BTreeMap<Role, usize>);

impl PageCounts {
    /// Create an empty set of counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the page count of a role.
    pub fn insert(&mut self, role: Role, pages: usize) {
        self.0.insert(role, pages);
    }

    /// Page count of a role, if loaded.
    pub fn get(&self, role: Role) -> Option<usize> {
        self.0.get(&role).copied()
    }
}

impl FromIterator<(Role, usize)> for PageCounts {
    fn from_iter<I: IntoIterator<Item = (Role, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One append operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MergeStep {
    /// Append every page of the document.
    Whole {
        /// Role of the document.
        role: Role,
        /// The document.
        source: SourceFile,
        /// Its page count.
        pages: usize,
    },
    /// Append the pages of the document inside `range`.
    Range {
        /// Role of the document.
        role: Role,
        /// The document.
        source: SourceFile,
        /// Pages to append.
        range: PageRange,
    },
}

impl MergeStep {
    /// Role of the appended document.
    pub fn role(&self) -> Role {
        match self {
            Self::Whole { role, .. } | Self::Range { role, .. } => *role,
        }
    }

    /// The appended document.
    pub fn source(&self) -> &SourceFile {
        match self {
            Self::Whole { source, .. } | Self::Range { source, .. } => source,
        }
    }

    /// Number of pages this step appends.
    pub fn page_count(&self) -> usize {
        match self {
            Self::Whole { pages, .. } => *pages,
            Self::Range { range, .. } => range.len(),
        }
    }
}

/// A named outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookmark {
    /// Entry title.
    pub label: String,
    /// Zero-based page index in the output.
    pub target_page: usize,
}

/// Ordered merge steps plus the bookmark to attach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergePlan {
    /// Steps in output order.
    pub steps: Vec<MergeStep>,
    /// Bookmark for the change registration table, if one is merged.
    pub bookmark: Option<Bookmark>,
    /// Pages the output will have.
    pub output_pages: usize,
}

impl MergePlan {
    /// Zero-based output index of the first page appended by each step.
    pub fn step_offsets(&self) -> Vec<usize> {
        self.steps
            .iter()
            .scan(0, |offset, step| {
                let start = *offset;
                *offset += step.page_count();
                Some(start)
            })
            .collect()
    }
}

/// Builds merge plans.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    options: PlanOptions,
}

impl Planner {
    /// Create a planner.
    pub fn new(options: PlanOptions) -> Self {
        Self { options }
    }

    /// Compute the merge plan.
    ///
    /// # Errors
    ///
    /// - `MissingRequiredDocument` if the explanatory note is absent
    /// - `PageRangeError` if the title page has more pages than the note
    /// - `MergeFailed` if a merged role has no recorded page count
    pub fn plan(&self, assignment: &RoleAssignment, counts: &PageCounts) -> Result<MergePlan> {
        let main = assignment.require(Role::MainBody)?;
        let main_pages = page_count(counts, Role::MainBody)?;

        let mut steps = Vec::new();

        match assignment.get(Role::TitlePage) {
            Some(title) => {
                let title_pages = page_count(counts, Role::TitlePage)?;
                steps.push(MergeStep::Whole {
                    role: Role::TitlePage,
                    source: title.clone(),
                    pages: title_pages,
                });

                let range = PageRange::new(title_pages, main_pages);
                if !range.fits(main_pages) {
                    return Err(PdfBindError::PageRangeError {
                        role: Role::MainBody,
                        path: main.path.clone(),
                        range,
                        total_pages: main_pages,
                    });
                }
                steps.push(MergeStep::Range {
                    role: Role::MainBody,
                    source: main.clone(),
                    range,
                });
            }
            None => steps.push(MergeStep::Whole {
                role: Role::MainBody,
                source: main.clone(),
                pages: main_pages,
            }),
        }

        if let Some(changes) = assignment.get(Role::ChangesTable) {
            steps.push(MergeStep::Whole {
                role: Role::ChangesTable,
                source: changes.clone(),
                pages: page_count(counts, Role::ChangesTable)?,
            });
        }

        if self.options.include_info_sheet
            && let Some(sheet) = assignment.get(Role::InfoCertificationSheet)
        {
            steps.push(MergeStep::Whole {
                role: Role::InfoCertificationSheet,
                source: sheet.clone(),
                pages: page_count(counts, Role::InfoCertificationSheet)?,
            });
        }

        let mut plan = MergePlan {
            steps,
            bookmark: None,
            output_pages: 0,
        };
        plan.output_pages = plan.steps.iter().map(MergeStep::page_count).sum();

        // The anchor is where the table actually lands, which is the note's
        // full page count whenever the title pages replace note pages 1:1.
        let offsets = plan.step_offsets();
        plan.bookmark = plan
            .steps
            .iter()
            .position(|step| step.role() == Role::ChangesTable)
            .map(|idx| Bookmark {
                label: self.options.bookmark_label.clone(),
                target_page: offsets[idx],
            });

        log::debug!(
            "planned {} step(s), {} output pages",
            plan.steps.len(),
            plan.output_pages
        );

        Ok(plan)
    }
}

fn page_count(counts: &PageCounts, role: Role) -> Result<usize> {
    counts
        .get(role)
        .ok_or_else(|| PdfBindError::merge_failed(format!("no page count for {role}")))
}
