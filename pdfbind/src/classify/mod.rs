//! Classification of section PDFs by file name.
//!
//! - [`Classifier`] finds every file matching each role's pattern
//! - [`RoleResolver`] picks one representative per role
//!
//! # Examples
//!
//! ```
//! use pdfbind::classify::{Classifier, Role, RoleResolver};
//! use pdfbind::events::NullSink;
//! use pdfbind::source::SourceFile;
//!
//! let files = vec![
//!     SourceFile::from_path("project/Обложка.pdf"),
//!     SourceFile::from_path("project/ПЗ.pdf"),
//! ];
//! let classification = Classifier::default().classify(&files);
//! let assignment = RoleResolver::new().resolve(&classification, &mut NullSink);
//!
//! assert!(assignment.is_present(Role::TitlePage));
//! assert_eq!(assignment.require(Role::MainBody).unwrap().name, "ПЗ.pdf");
//! ```

pub mod classifier;
pub mod resolver;
pub mod role;

pub use classifier::{CasePolicy, Classification, Classifier, RolePattern, RolePatterns};
pub use resolver::{RoleAssignment, RoleResolver};
pub use role::Role;
