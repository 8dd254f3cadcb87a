//! Document assembly.
//!
//! - [`pages`]: cuts page ranges out of source documents
//! - [`assembler`]: runs a [`MergePlan`](crate::plan::MergePlan) into one output document
//! - [`bookmarks`]: carries section outlines and attaches the change
//!   registration table bookmark
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::config::CompressionLevel;
//! use pdfbind::events::NullSink;
//! use pdfbind::io::LoadedSources;
//! use pdfbind::merge::{Assembler, BookmarkInjector};
//! use pdfbind::plan::MergePlan;
//!
//! # fn example(plan: MergePlan, sources: LoadedSources) -> pdfbind::Result<()> {
//! let assembler = Assembler::new();
//! let mut doc = assembler.assemble(&plan, &sources, &mut NullSink)?;
//! if let Some(bookmark) = &plan.bookmark {
//!     BookmarkInjector::new().inject(&mut doc, bookmark)?;
//! }
//! assembler.finalize(&mut doc, CompressionLevel::Standard);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod bookmarks;
pub mod pages;

pub use assembler::Assembler;
pub use bookmarks::{
    BookmarkInjector, OutlineEntry, OutlineNode, decode_text, encode_text, encode_title,
    read_outline, read_outline_tree,
};
pub use pages::PageExtractor;
