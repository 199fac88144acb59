//! Manual page staging for mantree.
//!
//! Turns the flat pages emitted by a CLI's manual-page generator
//! (`incus_config_device_add.md`) into a nested documentation tree
//! (`incus/config/device/add.md`) ready for a Sphinx/MyST site:
//!
//! 1. [`CommandGenerator`] runs the generator into the staging directory.
//! 2. [`NamespacePath`] decomposes each flat filename into segments.
//! 3. [`PageRewriter`] shifts headings and prepends a `(<flat-name>)=` anchor.
//! 4. [`TreeMaterializer`] writes pages to their nested location.
//! 5. [`NavigationInjector`] appends a hidden `toctree` to every directory's
//!    index page.
//! 6. [`mantree_publish::IncrementalPublisher`] copies changed files to the
//!    destination tree.
//!
//! [`Pipeline`] runs all of them in order.

mod error;
mod generator;
mod materializer;
mod namespace;
mod navigation;
mod page;
mod pipeline;
mod rewriter;

pub use error::{PipelineError, StageError};
pub use generator::{CommandGenerator, GeneratorError, PageGenerator};
pub use materializer::{Materialized, TreeMaterializer};
pub use namespace::{NamespaceError, NamespacePath};
pub use navigation::{DirectoryIndex, DirectoryNode, NavigationInjector, navigation_block};
pub use page::{StagedPage, collect_staged_pages};
pub use pipeline::{Pipeline, PipelineReport, StageConfig, StageReport, stage};
pub use rewriter::{PageRewriter, RewrittenPage, anchor_line};
