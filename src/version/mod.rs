//! Version model and lookup
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Collector  │────▶│ Collection  │────▶│   Finder    │
//! │  (listing)  │     │  (sorted)   │     │  (resolve)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │ Constraint  │
//!                                         │ (matching)  │
//!                                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`]: `Version`, a release with its packages
//! - [`package`]: `Package` and `PackageKind`
//! - [`semver`]: Go release name to semantic version coercion
//! - [`constraint`]: Constraint expressions such as `~1.18` or `1.16 - 1.20`
//! - [`collection`]: Ascending version lists
//! - [`finder`]: Expression lookup for a target platform
//! - [`remote`]: `ls-remote` style filtering of a collector's versions

pub mod collection;
pub mod constraint;
pub mod finder;
pub mod package;
pub mod remote;
pub mod semver;
pub mod types;

pub use collection::Collection;
pub use constraint::Constraint;
pub use finder::{Finder, LATEST};
pub use package::{Package, PackageKind};
pub use types::Version;
