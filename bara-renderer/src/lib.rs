//! # bara-renderer
//!
//! Builds glob lists and transformation clauses, and renders the
//! `copy.bara.sky` workflow document with Tera.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bara_core::JobConfig;
//! use bara_renderer::Synthesizer;
//!
//! fn print_config(job: &JobConfig) {
//!     if bara_core::validate(job).is_ok() {
//!         if let Ok(doc) = Synthesizer::new().and_then(|s| s.render(job)) {
//!             println!("{doc}");
//!         }
//!     }
//! }
//! ```

pub mod builder;
pub mod context;
pub mod engine;
pub mod error;

pub use builder::{build_transformations, glob_list_literal, TransformMethod, TransformationClause};
pub use context::ConfigContext;
pub use engine::Synthesizer;
pub use error::RenderError;
