//! Prelude module for iso_date_dedup crate.
//!
//! Re-exports the derive_more macros used for report labels and formatting.

#[allow(unused_imports)]
pub use derive_more::Display;
