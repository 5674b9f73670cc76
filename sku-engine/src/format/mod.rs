//! SKU string formatting and code normalization
//!
//! Pure functions, no I/O. `formatter` owns the canonical
//! `BRAND-CATEGORY-SIZE-COLOR-SEQUENCE` shape; `normalizer` maps
//! free-text size/color input to short codes.

pub mod formatter;
pub mod normalizer;

pub use formatter::{build, parse};
pub use normalizer::{normalize_color, normalize_size};
