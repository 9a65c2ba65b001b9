//! Exposition formats.
//!
//! Only the Prometheus text format (0.0.4) is provided. Encoding never fails:
//! writes go to a `String` and label/help escaping is total.

pub mod text;
