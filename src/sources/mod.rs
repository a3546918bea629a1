//! Source normalizers
//!
//! Each normalizer turns one raw extract into a table keyed uniquely by
//! (country, year). They are pure functions over a [`RawTable`]; reading the
//! extracts from disk is left to [`crate::pipeline`].
//!
//! [`RawTable`]: crate::utils::io::RawTable

pub mod sipri;
pub mod ucdp;
pub mod wdi;

pub use sipri::{StatusClass, classify_status};
