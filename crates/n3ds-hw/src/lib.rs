//! Nintendo 3DS hardware specifications shared by the plugin crates.
//!
//! # References
//! - <https://www.3dbrew.org/wiki/Hardware>

pub mod specs;
