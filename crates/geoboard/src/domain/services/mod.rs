//! Domain Services
//!
//! Pure functions over domain values.

mod distance;

pub use distance::*;
