//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod life_cycle;
mod repository_kind;

pub use life_cycle::*;
pub use repository_kind::*;
