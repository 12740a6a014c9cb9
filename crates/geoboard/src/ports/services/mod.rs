//! Service Ports
//!
//! Small capabilities the repositories consume.

mod clock;
mod id_generator;

pub use clock::*;
pub use id_generator::*;
