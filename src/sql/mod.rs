//! Parameter binding and row decoding shared by every `DbConn` implementation.

pub mod params;
mod row;
pub use params::*;
pub use row::*;
