//! The narrow connection capability the persistence layer is written against.

mod conn;
pub mod mock;

pub use conn::{connect, DbConn};
pub use mock::{Expect, MockConn};
