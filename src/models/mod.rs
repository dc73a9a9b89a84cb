//! Records returned by the persistence layer and the request shapes that feed it.

mod coach;
mod reservation;
mod tunnel;

pub use coach::*;
pub use reservation::*;
pub use tunnel::*;
