pub mod snapshot;
pub mod universe;

pub use snapshot::{Link, WorldSnapshot};
pub use universe::Universe;
