mod interface;
mod sources;

pub use interface::*;
pub use sources::*;
