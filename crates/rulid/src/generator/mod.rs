mod locked;
mod monotonic;
mod mutex;
mod pool;

pub use locked::*;
pub use monotonic::*;
pub use mutex::*;
pub use pool::*;
