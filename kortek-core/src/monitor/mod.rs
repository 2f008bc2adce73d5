mod recorder;
mod summary;
mod types;


pub use recorder::*;
pub use summary::*;
pub use types::*;
