mod date;
mod error;
pub mod listing;
pub mod preferences;
pub mod tag;

pub use date::*;
pub use error::*;
pub use listing::*;
pub use preferences::*;
pub use tag::*;
