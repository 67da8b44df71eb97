mod classify;
mod migrate;
mod recommend;
mod server;

pub use classify::*;
pub use migrate::*;
pub use recommend::*;
pub use server::*;
