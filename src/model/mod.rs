pub mod arrangement;
pub mod column;
pub mod config;

pub use arrangement::*;
pub use column::*;
pub use config::*;
