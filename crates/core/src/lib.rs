pub mod config;
pub mod mapping;

pub use config::Config;
pub use mapping::*;
