//! Configuration types and the boot-time parser
//!
//! The config file is compiled into the firmware; see [`toml::parse_config`].

pub mod toml;
pub mod types;

pub use types::*;
