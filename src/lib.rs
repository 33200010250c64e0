pub mod changelog;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod forge;
pub mod repo;
pub mod version;

pub use cli::{Args, Command};
pub use error::{KeeperError, Result};
