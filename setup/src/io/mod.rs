//! Side-effecting helpers: filesystem, subprocesses, network, prompts.

pub mod composer_file;
pub mod db;
pub mod download;
pub mod fsops;
pub mod input;
pub mod process;
pub mod wp_cli;
pub mod wp_config_file;
