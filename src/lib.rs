pub mod command;
pub mod config;
pub mod controller;
pub mod lirc;
pub mod logging;
pub mod protocol;
pub mod store;
