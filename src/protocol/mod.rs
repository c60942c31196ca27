pub mod frame;
pub mod messages;
pub mod pulse;
pub mod state;
