pub mod command;
pub mod config;
mod event;
pub mod permissions;
pub mod plan;
pub mod policy;

pub use event::EventType;

const USER_AGENT: &str = "derek (https://github.com/alexellis/derek)";
