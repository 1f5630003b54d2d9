pub mod cmd;
pub mod log;
pub mod random;
pub mod registry;
pub mod trace_setup;
