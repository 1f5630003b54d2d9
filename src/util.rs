pub mod cli;
pub mod runtimes;
