// walkmap-shared - Logging and configuration used by the walkmap tools

pub mod config;
pub mod log;
