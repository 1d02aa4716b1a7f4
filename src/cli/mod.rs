pub mod alternatives;
pub mod commands;
pub mod core;
pub mod format;
mod help;
pub mod io;
pub mod output;
mod shell;
pub mod shell_context;
pub mod system_clock;

pub use shell::run_cli;
