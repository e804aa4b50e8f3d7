//! Command handlers, one module per subcommand.

pub mod build;
pub mod config;
pub mod handle;
pub mod render_static;
