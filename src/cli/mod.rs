mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{handle_categories, handle_merge, handle_serve, handle_show, handle_tasks};
