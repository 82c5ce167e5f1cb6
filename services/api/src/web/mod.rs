pub mod generation_task;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod ws_handler;

// Re-export the handlers to make them easily accessible
// to the binary that builds the web server router.
pub use middleware::log_requests;
pub use rest::{generate_script_handler, list_options_handler};
pub use ws_handler::ws_handler;
