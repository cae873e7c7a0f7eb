pub mod api_client;
pub mod auth_client;
pub mod config;
pub mod dictionary;
pub mod history;
pub mod logging;
pub mod search_cache;
pub mod search_session;
pub mod text_formatter;
pub mod tui_app;
