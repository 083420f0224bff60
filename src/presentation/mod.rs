// Presentation layer - Console front end standing in for the panel window
pub mod app_state;
pub mod commands;
pub mod console;
pub mod handlers;
