// sensus-web-host library
// Serves the watchlist page and renders the latest watchlist natively

// Configuration
pub mod config;

// Embedded UI assets (single-binary distribution)
pub mod embedded;

// Native SQLite engine
pub mod engine;

// Database file access and schema
pub mod store;

// HTTP routes
pub mod server;
