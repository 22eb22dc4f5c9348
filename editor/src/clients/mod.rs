mod client;
mod config;
mod error;
mod notes_client;

// Re-export public types
pub use client::NotesApi;
pub use config::ApiConfig;
pub use error::ApiError;
pub use notes_client::HttpNotesClient;
