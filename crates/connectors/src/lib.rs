pub mod models;
pub mod services;

// Callers build the shared HTTP client with the same version the connectors use.
pub use reqwest;
