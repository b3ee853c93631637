pub mod error;
pub mod gmail;
pub mod notion;
mod response;
pub mod settings;
