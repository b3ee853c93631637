pub mod gmail;
pub mod notion;
