pub mod agent;
pub mod request;
pub mod ui;
