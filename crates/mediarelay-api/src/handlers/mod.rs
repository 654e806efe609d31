pub mod health;
pub mod passthrough;
pub mod upload;
