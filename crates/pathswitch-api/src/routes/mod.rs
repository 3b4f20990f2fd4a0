//! API Routes

pub mod engine;
pub mod health;
pub mod history;
pub mod settings;
