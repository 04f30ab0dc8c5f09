pub mod engine;
pub mod typed;
