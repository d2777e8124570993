pub mod context;
pub mod dose;
pub mod engine;
