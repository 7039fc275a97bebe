pub mod error;
pub mod sfx;
pub mod store;
