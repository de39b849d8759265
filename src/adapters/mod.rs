// Adapters layer: concrete implementations of the domain ports.

pub mod json_store;

pub use json_store::{load_program, save_program, JsonFileStore};
