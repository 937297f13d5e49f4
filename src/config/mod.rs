//! Configuration management

mod settings;

pub use settings::{parse_bool, Settings};
