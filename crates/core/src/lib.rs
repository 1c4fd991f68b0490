pub mod config;
pub mod error;
pub mod value;

pub use config::Config;
pub use error::*;
pub use value::{Record, Value};
