pub mod config;
pub mod path;
pub mod types;
pub mod value;

pub use config::{OmniConfig, ResponseMode, DEFAULT_CACHE_DIR};
pub use path::{PathError, TablePath};
pub use types::*;
pub use value::ColumnValue;
