pub mod config;
pub mod document;
pub mod error;
pub mod range;
pub mod value;

pub use config::Config;
pub use document::*;
pub use error::*;
pub use range::Range;
pub use value::TypedValue;
