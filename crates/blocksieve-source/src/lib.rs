pub mod error;
pub mod file;
pub mod http;
pub mod payload;
pub mod source;

pub use error::{Result, SourceError};
pub use file::FileBlocklistSource;
pub use http::HttpBlocklistSource;
pub use payload::parse_payload;
pub use source::{BlocklistSource, StaticBlocklist};
