pub mod blocklist;
pub mod ids;
pub mod options;
pub mod phone;
pub mod table;

pub use blocklist::BlocklistSet;
pub use ids::JobId;
pub use options::{OutputFormat, ProcessingOptions};
pub use phone::{normalize_phone, PhoneNormalizer, PhoneValue};
pub use table::{clean_header, Cell, Row, Table};
