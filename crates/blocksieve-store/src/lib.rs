pub mod error;
pub mod paths;
pub mod read;
pub mod write;

pub use error::{Result, StoreError, StoreErrorKind};
pub use read::{read_table, InputInfo, InputTable};
pub use write::{Artifact, OutputView, OutputWriter};
