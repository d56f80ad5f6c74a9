use crate::payload::parse_payload;
use crate::source::BlocklistSource;
use crate::Result;
use std::fs;
use std::path::PathBuf;

/// Reads a blocklist payload from a local file; accepts the same formats as
/// the HTTP source.
#[derive(Debug, Clone)]
pub struct FileBlocklistSource {
    path: PathBuf,
}

impl FileBlocklistSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BlocklistSource for FileBlocklistSource {
    fn source_name(&self) -> &'static str {
        "file"
    }

    fn fetch_entries(&self) -> Result<Vec<String>> {
        let bytes = fs::read(&self.path)?;
        parse_payload(&String::from_utf8_lossy(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::FileBlocklistSource;
    use crate::{BlocklistSource, SourceError};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_plain_text_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("blocklist.txt");
        fs::write(&path, "0723456789\n+40744111222\n").expect("write");

        let entries = FileBlocklistSource::new(&path)
            .fetch_entries()
            .expect("entries");
        assert_eq!(entries, vec!["0723456789", "+40744111222"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp = TempDir::new().expect("temp dir");
        let err = FileBlocklistSource::new(temp.path().join("nope.txt"))
            .fetch_entries()
            .unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
