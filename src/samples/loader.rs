use std::fmt;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::log::debug;

pub const DEFAULT_SAMPLE_DIR: &str = "books_json_sample";

const SAMPLE_EXTENSION: &str = "json";

// ImportSample is a canned import payload used to pre-populate the import
// form. The content stays an opaque string; whatever document it encodes is
// decoded by the remote service, never here.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSample {
    pub format: String,
    pub content: String,
}

impl ImportSample {
    pub fn new(format: &str, content: &str) -> ImportSample {
        ImportSample {
            format: format.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum SampleError {
    Missing {
        name: String,
    },
    Read {
        name: String,
        message: String,
    },
    Parse {
        name: String,
        message: String,
    },
    Shape {
        name: String,
        message: String,
    },
}

impl SampleError {
    pub fn missing(name: &str) -> SampleError {
        SampleError::Missing { name: name.to_string() }
    }

    pub fn read(name: &str, message: &str) -> SampleError {
        SampleError::Read { name: name.to_string(), message: message.to_string() }
    }

    pub fn parse(name: &str, message: &str) -> SampleError {
        SampleError::Parse { name: name.to_string(), message: message.to_string() }
    }

    pub fn shape(name: &str, message: &str) -> SampleError {
        SampleError::Shape { name: name.to_string(), message: message.to_string() }
    }
}

impl Display for SampleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::Missing { name } => {
                write!(f, "sample {} does not exist", name)
            }
            SampleError::Read { name, message } => {
                write!(f, "sample {} unreadable: {}", name, message)
            }
            SampleError::Parse { name, message } => {
                write!(f, "sample {} is not valid JSON: {}", name, message)
            }
            SampleError::Shape { name, message } => {
                write!(f, "sample {} has unexpected shape: {}", name, message)
            }
        }
    }
}

// SampleStore reads bundled sample files from a fixed directory. The
// directory is read-only from this system's perspective.
#[derive(Debug, Clone)]
pub struct SampleStore {
    dir: PathBuf,
}

impl Default for SampleStore {
    fn default() -> SampleStore {
        SampleStore::new(DEFAULT_SAMPLE_DIR)
    }
}

impl SampleStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> SampleStore {
        SampleStore { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        self.dir.as_path()
    }

    // Sorted sample file names. A missing directory means no samples are
    // bundled, not an error.
    pub fn list_sample_files(&self) -> Vec<String> {
        let entries = match fs::read_dir(self.dir.as_path()) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .map(|ext| ext == SAMPLE_EXTENSION)
                    .unwrap_or(false)
            })
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    pub fn load_sample_content(&self, filename: &str) -> Option<String> {
        let path = self.dir.join(filename);
        if !path.exists() {
            return None;
        }
        fs::read_to_string(path).ok()
    }

    // Strict surface: distinguishes a missing file from unreadable,
    // unparsable, or wrongly shaped content.
    pub fn read_import_sample(&self, filename: &str) -> Result<ImportSample, SampleError> {
        let path = self.dir.join(filename);
        if !path.exists() {
            return Err(SampleError::missing(filename));
        }
        let raw = fs::read_to_string(path)
            .map_err(|err| SampleError::read(filename, err.to_string().as_str()))?;
        let value: Value = serde_json::from_str(raw.as_str())
            .map_err(|err| SampleError::parse(filename, err.to_string().as_str()))?;
        let map = match value {
            Value::Object(map) => map,
            _ => return Err(SampleError::shape(filename, "not a JSON object")),
        };
        let format = match map.get("format") {
            Some(Value::String(format)) => format.clone(),
            _ => return Err(SampleError::shape(filename, "format missing or not a string")),
        };
        let content = match map.get("content") {
            Some(Value::String(content)) => content.clone(),
            _ => return Err(SampleError::shape(filename, "content missing or not a string")),
        };
        Ok(ImportSample { format, content })
    }

    // Folded surface used by the import form: any failure means no sample.
    pub fn load_import_sample(&self, filename: &str) -> Option<ImportSample> {
        match self.read_import_sample(filename) {
            Ok(sample) => Some(sample),
            Err(err) => {
                debug!("{}", err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use crate::samples::loader::{ImportSample, SampleError, SampleStore};

    fn write_sample(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[tokio::test]
    async fn test_should_list_sorted_sample_files() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(dir.path(), "zeta.json", "{}");
        write_sample(dir.path(), "alpha.json", "{}");
        write_sample(dir.path(), "notes.txt", "skip me");

        let store = SampleStore::new(dir.path());
        assert_eq!(vec!["alpha.json", "zeta.json"], store.list_sample_files());
    }

    #[tokio::test]
    async fn test_should_list_nothing_for_missing_directory() {
        let store = SampleStore::new("no/such/sample/dir");
        assert!(store.list_sample_files().is_empty());
    }

    #[tokio::test]
    async fn test_should_load_raw_sample_content() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(dir.path(), "raw.json", "{\"format\": \"json\"}");

        let store = SampleStore::new(dir.path());
        assert_eq!(
            Some("{\"format\": \"json\"}".to_string()),
            store.load_sample_content("raw.json")
        );
        assert_eq!(None, store.load_sample_content("absent.json"));
    }

    #[tokio::test]
    async fn test_should_read_well_formed_sample() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(
            dir.path(),
            "import_xml.json",
            "{\"format\": \"xml\", \"content\": \"<?xml version=\\\"1.0\\\"?><catalog/>\"}",
        );

        let store = SampleStore::new(dir.path());
        let sample = store.load_import_sample("import_xml.json").unwrap();
        assert_eq!("xml", sample.format.as_str());
        assert!(sample.content.starts_with("<?xml"));
    }

    #[tokio::test]
    async fn test_should_keep_json_content_as_opaque_string() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(
            dir.path(),
            "import_json.json",
            "{\"format\": \"json\", \"content\": \"{\\\"catalog\\\": []}\"}",
        );

        let store = SampleStore::new(dir.path());
        let sample = store.load_import_sample("import_json.json").unwrap();
        assert_eq!(ImportSample::new("json", "{\"catalog\": []}"), sample);
    }

    #[tokio::test]
    async fn test_should_fold_failures_to_no_sample() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(dir.path(), "broken.json", "not json at all");
        write_sample(dir.path(), "array.json", "[1, 2, 3]");
        write_sample(dir.path(), "partial.json", "{\"format\": \"json\"}");
        write_sample(
            dir.path(),
            "badtype.json",
            "{\"format\": 7, \"content\": \"x\"}",
        );

        let store = SampleStore::new(dir.path());
        assert_eq!(None, store.load_import_sample("missing.json"));
        assert_eq!(None, store.load_import_sample("broken.json"));
        assert_eq!(None, store.load_import_sample("array.json"));
        assert_eq!(None, store.load_import_sample("partial.json"));
        assert_eq!(None, store.load_import_sample("badtype.json"));
    }

    #[tokio::test]
    async fn test_should_distinguish_failure_causes() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(dir.path(), "broken.json", "not json at all");
        write_sample(dir.path(), "array.json", "[1, 2, 3]");
        write_sample(dir.path(), "partial.json", "{\"content\": \"x\"}");

        let store = SampleStore::new(dir.path());
        assert!(matches!(
            store.read_import_sample("missing.json"),
            Err(SampleError::Missing { .. })
        ));
        assert!(matches!(
            store.read_import_sample("broken.json"),
            Err(SampleError::Parse { .. })
        ));
        assert!(matches!(
            store.read_import_sample("array.json"),
            Err(SampleError::Shape { .. })
        ));
        assert!(matches!(
            store.read_import_sample("partial.json"),
            Err(SampleError::Shape { .. })
        ));
    }
}
