use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use breakeven_core::project::KeyValueStore;
use breakeven_core::{BreakevenError, BreakevenResult};

const EXTENSION: &str = "json";

/// One file per key under a directory. Keys are percent-encoded into
/// file names so any key round-trips through `keys()`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl AsRef<Path>) -> BreakevenResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| io_error(&root, e))?;
        Ok(FileStore { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", encode_key(key), EXTENSION))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> BreakevenError {
    BreakevenError::Storage(format!("{}: {}", path.display(), e))
}

fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn decode_key(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = encoded.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> BreakevenResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn put(&self, key: &str, value: String) -> BreakevenResult<()> {
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|e| io_error(&path, e))
    }

    fn delete(&self, key: &str) -> BreakevenResult<bool> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn keys(&self) -> BreakevenResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| io_error(&self.root, e))?;
        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error(&self.root, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(decode_key)
            {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breakeven_core::project::ProjectRepository;
    use breakeven_core::worksheet::Worksheet;

    #[test]
    fn test_key_encoding_round_trip() {
        for key in ["project:Salon", "project:My Café 2024", "plain"] {
            assert_eq!(decode_key(&encode_key(key)).as_deref(), Some(key));
        }
        assert_eq!(encode_key("project:a b"), "project%3Aa%20b");
    }

    #[test]
    fn test_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("project:x").unwrap(), None);

        store.put("project:x", "{}".to_string()).unwrap();
        assert_eq!(store.get("project:x").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.keys().unwrap(), vec!["project:x".to_string()]);

        assert!(store.delete("project:x").unwrap());
        assert!(!store.delete("project:x").unwrap());
    }

    #[test]
    fn test_repository_on_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ProjectRepository::new(FileStore::open(dir.path()).unwrap());
        repo.save("Corner Café", &Worksheet::default()).unwrap();
        assert_eq!(repo.list().unwrap(), vec!["Corner Café".to_string()]);
        assert_eq!(repo.load("Corner Café").unwrap().worksheet, Worksheet::default());
    }
}
