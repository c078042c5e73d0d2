use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use loopreader_core::settings::KeyValueStore;

#[derive(Debug)]
pub(super) enum FileStoreError {
    Io(io::Error),
    InvalidKey,
}

impl fmt::Display for FileStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "store i/o failed: {err}"),
            Self::InvalidKey => f.write_str("store key contains unsupported characters"),
        }
    }
}

impl From<io::Error> for FileStoreError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Key-value store keeping one file per key inside a directory.
#[derive(Debug)]
pub(super) struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub(super) fn open(root: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub(super) fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, FileStoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'));
        if !valid {
            return Err(FileStoreError::InvalidKey);
        }
        Ok(self.root.join(key))
    }
}

impl KeyValueStore for FileStore {
    type Error = FileStoreError;

    fn get(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        // Write-then-rename so a crash never leaves a truncated value.
        let staging = path.with_extension("tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use loopreader_core::settings::{SessionSettings, TEXT_KEY, VOLUME_KEY};

    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!(
            "loopreader-{tag}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn values_round_trip_through_files() {
        let dir = scratch_dir("roundtrip");
        let mut store = FileStore::open(&dir).unwrap();

        assert_eq!(store.get(TEXT_KEY).unwrap(), None);
        store.set(TEXT_KEY, "line one\nline two").unwrap();
        store.set(VOLUME_KEY, "0.30").unwrap();

        let mut reopened = FileStore::open(&dir).unwrap();
        let session = SessionSettings::load(&mut reopened);
        assert_eq!(session.text, "line one\nline two");
        assert_eq!(session.volume, 0.3);

        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let dir = scratch_dir("keys");
        let mut store = FileStore::open(&dir).unwrap();

        assert!(matches!(
            store.set("../escape", "x"),
            Err(FileStoreError::InvalidKey)
        ));
        assert!(matches!(store.get(""), Err(FileStoreError::InvalidKey)));

        fs::remove_dir_all(&dir).unwrap();
    }
}
