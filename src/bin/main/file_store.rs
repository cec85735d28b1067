use std::{fs, io, path::PathBuf};

use swipedeck_core::feed::KeyValueStore;

/// One file per key under `root`. Writes go through a temp file and a
/// rename so a crash never leaves half a value behind.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    type Error = io::Error;

    fn get(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use swipedeck_core::feed::{SeenLedger, UserScope};

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "swipedeck-file-store-{}-{name}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn values_survive_reopen() {
        let dir = scratch("reopen");
        let mut store = FileStore::open(&dir).unwrap();
        assert_eq!(store.get("favorites:byUser").unwrap(), None);

        store.set("favorites:byUser", r#"{"__anon__":["1"]}"#).unwrap();
        assert!(dir.join("favorites_byUser.json").exists());

        let mut reopened = FileStore::open(&dir).unwrap();
        assert_eq!(
            reopened.get("favorites:byUser").unwrap().as_deref(),
            Some(r#"{"__anon__":["1"]}"#)
        );

        reopened.remove("favorites:byUser").unwrap();
        reopened.remove("favorites:byUser").unwrap();
        assert_eq!(reopened.get("favorites:byUser").unwrap(), None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn seen_ledger_persists_to_disk() {
        let dir = scratch("seen");
        let store = FileStore::open(&dir).unwrap();
        let scope = UserScope::User("u-7".into());

        let mut ledger = SeenLedger::load(store.clone(), &scope).unwrap();
        ledger.mark_seen("3").unwrap();

        let reloaded = SeenLedger::load(store, &scope).unwrap();
        assert!(reloaded.is_seen("3"));
        assert!(dir.join("seen_events_v1_u-7.json").exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
