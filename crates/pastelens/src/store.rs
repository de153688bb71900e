//! Named cipher profile storage.
//!
//! The classifier takes profiles as a plain slice; this module only exists so
//! front-ends have somewhere to keep them. [`JsonProfileStore`] persists an
//! ordered profile list as a pretty-printed JSON document.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use pastelens_crypto::CipherProfile;
use serde::{Deserialize, Serialize};
use tokio::fs as tokio_fs;
use tracing::{debug, trace};

use crate::error::{PastelensError, Result};

/// Anything that can hand out an ordered list of profiles.
pub trait ProfileStore {
    /// Profiles in sweep order.
    fn list(&self) -> Vec<CipherProfile>;
}

impl ProfileStore for [CipherProfile] {
    fn list(&self) -> Vec<CipherProfile> { self.to_vec() }
}

impl ProfileStore for Vec<CipherProfile> {
    fn list(&self) -> Vec<CipherProfile> { self.clone() }
}

#[derive(Default, Serialize, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profiles: Vec<CipherProfile>,
}

/// Profiles backed by a JSON file of the form `{"profiles": [...]}`.
#[derive(Debug, Clone)]
pub struct JsonProfileStore {
    path:     PathBuf,
    profiles: Vec<CipherProfile>,
}

impl JsonProfileStore {
    /// Loads the store at `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// I/O failures other than "not found", malformed JSON, invalid profiles
    /// and duplicate profile names.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        trace!("Opening profile store at {:?}", path);

        let profiles = match tokio_fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<ProfileFile>(&content)?.profiles,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Profile store {:?} does not exist yet", path);
                Vec::new()
            },
            Err(e) => return Err(e.into()),
        };

        let mut seen = HashSet::new();
        if let Some(duplicate) = profiles.iter().find(|profile| !seen.insert(profile.name())) {
            return Err(PastelensError::ConfigError {
                message: format!("duplicate profile name '{}'", duplicate.name()),
            });
        }

        debug!("Loaded {} profiles from {:?}", profiles.len(), path);
        Ok(Self {
            path,
            profiles,
        })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn profiles(&self) -> &[CipherProfile] { &self.profiles }

    pub fn get(&self, name: &str) -> Option<&CipherProfile> { self.profiles.iter().find(|profile| profile.name() == name) }

    /// Replaces the profile with the same name in place, or appends it.
    pub fn upsert(&mut self, profile: CipherProfile) {
        match self.profiles.iter_mut().find(|existing| existing.name() == profile.name()) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    /// Removes and returns the named profile.
    pub fn remove(&mut self, name: &str) -> Option<CipherProfile> {
        let index = self.profiles.iter().position(|profile| profile.name() == name)?;
        Some(self.profiles.remove(index))
    }

    /// Writes the store back to its file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Serialization or I/O failures.
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio_fs::create_dir_all(parent).await?;
            }
        }
        let file = ProfileFile {
            profiles: self.profiles.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        tokio_fs::write(&self.path, content).await?;
        debug!("Saved {} profiles to {:?}", self.profiles.len(), self.path);
        Ok(())
    }
}

impl ProfileStore for JsonProfileStore {
    fn list(&self) -> Vec<CipherProfile> { self.profiles.clone() }
}

#[cfg(test)]
mod tests {
    use pastelens_crypto::{BlockMode, KeyMaterial, SymmetricProfile};
    use tempfile::tempdir;

    use super::*;

    fn profile(name: &str) -> CipherProfile {
        SymmetricProfile::builder(name)
            .mode(BlockMode::Ecb)
            .key(KeyMaterial::hex("000102030405060708090a0b0c0d0e0f"))
            .build()
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let temp_dir = tempdir().unwrap();
        let store = JsonProfileStore::open(temp_dir.path().join("profiles.json"))
            .await
            .unwrap();
        assert!(store.profiles().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reopen() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("profiles.json");

        let mut store = JsonProfileStore::open(&path).await.unwrap();
        store.upsert(profile("first"));
        store.upsert(profile("second"));
        store.save().await.unwrap();

        let reopened = JsonProfileStore::open(&path).await.unwrap();
        let names: Vec<&str> = reopened.profiles().iter().map(CipherProfile::name).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(reopened.get("second"), Some(&profile("second")));
    }

    #[tokio::test]
    async fn test_upsert_keeps_position() {
        let temp_dir = tempdir().unwrap();
        let mut store = JsonProfileStore::open(temp_dir.path().join("p.json"))
            .await
            .unwrap();
        store.upsert(profile("a"));
        store.upsert(profile("b"));
        store.upsert(profile("a"));
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.profiles()[0].name(), "a");

        assert!(store.remove("a").is_some());
        assert!(store.remove("a").is_none());
        assert_eq!(store.list().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_names_rejected() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("profiles.json");
        let file = ProfileFile {
            profiles: vec![profile("same"), profile("same")],
        };
        tokio_fs::write(&path, serde_json::to_string(&file).unwrap())
            .await
            .unwrap();
        let result = JsonProfileStore::open(&path).await;
        assert!(matches!(result, Err(PastelensError::ConfigError { .. })));
    }

    #[tokio::test]
    async fn test_invalid_json_rejected() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("profiles.json");
        tokio_fs::write(&path, "{not json").await.unwrap();
        assert!(matches!(
            JsonProfileStore::open(&path).await,
            Err(PastelensError::Json { .. })
        ));
    }

    #[test]
    fn test_slice_store() {
        let profiles = vec![profile("x")];
        assert_eq!(profiles.as_slice().list(), profiles);
    }
}
