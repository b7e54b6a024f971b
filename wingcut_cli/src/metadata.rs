//! On-disk bookkeeping: `map.json` indexes every processed image by a hash of
//! its path, and each image gets a `<hash>.json` session record next to it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};
use wingcut::{LoopState, SessionRecord};

const INDEX_FILE: &str = "map.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub file: PathBuf,
    pub state: LoopState,
}

#[derive(Debug)]
pub struct MetadataStore {
    dir: PathBuf,
    index: BTreeMap<String, IndexEntry>,
}

impl MetadataStore {
    /// Opens `dir`, creating it if needed. A corrupt index is replaced by an
    /// empty one.
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

        let index_path = dir.join(INDEX_FILE);
        let index = match std::fs::read(&index_path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                warn!("{} is not a valid index ({err}), starting empty", index_path.display());
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Ok(Self {
            dir: dir.to_path_buf(),
            index,
        })
    }

    pub fn key(image: &Path) -> String {
        common::hash_hex(&image.to_string_lossy())
    }

    pub fn state_of(&self, image: &Path) -> Option<LoopState> {
        self.index.get(&Self::key(image)).map(|entry| entry.state)
    }

    fn record_path(&self, image: &Path) -> PathBuf {
        self.dir.join(format!("{}.json", Self::key(image)))
    }

    /// The stored record of `image`, if it exists and parses.
    pub fn load_record(&self, image: &Path) -> Option<SessionRecord> {
        let path = self.record_path(image);
        let bytes = std::fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("ignoring unreadable record {}: {err}", path.display());
                None
            }
        }
    }

    /// Writes the record of `image` and updates the index with its state.
    pub fn save(&mut self, image: &Path, record: &SessionRecord) -> anyhow::Result<()> {
        let path = self.record_path(image);
        let bytes = common::serde::serialize(record, common::SerdeFormat::Json)?;
        std::fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;

        self.index.insert(
            Self::key(image),
            IndexEntry {
                file: image.to_path_buf(),
                state: record.state,
            },
        );
        self.save_index()
    }

    fn save_index(&self) -> anyhow::Result<()> {
        let path = self.dir.join(INDEX_FILE);
        let bytes = common::serde::serialize(&self.index, common::SerdeFormat::Json)?;
        std::fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))
    }
}
