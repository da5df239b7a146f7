//! Test helpers for building catalogues in temporary directories.

use camino::{Utf8Path, Utf8PathBuf};
use skatepark_core::test_support::sample_directory;
use skatepark_core::{Park, ParkId};
use tempfile::TempDir;

use crate::catalogue::{Catalogue, load_catalogue};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

/// A catalogue file living in its own temporary directory.
#[derive(Debug)]
pub(super) struct CatalogueFixture {
    _dir: TempDir,
    root: Utf8PathBuf,
    path: Utf8PathBuf,
}

impl CatalogueFixture {
    /// An empty directory; the catalogue file is not written.
    pub(super) fn empty() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let path = root.join("parks.json");
        Self {
            _dir: dir,
            root,
            path,
        }
    }

    /// A catalogue holding the shared sample directory.
    pub(super) fn sample() -> Self {
        Self::with_parks(sample_directory())
    }

    pub(super) fn with_parks(parks: Vec<Park>) -> Self {
        let fixture = Self::empty();
        let payload = serde_json::to_string_pretty(&Catalogue { parks }).expect("serialise parks");
        write_utf8(&fixture.path, payload.as_bytes());
        fixture
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub(super) fn stored_park(&self, id: &str) -> Park {
        load_catalogue(&self.path)
            .expect("catalogue should reload")
            .parks
            .into_iter()
            .find(|park| park.id == ParkId::from(id))
            .unwrap_or_else(|| panic!("park {id} missing from catalogue"))
    }
}

/// Decode the JSON array printed by `rank` and return the park ids in order.
pub(super) fn listed_ids(stdout: &[u8]) -> Vec<String> {
    let rows: Vec<serde_json::Value> = serde_json::from_slice(stdout).expect("rank output JSON");
    rows.iter()
        .map(|row| row["id"].as_str().expect("row id").to_owned())
        .collect()
}
