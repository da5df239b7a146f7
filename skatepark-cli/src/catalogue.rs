//! Loading and rewriting the JSON park catalogue.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use skatepark_core::{MemoryParkStore, Park, ParkStore};
use skatepark_fs::{
    FileLock, file_is_file, lock_exclusive, read_utf8_file, write_utf8_file_atomic,
};

use crate::CliError;

/// On-disk catalogue document: `{ "parks": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Catalogue {
    #[serde(default)]
    pub(crate) parks: Vec<Park>,
}

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_catalogue(path: &Utf8Path) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingCatalogue {
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingCatalogue {
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectCatalogue {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Hold the catalogue's advisory lock until the returned guard drops.
pub(crate) fn lock_catalogue(path: &Utf8Path) -> Result<FileLock, CliError> {
    lock_exclusive(path).map_err(|source| CliError::LockCatalogue {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the catalogue at `path` into a store, rejecting duplicate ids.
pub(crate) fn load_store(path: &Utf8Path) -> Result<MemoryParkStore, CliError> {
    let catalogue = load_catalogue(path)?;
    let store = MemoryParkStore::new(catalogue.parks).map_err(|source| {
        CliError::InvalidCatalogue {
            path: path.to_path_buf(),
            source,
        }
    })?;
    log::debug!("Loaded {} parks from {path}", store.parks().len());
    Ok(store)
}

/// Decode a JSON catalogue from disk.
pub(crate) fn load_catalogue(path: &Utf8Path) -> Result<Catalogue, CliError> {
    let contents = read_utf8_file(path).map_err(|source| CliError::ReadCatalogue {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::ParseCatalogue {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the catalogue at `path` with `parks`.
pub(crate) fn save_catalogue(path: &Utf8Path, parks: Vec<Park>) -> Result<(), CliError> {
    let catalogue = Catalogue { parks };
    let mut payload =
        serde_json::to_string_pretty(&catalogue).map_err(CliError::SerialiseOutput)?;
    payload.push('\n');
    write_utf8_file_atomic(path, &payload).map_err(|source| CliError::WriteCatalogue {
        path: path.to_path_buf(),
        source,
    })
}
