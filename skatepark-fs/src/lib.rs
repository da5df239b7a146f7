//! Capability-based file access for catalogue files, built on `cap-std` and
//! `camino`.
//!
//! Catalogues are small JSON documents that are read whole and rewritten
//! whole. Rewrites go through a sibling temporary file so a crash never
//! leaves a half-written catalogue behind.
#![forbid(unsafe_code)]

use std::io::{self, Read, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 file path using ambient authority.
///
/// # Errors
/// Returns the underlying IO error when the file cannot be opened.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole UTF-8 file into memory.
///
/// # Errors
/// Fails when the file cannot be opened or is not valid UTF-8.
pub fn read_utf8_file(path: &Utf8Path) -> io::Result<String> {
    let mut contents = String::new();
    open_utf8_file(path)?.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Return whether a path exists and is a regular file.
///
/// # Errors
/// Fails when the parent directory cannot be opened.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Replace the contents of `path`, creating parent directories as needed.
///
/// The data is written to a hidden sibling file first and then renamed over
/// the target, so readers see either the old or the new contents.
///
/// # Errors
/// Returns the first IO error hit while staging or renaming the file. The
/// staging file is removed again on failure.
pub fn write_utf8_file_atomic(path: &Utf8Path, contents: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_dir_and_file(path)?;
    let staging = format!(".{name}.tmp");
    write_staging_file(&dir, &staging, contents)
        .and_then(|()| dir.rename(staging.as_str(), &dir, name.as_str()))
        .inspect_err(|_| discard_staging_file(&dir, &staging))
}

fn write_staging_file(dir: &fs_utf8::Dir, staging: &str, contents: &str) -> io::Result<()> {
    let mut file = dir.create(staging)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

fn discard_staging_file(dir: &fs_utf8::Dir, staging: &str) {
    if let Err(err) = dir.remove_file(staging)
        && err.kind() != io::ErrorKind::NotFound
    {
        log::warn!("Failed to remove staging file {staging}: {err}");
    }
}

/// Exclusive advisory lock over a file's read-modify-write cycle.
///
/// The lock is held on a hidden `.{name}.lock` sibling, so it survives the
/// file itself being replaced by [`write_utf8_file_atomic`]. Dropping the
/// guard releases it.
#[derive(Debug)]
pub struct FileLock {
    _file: std::fs::File,
}

/// Block until this process holds the exclusive lock for `path`.
///
/// # Errors
/// Fails when the lock file cannot be created or locked.
pub fn lock_exclusive(path: &Utf8Path) -> io::Result<FileLock> {
    let (dir, name) = open_dir_and_file(path)?;
    let mut options = cap_std::fs::OpenOptions::new();
    options.create(true).write(true).truncate(false);
    let file = dir
        .open_with(format!(".{name}.lock").as_str(), &options)?
        .into_std();
    file.lock()?;
    Ok(FileLock { _file: file })
}

/// Ensure the parent directory for `path` exists.
///
/// # Errors
/// Fails when a missing directory cannot be created.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }
    let (base, relative) = split_ambient_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("'{path}' does not name a file")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `parent` into an ambient root to open and the path below it.
///
/// cap-std refuses absolute paths relative to a directory handle, so
/// absolute paths are opened at their root (or Windows prefix) and the rest
/// is walked from there.
fn split_ambient_base(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let base = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let drive = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(drive).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => Utf8PathBuf::from("."),
    };
    let relative = if base.as_str() == "." {
        parent.to_path_buf()
    } else {
        parent
            .strip_prefix(&base)
            .map_err(|_| io::Error::other(format!("failed to strip '{base}' from '{parent}'")))?
            .to_path_buf()
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}
