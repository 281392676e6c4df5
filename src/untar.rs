//! Unpacking of the gzip-compressed dataset archive.

use std::fs::OpenOptions;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use flate2::read::GzDecoder;
use tar::{Archive, EntryType};
use crate::error::{Error, Result};
use crate::store::{create_dir_with_mode, DIR_MODE};

const LOG_TARGET: &str = "untar";

/// Unpacks a gzip-compressed tar stream into `destination`.
///
/// Entries are processed in stream order. Directories are created when missing,
/// regular files are created or truncated with the mode bits of their header, and
/// every other entry type (links, devices, metadata records) is skipped.
///
/// Returns the number of regular files written.
///
/// # Errors
///
/// Fails on the first decompression, decoding or write error, and on any entry whose
/// name resolves outside `destination`. Files written before the failure are left in
/// place.
pub fn unpack<R: Read>(destination: &Path, reader: R) -> Result<usize> {
    let mut archive = Archive::new(GzDecoder::new(reader));
    let mut written = 0;

    for entry in archive.entries().map_err(Error::Archive)? {
        let mut entry = entry.map_err(Error::Archive)?;
        let name = entry.path().map_err(Error::Archive)?.into_owned();

        match entry.header().entry_type() {
            EntryType::Directory => {
                let target = resolve_entry_path(destination, &name)?;
                if !target.exists() {
                    create_dir_with_mode(&target, DIR_MODE)?;
                }
            }
            EntryType::Regular => {
                let target = resolve_entry_path(destination, &name)?;
                if target == destination {
                    return Err(Error::UnsafeEntry { path: name });
                }
                if let Some(parent) = target.parent() {
                    if !parent.exists() {
                        create_dir_with_mode(parent, DIR_MODE)?;
                    }
                }
                let mode = entry.header().mode().map_err(Error::Archive)?;

                let mut options = OpenOptions::new();
                options.write(true).create(true).truncate(true);
                #[cfg(unix)]
                {
                    use std::os::unix::fs::OpenOptionsExt;
                    options.mode(mode & 0o777);
                }
                #[cfg(not(unix))]
                let _ = mode;

                let mut file = options.open(&target).map_err(|source| Error::Extract {
                    path: target.clone(),
                    source,
                })?;
                std::io::copy(&mut entry, &mut file).map_err(|source| Error::Extract {
                    path: target.clone(),
                    source,
                })?;
                written += 1;
            }
            other => {
                log::debug!(target: LOG_TARGET, "Skipping {:?} entry {}", other, name.display());
            }
        }
    }

    log::info!(target: LOG_TARGET, "Extracted {} files into {}", written, destination.display());
    Ok(written)
}

/// Joins an archive entry name onto `destination`, refusing names that leave it.
///
/// The check is lexical: `.` is dropped, `..` removes the previous component, and
/// absolute names are rejected outright.
pub fn resolve_entry_path(destination: &Path, name: &Path) -> Result<PathBuf> {
    let mut relative = PathBuf::new();
    for component in name.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return Err(Error::UnsafeEntry { path: name.to_path_buf() });
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::UnsafeEntry { path: name.to_path_buf() });
            }
        }
    }
    Ok(destination.join(relative))
}
