use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use crate::error::{Error, Result};

/// Mode of the cache root and of directories created inside it.
pub const DIR_MODE: u32 = 0o755;
/// Mode of files written by the synchronizer itself.
pub const FILE_MODE: u32 = 0o644;

const LOG_TARGET: &str = "store";

/// Local file store rooted at the per-user cache directory.
///
/// All paths taken by its methods are relative to the root.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Opens the store, creating the root directory with [`DIR_MODE`] if it is missing.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            create_dir_with_mode(&root, DIR_MODE)?;
            log::debug!(target: LOG_TARGET, "Created cache root {}", root.display());
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.root.join(relative)
    }

    pub fn exists<P: AsRef<Path>>(&self, relative: P) -> bool {
        self.path(relative).exists()
    }

    /// Reads a whole file. A missing file is reported as [`Error::MissingFile`].
    pub fn read<P: AsRef<Path>>(&self, relative: P) -> Result<Vec<u8>> {
        let path = self.path(relative);
        std::fs::read(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => Error::MissingFile { path: path.clone() },
            _ => Error::Io { path: path.clone(), source },
        })
    }

    /// Reads and deserializes a YAML file.
    pub fn read_yaml<T, P>(&self, relative: P) -> Result<T>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let relative = relative.as_ref();
        let data = self.read(relative)?;
        serde_yaml::from_slice(&data).map_err(|source| Error::Deserialize {
            path: self.path(relative),
            source,
        })
    }

    /// Creates or truncates a file and writes `contents` into it.
    ///
    /// `mode` is applied when the file is created (Unix only).
    pub fn write<P: AsRef<Path>>(&self, relative: P, contents: &[u8], mode: u32) -> Result<()> {
        let path = self.path(relative);
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;
        let mut file = options
            .open(&path)
            .map_err(|source| Error::Io { path: path.clone(), source })?;
        file.write_all(contents)
            .map_err(|source| Error::Io { path, source })
    }

    /// Creates a directory and its missing parents.
    pub fn create_dir<P: AsRef<Path>>(&self, relative: P, mode: u32) -> Result<()> {
        create_dir_with_mode(&self.path(relative), mode)
    }
}

/// `mkdir -p` with an explicit mode for every directory it creates (Unix only).
pub fn create_dir_with_mode(path: &Path, mode: u32) -> Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path).map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
