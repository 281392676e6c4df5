use std::path::PathBuf;
use chrono::{NaiveDate, Utc};
use crate::catalog::{Library, LibraryVersion};
use crate::config::Config;
use crate::download::{Download, Fetch, HttpFetcher, SyncOutcome};
use crate::error::{Error, Result};
use crate::store::ContentStore;

/// Catalog file at the root of the dataset.
pub const LIBRARIES_FILE: &str = "libraries.yml";
/// Directory holding one version document per library.
pub const VERSIONS_DIR: &str = "data";

const LOG_TARGET: &str = "manager";

/// Read access to a synchronized dataset.
///
/// Never writes beneath the cache root; every query re-reads the files.
#[derive(Debug, Clone)]
pub struct Manager {
    store: ContentStore,
}

impl Manager {
    /// Synchronizes the dataset described by `config` and opens it for reading.
    ///
    /// # Errors
    ///
    /// Fails closed: if the cache root cannot be prepared or the sync fails, no
    /// `Manager` is returned.
    pub fn new(config: &Config) -> Result<Self> {
        let store = ContentStore::open(config.cache_root()?)?;
        let fetcher = HttpFetcher::from_config(config)?;
        Self::open(store, &fetcher, Utc::now().date_naive())
    }

    /// Like [`Manager::new`] with an explicit fetcher and date.
    pub fn open<F: Fetch>(store: ContentStore, fetcher: &F, today: NaiveDate) -> Result<Self> {
        let outcome = Download::new(&store, fetcher).ensure_synced(today)?;
        if let SyncOutcome::Updated { files } = outcome {
            log::info!(target: LOG_TARGET, "Dataset updated ({files} files)");
        }
        Ok(Self::from_store(store))
    }

    /// Reads whatever is already in `store`, without synchronizing.
    pub fn from_store(store: ContentStore) -> Self {
        Self { store }
    }

    /// All libraries in catalog file order.
    pub fn list_libraries(&self) -> Result<Vec<Library>> {
        self.store.read_yaml(LIBRARIES_FILE)
    }

    /// Looks up a library by exact name; the first match wins.
    pub fn get_library(&self, name: &str) -> Result<Library> {
        self.list_libraries()?
            .into_iter()
            .find(|library| library.name == name)
            .ok_or_else(|| Error::LibraryNotFound(name.to_string()))
    }

    /// Libraries whose name starts with `prefix`, in catalog order.
    ///
    /// No match is an empty result; only an unreadable catalog is an error.
    pub fn find_libraries(&self, prefix: &str) -> Result<Vec<Library>> {
        let mut libraries = self.list_libraries()?;
        libraries.retain(|library| library.name.starts_with(prefix));
        Ok(libraries)
    }

    /// Reads the version document of `library`, keeping only versions that start with
    /// `version_prefix` and, unless `include_prerelease`, are not prereleases.
    pub fn get_library_version(
        &self,
        library: &Library,
        version_prefix: &str,
        include_prerelease: bool,
    ) -> Result<LibraryVersion> {
        let mut library_version: LibraryVersion =
            self.store.read_yaml(version_file(&library.name)?)?;
        library_version.retain_matching(version_prefix, include_prerelease);
        Ok(library_version)
    }
}

/// `data/<name>`, refusing names that are not a single path component.
fn version_file(name: &str) -> Result<PathBuf> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if invalid {
        return Err(Error::InvalidLibraryName(name.to_string()));
    }
    Ok(PathBuf::from(VERSIONS_DIR).join(name))
}
