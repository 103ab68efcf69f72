use directories::ProjectDirs;
use retic_core::PathUnavailable;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const TABLE_FILE_NAME: &str = "inventario_equipos.csv";

pub fn data_root() -> PathBuf {
    if let Some(pd) = ProjectDirs::from("mx", "CFE", "RETI-C") {
        pd.data_dir().to_path_buf()
    } else {
        // Fallback: current dir
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

pub fn default_local_file() -> PathBuf {
    data_root().join(TABLE_FILE_NAME)
}

/// Which of the two candidate locations is active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    Preferred,
    Fallback(PathUnavailable),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub location: Location,
}

impl Resolution {
    pub fn is_preferred(&self) -> bool {
        matches!(self.location, Location::Preferred)
    }

    /// Why the fallback is in use; `None` on the preferred location.
    pub fn diagnostic(&self) -> Option<String> {
        match &self.location {
            Location::Preferred => None,
            Location::Fallback(reason) => Some(reason.to_string()),
        }
    }

    pub fn mode_label(&self) -> &'static str {
        if self.is_preferred() {
            "network"
        } else {
            "local"
        }
    }
}

/// Picks the table file location: the shared path when its folder exists and
/// accepts writes, otherwise the local one.
#[derive(Clone, Debug)]
pub struct PathResolver {
    preferred: Option<PathBuf>,
    fallback: PathBuf,
}

impl PathResolver {
    pub fn new(preferred: impl Into<PathBuf>, fallback: impl Into<PathBuf>) -> Self {
        Self {
            preferred: Some(preferred.into()),
            fallback: fallback.into(),
        }
    }

    pub fn local_only(fallback: impl Into<PathBuf>) -> Self {
        Self {
            preferred: None,
            fallback: fallback.into(),
        }
    }

    pub fn preferred(&self) -> Option<&Path> {
        self.preferred.as_deref()
    }

    pub fn fallback(&self) -> &Path {
        &self.fallback
    }

    /// Chooses the active location. Nothing is read or changed except in the
    /// preferred folder, where a uniquely named temporary file is created and
    /// removed again to test write access. Each call checks afresh.
    pub fn resolve(&self) -> Resolution {
        let Some(preferred) = &self.preferred else {
            return self.fall_back(PathUnavailable::NotConfigured);
        };
        match probe_dir(parent_dir(preferred)) {
            Ok(()) => {
                tracing::debug!(path = %preferred.display(), "using shared location");
                Resolution {
                    path: preferred.clone(),
                    location: Location::Preferred,
                }
            }
            Err(reason) => self.fall_back(reason),
        }
    }

    pub(crate) fn fall_back(&self, reason: PathUnavailable) -> Resolution {
        tracing::warn!(
            path = %self.fallback.display(),
            reason = %reason,
            "shared location unavailable, using local file"
        );
        Resolution {
            path: self.fallback.clone(),
            location: Location::Fallback(reason),
        }
    }
}

/// Directory holding `path`; a bare file name lives in the current directory.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Checks that `dir` exists and accepts a new file. Permission bits on network
/// shares do not reflect the server's ACLs, so writability is tested by
/// creating (and dropping) a temporary file.
pub fn probe_dir(dir: &Path) -> Result<(), PathUnavailable> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(PathUnavailable::DirectoryMissing(dir.to_path_buf())),
        Err(err) => return Err(classify(dir, err)),
    }
    tempfile::Builder::new()
        .prefix(".retic-probe-")
        .tempfile_in(dir)
        .map(drop)
        .map_err(|err| classify(dir, err))
}

fn classify(dir: &Path, err: io::Error) -> PathUnavailable {
    match err.kind() {
        io::ErrorKind::NotFound => PathUnavailable::DirectoryMissing(dir.to_path_buf()),
        io::ErrorKind::PermissionDenied => PathUnavailable::NotWritable(dir.to_path_buf()),
        _ => PathUnavailable::ProbeFailed {
            dir: dir.to_path_buf(),
            detail: err.to_string(),
        },
    }
}
