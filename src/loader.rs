//! Resource loading capability
//!
//! The font engine never touches a transport or an image codec directly:
//! it asks an injected [`Loader`] for bytes and decoded pages.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use log::debug;
use std::path::{Path, PathBuf};

use crate::error::{FontError, Result};
use crate::font::RasterBuffer;

/// Fetches raw bytes and decodes atlas pages
pub trait Loader: Send + Sync + 'static {
    /// Fetch the bytes at `path`. Failures are [`FontError::Fetch`].
    fn fetch<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<Vec<u8>>>;

    /// Decode page bytes. Failures are [`FontError::Decode`].
    fn decode(&self, bytes: &[u8]) -> Result<RasterBuffer> {
        RasterBuffer::decode(bytes)
    }
}

/// Loads from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FsLoader {
    /// Prefix for relative paths (None = current directory)
    root: Option<PathBuf>,
}

impl FsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Loader for FsLoader {
    fn fetch<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<Vec<u8>>> {
        async move {
            let full = self.resolve(path);
            let bytes = tokio::fs::read(&full)
                .await
                .map_err(|e| FontError::fetch(&full, e))?;
            debug!("Read {} bytes: {}", bytes.len(), full.display());
            Ok(bytes)
        }
        .boxed()
    }
}
