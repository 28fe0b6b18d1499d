//! File Backend
//!
//! One file per key under a cache directory. TTLs are not enforced: an entry
//! lives until its file is removed out of band. Concurrent writers to the
//! same key may interleave.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use crate::cache::{glob_match, CacheBackend};
use crate::error::{CacheError, Result};

/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "_cache";

// == File Backend ==
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Opens (creating if needed) a cache rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(encode_key(key))
    }
}

// == Key <-> Filename ==
/// Escapes characters that are unsafe or ambiguous in filenames, then maps
/// the `:` delimiter to `_`. Reversible by [`decode_key`].
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '%' => out.push_str("%25"),
            '_' => out.push_str("%5F"),
            '/' => out.push_str("%2F"),
            '\\' => out.push_str("%5C"),
            ':' => out.push('_'),
            c => out.push(c),
        }
    }
    out
}

fn decode_key(name: &str) -> Option<String> {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        match c {
            '_' => out.push(':'),
            '%' => {
                let code: String = chars.by_ref().take(2).collect();
                match code.as_str() {
                    "25" => out.push('%'),
                    "5F" => out.push('_'),
                    "2F" => out.push('/'),
                    "5C" => out.push('\\'),
                    _ => return None,
                }
            }
            c => out.push(c),
        }
    }
    Some(out)
}

#[async_trait]
impl CacheBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CacheError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, _ttl: Duration) -> Result<()> {
        let path = self.path_for(key);
        trace!(key = %key, path = %path.display(), "Writing cache file");
        tokio::fs::write(path, value).await?;
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.path_for(key)).await?)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(key) = entry.file_name().to_str().and_then(decode_key) else {
                continue;
            };
            if glob_match(pattern, &key) {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
