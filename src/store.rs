//! File-backed storage for keys and ciphertext.
//!
//! The core algorithms never touch the filesystem; everything persisted
//! goes through [`KeyRepository`], injected at the edges. The directory
//! implementation owns identifier-to-path resolution and refuses to
//! overwrite existing artifacts (create-new semantics; the existence
//! check is best-effort and not a lock).

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// The four persisted artifact kinds, each with its own file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    PrivateKey,
    PublicKey,
    Ciphertext,
    Plaintext,
}

impl ArtifactKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            ArtifactKind::PrivateKey => "_private_key.txt",
            ArtifactKind::PublicKey => "_public_key.txt",
            ArtifactKind::Ciphertext => "_encrypted.txt",
            ArtifactKind::Plaintext => "_decrypted.txt",
        }
    }
}

/// Storage for persisted artifacts, keyed by kind and identifier.
///
/// Single writer, single reader per identifier; implementations do not
/// lock.
pub trait KeyRepository {
    fn get(&self, kind: ArtifactKind, id: &str) -> Result<Vec<u8>>;
    /// Store a new artifact. Fails if it already exists.
    fn put(&self, kind: ArtifactKind, id: &str, bytes: &[u8]) -> Result<()>;
    fn exists(&self, kind: ArtifactKind, id: &str) -> bool;
}

/// Directory-backed repository: `<root>/<id><suffix>`.
#[derive(Debug, Clone)]
pub struct DirRepository {
    root: PathBuf,
}

impl DirRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, kind: ArtifactKind, id: &str) -> PathBuf {
        self.root.join(format!("{id}{}", kind.suffix()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl KeyRepository for DirRepository {
    fn get(&self, kind: ArtifactKind, id: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.path_for(kind, id))?)
    }

    fn put(&self, kind: ArtifactKind, id: &str, bytes: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path_for(kind, id))?;
        file.write_all(bytes)?;
        Ok(())
    }

    fn exists(&self, kind: ArtifactKind, id: &str) -> bool {
        self.path_for(kind, id).is_file()
    }
}
