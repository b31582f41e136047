//! Private key resolution and loading.
//!
//! The provider only stores a logical key name; on disk the file may carry
//! a `.pem` suffix. The bare name always wins over the suffixed form.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use russh_keys::PrivateKey;

use crate::error::{CourirError, Result};

/// Locate the private key file for `key_name` under `key_dir`.
///
/// Tries `key_dir/key_name`, then `key_dir/key_name.pem`, in that order.
/// Both the directory and the final error are tilde-expanded / fully
/// spelled out so the user sees exactly which paths were checked.
pub fn resolve_key(key_dir: &str, key_name: &str) -> Result<PathBuf> {
    let dir = shellexpand::tilde(key_dir).to_string();

    let bare = Path::new(&dir).join(key_name);
    if bare.is_file() {
        return Ok(bare);
    }

    let pem = Path::new(&dir).join(format!("{}.pem", key_name));
    if pem.is_file() {
        return Ok(pem);
    }

    Err(CourirError::KeyNotFound { bare, pem })
}

/// Parse the private key at `path`.
///
/// Encrypted keys are not supported here; load them into an agent instead.
pub fn load_key(path: &Path) -> Result<Arc<PrivateKey>> {
    let key = russh_keys::load_secret_key(path, None).map_err(|e| {
        CourirError::Ssh(format!("failed to load key {}: {}", path.display(), e))
    })?;

    Ok(Arc::new(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name_wins_over_pem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("foo"), "bare").unwrap();
        std::fs::write(dir.path().join("foo.pem"), "pem").unwrap();

        let path = resolve_key(dir.path().to_str().unwrap(), "foo").unwrap();
        assert_eq!(path, dir.path().join("foo"));
    }

    #[test]
    fn test_falls_back_to_pem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("foo.pem"), "pem").unwrap();

        let path = resolve_key(dir.path().to_str().unwrap(), "foo").unwrap();
        assert_eq!(path, dir.path().join("foo.pem"));
    }

    #[test]
    fn test_not_found_names_both_forms() {
        let dir = tempfile::tempdir().unwrap();

        let err = resolve_key(dir.path().to_str().unwrap(), "foo").unwrap_err();
        let message = err.to_string();

        assert!(message.contains("foo"));
        assert!(message.contains("foo.pem"));
    }
}
