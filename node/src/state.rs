//! # Snapshot Files
//!
//! A ledger is persisted as one pretty-printed JSON document. Loading goes
//! through the ledger's own deserializer, which re-checks supply and cap
//! invariants, so a hand-edited or truncated file is rejected rather than
//! silently accepted.

use anyhow::{bail, Context, Result};
use ledger_contracts::TokenLedger;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads and validates a snapshot.
pub fn load(path: &Path) -> Result<TokenLedger> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let ledger: TokenLedger = serde_json::from_str(&raw)
        .with_context(|| format!("snapshot {} is corrupt or invalid", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        holders = ledger.holder_count(),
        events = ledger.events().len(),
        "snapshot loaded"
    );
    Ok(ledger)
}

/// Writes a snapshot, replacing `path` atomically.
///
/// The document is written to a sibling temp file first and renamed into
/// place, so readers never observe a partial file.
pub fn save(path: &Path, ledger: &TokenLedger) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let body = serde_json::to_string_pretty(ledger).context("failed to encode snapshot")?;
    let tmp = temp_path(path);
    fs::write(&tmp, body).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move snapshot into place at {}", path.display()))?;

    tracing::debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

/// Writes a fresh snapshot, refusing to clobber an existing one unless `force`.
pub fn create(path: &Path, ledger: &TokenLedger, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "snapshot {} already exists (use --force to overwrite)",
            path.display()
        );
    }
    save(path, ledger)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "ledger".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_protocol::Address;

    fn sample() -> TokenLedger {
        let alice = Address::derive("alice");
        let mut ledger = TokenLedger::new(alice, "Token", "TKN", 1_000).unwrap();
        let _ = ledger.transfer(alice, Address::derive("bob"), 250).unwrap();
        let _ = ledger.approve(alice, Address::derive("carol"), 40).unwrap();
        ledger
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json");
        let ledger = sample();

        save(&path, &ledger).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, ledger);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn create_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        create(&path, &sample(), false).unwrap();

        let err = create(&path, &sample(), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        create(&path, &sample(), true).unwrap();
    }

    #[test]
    fn tampered_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        save(&path, &sample()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let tampered = raw.replacen("\"750\"", "\"751\"", 1);
        assert_ne!(raw, tampered);
        fs::write(&path, tampered).unwrap();

        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("does not equal sum of balances"));
    }

    #[test]
    fn missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read snapshot"));
    }
}
