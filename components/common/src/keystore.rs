use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use ethers::signers::{LocalWallet, Signer};
use serde_json::Value;

/// Decrypts a Web3 secret storage JSON (as produced when the deployer account was generated).
///
/// The ethers keystore reader only takes a path, so the JSON is staged in an owner-only
/// scratch file that is removed before returning.
pub fn decrypt_deployer_wallet(encrypted_json: &str, password: &str) -> anyhow::Result<LocalWallet> {
    decrypt_in(&env::temp_dir(), encrypted_json, password)
}

fn decrypt_in(dir: &Path, encrypted_json: &str, password: &str) -> anyhow::Result<LocalWallet> {
    let keystore = normalize_keystore(encrypted_json)?;

    let staged = StagedKeystore::create(dir, &keystore)?;
    let wallet = LocalWallet::decrypt_keystore(&staged.path, password);
    drop(staged);

    let wallet = wallet.map_err(|e| {
        log::debug!("Keystore decryption error: {}", e);
        anyhow!("Failed to decrypt wallet. Check your password.")
    })?;
    log::info!("Decrypted deployer wallet {:#x}", wallet.address());

    Ok(wallet)
}

/// ethers.js writes the cipher block under `Crypto`, the Rust reader wants `crypto`.
fn normalize_keystore(encrypted_json: &str) -> anyhow::Result<String> {
    let mut keystore: Value = serde_json::from_str(encrypted_json)
        .context("Encrypted deployer key is not valid keystore JSON.")?;
    let fields = keystore
        .as_object_mut()
        .ok_or_else(|| anyhow!("Encrypted deployer key is not valid keystore JSON."))?;

    if !fields.contains_key("crypto") {
        if let Some(crypto) = fields.remove("Crypto") {
            fields.insert("crypto".to_string(), crypto);
        }
    }

    Ok(serde_json::to_string(&keystore)?)
}

/// Scratch copy of the keystore, deleted on drop.
struct StagedKeystore {
    path: PathBuf,
}

impl StagedKeystore {
    fn create(dir: &Path, contents: &str) -> anyhow::Result<StagedKeystore> {
        let path = dir.join(format!("deployer-keystore-{:016x}.json", rand::random::<u64>()));

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&path)
            .context("Failed to stage keystore for decryption.")?;
        // from here on the file is ours, a failed write still cleans it up
        let staged = StagedKeystore { path };
        file.write_all(contents.as_bytes())
            .context("Failed to stage keystore for decryption.")?;
        log::debug!("Staged keystore at {}", staged.path.display());

        Ok(staged)
    }
}

impl Drop for StagedKeystore {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("Could not remove staged keystore {}: {}", self.path.display(), e);
        }
    }
}
