use anyhow::anyhow;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

pub static DEFAULT_ENV_FILE: &str = "./.env";

pub static DEFAULT_RPC_URL: Lazy<String> = Lazy::new(|| "https://sepolia.drpc.org".to_string());

const ENCRYPTED_KEY_VAR: &str = "DEPLOYER_PRIVATE_KEY_ENCRYPTED";
const RPC_URL_VAR: &str = "DEPLOYER_RPC_URL";

#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Web3 secret storage JSON of the deployer key.
    pub deployer_private_key_encrypted: String,
    /// RPC URL offered when the operator leaves the prompt blank.
    pub default_rpc_url: String,
}

impl Config {
    pub fn new_from_env() -> anyhow::Result<Config> {
        Config::from_env_file(DEFAULT_ENV_FILE)
    }

    /// Loads deployer settings from a dotenv file.
    ///
    /// An exported, non-empty process variable wins over the file, the same precedence
    /// `dotenv()` gives. The process environment itself is left untouched.
    pub fn from_env_file(path: impl AsRef<Path>) -> anyhow::Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(anyhow!(
                ".env file not found. Please generate a deployer account first."
            ));
        }

        let mut vars = HashMap::new();
        for item in dotenv::from_path_iter(path)? {
            match item {
                Ok((key, value)) => {
                    vars.insert(key, value);
                }
                Err(e) => log::warn!("Skipping unparseable line in {}: {}", path.display(), e),
            }
        }
        log::debug!("Loaded {} entries from {}", vars.len(), path.display());

        // keystore JSON is written unquoted, dotenv would strip its quotes
        let contents = fs::read_to_string(path)?;
        if let Some(raw) = raw_value(&contents, ENCRYPTED_KEY_VAR) {
            if raw.starts_with('{') {
                vars.insert(ENCRYPTED_KEY_VAR.to_string(), raw);
            }
        }

        let deployer_private_key_encrypted = lookup(&vars, ENCRYPTED_KEY_VAR).ok_or_else(|| {
            anyhow!(
                "{} not found in .env. Please generate a deployer account first.",
                ENCRYPTED_KEY_VAR
            )
        })?;
        let default_rpc_url = lookup(&vars, RPC_URL_VAR).unwrap_or_else(|| DEFAULT_RPC_URL.clone());

        Ok(Config {
            deployer_private_key_encrypted,
            default_rpc_url,
        })
    }
}

/// Exported variable first, then the file. Blank values count as unset.
fn lookup(vars: &HashMap<String, String>, key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| vars.get(key).cloned())
        .filter(|value| !value.trim().is_empty())
}

/// Text after the first `=` on the line defining `key`, as written.
fn raw_value(contents: &str, key: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let line = line.trim_start();
        let line = line.strip_prefix("export ").unwrap_or(line);
        let (name, value) = line.split_once('=')?;
        (name.trim() == key).then(|| value.trim().to_string())
    })
}
