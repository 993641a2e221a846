use std::collections::HashMap;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::error::{Result, SnapshotError};

pub const DEFAULT_ENV_FILE: &str = ".env.local";

pub const STORE_URL_KEY: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const STORE_KEY_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const ODOO_URL_KEY: &str = "ODOO_URL";
pub const ODOO_DB_KEY: &str = "ODOO_DB";
pub const ODOO_USERNAME_KEY: &str = "ODOO_USERNAME";
pub const ODOO_PASSWORD_KEY: &str = "ODOO_PASSWORD";

/// Key-value pairs read from the local env file. The process environment
/// is left untouched.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    path: PathBuf,
    values: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub url: String,
    pub service_key: String,
}

pub struct LedgerSettings {
    pub url: String,
    pub db: String,
    pub username: String,
    pub password: Option<Zeroizing<String>>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SnapshotError::Config(format!("{} not found", path.display())));
        }
        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| SnapshotError::Config(format!("{}: {e}", path.display())))?;
        let mut values = HashMap::new();
        for item in iter {
            let (key, value) =
                item.map_err(|e| SnapshotError::Config(format!("{}: {e}", path.display())))?;
            values.insert(key, value.trim().to_string());
        }
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn require(&self, keys: &[&str]) -> Result<Vec<String>> {
        let missing: Vec<&str> = keys.iter().copied().filter(|k| self.get(k).is_none()).collect();
        if !missing.is_empty() {
            return Err(SnapshotError::Config(format!(
                "Missing {} in {}",
                missing.join(" or "),
                self.path.display()
            )));
        }
        Ok(keys.iter().filter_map(|k| self.get(k)).map(str::to_string).collect())
    }

    pub fn store(&self) -> Result<StoreSettings> {
        let values = self.require(&[STORE_URL_KEY, STORE_KEY_KEY])?;
        Ok(StoreSettings {
            url: values[0].clone(),
            service_key: values[1].clone(),
        })
    }

    pub fn ledger(&self) -> Result<LedgerSettings> {
        let values = self.require(&[ODOO_URL_KEY, ODOO_DB_KEY, ODOO_USERNAME_KEY])?;
        Ok(LedgerSettings {
            url: values[0].trim_end_matches('/').to_string(),
            db: values[1].clone(),
            username: values[2].clone(),
            password: self.get(ODOO_PASSWORD_KEY).map(|p| Zeroizing::new(p.to_string())),
        })
    }
}
