//! Configuration file maintenance: field-presence checks and in-place
//! upgrades for config files written by earlier releases.

use crate::ui::messages::success;
use rusqlite::{Connection, Error, OptionalExtension};
use serde_yaml::Value;
use std::fs;

/// Keys every current config file must carry.
const REQUIRED_KEYS: &[&str] = &[
    "database",
    "default_tier_days",
    "due_window_days",
    "reminder_offsets",
    "leave_length_days",
    "max_batch_rows",
    "ingest_chunk_rows",
    "cache_capacity",
    "cache_ttl_secs",
    "watch_interval_secs",
    "schedule_windows",
];

/// Report config keys missing from the on-disk file (empty = healthy).
pub fn missing_keys() -> std::io::Result<Vec<String>> {
    let conf_file = super::Config::config_file();

    if !conf_file.exists() {
        return Ok(REQUIRED_KEYS.iter().map(|k| k.to_string()).collect());
    }

    let content = fs::read_to_string(&conf_file)?;
    let yaml: Value = serde_yaml::from_str(&content)
        .map_err(|e| std::io::Error::other(format!("parse config: {}", e)))?;

    let mut missing = Vec::new();
    if let Some(map) = yaml.as_mapping() {
        for key in REQUIRED_KEYS {
            if !map.contains_key(Value::String(key.to_string())) {
                missing.push(key.to_string());
            }
        }
    }

    Ok(missing)
}

/// Migration that adds the engine tuning parameters introduced in 0.3
/// to an older YAML config, and marks the migration as applied in the
/// `log` table so it runs once.
pub fn migrate_add_engine_parameters(conn: &Connection) -> Result<(), Error> {
    let version = "20260815_0003_add_engine_parameters";

    // Check if already applied
    let mut chk = conn.prepare(
        "SELECT 1 FROM log WHERE operation = 'migration_applied' AND target = ?1 LIMIT 1",
    )?;
    if chk.query_row([version], |_| Ok(())).optional()?.is_some() {
        return Ok(());
    }

    let conf_file = super::Config::config_file();

    if conf_file.exists() {
        let content = fs::read_to_string(&conf_file).map_err(|e| {
            Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(format!("Failed to read config {:?}: {}", conf_file, e)),
            )
        })?;

        if let Ok(mut yaml) = serde_yaml::from_str::<Value>(&content)
            && let Some(map) = yaml.as_mapping_mut()
        {
            let defaults = super::Config::default();
            let defaults_yaml = serde_yaml::to_value(&defaults).map_err(|e| {
                Error::SqliteFailure(
                    rusqlite::ffi::Error::new(1),
                    Some(format!("Failed to build default config: {}", e)),
                )
            })?;

            let mut changed = false;
            if let Some(default_map) = defaults_yaml.as_mapping() {
                for key in REQUIRED_KEYS {
                    let k = Value::String(key.to_string());
                    if !map.contains_key(&k)
                        && let Some(v) = default_map.get(&k)
                    {
                        map.insert(k, v.clone());
                        changed = true;
                    }
                }
            }

            if changed {
                let serialized = serde_yaml::to_string(&yaml).map_err(|e| {
                    Error::SqliteFailure(
                        rusqlite::ffi::Error::new(1),
                        Some(format!(
                            "Failed to serialize updated config {:?}: {}",
                            conf_file, e
                        )),
                    )
                })?;

                fs::write(&conf_file, serialized).map_err(|e| {
                    Error::SqliteFailure(
                        rusqlite::ffi::Error::new(1),
                        Some(format!(
                            "Failed to write updated config {:?}: {}",
                            conf_file, e
                        )),
                    )
                })?;

                success(format!(
                    "Migration applied: {} — added engine parameters to config.",
                    version
                ));
            }
        }
    }

    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, 'config upgraded')",
        [version],
    )?;

    Ok(())
}
