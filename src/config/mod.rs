use crate::models::monitoring::EntitlementTier;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod migrate; // use submodule at src/config/migrate.rs

/// One named time window. The attendance check-in validator and any
/// future schedule consumer read these from here instead of carrying
/// their own copies of the shift constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub name: String,
    pub start: String, // "HH:MM"
    pub end: String,   // "HH:MM"
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,

    /// Default entitlement tier (working days) for empty upload cells.
    #[serde(default = "default_tier_days")]
    pub default_tier_days: i64,

    /// Days before the anchor date at which a record becomes Due.
    #[serde(default = "default_due_window")]
    pub due_window_days: i64,

    /// Reminder tiers, in days before the leave start date.
    #[serde(default = "default_reminder_offsets")]
    pub reminder_offsets: Vec<i64>,

    /// Default leave length when an approval has no end-date override.
    #[serde(default = "default_leave_length")]
    pub leave_length_days: i64,

    /// Hard cap on one upload batch.
    #[serde(default = "default_max_batch")]
    pub max_batch_rows: usize,

    /// Rows per ingest transaction.
    #[serde(default = "default_chunk_rows")]
    pub ingest_chunk_rows: usize,

    /// Directory-lookup cache bounds for long-running jobs.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Interval for the `watch` runner; daily is sufficient.
    #[serde(default = "default_watch_interval")]
    pub watch_interval_secs: u64,

    /// Named time windows shared with the surrounding application.
    #[serde(default = "default_schedule_windows")]
    pub schedule_windows: Vec<ScheduleWindow>,
}

fn default_tier_days() -> i64 {
    70
}
fn default_due_window() -> i64 {
    10
}
fn default_reminder_offsets() -> Vec<i64> {
    vec![7, 3, 1]
}
fn default_leave_length() -> i64 {
    14
}
fn default_max_batch() -> usize {
    1000
}
fn default_chunk_rows() -> usize {
    200
}
fn default_cache_capacity() -> usize {
    256
}
fn default_cache_ttl() -> u64 {
    300
}
fn default_watch_interval() -> u64 {
    86_400
}
fn default_schedule_windows() -> Vec<ScheduleWindow> {
    vec![
        ScheduleWindow {
            name: "morning_checkin".to_string(),
            start: "06:30".to_string(),
            end: "09:00".to_string(),
        },
        ScheduleWindow {
            name: "evening_checkin".to_string(),
            start: "18:30".to_string(),
            end: "21:00".to_string(),
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            default_tier_days: default_tier_days(),
            due_window_days: default_due_window(),
            reminder_offsets: default_reminder_offsets(),
            leave_length_days: default_leave_length(),
            max_batch_rows: default_max_batch(),
            ingest_chunk_rows: default_chunk_rows(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl(),
            watch_interval_secs: default_watch_interval(),
            schedule_windows: default_schedule_windows(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rosterwatch")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rosterwatch")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rosterwatch.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rosterwatch.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
                Err(_) => Config::default(),
            }
        } else {
            Config::default()
        }
    }

    /// The configured default tier; a bad value in the file falls back
    /// to 70 rather than poisoning every upload.
    pub fn default_tier(&self) -> EntitlementTier {
        EntitlementTier::from_days(self.default_tier_days).unwrap_or(EntitlementTier::Tier70)
    }

    pub fn window(&self, name: &str) -> Option<&ScheduleWindow> {
        self.schedule_windows.iter().find(|w| w.name == name)
    }

    pub fn save(&self) -> io::Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| io::Error::other(format!("serialize config: {}", e)))?;
        let mut file = fs::File::create(Self::config_file())?;
        file.write_all(yaml.as_bytes())
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            config.save()?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(())
    }
}
