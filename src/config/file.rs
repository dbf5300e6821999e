// src/config/file.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use crate::error::Result;
use super::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub documents_file: PathBuf,
    pub zones_file: PathBuf,
    pub zones_json_file: PathBuf,
    pub log_file: PathBuf,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            documents_file: PathBuf::from("output/documents.csv"),
            zones_file: PathBuf::from("output/zones.csv"),
            zones_json_file: PathBuf::from("output/zones.json"),
            log_file: PathBuf::from("output/run_log.txt"),
        }
    }
}

impl FromIni for FileConfig {
    fn from_ini_section(&mut self, _section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        match key {
            "documents_file" => {
                self.documents_file = PathBuf::from(value.trim_matches('"'));
                Some(Ok(()))
            },
            "zones_file" => {
                self.zones_file = PathBuf::from(value.trim_matches('"'));
                Some(Ok(()))
            },
            "zones_json_file" => {
                self.zones_json_file = PathBuf::from(value.trim_matches('"'));
                Some(Ok(()))
            },
            "log_file" => {
                self.log_file = PathBuf::from(value.trim_matches('"'));
                Some(Ok(()))
            },
            _ => None,
        }
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        // Create output directories if they don't exist
        for path in [
            &self.documents_file,
            &self.zones_file,
            &self.zones_json_file,
            &self.log_file,
        ] {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        Ok(())
    }
}
