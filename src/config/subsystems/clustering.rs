// src/config/subsystems/clustering.rs

use serde::{Serialize, Deserialize};
use log::LevelFilter;
use crate::error::{Error, Result};
use crate::config::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Maximum distance, in miles, at which two points count as reachable
    /// from one another.
    pub radius_miles: f64,
    /// Answer neighbor queries from an R-tree index instead of a linear
    /// scan. Output is identical either way.
    pub spatial_index: bool,
    pub log_level: String,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            radius_miles: 1.5,
            spatial_index: false,
            log_level: "info".to_string(),
        }
    }
}

impl FromIni for ClusteringConfig {
    fn from_ini_section(&mut self, _section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        match key {
            "radius_miles" => {
                match value.parse::<f64>() {
                    Ok(radius) if radius.is_finite() && radius > 0.0 => {
                        self.radius_miles = radius;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(
                        format!("Invalid radius_miles (must be a positive number): {}", value)
                    ))),
                }
            },
            "spatial_index" => {
                match value.parse::<bool>() {
                    Ok(val) => {
                        self.spatial_index = val;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid spatial_index (must be true or false): {}", value)
                    ))),
                }
            },
            "log_level" => {
                self.log_level = value.trim_matches('"').to_string();
                Some(Ok(()))
            },
            _ => None,
        }
    }
}

impl ClusteringConfig {
    pub fn get_log_level(&self) -> LevelFilter {
        match self.log_level.trim().to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "none" => LevelFilter::Off,
            _ => LevelFilter::Info, // Default to Info if invalid
        }
    }

    pub fn validate(&self) -> Result<()> {
        // A zero or negative radius would quietly degenerate to
        // all-singleton zones.
        if !self.radius_miles.is_finite() || self.radius_miles <= 0.0 {
            return Err(Error::Config(
                format!("radius_miles must be a positive finite number, got {}", self.radius_miles)
            ));
        }
        Ok(())
    }
}
