// cluster/mod.rs
pub mod clusterer;
pub mod labels;
pub mod neighbors;

// Re-export the main struct to keep the public API flat
pub use self::clusterer::{ZoneClusterer, ZoneReport};
