//! # coordconv-host
//!
//! Hôte de référence pour `coordconv`: couches en mémoire avec tampon
//! d'édition, transformations EPSG, chargement des options, logs et
//! rapports de conversion.
//!
//! ## Features
//!
//! - Couches et projet en mémoire (`MemoryStore`, `MemoryProject`)
//! - Reprojection légère en Rust pur: EPSG:4326, 3857, 2154, UTM 326xx/327xx
//! - Fallback PROJ avec le feature `reproject`
//! - Presets d'options (`default`, `compact`) et surcharges par variables d'environnement
//! - Rapport JSON de conversion
//!
//! ## Usage
//!
//! ```rust,ignore
//! use coordconv::{Converter, NoProgress, SpatialReference};
//! use coordconv_host::{Config, HostTransforms, MemoryProject};
//!
//! coordconv_host::load_env();
//! coordconv_host::init_logging(0, false)?;
//!
//! let mut config = Config::from_preset("default")?;
//! config.apply_env()?;
//!
//! let transforms = HostTransforms::new();
//! let mut project = MemoryProject::new();
//! let mut converter = Converter::new(&transforms, &mut project, config.into_options()?);
//! let source = SpatialReference::new("EPSG:2154");
//! let result = converter.convert(&mut layer, &source, None, &mut NoProgress);
//! let report = RunReport::from_result("parcels", &result);
//! ```

pub mod config;
pub mod logging;
pub mod memory;
pub mod report;
pub mod reproject;
pub mod reproject_lite;
pub mod transforms;

pub use config::{load_env, Config};
pub use logging::init_logging;
pub use memory::{MemoryProject, MemoryStore};
pub use report::{ErrorLevel, ReportError, ReportStatus, RunReport};
pub use reproject_lite::{ReprojectorLite, SmartReprojector};
pub use transforms::{parse_epsg, HostTransforms};
