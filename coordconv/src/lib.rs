//! # coordconv
//!
//! Conversion des coordonnées d'une couche vers WGS84 (degrés décimaux et DMS),
//! avec reprojection optionnelle vers un SCR cible, écrites dans de nouveaux
//! champs attributaires.
//!
//! ## Features
//!
//! - Réduction de toute géométrie à un point représentatif (`geo`)
//! - Formatage DMS `DD°MM'SS.ss"H` / `DDD°MM'SS.ss"H`
//! - Création idempotente des champs `lon_dd`, `lat_dd`, `lon_dms`, `lat_dms`
//!   (et `x_proj`, `y_proj` si un SCR cible est demandé)
//! - Deux stratégies de persistance: en place (transaction) ou nouvelle couche
//!
//! Le stockage, les transactions et les mathématiques de projection sont
//! fournis par l'hôte via les traits de [`host`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use coordconv::{ConversionOptions, Converter, NoProgress, SpatialReference};
//!
//! let mut converter = Converter::new(&transforms, &mut project, ConversionOptions::default());
//! let outcome = converter.convert(
//!     &mut layer,
//!     &SpatialReference::new("EPSG:2154"),
//!     Some(&SpatialReference::new("EPSG:3857")),
//!     &mut NoProgress,
//! )?;
//! println!("{}", outcome.summary());
//! ```

pub mod commit;
pub mod dms;
pub mod engine;
pub mod error;
pub mod host;
pub mod options;
pub mod outcome;
pub mod progress;
pub mod reduce;
pub mod schema;
pub mod types;

pub use commit::{select_strategy, Converter};
pub use dms::{format_dms, AxisRole};
pub use engine::{ComputedValues, Engine, FeatureOutcome, RunCounts};
pub use error::{BoxError, ConvertError, ReferenceRole};
pub use host::{FeatureStore, StoreFactory, TransformFactory, Transformer};
pub use options::ConversionOptions;
pub use outcome::{CommitStrategy, ConversionOutcome, FeatureFailure, RunStatus};
pub use progress::{CancelFlag, NoProgress, Progress};
pub use reduce::reduce;
pub use schema::{ensure_field, ComputedFields};
pub use types::{
    layer_uri, AttributeUpdate, FeatureId, FeatureRecord, FieldKind, FieldSpec, FieldValue,
    GeometryKind, SpatialReference,
};
