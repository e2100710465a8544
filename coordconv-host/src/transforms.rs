//! Fabrique de transformations pour le moteur de conversion

use coordconv::{BoxError, SpatialReference, TransformFactory};
use tracing::debug;

use crate::reproject_lite::{ReprojectorLite, SmartReprojector};

/// Extrait le code EPSG d'un identifiant "EPSG:xxxx" (casse indifférente)
pub fn parse_epsg(reference: &SpatialReference) -> Option<u32> {
    let authid = reference.authid();
    let (authority, code) = authid.split_once(':')?;
    if !authority.trim().eq_ignore_ascii_case("EPSG") {
        return None;
    }
    code.trim().parse().ok()
}

/// Transformations disponibles dans ce build: reproject_lite, plus PROJ avec
/// le feature `reproject`
#[derive(Debug, Default, Clone, Copy)]
pub struct HostTransforms;

impl HostTransforms {
    pub fn new() -> Self {
        Self
    }
}

impl TransformFactory for HostTransforms {
    type Transformer = SmartReprojector;

    fn is_valid(&self, reference: &SpatialReference) -> bool {
        if reference.is_empty() {
            return false;
        }
        if parse_epsg(reference).is_some_and(ReprojectorLite::is_supported) {
            return true;
        }

        #[cfg(feature = "reproject")]
        {
            if crate::reproject::Reprojector::is_known(reference.authid()) {
                return true;
            }
        }

        false
    }

    fn create(
        &self,
        source: &SpatialReference,
        target: &SpatialReference,
    ) -> Result<Self::Transformer, BoxError> {
        let transformer = SmartReprojector::new(source, target)?;
        debug!(
            source = %source,
            target = %target,
            backend = transformer.description(),
            "Transformation created"
        );
        Ok(transformer)
    }
}
