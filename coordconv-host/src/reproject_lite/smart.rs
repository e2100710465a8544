//! Reprojection intelligente : reproject_lite en priorité, fallback sur proj
//!
//! Utilise automatiquement la meilleure option disponible.

use super::ReprojectorLite;
use crate::transforms::parse_epsg;
use anyhow::{bail, Result};
use coordconv::{BoxError, SpatialReference, Transformer};
use geo::Point;

/// Reprojection intelligente
///
/// Essaie d'abord reproject_lite (pure Rust), puis fallback sur proj si disponible.
pub enum SmartReprojector {
    /// Reprojection légère (pure Rust)
    Lite(ReprojectorLite),
    /// Reprojection via PROJ (si feature activée)
    #[cfg(feature = "reproject")]
    Proj(crate::reproject::Reprojector),
    /// Pas de reprojection (source == cible, hors systèmes légers)
    Identity,
}

impl SmartReprojector {
    /// Crée un nouveau reprojector
    pub fn new(source: &SpatialReference, target: &SpatialReference) -> Result<Self> {
        // Les systèmes légers passent toujours par reproject_lite, y compris
        // 4326 -> 4326 qui valide les bornes géographiques
        if let (Some(src), Some(dst)) = (parse_epsg(source), parse_epsg(target)) {
            if ReprojectorLite::is_supported(src) && ReprojectorLite::is_supported(dst) {
                return Ok(Self::Lite(ReprojectorLite::new(src, dst)?));
            }
        }

        if source.authid().eq_ignore_ascii_case(target.authid()) {
            return Ok(Self::Identity);
        }

        // Fallback sur proj si disponible
        #[cfg(feature = "reproject")]
        {
            let proj = crate::reproject::Reprojector::new(source.authid(), target.authid())?;
            return Ok(Self::Proj(proj));
        }

        // Aucune option disponible
        #[cfg(not(feature = "reproject"))]
        bail!(
            "Transformation {} -> {} not supported.\n\
             Supported without PROJ: EPSG:4326, EPSG:3857, EPSG:2154, EPSG:326xx, EPSG:327xx.\n\
             For other systems, build with: cargo build --features reproject",
            source,
            target
        );
    }

    /// Transforme un point (x, y)
    pub fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        match self {
            Self::Identity => {
                if !x.is_finite() || !y.is_finite() {
                    bail!("Non-finite input coordinate ({}, {})", x, y);
                }
                Ok((x, y))
            }
            Self::Lite(lite) => lite.transform_point(x, y),
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => proj.transform_point(x, y),
        }
    }

    /// Retourne une description du reprojector utilisé
    pub fn description(&self) -> &'static str {
        match self {
            Self::Identity => "identity (no reprojection)",
            Self::Lite(_) => "reproject_lite (pure Rust)",
            #[cfg(feature = "reproject")]
            Self::Proj(_) => "proj (PROJ library)",
        }
    }
}

impl Transformer for SmartReprojector {
    fn transform(&self, point: Point) -> Result<Point, BoxError> {
        let (x, y) = self.transform_point(point.x(), point.y())?;
        Ok(Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn srs(authid: &str) -> SpatialReference {
        SpatialReference::new(authid)
    }

    #[test]
    fn test_wgs84_identity_is_validated() {
        let r = SmartReprojector::new(&srs("EPSG:4326"), &srs("EPSG:4326")).unwrap();
        assert!(matches!(r, SmartReprojector::Lite(_)));
        assert!(r.transform(Point::new(2.0, 95.0)).is_err());
    }

    #[test]
    fn test_identity() {
        let r = SmartReprojector::new(&srs("IGNF:LAMB93"), &srs("ignf:lamb93")).unwrap();
        assert!(matches!(r, SmartReprojector::Identity));
        assert_eq!(r.transform(Point::new(1.0, 2.0)).unwrap(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_lite() {
        let r = SmartReprojector::new(&srs("EPSG:2154"), &srs("EPSG:4326")).unwrap();
        assert!(matches!(r, SmartReprojector::Lite(_)));
        assert_eq!(r.description(), "reproject_lite (pure Rust)");
    }

    #[test]
    fn test_lambert93_to_3857() {
        let r = SmartReprojector::new(&srs("EPSG:2154"), &srs("EPSG:3857")).unwrap();
        let p = r.transform(Point::new(652381.0, 6862047.0)).unwrap();
        assert!((p.x() - 261600.0).abs() < 2000.0, "x={}", p.x());
    }

    #[cfg(not(feature = "reproject"))]
    #[test]
    fn test_unsupported_without_proj() {
        assert!(SmartReprojector::new(&srs("EPSG:27572"), &srs("EPSG:4326")).is_err());
    }
}
