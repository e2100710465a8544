//! Transformation de coordonnées avec PROJ
//!
//! Ce module est disponible uniquement avec le feature `reproject`.

#[cfg(feature = "reproject")]
use anyhow::{bail, Context, Result};
#[cfg(feature = "reproject")]
use proj::Proj;

/// Transformation entre deux systèmes de coordonnées quelconques connus de PROJ
#[cfg(feature = "reproject")]
pub struct Reprojector {
    proj: Proj,
    source: String,
    target: String,
}

#[cfg(feature = "reproject")]
impl Reprojector {
    /// Crée une transformation entre deux identifiants (ex: "EPSG:2154")
    pub fn new(source: &str, target: &str) -> Result<Self> {
        let proj = Proj::new_known_crs(source, target, None).context(format!(
            "Failed to create projection from {} to {}",
            source, target
        ))?;

        Ok(Self {
            proj,
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    /// Vérifie qu'un identifiant est résolu par PROJ
    pub fn is_known(authid: &str) -> bool {
        Proj::new(authid).is_ok()
    }

    /// Transforme une coordonnée unique
    pub fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (tx, ty) = self
            .proj
            .convert((x, y))
            .context("Coordinate transformation failed")?;
        if !tx.is_finite() || !ty.is_finite() {
            bail!(
                "Transformation {} -> {} produced a non-finite coordinate",
                self.source,
                self.target
            );
        }
        Ok((tx, ty))
    }
}

#[cfg(feature = "reproject")]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lambert93_to_wgs84() {
        // Paris (environ), Lambert-93: X=652381, Y=6862047
        let reprojector = Reprojector::new("EPSG:2154", "EPSG:4326").unwrap();
        let (lon, lat) = reprojector.transform_point(652381.0, 6862047.0).unwrap();

        assert!(
            lon > 2.0 && lon < 3.0,
            "Longitude should be around 2.35, got {}",
            lon
        );
        assert!(
            lat > 48.0 && lat < 49.0,
            "Latitude should be around 48.85, got {}",
            lat
        );
    }

    #[test]
    fn test_known_identifiers() {
        assert!(Reprojector::is_known("EPSG:2154"));
        assert!(!Reprojector::is_known("EPSG:99999"));
    }

    #[test]
    fn test_invalid_epsg() {
        assert!(Reprojector::new("EPSG:99999", "EPSG:4326").is_err());
    }
}
