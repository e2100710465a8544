//! Reprojection légère en Rust pur (sans dépendances externes)
//!
//! Systèmes supportés, dans les deux sens :
//! - WGS84 géographique (EPSG:4326)
//! - Web Mercator (EPSG:3857)
//! - Lambert 93 (EPSG:2154) - Métropole
//! - UTM WGS84, zones nord (EPSG:32601-32660) et sud (EPSG:32701-32760)
//!
//! Toute transformation passe par les coordonnées géographiques.

mod ellipsoid;
mod lambert;
mod mercator;
mod smart;
mod utm;

pub use ellipsoid::Ellipsoid;
pub use smart::SmartReprojector;

use anyhow::{bail, Result};

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Crée depuis des degrés
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }
}

/// Système de coordonnées connu de la reprojection légère
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteCrs {
    Wgs84,
    WebMercator,
    Lambert93,
    Utm { zone: u8, south: bool },
}

impl LiteCrs {
    /// Résout un code EPSG
    pub fn from_epsg(epsg: u32) -> Option<Self> {
        match epsg {
            4326 => Some(Self::Wgs84),
            3857 => Some(Self::WebMercator),
            2154 => Some(Self::Lambert93),
            32601..=32660 => Some(Self::Utm {
                zone: (epsg - 32600) as u8,
                south: false,
            }),
            32701..=32760 => Some(Self::Utm {
                zone: (epsg - 32700) as u8,
                south: true,
            }),
            _ => None,
        }
    }

    /// Code EPSG du système
    pub fn epsg(&self) -> u32 {
        match *self {
            Self::Wgs84 => 4326,
            Self::WebMercator => 3857,
            Self::Lambert93 => 2154,
            Self::Utm { zone, south } => (if south { 32700 } else { 32600 }) + zone as u32,
        }
    }

    /// Coordonnées natives vers géographiques
    fn unproject(self, x: f64, y: f64) -> Result<Geographic> {
        match self {
            Self::Wgs84 => {
                if !(-180.0..=180.0).contains(&x) {
                    bail!("Longitude {} out of range [-180, 180]", x);
                }
                if !(-90.0..=90.0).contains(&y) {
                    bail!("Latitude {} out of range [-90, 90]", y);
                }
                Ok(Geographic::from_degrees(x, y))
            }
            Self::WebMercator => mercator::web_mercator_to_geographic(x, y),
            Self::Lambert93 => lambert::lambert93_to_geographic(x, y),
            Self::Utm { zone, south } => utm::utm_to_geographic(x, y, zone, south),
        }
    }

    /// Coordonnées géographiques vers coordonnées natives
    fn project(self, geo: Geographic) -> Result<(f64, f64)> {
        match self {
            Self::Wgs84 => Ok(geo.to_degrees()),
            Self::WebMercator => mercator::geographic_to_web_mercator(geo),
            Self::Lambert93 => lambert::geographic_to_lambert93(geo),
            Self::Utm { zone, south } => utm::geographic_to_utm(geo, zone, south),
        }
    }
}

/// Reprojection légère entre deux systèmes connus
#[derive(Debug, Clone, Copy)]
pub struct ReprojectorLite {
    source: LiteCrs,
    target: LiteCrs,
}

impl ReprojectorLite {
    /// Crée un nouveau reprojector
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self> {
        let Some(source) = LiteCrs::from_epsg(source_epsg) else {
            bail!(
                "EPSG:{} not supported by lite reprojection (4326, 3857, 2154, 326xx, 327xx)",
                source_epsg
            );
        };
        let Some(target) = LiteCrs::from_epsg(target_epsg) else {
            bail!(
                "EPSG:{} not supported by lite reprojection (4326, 3857, 2154, 326xx, 327xx)",
                target_epsg
            );
        };

        Ok(Self { source, target })
    }

    /// Vérifie si un EPSG est supporté
    pub fn is_supported(epsg: u32) -> bool {
        LiteCrs::from_epsg(epsg).is_some()
    }

    /// Transforme un point (x, y) de la source vers la cible
    pub fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            bail!("Non-finite input coordinate ({}, {})", x, y);
        }

        if self.source == self.target {
            self.source.unproject(x, y)?;
            return Ok((x, y));
        }

        // Étape 1: Source → Géographique
        let geo = self.source.unproject(x, y)?;

        // Étape 2: Géographique → Cible
        let (tx, ty) = self.target.project(geo)?;
        if !tx.is_finite() || !ty.is_finite() {
            bail!(
                "Transformation EPSG:{} -> EPSG:{} produced a non-finite coordinate",
                self.source.epsg(),
                self.target.epsg()
            );
        }
        Ok((tx, ty))
    }
}
