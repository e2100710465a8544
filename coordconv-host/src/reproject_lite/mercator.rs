//! Projection Web Mercator (EPSG:3857)
//!
//! Modèle sphérique sur le rayon équatorial WGS84 (Pseudo-Mercator).

use super::ellipsoid::Ellipsoid;
use super::Geographic;
use anyhow::{bail, Result};

/// Latitude maximale couverte par la grille Web Mercator
const MAX_LATITUDE: f64 = 85.06;

/// Convertit coordonnées géographiques vers Web Mercator (EPSG:3857)
pub fn geographic_to_web_mercator(geo: Geographic) -> Result<(f64, f64)> {
    // Modèle sphérique, rayon équatorial
    let r = Ellipsoid::WGS84.a;

    // Au-delà de la grille, Y tend vers l'infini
    if geo.lat.to_degrees().abs() > MAX_LATITUDE {
        bail!(
            "Latitude {:.6} outside Web Mercator domain",
            geo.lat.to_degrees()
        );
    }

    // X = R * longitude
    let x = r * geo.lon;

    // Y = R * ln(tan(π/4 + lat/2))
    let y = r * (std::f64::consts::FRAC_PI_4 + geo.lat / 2.0).tan().ln();

    Ok((x, y))
}

/// Convertit Web Mercator vers coordonnées géographiques
pub fn web_mercator_to_geographic(x: f64, y: f64) -> Result<Geographic> {
    let r = Ellipsoid::WGS84.a;

    // Longitude = x / R
    let lon = x / r;

    // Latitude = 2 * atan(exp(y/R)) - π/2
    let lat = 2.0 * (y / r).exp().atan() - std::f64::consts::FRAC_PI_2;

    Ok(Geographic::new(lon, lat))
}
