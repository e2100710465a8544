//! Projection Lambert 93 (EPSG:2154)
//!
//! Lambert Conformal Conic avec 2 parallèles standards

use super::ellipsoid::Ellipsoid;
use super::Geographic;
use anyhow::Result;

/// Paramètres Lambert 93 (EPSG:2154)
struct Lambert93 {
    /// Longitude origine (méridien de Greenwich en RGF93)
    lon0: f64,
    /// Latitude origine
    lat0: f64,
    /// Premier parallèle standard
    lat1: f64,
    /// Deuxième parallèle standard
    lat2: f64,
    /// False easting
    x0: f64,
    /// False northing
    y0: f64,
}

impl Default for Lambert93 {
    fn default() -> Self {
        Self {
            lon0: 3.0_f64.to_radians(),  // 3°E
            lat0: 46.5_f64.to_radians(), // 46.5°N
            lat1: 44.0_f64.to_radians(), // 44°N
            lat2: 49.0_f64.to_radians(), // 49°N
            x0: 700000.0,                // False easting
            y0: 6600000.0,               // False northing
        }
    }
}

/// Constantes dérivées de la conique
struct Cone {
    /// Exposant de la projection
    n: f64,
    c: f64,
    /// Rayon à l'origine
    r0: f64,
}

impl Lambert93 {
    fn cone(&self) -> Cone {
        let ell = Ellipsoid::GRS80;
        let e = ell.e();

        // Grandes normales aux parallèles standards
        let n1 = ell.normal_radius(self.lat1);
        let n2 = ell.normal_radius(self.lat2);
        let iso1 = isometric_latitude(self.lat1, e);
        let iso2 = isometric_latitude(self.lat2, e);
        let iso0 = isometric_latitude(self.lat0, e);

        // Exposant, constante C et rayon à l'origine
        let n = ((n1 * self.lat1.cos()).ln() - (n2 * self.lat2.cos()).ln()) / (iso2 - iso1);
        let c = (n1 * self.lat1.cos() / n) * (n * iso1).exp();
        let r0 = c * (-n * iso0).exp();

        Cone { n, c, r0 }
    }
}

/// Calcule la latitude isométrique
fn isometric_latitude(lat: f64, e: f64) -> f64 {
    let sin_lat = lat.sin();
    let term = ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).powf(e / 2.0);
    ((std::f64::consts::FRAC_PI_4 + lat / 2.0).tan() * term).ln()
}

/// Calcule la latitude depuis la latitude isométrique (itératif)
fn latitude_from_isometric(iso_lat: f64, e: f64) -> f64 {
    let mut lat = 2.0 * iso_lat.exp().atan() - std::f64::consts::FRAC_PI_2;

    for _ in 0..10 {
        let sin_lat = lat.sin();
        let term = ((1.0 + e * sin_lat) / (1.0 - e * sin_lat)).powf(e / 2.0);
        let new_lat = 2.0 * (iso_lat.exp() * term).atan() - std::f64::consts::FRAC_PI_2;

        if (new_lat - lat).abs() < 1e-12 {
            return new_lat;
        }
        lat = new_lat;
    }
    lat
}

/// Convertit Lambert 93 vers coordonnées géographiques
pub fn lambert93_to_geographic(x: f64, y: f64) -> Result<Geographic> {
    let params = Lambert93::default();
    let Cone { n, c, r0 } = params.cone();

    // Coordonnées centrées
    let dx = x - params.x0;
    let dy = y - params.y0;

    // Rayon et angle
    let r = (dx.powi(2) + (r0 - dy).powi(2)).sqrt();
    let r = if n < 0.0 { -r } else { r };
    let gamma = (dx / (r0 - dy)).atan();

    // Latitude isométrique puis géographique
    let iso_lat = -(r / c).ln() / n;
    let lat = latitude_from_isometric(iso_lat, Ellipsoid::GRS80.e());

    // Longitude
    let lon = params.lon0 + gamma / n;

    Ok(Geographic::new(lon, lat))
}

/// Convertit des coordonnées géographiques vers Lambert 93
pub fn geographic_to_lambert93(geo: Geographic) -> Result<(f64, f64)> {
    let params = Lambert93::default();
    let Cone { n, c, r0 } = params.cone();

    // Rayon du parallèle et angle au méridien origine
    let r = c * (-n * isometric_latitude(geo.lat, Ellipsoid::GRS80.e())).exp();
    let gamma = n * (geo.lon - params.lon0);

    // X = X0 + R * sin(γ), Y = Y0 + R0 - R * cos(γ)
    let x = params.x0 + r * gamma.sin();
    let y = params.y0 + r0 - r * gamma.cos();

    Ok((x, y))
}
