//! Projection UTM (Universal Transverse Mercator) sur WGS84
//!
//! Toutes les zones 1 à 60, hémisphères nord (EPSG:326xx) et sud (EPSG:327xx).

use super::ellipsoid::Ellipsoid;
use super::Geographic;
use anyhow::{bail, Result};

/// Facteur d'échelle sur le méridien central
const K0: f64 = 0.9996;
/// False easting
const X0: f64 = 500000.0;
/// False northing de l'hémisphère sud
const Y0_SOUTH: f64 = 10000000.0;

fn false_northing(south: bool) -> f64 {
    if south {
        Y0_SOUTH
    } else {
        0.0
    }
}

/// Longitude centrale de la zone (radians)
fn central_meridian(zone: u8) -> Result<f64> {
    if !(1..=60).contains(&zone) {
        bail!("UTM zone {} out of range (1-60)", zone);
    }
    Ok((zone as f64 * 6.0 - 183.0).to_radians())
}

/// Longueur de l'arc de méridien depuis l'équateur
fn meridian_arc(lat: f64) -> f64 {
    let ell = Ellipsoid::WGS84;
    let e2 = ell.e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    ell.a
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

/// Convertit des coordonnées géographiques WGS84 vers UTM
pub fn geographic_to_utm(geo: Geographic, zone: u8, south: bool) -> Result<(f64, f64)> {
    let lon0 = central_meridian(zone)?;
    let ell = Ellipsoid::WGS84;
    let ep2 = ell.ep2();

    let lat = geo.lat;
    let n = ell.normal_radius(lat);
    let t = lat.tan().powi(2);
    let c = ep2 * lat.cos().powi(2);
    let a = (geo.lon - lon0) * lat.cos();
    let m = meridian_arc(lat);

    let x = K0
        * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + X0;

    let y = K0
        * (m + n
            * lat.tan()
            * (a.powi(2) / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0))
        + false_northing(south);

    Ok((x, y))
}

/// Convertit UTM vers coordonnées géographiques WGS84
pub fn utm_to_geographic(x: f64, y: f64, zone: u8, south: bool) -> Result<Geographic> {
    let lon0 = central_meridian(zone)?;
    let ell = Ellipsoid::WGS84;
    let a = ell.a;
    let e2 = ell.e2();
    let ep2 = ell.ep2();

    // Coordonnées réduites
    let x = x - X0;
    let y = y - false_northing(south);

    // Latitude du pied de la perpendiculaire
    let m = y / K0;
    let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let n1 = ell.normal_radius(phi1);
    let t1 = tan_phi1.powi(2);
    let c1 = ep2 * cos_phi1.powi(2);
    let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
    let d = x / (n1 * K0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2) - 252.0 * ep2 - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);

    let lon = lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos_phi1;

    Ok(Geographic::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_meridian_on_equator() {
        let (x, y) = geographic_to_utm(Geographic::from_degrees(3.0, 0.0), 31, false).unwrap();
        assert!((x - 500000.0).abs() < 1e-6, "x={}", x);
        assert!(y.abs() < 1e-6, "y={}", y);
    }

    #[test]
    fn test_invalid_zone() {
        assert!(geographic_to_utm(Geographic::from_degrees(3.0, 0.0), 0, false).is_err());
        assert!(utm_to_geographic(500000.0, 0.0, 61, false).is_err());
    }

    #[test]
    fn test_martinique() {
        // Fort-de-France, zone 20N
        let geo = utm_to_geographic(708000.0, 1615000.0, 20, false).unwrap();
        let (lon, lat) = geo.to_degrees();

        assert!((lon - (-61.07)).abs() < 0.2, "lon={}", lon);
        assert!((lat - 14.60).abs() < 0.2, "lat={}", lat);
    }

    #[test]
    fn test_reunion() {
        // Saint-Denis, zone 40S
        let geo = utm_to_geographic(338000.0, 7691000.0, 40, true).unwrap();
        let (lon, lat) = geo.to_degrees();

        assert!((lon - 55.45).abs() < 0.2, "lon={}", lon);
        assert!((lat - (-20.88)).abs() < 0.2, "lat={}", lat);
    }

    #[test]
    fn test_guyane() {
        // Cayenne, zone 22N
        let geo = utm_to_geographic(352000.0, 546000.0, 22, false).unwrap();
        let (lon, lat) = geo.to_degrees();

        assert!((lon - (-52.33)).abs() < 0.2, "lon={}", lon);
        assert!((lat - 4.93).abs() < 0.2, "lat={}", lat);
    }

    #[test]
    fn test_forward_inverse() {
        for (lon, lat, zone, south) in [
            (-61.07, 14.60, 20, false),
            (55.45, -20.88, 40, true),
            (2.35, 48.85, 31, false),
        ] {
            let (x, y) =
                geographic_to_utm(Geographic::from_degrees(lon, lat), zone, south).unwrap();
            let (lon2, lat2) = utm_to_geographic(x, y, zone, south).unwrap().to_degrees();
            assert!((lon2 - lon).abs() < 1e-6, "zone {}: lon={}", zone, lon2);
            assert!((lat2 - lat).abs() < 1e-6, "zone {}: lat={}", zone, lat2);
        }
    }
}
