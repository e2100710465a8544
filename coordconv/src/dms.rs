//! Formatage sexagésimal (degrés, minutes, secondes)
//!
//! Format: `DD°MM'SS.ss"H` pour une latitude, `DDD°MM'SS.ss"H` pour une longitude.

/// Rôle d'une valeur: latitude ou longitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRole {
    Latitude,
    Longitude,
}

impl AxisRole {
    /// Lettre d'hémisphère pour une valeur signée
    fn hemisphere(self, value: f64) -> char {
        match (self, value >= 0.0) {
            (Self::Latitude, true) => 'N',
            (Self::Latitude, false) => 'S',
            (Self::Longitude, true) => 'E',
            (Self::Longitude, false) => 'W',
        }
    }
}

/// Convertit des degrés décimaux en chaîne DMS
///
/// Une valeur absente (ou non finie) donne la chaîne vide.
/// Degrés et minutes sont tronqués, les secondes arrondies à 2 décimales.
pub fn format_dms(value: Option<f64>, role: AxisRole) -> String {
    let Some(dd) = value.filter(|v| v.is_finite()) else {
        return String::new();
    };

    let hemi = role.hemisphere(dd);
    let abs_dd = dd.abs();
    let deg = abs_dd.trunc();
    let min_float = (abs_dd - deg) * 60.0;
    let minute = min_float.trunc();
    let sec = (min_float - minute) * 60.0;

    let (deg, minute) = (deg as u32, minute as u32);
    match role {
        AxisRole::Latitude => format!("{:02}°{:02}'{:05.2}\"{}", deg, minute, sec, hemi),
        AxisRole::Longitude => format!("{:03}°{:02}'{:05.2}\"{}", deg, minute, sec, hemi),
    }
}
