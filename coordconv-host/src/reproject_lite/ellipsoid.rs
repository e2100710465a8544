//! Définitions des ellipsoïdes

/// Ellipsoïde de révolution défini par son demi-grand axe et son aplatissement
#[derive(Debug, Clone, Copy)]
pub struct Ellipsoid {
    /// Demi-grand axe (rayon équatorial) en mètres
    pub a: f64,
    /// Aplatissement
    pub f: f64,
}

impl Ellipsoid {
    /// WGS84 (UTM, Web Mercator)
    pub const WGS84: Self = Self {
        a: 6378137.0,
        f: 1.0 / 298.257223563,
    };

    /// GRS80 (Lambert 93), différence avec WGS84 < 0.1mm
    pub const GRS80: Self = Self {
        a: 6378137.0,
        f: 1.0 / 298.257222101,
    };

    /// Première excentricité au carré
    pub fn e2(&self) -> f64 {
        2.0 * self.f - self.f * self.f
    }

    /// Première excentricité
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    /// Deuxième excentricité au carré
    pub fn ep2(&self) -> f64 {
        self.e2() / (1.0 - self.e2())
    }

    /// Grande normale (rayon de courbure dans le premier vertical)
    pub fn normal_radius(&self, lat: f64) -> f64 {
        self.a / (1.0 - self.e2() * lat.sin().powi(2)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eccentricities() {
        assert!((Ellipsoid::WGS84.e() - 0.0818191908426215).abs() < 1e-15);
        assert!((Ellipsoid::GRS80.e() - 0.0818191910428158).abs() < 1e-15);
    }

    #[test]
    fn test_normal_radius_equator() {
        assert_eq!(Ellipsoid::WGS84.normal_radius(0.0), Ellipsoid::WGS84.a);
    }
}
