//! Réduction d'une géométrie à un point représentatif
//!
//! - Point simple: le point lui-même
//! - MultiPoint: le premier point de la liste
//! - Lignes, polygones et leurs variantes multiples: le centroïde

use geo::{Centroid, Geometry, Point};

/// Réduit une géométrie à un point, `None` si la géométrie est nulle ou vide
pub fn reduce(geometry: Option<&Geometry>) -> Option<Point> {
    match geometry? {
        Geometry::Point(p) => Some(*p),
        Geometry::MultiPoint(mp) => mp.0.first().copied(),
        // Le centroïde d'une géométrie vide est None
        other => other.centroid(),
    }
}
