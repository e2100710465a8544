//! Moteur de conversion par entité
//!
//! Pour chaque entité, dans l'ordre du store:
//! géométrie → point représentatif → WGS84 → DMS → (SCR cible).
//! Une entité en échec est journalisée et comptée, la boucle continue.

use geo::Point;
use tracing::{info, warn};

use crate::dms::{format_dms, AxisRole};
use crate::error::{BoxError, ConvertError};
use crate::host::Transformer;
use crate::outcome::FeatureFailure;
use crate::progress::Progress;
use crate::reduce::reduce;
use crate::types::FeatureRecord;

/// Valeurs calculées pour une entité
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedValues {
    pub lon_dd: f64,
    pub lat_dd: f64,
    pub lon_dms: String,
    pub lat_dms: String,
    /// X/Y dans le SCR cible, si demandé
    pub projected: Option<Point>,
}

/// Résultat du traitement d'une entité
#[derive(Debug)]
pub enum FeatureOutcome {
    /// Géométrie nulle, vide ou non réductible
    Skipped,
    /// Toutes les sorties demandées ont été calculées
    Converted(ComputedValues),
    /// Échec de transformation (aucune valeur partielle)
    Failed(ConvertError),
}

/// Compteurs d'une boucle de conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunCounts {
    pub processed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub failures: Vec<FeatureFailure>,
}

impl RunCounts {
    /// Requalifie une entité convertie en échec (ex: refus du tampon d'édition)
    pub fn demote(&mut self, failure: FeatureFailure) {
        self.succeeded = self.succeeded.saturating_sub(1);
        self.failed += 1;
        self.failures.push(failure);
    }
}

/// Moteur de conversion
pub struct Engine<'a, T: Transformer> {
    to_wgs84: &'a T,
    to_target: Option<&'a T>,
    progress_interval: usize,
}

impl<'a, T: Transformer> Engine<'a, T> {
    pub fn new(to_wgs84: &'a T, to_target: Option<&'a T>, progress_interval: usize) -> Self {
        Self {
            to_wgs84,
            to_target,
            progress_interval: progress_interval.max(1),
        }
    }

    /// Vrai si un SCR cible a été demandé
    pub fn has_target(&self) -> bool {
        self.to_target.is_some()
    }

    /// Traite une entité
    pub fn compute(&self, feature: &FeatureRecord) -> FeatureOutcome {
        let Some(point) = reduce(feature.geometry.as_ref()) else {
            return FeatureOutcome::Skipped;
        };

        match self.convert_point(point) {
            Ok(values) => FeatureOutcome::Converted(values),
            Err(e) => FeatureOutcome::Failed(ConvertError::feature_transform(feature.id, e)),
        }
    }

    fn convert_point(&self, point: Point) -> Result<ComputedValues, BoxError> {
        let wgs = finite(self.to_wgs84.transform(point)?)?;
        let (lon_dd, lat_dd) = (wgs.x(), wgs.y());

        let projected = match self.to_target {
            Some(tf) => Some(finite(tf.transform(point)?)?),
            None => None,
        };

        Ok(ComputedValues {
            lon_dd,
            lat_dd,
            lon_dms: format_dms(Some(lon_dd), AxisRole::Longitude),
            lat_dms: format_dms(Some(lat_dd), AxisRole::Latitude),
            projected,
        })
    }

    /// Parcourt les entités et transmet chaque résultat au puits
    ///
    /// L'annulation est vérifiée avant chaque entité; les résultats déjà
    /// transmis ne sont pas annulés.
    pub fn run<I, F>(
        &self,
        features: I,
        total: usize,
        progress: &mut dyn Progress,
        mut sink: F,
    ) -> RunCounts
    where
        I: IntoIterator<Item = FeatureRecord>,
        F: FnMut(FeatureRecord, FeatureOutcome),
    {
        let mut counts = RunCounts::default();

        for feature in features {
            if progress.is_cancelled() {
                info!(processed = counts.processed, total, "Conversion cancelled");
                counts.cancelled = true;
                break;
            }
            counts.processed += 1;

            let outcome = self.compute(&feature);
            match &outcome {
                FeatureOutcome::Skipped => counts.skipped += 1,
                FeatureOutcome::Converted(_) => counts.succeeded += 1,
                FeatureOutcome::Failed(e) => {
                    warn!(feature_id = ?feature.id, error = %e, "Coordinate conversion failed");
                    counts.failed += 1;
                    counts.failures.push(FeatureFailure::new(feature.id, e));
                }
            }
            sink(feature, outcome);

            if counts.processed % self.progress_interval == 0 {
                progress.report(counts.processed, total);
            }
        }

        progress.report(counts.processed, total);
        counts
    }
}

fn finite(p: Point) -> Result<Point, BoxError> {
    if p.x().is_finite() && p.y().is_finite() {
        Ok(p)
    } else {
        Err(format!("non-finite coordinates ({}, {})", p.x(), p.y()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use crate::types::FeatureId;
    use geo::{Geometry, MultiPoint};

    /// Décalage fixe, échoue pour x négatif ou si `broken`
    struct Shift {
        offset: f64,
        broken: bool,
    }

    impl Shift {
        fn by(offset: f64) -> Self {
            Self {
                offset,
                broken: false,
            }
        }

        fn broken() -> Self {
            Self {
                offset: 0.0,
                broken: true,
            }
        }
    }

    impl Transformer for Shift {
        fn transform(&self, point: Point) -> Result<Point, BoxError> {
            if self.broken {
                return Err("datum grid missing".into());
            }
            if point.x() < 0.0 {
                return Err("point outside projection domain".into());
            }
            Ok(Point::new(point.x() + self.offset, point.y() + self.offset))
        }
    }

    struct Recorder {
        reports: Vec<(usize, usize)>,
        cancel_after: Option<usize>,
    }

    impl Progress for Recorder {
        fn report(&mut self, processed: usize, total: usize) {
            self.reports.push((processed, total));
        }

        fn is_cancelled(&self) -> bool {
            match (self.cancel_after, self.reports.last()) {
                (Some(limit), Some((processed, _))) => *processed >= limit,
                _ => false,
            }
        }
    }

    fn point_feature(id: i64, x: f64, y: f64) -> FeatureRecord {
        FeatureRecord {
            id: Some(FeatureId(id)),
            geometry: Some(Geometry::Point(Point::new(x, y))),
            attributes: vec![],
        }
    }

    #[test]
    fn test_compute_without_target() {
        let wgs = Shift::by(0.0);
        let engine = Engine::new(&wgs, None, 50);
        match engine.compute(&point_feature(1, 2.3508, 48.8567)) {
            FeatureOutcome::Converted(v) => {
                assert_eq!(v.lon_dd, 2.3508);
                assert_eq!(v.lat_dd, 48.8567);
                assert_eq!(v.lon_dms, "002°21'02.88\"E");
                assert_eq!(v.lat_dms, "48°51'24.12\"N");
                assert!(v.projected.is_none());
            }
            other => panic!("Expected conversion, got {:?}", other),
        }
    }

    #[test]
    fn test_compute_with_target() {
        let wgs = Shift::by(0.0);
        let target = Shift::by(100.0);
        let engine = Engine::new(&wgs, Some(&target), 50);
        match engine.compute(&point_feature(1, 1.0, 2.0)) {
            FeatureOutcome::Converted(v) => {
                assert_eq!(v.projected, Some(Point::new(101.0, 102.0)));
            }
            other => panic!("Expected conversion, got {:?}", other),
        }
    }

    #[test]
    fn test_target_failure_fails_whole_feature() {
        let wgs = Shift::by(0.0);
        let target = Shift::broken();
        let engine = Engine::new(&wgs, Some(&target), 50);
        match engine.compute(&point_feature(7, 1.0, 2.0)) {
            FeatureOutcome::Failed(ConvertError::FeatureTransform { feature_id, reason }) => {
                assert_eq!(feature_id, Some(FeatureId(7)));
                assert!(reason.contains("datum grid"));
            }
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_wgs84_failure() {
        let wgs = Shift::by(0.0);
        let engine = Engine::new(&wgs, None, 50);
        match engine.compute(&point_feature(7, -1.0, 2.0)) {
            FeatureOutcome::Failed(ConvertError::FeatureTransform { reason, .. }) => {
                assert!(reason.contains("outside"));
            }
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_empty_geometry() {
        let wgs = Shift::by(0.0);
        let engine = Engine::new(&wgs, None, 50);
        let null_geom = FeatureRecord::new(None, vec![]);
        let empty = FeatureRecord::new(
            Some(Geometry::MultiPoint(MultiPoint::new(vec![]))),
            vec![],
        );
        assert!(matches!(engine.compute(&null_geom), FeatureOutcome::Skipped));
        assert!(matches!(engine.compute(&empty), FeatureOutcome::Skipped));
    }

    #[test]
    fn test_non_finite_result_is_failure() {
        let wgs = Shift::by(f64::INFINITY);
        let engine = Engine::new(&wgs, None, 50);
        assert!(matches!(
            engine.compute(&point_feature(1, 1.0, 1.0)),
            FeatureOutcome::Failed(_)
        ));
    }

    #[test]
    fn test_run_counts_and_order() {
        let wgs = Shift::by(0.0);
        let engine = Engine::new(&wgs, None, 2);
        let features = vec![
            point_feature(1, 1.0, 1.0),
            point_feature(2, -1.0, 1.0),
            FeatureRecord {
                id: Some(FeatureId(3)),
                geometry: None,
                attributes: vec![],
            },
            point_feature(4, 2.0, 2.0),
        ];

        let mut seen = Vec::new();
        let mut progress = Recorder {
            reports: vec![],
            cancel_after: None,
        };
        let counts = engine.run(features, 4, &mut progress, |f, _| seen.push(f.id.unwrap().0));

        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(counts.processed, 4);
        assert_eq!(counts.succeeded, 2);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.skipped, 1);
        assert!(!counts.cancelled);
        assert_eq!(counts.failures.len(), 1);
        assert_eq!(counts.failures[0].feature_id, Some(FeatureId(2)));
        assert_eq!(progress.reports, vec![(2, 4), (4, 4), (4, 4)]);
    }

    #[test]
    fn test_run_cancellation() {
        let wgs = Shift::by(0.0);
        let engine = Engine::new(&wgs, None, 3);
        let features: Vec<_> = (0..10).map(|i| point_feature(i, 1.0, 1.0)).collect();
        let mut progress = Recorder {
            reports: vec![],
            cancel_after: Some(3),
        };
        let mut sunk = 0;
        let counts = engine.run(features, 10, &mut progress, |_, _| sunk += 1);

        assert!(counts.cancelled);
        assert_eq!(counts.processed, 3);
        assert_eq!(sunk, 3);
    }

    #[test]
    fn test_run_no_progress() {
        let wgs = Shift::by(0.0);
        let engine = Engine::new(&wgs, None, 0);
        let counts = engine.run(
            vec![point_feature(1, 1.0, 1.0)],
            1,
            &mut NoProgress,
            |_, _| {},
        );
        assert_eq!(counts.succeeded, 1);
    }
}
