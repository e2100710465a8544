//! Progression et annulation coopérative

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Observateur de progression (couche UI)
///
/// `is_cancelled` est interrogé avant chaque entité; `report` est purement
/// informatif et n'influence pas le résultat.
pub trait Progress {
    fn report(&mut self, processed: usize, total: usize);

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Pas de suivi
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _processed: usize, _total: usize) {}
}

/// Drapeau d'annulation partageable entre l'UI et la boucle de conversion
#[derive(Debug, Default, Clone)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demande l'arrêt du traitement
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Progress for CancelFlag {
    fn report(&mut self, processed: usize, total: usize) {
        tracing::debug!(processed, total, "Conversion progress");
    }

    fn is_cancelled(&self) -> bool {
        self.is_set()
    }
}
