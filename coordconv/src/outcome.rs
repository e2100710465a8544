//! Résultat d'une conversion

use serde::Serialize;

use crate::engine::RunCounts;
use crate::types::FeatureId;

/// Stratégie de persistance retenue pour une conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommitStrategy {
    /// Modification de la couche source dans une transaction d'édition
    InPlace,
    /// Création d'une nouvelle couche (source non éditable)
    NewStore,
}

/// Statut final d'une conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Modifications commitées dans la couche source
    Updated,
    /// Aucune entité modifiée, session d'édition annulée
    NothingChanged,
    /// Commit en échec, session d'édition annulée
    RolledBack,
    /// Nouvelle couche créée et enregistrée
    NewStoreCreated,
    /// Insertion dans la nouvelle couche en échec, couche non enregistrée
    NewStoreFailed,
}

/// Échec non fatal sur une entité
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureFailure {
    pub feature_id: Option<FeatureId>,
    pub message: String,
}

impl FeatureFailure {
    pub fn new(feature_id: Option<FeatureId>, message: impl std::fmt::Display) -> Self {
        Self {
            feature_id,
            message: message.to_string(),
        }
    }
}

/// Rapport d'une conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionOutcome {
    pub strategy: CommitStrategy,
    pub status: RunStatus,

    /// Entités parcourues avant fin ou annulation
    pub processed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,

    /// Vrai si l'utilisateur a interrompu la boucle
    pub cancelled: bool,

    /// Nom de la couche créée (stratégie NewStore)
    pub new_store: Option<String>,

    /// Entités insérées dans la nouvelle couche
    pub records_written: usize,

    /// Erreurs non fatales par entité
    pub failures: Vec<FeatureFailure>,

    /// Raison d'un échec de persistance
    pub commit_error: Option<String>,
}

impl ConversionOutcome {
    pub(crate) fn from_counts(
        strategy: CommitStrategy,
        status: RunStatus,
        counts: RunCounts,
    ) -> Self {
        Self {
            strategy,
            status,
            processed: counts.processed,
            succeeded: counts.succeeded,
            skipped: counts.skipped,
            failed: counts.failed,
            cancelled: counts.cancelled,
            new_store: None,
            records_written: 0,
            failures: counts.failures,
            commit_error: None,
        }
    }

    /// Vrai si des données ont été persistées
    pub fn changed(&self) -> bool {
        match self.status {
            RunStatus::Updated => true,
            RunStatus::NewStoreCreated => self.records_written > 0,
            RunStatus::NothingChanged | RunStatus::RolledBack | RunStatus::NewStoreFailed => false,
        }
    }

    /// Message utilisateur
    pub fn summary(&self) -> String {
        let mut msg = match self.status {
            RunStatus::Updated => format!("completed, {} updated", self.succeeded),
            RunStatus::NothingChanged => "completed, nothing changed (rolled back)".to_string(),
            RunStatus::RolledBack => "persistence failed (rolled back)".to_string(),
            RunStatus::NewStoreCreated => format!(
                "source not editable: new layer '{}' created with {} records",
                self.new_store.as_deref().unwrap_or_default(),
                self.records_written
            ),
            RunStatus::NewStoreFailed => format!(
                "source not editable: new layer '{}' could not be filled",
                self.new_store.as_deref().unwrap_or_default()
            ),
        };
        if self.failed > 0 {
            msg.push_str(&format!(", {} failed", self.failed));
        }
        if self.cancelled {
            msg.push_str(" (cancelled)");
        }
        msg
    }
}
