//! Rapport de conversion avec graceful degradation
//!
//! Agrège le résultat d'une conversion (y compris les erreurs fatales) dans
//! une structure sérialisable en JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use coordconv::{CommitStrategy, ConversionOutcome, ConvertError, RunStatus};
use serde::Serialize;

/// Statut global de la conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportStatus {
    /// Conversion persistée sans erreur
    Success,
    /// Conversion persistée avec des erreurs non-fatales
    PartialSuccess,
    /// Aucune entité modifiée
    NothingChanged,
    /// Persistance annulée (rollback)
    RolledBack,
    /// Conversion échouée
    Failed,
}

/// Niveau de sévérité des erreurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorLevel {
    /// Erreur fatale: conversion abandonnée ou non persistée
    Fatal,
    /// Erreur: entité sans valeurs calculées
    Error,
}

/// Erreur de conversion avec contexte
#[derive(Debug, Clone, Serialize)]
pub struct ReportError {
    pub level: ErrorLevel,
    /// Identifiant de l'entité (optionnel)
    pub feature_id: Option<i64>,
    pub message: String,
}

/// Rapport d'une conversion
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Couche source
    pub layer: String,
    pub duration_secs: f64,
    pub status: ReportStatus,
    /// Absente si la conversion a échoué avant le choix de stratégie
    pub strategy: Option<CommitStrategy>,
    pub processed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub new_store: Option<String>,
    pub records_written: usize,
    pub errors: Vec<ReportError>,
    /// Message utilisateur
    pub message: String,
}

impl RunReport {
    /// Construit le rapport depuis le résultat du moteur
    pub fn from_result(layer: &str, result: &Result<ConversionOutcome, ConvertError>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(layer, outcome),
            Err(e) => Self {
                layer: layer.to_string(),
                duration_secs: 0.0,
                status: ReportStatus::Failed,
                strategy: None,
                processed: 0,
                succeeded: 0,
                skipped: 0,
                failed: 0,
                cancelled: false,
                new_store: None,
                records_written: 0,
                errors: vec![ReportError {
                    level: ErrorLevel::Fatal,
                    feature_id: None,
                    message: e.to_string(),
                }],
                message: format!("aborted: {}", e),
            },
        }
    }

    fn from_outcome(layer: &str, outcome: &ConversionOutcome) -> Self {
        let mut errors: Vec<ReportError> = outcome
            .failures
            .iter()
            .map(|f| ReportError {
                level: ErrorLevel::Error,
                feature_id: f.feature_id.map(|id| id.0),
                message: f.message.clone(),
            })
            .collect();
        if let Some(reason) = &outcome.commit_error {
            errors.push(ReportError {
                level: ErrorLevel::Fatal,
                feature_id: None,
                message: reason.clone(),
            });
        }

        let status = match outcome.status {
            RunStatus::Updated | RunStatus::NewStoreCreated if outcome.failed > 0 => {
                ReportStatus::PartialSuccess
            }
            RunStatus::Updated | RunStatus::NewStoreCreated => ReportStatus::Success,
            RunStatus::NothingChanged => ReportStatus::NothingChanged,
            RunStatus::RolledBack => ReportStatus::RolledBack,
            RunStatus::NewStoreFailed => ReportStatus::Failed,
        };

        Self {
            layer: layer.to_string(),
            duration_secs: 0.0,
            status,
            strategy: Some(outcome.strategy),
            processed: outcome.processed,
            succeeded: outcome.succeeded,
            skipped: outcome.skipped,
            failed: outcome.failed,
            cancelled: outcome.cancelled,
            new_store: outcome.new_store.clone(),
            records_written: outcome.records_written,
            errors,
            message: outcome.summary(),
        }
    }

    /// Définit la durée de la conversion
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .context(format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} ({} processed, {} skipped, {} errors)",
            self.layer,
            self.message,
            self.processed,
            self.skipped,
            self.errors.len()
        )
    }
}
