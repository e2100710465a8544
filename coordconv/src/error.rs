//! Types d'erreurs pour le crate coordconv

use thiserror::Error;

use crate::types::FeatureId;

/// Erreur renvoyée par les capacités externes (store, transformation, projet)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Rôle d'un système de référence dans une conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceRole {
    /// SCR d'origine de la couche
    Source,
    /// SCR cible optionnel
    Target,
}

impl std::fmt::Display for ReferenceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Erreurs pouvant survenir pendant une conversion
#[derive(Debug, Error)]
pub enum ConvertError {
    /// SCR vide ou non résolvable
    #[error("Invalid {role} reference system: '{reference}'")]
    InvalidReference {
        role: ReferenceRole,
        reference: String,
    },

    /// Aucune transformation possible entre deux SCR
    #[error("No transform from {from} to {to}: {reason}")]
    NoTransform {
        from: String,
        to: String,
        reason: String,
    },

    /// Champ de sortie impossible à ajouter
    #[error("Cannot add field {field}: {reason}")]
    Schema { field: String, reason: String },

    /// Création de la nouvelle couche impossible
    #[error("Cannot create store {name}: {reason}")]
    StoreCreation { name: String, reason: String },

    /// Échec de transformation pour une entité (non fatal)
    #[error("Transform failed for feature {}: {reason}", display_id(.feature_id))]
    FeatureTransform {
        feature_id: Option<FeatureId>,
        reason: String,
    },

    /// Échec de persistance des modifications
    #[error("Commit failed: {reason}")]
    Commit { reason: String },
}

fn display_id(id: &Option<FeatureId>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => "<new>".to_string(),
    }
}

impl ConvertError {
    /// Crée une erreur de SCR invalide
    pub fn invalid_reference(role: ReferenceRole, reference: impl Into<String>) -> Self {
        Self::InvalidReference {
            role,
            reference: reference.into(),
        }
    }

    /// Crée une erreur de champ
    pub fn schema(field: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Schema {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// Crée une erreur de transformation d'entité
    pub fn feature_transform(
        feature_id: Option<FeatureId>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::FeatureTransform {
            feature_id,
            reason: reason.to_string(),
        }
    }

    /// Les erreurs fatales arrêtent la conversion avant toute mutation
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::FeatureTransform { .. } | Self::Commit { .. })
    }
}
