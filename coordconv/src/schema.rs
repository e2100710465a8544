//! Création idempotente des champs de sortie

use tracing::debug;

use crate::engine::ComputedValues;
use crate::error::ConvertError;
use crate::host::FeatureStore;
use crate::options::ConversionOptions;
use crate::types::{FieldSpec, FieldValue};

/// Garantit qu'un champ existe une seule fois et retourne son index
///
/// Un champ déjà présent est réutilisé tel quel, sans vérification de type.
pub fn ensure_field<S: FeatureStore + ?Sized>(
    store: &mut S,
    spec: &FieldSpec,
) -> Result<usize, ConvertError> {
    if let Some(index) = store.field_index(&spec.name) {
        return Ok(index);
    }

    store
        .add_field(spec)
        .map_err(|e| ConvertError::schema(&spec.name, e))?;
    store.reload_fields();

    debug!(store = store.name(), field = %spec.name, "Field added");

    store
        .field_index(&spec.name)
        .ok_or_else(|| ConvertError::schema(&spec.name, "field missing after schema reload"))
}

/// Index des champs calculés dans le schéma d'un store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedFields {
    pub lon_dd: usize,
    pub lat_dd: usize,
    pub lon_dms: usize,
    pub lat_dms: usize,
    /// (x_proj, y_proj), seulement si un SCR cible est demandé
    pub projected: Option<(usize, usize)>,
}

impl ComputedFields {
    /// Crée les champs calculés dans l'ordre fixe et retourne leurs index
    pub fn provision<S: FeatureStore + ?Sized>(
        store: &mut S,
        options: &ConversionOptions,
        with_target: bool,
    ) -> Result<Self, ConvertError> {
        let mut indices = Vec::with_capacity(6);
        for spec in options.computed_fields(with_target) {
            indices.push(ensure_field(store, &spec)?);
        }

        Ok(Self {
            lon_dd: indices[0],
            lat_dd: indices[1],
            lon_dms: indices[2],
            lat_dms: indices[3],
            projected: with_target.then(|| (indices[4], indices[5])),
        })
    }

    /// Paires (index, valeur) pour les valeurs calculées d'une entité
    pub fn assignments(&self, values: &ComputedValues) -> Vec<(usize, FieldValue)> {
        let mut out = vec![
            (self.lon_dd, FieldValue::Float(values.lon_dd)),
            (self.lat_dd, FieldValue::Float(values.lat_dd)),
            (self.lon_dms, FieldValue::Text(values.lon_dms.clone())),
            (self.lat_dms, FieldValue::Text(values.lat_dms.clone())),
        ];
        if let (Some((x_idx, y_idx)), Some(p)) = (self.projected, values.projected) {
            out.push((x_idx, FieldValue::Float(p.x())));
            out.push((y_idx, FieldValue::Float(p.y())));
        }
        out
    }
}
