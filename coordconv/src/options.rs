//! Options de formatage et de traitement

use serde::{Deserialize, Serialize};

use crate::types::FieldSpec;

/// Noms des champs calculés
pub const LON_DD: &str = "lon_dd";
pub const LAT_DD: &str = "lat_dd";
pub const LON_DMS: &str = "lon_dms";
pub const LAT_DMS: &str = "lat_dms";
pub const X_PROJ: &str = "x_proj";
pub const Y_PROJ: &str = "y_proj";

/// Options d'une conversion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Longueur d'affichage des degrés décimaux
    pub dd_length: u16,

    /// Nombre de décimales des degrés décimaux
    pub dd_precision: u8,

    /// Longueur maximale des chaînes DMS
    pub dms_length: u16,

    /// Longueur d'affichage des X/Y projetés
    pub xy_length: u16,

    /// Nombre de décimales des X/Y projetés
    pub xy_precision: u8,

    /// Fréquence des notifications de progression (en entités)
    pub progress_interval: usize,

    /// Suffixe du nom de la nouvelle couche
    pub layer_suffix: String,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            dd_length: 24,
            dd_precision: 10,
            dms_length: 64,
            xy_length: 24,
            xy_precision: 3,
            progress_interval: 50,
            layer_suffix: "_CoordConv".to_string(),
        }
    }
}

impl ConversionOptions {
    /// Champs à créer, dans l'ordre: lon_dd, lat_dd, lon_dms, lat_dms [, x_proj, y_proj]
    pub fn computed_fields(&self, with_target: bool) -> Vec<FieldSpec> {
        let mut fields = vec![
            FieldSpec::float(LON_DD, self.dd_length, self.dd_precision),
            FieldSpec::float(LAT_DD, self.dd_length, self.dd_precision),
            FieldSpec::text(LON_DMS, self.dms_length),
            FieldSpec::text(LAT_DMS, self.dms_length),
        ];
        if with_target {
            fields.push(FieldSpec::float(X_PROJ, self.xy_length, self.xy_precision));
            fields.push(FieldSpec::float(Y_PROJ, self.xy_length, self.xy_precision));
        }
        fields
    }

    /// Nom de la couche créée quand la source n'est pas éditable
    pub fn derived_name(&self, original: &str) -> String {
        format!("{}{}", original, self.layer_suffix)
    }
}
