//! Sélection et exécution de la stratégie de persistance
//!
//! La stratégie est choisie une seule fois, avant toute création de champ:
//! - couche éditable (ou pouvant le devenir): modification en place
//! - sinon: création obligatoire d'une nouvelle couche

mod in_place;
mod new_store;

use tracing::info;

use crate::engine::Engine;
use crate::error::{ConvertError, ReferenceRole};
use crate::host::{FeatureStore, StoreFactory, TransformFactory};
use crate::options::ConversionOptions;
use crate::outcome::{CommitStrategy, ConversionOutcome};
use crate::progress::Progress;
use crate::types::SpatialReference;

/// Choisit la stratégie: ouvre une session d'édition si possible
pub fn select_strategy<S: FeatureStore + ?Sized>(store: &mut S) -> CommitStrategy {
    if store.is_editable() || store.start_editing() {
        CommitStrategy::InPlace
    } else {
        CommitStrategy::NewStore
    }
}

/// Point d'entrée de la conversion
///
/// Regroupe les capacités de l'hôte (transformations, projet) et les options.
pub struct Converter<'a, F, P> {
    transforms: &'a F,
    project: &'a mut P,
    options: ConversionOptions,
}

impl<'a, F, P> Converter<'a, F, P>
where
    F: TransformFactory,
    P: StoreFactory,
{
    pub fn new(transforms: &'a F, project: &'a mut P, options: ConversionOptions) -> Self {
        Self {
            transforms,
            project,
            options,
        }
    }

    /// Convertit les entités de `store` depuis `source` vers WGS84 (et `target` si demandé)
    ///
    /// # Errors
    ///
    /// Erreurs fatales uniquement: SCR invalide ou non transformable,
    /// champ impossible à créer, nouvelle couche impossible à créer.
    /// Les échecs par entité et l'échec de commit sont rapportés dans
    /// le `ConversionOutcome`.
    pub fn convert<S: FeatureStore>(
        &mut self,
        store: &mut S,
        source: &SpatialReference,
        target: Option<&SpatialReference>,
        progress: &mut dyn Progress,
    ) -> Result<ConversionOutcome, ConvertError> {
        // 1. Validation des SCR et des transformations, avant toute mutation
        let to_wgs84 = self.transformer(source, &SpatialReference::wgs84(), ReferenceRole::Source)?;
        let to_target = match target {
            Some(t) => Some(self.transformer(source, t, ReferenceRole::Target)?),
            None => None,
        };

        // 2. Choix de la stratégie
        let already_editing = store.is_editable();
        let strategy = select_strategy(store);
        info!(
            store = store.name(),
            source = %source,
            target = ?target.map(|t| t.authid()),
            strategy = ?strategy,
            "Starting coordinate conversion"
        );

        // 3. Conversion
        let engine = Engine::new(&to_wgs84, to_target.as_ref(), self.options.progress_interval);
        match strategy {
            CommitStrategy::InPlace => {
                in_place::run(store, !already_editing, &engine, &self.options, progress)
            }
            CommitStrategy::NewStore => new_store::run(
                store,
                source,
                &mut *self.project,
                &engine,
                &self.options,
                progress,
            ),
        }
    }

    fn transformer(
        &self,
        source: &SpatialReference,
        destination: &SpatialReference,
        role: ReferenceRole,
    ) -> Result<F::Transformer, ConvertError> {
        if source.is_empty() || !self.transforms.is_valid(source) {
            return Err(ConvertError::invalid_reference(
                ReferenceRole::Source,
                source.authid(),
            ));
        }
        if destination.is_empty() || !self.transforms.is_valid(destination) {
            return Err(ConvertError::invalid_reference(role, destination.authid()));
        }

        self.transforms
            .create(source, destination)
            .map_err(|e| ConvertError::NoTransform {
                from: source.to_string(),
                to: destination.to_string(),
                reason: e.to_string(),
            })
    }
}
