//! Stratégie en place: champs ajoutés à la couche source, valeurs
//! enregistrées dans le tampon d'édition puis commitées (ou annulées).

use tracing::{error, info, warn};

use crate::engine::{Engine, FeatureOutcome};
use crate::error::ConvertError;
use crate::host::{FeatureStore, Transformer};
use crate::options::ConversionOptions;
use crate::outcome::{CommitStrategy, ConversionOutcome, FeatureFailure, RunStatus};
use crate::progress::Progress;
use crate::schema::ComputedFields;
use crate::types::AttributeUpdate;

/// `opened_session`: la session d'édition a été ouverte par cette conversion
pub(super) fn run<S, T>(
    store: &mut S,
    opened_session: bool,
    engine: &Engine<'_, T>,
    options: &ConversionOptions,
    progress: &mut dyn Progress,
) -> Result<ConversionOutcome, ConvertError>
where
    S: FeatureStore,
    T: Transformer,
{
    let fields = match ComputedFields::provision(store, options, engine.has_target()) {
        Ok(fields) => fields,
        Err(e) => {
            // Une session ouverte par l'utilisateur reste intacte
            if opened_session {
                store.rollback();
            }
            return Err(e);
        }
    };

    let total = store.feature_count();
    let mut pending: Vec<AttributeUpdate> = Vec::new();
    let mut unaddressable = 0usize;
    let mut counts = engine.run(store.features(), total, progress, |feature, outcome| {
        if let FeatureOutcome::Converted(values) = outcome {
            match feature.id {
                Some(feature_id) => pending.push(AttributeUpdate {
                    feature_id,
                    values: fields.assignments(&values),
                }),
                None => unaddressable += 1,
            }
        }
    });

    // Sans identifiant, l'entité ne peut pas être modifiée en place
    for _ in 0..unaddressable {
        counts.demote(FeatureFailure::new(None, "feature has no identifier"));
    }
    if unaddressable > 0 {
        warn!(count = unaddressable, "Converted features without identifier were not updated");
    }

    let mut staged = 0usize;
    for update in &pending {
        match store.change_attributes(update) {
            Ok(()) => staged += 1,
            Err(e) => {
                warn!(feature_id = %update.feature_id, error = %e, "Edit buffer rejected update");
                counts.demote(FeatureFailure::new(Some(update.feature_id), e));
            }
        }
    }

    if staged == 0 {
        if opened_session {
            store.rollback();
        }
        info!(store = store.name(), rolled_back = opened_session, "No feature changed");
        return Ok(ConversionOutcome::from_counts(
            CommitStrategy::InPlace,
            RunStatus::NothingChanged,
            counts,
        ));
    }

    match store.commit_changes() {
        Ok(()) => {
            info!(
                store = store.name(),
                updated = staged,
                failed = counts.failed,
                skipped = counts.skipped,
                "Coordinate fields committed"
            );
            Ok(ConversionOutcome::from_counts(
                CommitStrategy::InPlace,
                RunStatus::Updated,
                counts,
            ))
        }
        Err(e) => {
            error!(store = store.name(), error = %e, "Commit failed, rolling back");
            store.rollback();
            let mut outcome = ConversionOutcome::from_counts(
                CommitStrategy::InPlace,
                RunStatus::RolledBack,
                counts,
            );
            outcome.commit_error = Some(
                ConvertError::Commit {
                    reason: e.to_string(),
                }
                .to_string(),
            );
            Ok(outcome)
        }
    }
}
