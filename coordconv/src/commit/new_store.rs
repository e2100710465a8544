//! Stratégie nouvelle couche: schéma d'origine + champs calculés, toutes les
//! entités non ignorées recopiées (sans valeurs calculées en cas d'échec).

use tracing::{error, info};

use crate::engine::{Engine, FeatureOutcome};
use crate::error::ConvertError;
use crate::host::{FeatureStore, StoreFactory, Transformer};
use crate::options::ConversionOptions;
use crate::outcome::{CommitStrategy, ConversionOutcome, RunStatus};
use crate::progress::Progress;
use crate::schema::ComputedFields;
use crate::types::{layer_uri, FeatureRecord, FieldValue, SpatialReference};

pub(super) fn run<S, P, T>(
    source: &S,
    reference: &SpatialReference,
    project: &mut P,
    engine: &Engine<'_, T>,
    options: &ConversionOptions,
    progress: &mut dyn Progress,
) -> Result<ConversionOutcome, ConvertError>
where
    S: FeatureStore,
    P: StoreFactory,
    T: Transformer,
{
    let uri = layer_uri(source.geometry_kind(), reference);
    let name = options.derived_name(source.name());

    let mut target = project
        .create_store(&uri, &name)
        .map_err(|e| ConvertError::StoreCreation {
            name: name.clone(),
            reason: e.to_string(),
        })?;

    // Schéma d'origine puis champs calculés
    for spec in source.fields() {
        target
            .add_field(spec)
            .map_err(|e| ConvertError::schema(&spec.name, e))?;
    }
    target.reload_fields();
    let fields = ComputedFields::provision(&mut target, options, engine.has_target())?;
    let width = target.fields().len();

    let total = source.feature_count();
    let mut records: Vec<FeatureRecord> = Vec::with_capacity(total);
    let counts = engine.run(source.features(), total, progress, |feature, outcome| {
        let values = match outcome {
            FeatureOutcome::Skipped => return,
            FeatureOutcome::Converted(values) => Some(values),
            FeatureOutcome::Failed(_) => None,
        };

        let mut attributes = feature.attributes;
        attributes.resize(width, FieldValue::Null);
        if let Some(values) = values {
            for (index, value) in fields.assignments(&values) {
                attributes[index] = value;
            }
        }
        records.push(FeatureRecord::new(feature.geometry, attributes));
    });

    let written = records.len();
    let mut outcome = ConversionOutcome::from_counts(
        CommitStrategy::NewStore,
        RunStatus::NewStoreCreated,
        counts,
    );
    outcome.new_store = Some(name.clone());

    if written > 0 {
        if let Err(e) = target.add_features(records) {
            error!(store = %name, error = %e, "Failed to insert features into new store");
            outcome.status = RunStatus::NewStoreFailed;
            outcome.commit_error = Some(
                ConvertError::Commit {
                    reason: e.to_string(),
                }
                .to_string(),
            );
            return Ok(outcome);
        }
    }
    target.update_extents();
    project.register(target);

    info!(
        store = %name,
        records = written,
        failed = outcome.failed,
        skipped = outcome.skipped,
        "New store created"
    );

    outcome.records_written = written;
    Ok(outcome)
}
