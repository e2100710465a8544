//! Couches en mémoire avec tampon d'édition
//!
//! Implémentation de référence des capacités hôte: schéma côté fournisseur
//! rechargé explicitement, modifications attributaires tamponnées jusqu'au
//! commit ou au rollback.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Result};
use coordconv::{
    AttributeUpdate, BoxError, FeatureId, FeatureRecord, FeatureStore, FieldSpec, FieldValue,
    GeometryKind, SpatialReference, StoreFactory,
};
use geo::{BoundingRect, Rect};
use tracing::{debug, info, warn};

/// Couche en mémoire
#[derive(Debug, Clone)]
pub struct MemoryStore {
    name: String,
    reference: SpatialReference,
    kind: GeometryKind,
    /// Schéma du fournisseur de données
    provider_fields: Vec<FieldSpec>,
    /// Schéma chargé par la couche (mis à jour par `reload_fields`)
    fields: Vec<FieldSpec>,
    features: Vec<FeatureRecord>,
    next_id: i64,
    read_only: bool,
    editing: bool,
    edit_buffer: BTreeMap<FeatureId, Vec<(usize, FieldValue)>>,
    max_fields: Option<usize>,
    commit_failure: Option<String>,
    extent: Option<Rect>,
}

impl MemoryStore {
    pub fn new(name: &str, reference: SpatialReference, kind: GeometryKind) -> Self {
        Self {
            name: name.to_string(),
            reference,
            kind,
            provider_fields: Vec::new(),
            fields: Vec::new(),
            features: Vec::new(),
            next_id: 1,
            read_only: false,
            editing: false,
            edit_buffer: BTreeMap::new(),
            max_fields: None,
            commit_failure: None,
            extent: None,
        }
    }

    /// Crée une couche vide depuis un descripteur `<Type>?crs=<authid>`
    pub fn from_uri(uri: &str, name: &str) -> Result<Self> {
        let (kind, params) = uri
            .split_once('?')
            .ok_or_else(|| anyhow!("Invalid layer descriptor '{}': missing parameters", uri))?;
        let kind: GeometryKind = kind.parse().map_err(|e: String| anyhow!(e))?;

        let crs = params
            .split('&')
            .find_map(|p| p.strip_prefix("crs="))
            .ok_or_else(|| anyhow!("Invalid layer descriptor '{}': missing crs", uri))?;
        if crs.trim().is_empty() {
            bail!("Invalid layer descriptor '{}': empty crs", uri);
        }

        Ok(Self::new(name, SpatialReference::new(crs), kind))
    }

    /// Définit le schéma initial
    pub fn with_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.provider_fields = fields.clone();
        self.fields = fields;
        self
    }

    /// Interdit l'édition et les modifications de schéma
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Limite le nombre de champs acceptés par le fournisseur
    pub fn with_field_limit(mut self, max_fields: usize) -> Self {
        self.max_fields = Some(max_fields);
        self
    }

    /// Fait échouer le prochain commit avec le message donné
    pub fn fail_commit(&mut self, reason: &str) {
        self.commit_failure = Some(reason.to_string());
    }

    /// Ajoute une entité hors session d'édition et retourne son identifiant
    pub fn push(
        &mut self,
        geometry: Option<geo::Geometry>,
        mut attributes: Vec<FieldValue>,
    ) -> FeatureId {
        let id = FeatureId(self.next_id);
        self.next_id += 1;
        attributes.resize(self.provider_fields.len(), FieldValue::Null);
        self.features.push(FeatureRecord {
            id: Some(id),
            geometry,
            attributes,
        });
        id
    }

    /// Entité commitée par identifiant
    pub fn feature(&self, id: FeatureId) -> Option<&FeatureRecord> {
        self.features.iter().find(|f| f.id == Some(id))
    }

    /// Valeur commitée d'un champ pour une entité
    pub fn value(&self, id: FeatureId, field: &str) -> Option<&FieldValue> {
        let index = self.provider_fields.iter().position(|f| f.name == field)?;
        self.feature(id).map(|f| f.attribute(index))
    }

    /// Schéma du fournisseur (inclut les champs pas encore rechargés)
    pub fn provider_fields(&self) -> &[FieldSpec] {
        &self.provider_fields
    }

    /// Emprise calculée par le dernier `update_extents`
    pub fn extent(&self) -> Option<Rect> {
        self.extent
    }

    /// Nombre d'entités modifiées dans le tampon d'édition
    pub fn pending_changes(&self) -> usize {
        self.edit_buffer.len()
    }
}

impl FeatureStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn reference(&self) -> &SpatialReference {
        &self.reference
    }

    fn geometry_kind(&self) -> GeometryKind {
        self.kind
    }

    fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn add_field(&mut self, spec: &FieldSpec) -> Result<(), BoxError> {
        if self.read_only {
            return Err(format!("store '{}' is read-only", self.name).into());
        }
        if self.provider_fields.iter().any(|f| f.name == spec.name) {
            return Err(format!("field '{}' already exists", spec.name).into());
        }
        if self
            .max_fields
            .is_some_and(|max| self.provider_fields.len() >= max)
        {
            return Err(format!(
                "field limit reached ({} fields)",
                self.provider_fields.len()
            )
            .into());
        }

        self.provider_fields.push(spec.clone());
        let width = self.provider_fields.len();
        for feature in &mut self.features {
            feature.attributes.resize(width, FieldValue::Null);
        }
        Ok(())
    }

    fn reload_fields(&mut self) {
        self.fields = self.provider_fields.clone();
    }

    fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn features(&self) -> Box<dyn Iterator<Item = FeatureRecord> + '_> {
        Box::new(self.features.iter().cloned())
    }

    fn is_editable(&self) -> bool {
        self.editing
    }

    fn start_editing(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        self.editing = true;
        true
    }

    fn change_attributes(&mut self, update: &AttributeUpdate) -> Result<(), BoxError> {
        if !self.editing {
            return Err(format!("store '{}' is not in edit mode", self.name).into());
        }
        if self.feature(update.feature_id).is_none() {
            return Err(format!("feature {} not found", update.feature_id).into());
        }
        let width = self.provider_fields.len();
        if let Some((index, _)) = update.values.iter().find(|(index, _)| *index >= width) {
            return Err(format!("field index {} out of range", index).into());
        }

        self.edit_buffer
            .entry(update.feature_id)
            .or_default()
            .extend(update.values.iter().cloned());
        Ok(())
    }

    fn commit_changes(&mut self) -> Result<(), BoxError> {
        if !self.editing {
            return Err(format!("store '{}' is not in edit mode", self.name).into());
        }
        if let Some(reason) = self.commit_failure.take() {
            warn!(store = %self.name, reason = %reason, "Commit refused by provider");
            return Err(reason.into());
        }

        let buffer = std::mem::take(&mut self.edit_buffer);
        let changed = buffer.len();
        for (id, values) in buffer {
            if let Some(feature) = self.features.iter_mut().find(|f| f.id == Some(id)) {
                for (index, value) in values {
                    feature.attributes[index] = value;
                }
            }
        }
        self.editing = false;

        info!(store = %self.name, features = changed, "Edit buffer committed");
        Ok(())
    }

    fn rollback(&mut self) {
        let discarded = self.edit_buffer.len();
        self.edit_buffer.clear();
        self.editing = false;
        debug!(store = %self.name, discarded, "Edit buffer rolled back");
    }

    fn add_features(&mut self, records: Vec<FeatureRecord>) -> Result<(), BoxError> {
        if self.read_only {
            return Err(format!("store '{}' is read-only", self.name).into());
        }
        let width = self.provider_fields.len();
        if let Some(record) = records.iter().find(|r| r.attributes.len() > width) {
            return Err(format!(
                "record has {} attributes, schema has {} fields",
                record.attributes.len(),
                width
            )
            .into());
        }

        for record in records {
            self.push(record.geometry, record.attributes);
        }
        Ok(())
    }

    fn update_extents(&mut self) {
        self.extent = self
            .features
            .iter()
            .filter_map(|f| f.geometry.as_ref().and_then(|g| g.bounding_rect()))
            .reduce(|a, b| {
                Rect::new(
                    (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                    (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
                )
            });
    }
}

/// Projet en mémoire: registre des couches créées
#[derive(Debug, Default)]
pub struct MemoryProject {
    layers: Vec<MemoryStore>,
    creation_failure: Option<String>,
}

impl MemoryProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fait échouer la prochaine création de couche
    pub fn fail_next_creation(&mut self, reason: &str) {
        self.creation_failure = Some(reason.to_string());
    }

    /// Couche enregistrée par nom
    pub fn layer(&self, name: &str) -> Option<&MemoryStore> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layers(&self) -> &[MemoryStore] {
        &self.layers
    }
}

impl StoreFactory for MemoryProject {
    type Store = MemoryStore;

    fn create_store(&mut self, uri: &str, name: &str) -> Result<MemoryStore, BoxError> {
        if let Some(reason) = self.creation_failure.take() {
            return Err(reason.into());
        }
        Ok(MemoryStore::from_uri(uri, name)?)
    }

    fn register(&mut self, store: MemoryStore) {
        debug!(store = %store.name, features = store.features.len(), "Layer registered");
        self.layers.push(store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, Point};

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new(
            "parcels",
            SpatialReference::new("EPSG:2154"),
            GeometryKind::Point,
        )
        .with_fields(vec![FieldSpec::text("name", 32)]);
        store.push(
            Some(Geometry::Point(Point::new(1.0, 2.0))),
            vec![FieldValue::from("a")],
        );
        store
    }

    #[test]
    fn test_from_uri() {
        let store = MemoryStore::from_uri("MultiPolygon?crs=EPSG:2154", "out").unwrap();
        assert_eq!(store.geometry_kind(), GeometryKind::MultiPolygon);
        assert_eq!(store.reference().authid(), "EPSG:2154");
        assert_eq!(store.name(), "out");

        assert!(MemoryStore::from_uri("Point", "x").is_err());
        assert!(MemoryStore::from_uri("Curve?crs=EPSG:4326", "x").is_err());
        assert!(MemoryStore::from_uri("Point?crs=", "x").is_err());
    }

    #[test]
    fn test_added_field_visible_after_reload() {
        let mut store = store();
        store.add_field(&FieldSpec::float("lon_dd", 24, 10)).unwrap();
        assert_eq!(store.fields().len(), 1);
        assert_eq!(store.provider_fields().len(), 2);

        store.reload_fields();
        assert_eq!(store.field_index("lon_dd"), Some(1));
        assert!(store.features().all(|f| f.attributes.len() == 2));
    }

    #[test]
    fn test_add_field_rejections() {
        let mut store = store().with_field_limit(1);
        assert!(store.add_field(&FieldSpec::text("name", 8)).is_err());
        assert!(store.add_field(&FieldSpec::text("other", 8)).is_err());

        let mut locked =
            MemoryStore::new("ro", SpatialReference::wgs84(), GeometryKind::Point).read_only();
        assert!(locked.add_field(&FieldSpec::text("x", 8)).is_err());
        assert!(!locked.start_editing());
    }

    #[test]
    fn test_commit_applies_buffer() {
        let mut store = store();
        let id = FeatureId(1);
        let update = AttributeUpdate {
            feature_id: id,
            values: vec![(0, "b".into())],
        };
        assert!(store.change_attributes(&update).is_err());

        assert!(store.start_editing());
        store.change_attributes(&update).unwrap();
        assert_eq!(store.pending_changes(), 1);
        assert_eq!(store.value(id, "name"), Some(&FieldValue::from("a")));

        store.commit_changes().unwrap();
        assert!(!store.is_editable());
        assert_eq!(store.value(id, "name"), Some(&FieldValue::from("b")));
    }

    #[test]
    fn test_rollback_discards_buffer() {
        let mut store = store();
        store.start_editing();
        store
            .change_attributes(&AttributeUpdate {
                feature_id: FeatureId(1),
                values: vec![(0, "b".into())],
            })
            .unwrap();
        store.rollback();
        assert_eq!(store.pending_changes(), 0);
        assert_eq!(store.value(FeatureId(1), "name"), Some(&FieldValue::from("a")));
    }

    #[test]
    fn test_commit_failure_keeps_session() {
        let mut store = store();
        store.start_editing();
        store.fail_commit("disk full");
        let err = store.commit_changes().unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(store.is_editable());
    }

    #[test]
    fn test_change_attributes_validation() {
        let mut store = store();
        store.start_editing();
        assert!(store
            .change_attributes(&AttributeUpdate {
                feature_id: FeatureId(99),
                values: vec![],
            })
            .is_err());
        assert!(store
            .change_attributes(&AttributeUpdate {
                feature_id: FeatureId(1),
                values: vec![(5, FieldValue::Null)],
            })
            .is_err());
    }

    #[test]
    fn test_update_extents() {
        let mut store = store();
        store.push(Some(Geometry::Point(Point::new(-3.0, 10.0))), vec![]);
        store.push(None, vec![]);
        store.update_extents();

        let extent = store.extent().unwrap();
        assert_eq!(extent.min().x, -3.0);
        assert_eq!(extent.min().y, 2.0);
        assert_eq!(extent.max().x, 1.0);
        assert_eq!(extent.max().y, 10.0);
    }

    #[test]
    fn test_project_registers_layers() {
        let mut project = MemoryProject::new();
        let store = project.create_store("Point?crs=EPSG:4326", "out").unwrap();
        project.register(store);
        assert!(project.layer("out").is_some());

        project.fail_next_creation("quota exceeded");
        assert!(project.create_store("Point?crs=EPSG:4326", "out2").is_err());
        assert_eq!(project.layers().len(), 1);
    }
}
