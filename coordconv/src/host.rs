//! Capacités fournies par l'application hôte
//!
//! Le stockage des couches, les transactions d'édition et les mathématiques
//! de projection sont externes: la conversion ne les manipule qu'à travers
//! ces traits.

use geo::Point;

use crate::error::BoxError;
use crate::types::{AttributeUpdate, FeatureRecord, FieldSpec, GeometryKind, SpatialReference};

/// Une couche d'entités avec schéma et tampon d'édition
pub trait FeatureStore {
    /// Nom affiché de la couche
    fn name(&self) -> &str;

    /// SCR natif de la couche
    fn reference(&self) -> &SpatialReference;

    fn geometry_kind(&self) -> GeometryKind;

    /// Schéma courant (tel que chargé par le dernier `reload_fields`)
    fn fields(&self) -> &[FieldSpec];

    /// Index d'un champ par nom
    fn field_index(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.name == name)
    }

    /// Ajoute un champ au schéma du fournisseur de données
    fn add_field(&mut self, spec: &FieldSpec) -> Result<(), BoxError>;

    /// Recharge le schéma après ajout de champs
    fn reload_fields(&mut self);

    fn feature_count(&self) -> usize;

    /// Entités dans un ordre stable
    fn features(&self) -> Box<dyn Iterator<Item = FeatureRecord> + '_>;

    /// Vrai si une session d'édition est ouverte
    fn is_editable(&self) -> bool;

    /// Tente d'ouvrir une session d'édition
    fn start_editing(&mut self) -> bool;

    /// Enregistre une modification attributaire dans le tampon d'édition
    fn change_attributes(&mut self, update: &AttributeUpdate) -> Result<(), BoxError>;

    /// Persiste le tampon d'édition et ferme la session
    fn commit_changes(&mut self) -> Result<(), BoxError>;

    /// Abandonne le tampon d'édition et ferme la session
    fn rollback(&mut self);

    /// Insère des entités (un identifiant est attribué par le store)
    fn add_features(&mut self, records: Vec<FeatureRecord>) -> Result<(), BoxError>;

    /// Recalcule l'emprise spatiale
    fn update_extents(&mut self);
}

/// Transformation ponctuelle entre deux SCR
pub trait Transformer {
    fn transform(&self, point: Point) -> Result<Point, BoxError>;
}

/// Fabrique de transformations (contient le contexte de transformation de l'hôte)
pub trait TransformFactory {
    type Transformer: Transformer;

    /// Vérifie qu'un SCR est non vide et résolvable
    fn is_valid(&self, reference: &SpatialReference) -> bool;

    /// Crée une transformation, échoue si la paire n'est pas transformable
    fn create(
        &self,
        source: &SpatialReference,
        target: &SpatialReference,
    ) -> Result<Self::Transformer, BoxError>;
}

/// Projet hôte: création et enregistrement de nouvelles couches
pub trait StoreFactory {
    type Store: FeatureStore;

    /// Crée une couche vide éditable depuis un descripteur `<Type>?crs=<authid>`
    fn create_store(&mut self, uri: &str, name: &str) -> Result<Self::Store, BoxError>;

    /// Ajoute la couche terminée au projet
    fn register(&mut self, store: Self::Store);
}
