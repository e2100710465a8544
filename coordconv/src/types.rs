//! Types de données pour le crate coordconv

use geo::Geometry;
use serde::{Deserialize, Serialize};

/// Identifiant stable d'une entité dans son store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub i64);

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Système de référence identifié par son code d'autorité (ex: "EPSG:2154")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpatialReference(String);

impl SpatialReference {
    pub fn new(authid: impl Into<String>) -> Self {
        Self(authid.into().trim().to_string())
    }

    /// WGS84 géographique (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::new("EPSG:4326")
    }

    /// Code d'autorité
    pub fn authid(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Type de géométrie d'une couche
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    Unknown,
}

impl GeometryKind {
    /// Nom utilisé dans les descripteurs de couche
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::MultiPoint => "MultiPoint",
            Self::LineString => "LineString",
            Self::MultiLineString => "MultiLineString",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
            Self::Unknown => "Unknown",
        }
    }

    /// Déduit le type depuis une géométrie
    pub fn of(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point(_) => Self::Point,
            Geometry::MultiPoint(_) => Self::MultiPoint,
            Geometry::Line(_) | Geometry::LineString(_) => Self::LineString,
            Geometry::MultiLineString(_) => Self::MultiLineString,
            Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => Self::Polygon,
            Geometry::MultiPolygon(_) => Self::MultiPolygon,
            Geometry::GeometryCollection(_) => Self::Unknown,
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GeometryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "point" => Ok(Self::Point),
            "multipoint" => Ok(Self::MultiPoint),
            "linestring" => Ok(Self::LineString),
            "multilinestring" => Ok(Self::MultiLineString),
            "polygon" => Ok(Self::Polygon),
            "multipolygon" => Ok(Self::MultiPolygon),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Invalid geometry kind: {}", s)),
        }
    }
}

/// Descripteur de couche: `<Type>?crs=<authid>`
pub fn layer_uri(kind: GeometryKind, reference: &SpatialReference) -> String {
    format!("{}?crs={}", kind, reference.authid())
}

/// Type sémantique d'un champ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Réel double précision (longueur / précision d'affichage)
    Float64 { length: u16, precision: u8 },
    /// Entier
    Integer { length: u16 },
    /// Texte de longueur maximale donnée
    Text { max_length: u16 },
}

/// Définition d'un champ attributaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Nom unique dans le store
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn float(name: impl Into<String>, length: u16, precision: u8) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Float64 { length, precision },
        }
    }

    pub fn integer(name: impl Into<String>, length: u16) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Integer { length },
        }
    }

    pub fn text(name: impl Into<String>, max_length: u16) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text { max_length },
        }
    }
}

/// Valeur d'attribut (Null = absente)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    #[default]
    Null,
    Float(f64),
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Une entité: identifiant, géométrie et attributs ordonnés selon le schéma du store
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    /// Absent pour une entité pas encore insérée
    pub id: Option<FeatureId>,

    /// Géométrie (None = géométrie nulle)
    pub geometry: Option<Geometry>,

    /// Valeurs par index de champ
    pub attributes: Vec<FieldValue>,
}

impl FeatureRecord {
    /// Crée une entité sans identifiant
    pub fn new(geometry: Option<Geometry>, attributes: Vec<FieldValue>) -> Self {
        Self {
            id: None,
            geometry,
            attributes,
        }
    }

    /// Valeur d'un champ par index
    pub fn attribute(&self, index: usize) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        self.attributes.get(index).unwrap_or(&NULL)
    }
}

/// Modifications attributaires d'une entité, appliquées atomiquement
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeUpdate {
    pub feature_id: FeatureId,
    /// Paires (index de champ, nouvelle valeur)
    pub values: Vec<(usize, FieldValue)>,
}
