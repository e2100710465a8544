//! Création idempotente des champs calculés

use coordconv::{
    ensure_field, ComputedFields, ConversionOptions, ConvertError, FeatureStore, FieldKind,
    FieldSpec, GeometryKind, SpatialReference,
};
use coordconv_host::MemoryStore;

fn layer() -> MemoryStore {
    MemoryStore::new("parcels", SpatialReference::new("EPSG:2154"), GeometryKind::Polygon)
        .with_fields(vec![FieldSpec::text("idu", 14), FieldSpec::integer("contenance", 10)])
}

#[test]
fn test_ensure_field_is_idempotent() {
    let mut store = layer();
    let spec = FieldSpec::float("lon_dd", 24, 10);

    let first = ensure_field(&mut store, &spec).unwrap();
    assert_eq!(first, 2);
    assert_eq!(store.fields().len(), 3);

    let second = ensure_field(&mut store, &spec).unwrap();
    assert_eq!(second, first);
    assert_eq!(store.fields().len(), 3);
}

#[test]
fn test_existing_field_reused_without_type_check() {
    let mut store = layer();
    // Même nom, autre type: le champ existant est conservé
    let index = ensure_field(&mut store, &FieldSpec::text("contenance", 4)).unwrap();
    assert_eq!(index, 1);
    assert_eq!(store.fields()[1].kind, FieldKind::Integer { length: 10 });
}

#[test]
fn test_read_only_store_reports_field() {
    let mut store = layer().read_only();
    let err = ensure_field(&mut store, &FieldSpec::text("lat_dms", 64)).unwrap_err();

    assert!(matches!(err, ConvertError::Schema { ref field, .. } if field == "lat_dms"));
    assert!(err.to_string().contains("lat_dms"));
    assert!(err.is_fatal());
}

#[test]
fn test_provision_fixed_order() {
    let mut store = layer();
    let options = ConversionOptions::default();

    let fields = ComputedFields::provision(&mut store, &options, true).unwrap();
    assert_eq!(fields.lon_dd, 2);
    assert_eq!(fields.lat_dd, 3);
    assert_eq!(fields.lon_dms, 4);
    assert_eq!(fields.lat_dms, 5);
    assert_eq!(fields.projected, Some((6, 7)));

    assert_eq!(
        store.fields()[2].kind,
        FieldKind::Float64 {
            length: 24,
            precision: 10
        }
    );
    assert_eq!(store.fields()[4].kind, FieldKind::Text { max_length: 64 });
    assert_eq!(
        store.fields()[7].kind,
        FieldKind::Float64 {
            length: 24,
            precision: 3
        }
    );
}

#[test]
fn test_provision_twice_adds_nothing() {
    let mut store = layer();
    let options = ConversionOptions::default();

    let first = ComputedFields::provision(&mut store, &options, false).unwrap();
    let second = ComputedFields::provision(&mut store, &options, false).unwrap();
    assert_eq!(first, second);
    assert_eq!(store.fields().len(), 6);

    // Ajout des champs projetés lors d'un second passage avec cible
    let third = ComputedFields::provision(&mut store, &options, true).unwrap();
    assert_eq!(third.lon_dd, first.lon_dd);
    assert_eq!(third.projected, Some((6, 7)));
    assert_eq!(store.fields().len(), 8);
}
