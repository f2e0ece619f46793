//! Reference spec and manifest conversion tests

use trellis_domain::{ReferenceManifest, ReferenceSpec};

#[test]
fn test_manifest_round_trip_keeps_kind() {
    for spec in [
        ReferenceSpec::single("a.A"),
        ReferenceSpec::qualified("a.A", "primary"),
        ReferenceSpec::all("a.A"),
    ] {
        let manifest = ReferenceManifest::from(&spec);
        assert_eq!(ReferenceSpec::try_from(manifest).unwrap(), spec);
    }
}

#[test]
fn test_empty_interface_name_is_invalid_metadata() {
    let manifest = ReferenceManifest::default();
    let err = ReferenceSpec::try_from(manifest).unwrap_err();
    assert_eq!(err.code(), "invalid-metadata");
}

#[test]
fn test_accessors() {
    let spec = ReferenceSpec::qualified("map.Layer", "base");
    assert_eq!(spec.interface_name(), "map.Layer");
    assert_eq!(spec.qualifier(), Some("base"));
    assert!(!spec.is_all());
    assert!(ReferenceSpec::all("map.Layer").qualifier().is_none());
}
