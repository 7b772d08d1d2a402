//! Integration tests for local names
//!
//! Tests names scoped to a parent: registration, moving along with a rebind,
//! refusal of a rebind onto a taken name and release on destruction.

use canopy_foundation::{EntityId, EntityKind, ErrorKind};
use canopy_ontology::{Entity, Universe, UniverseConfig};

/// Two species under one material, plus an object in the first.
fn two_species(universe: &mut Universe) -> (EntityId, EntityId, EntityId) {
    let root = universe.root();
    let scene = universe.create(root, EntityKind::Scene, None).unwrap();
    let shader = universe.create(scene, EntityKind::Shader, None).unwrap();
    let material = universe.create(shader, EntityKind::Material, None).unwrap();
    let first = universe.create(material, EntityKind::Species, None).unwrap();
    let second = universe.create(material, EntityKind::Species, None).unwrap();
    let object = universe.create(first, EntityKind::Object, None).unwrap();
    (first, second, object)
}

#[test]
fn object_keeps_local_name_across_species() {
    let mut universe = Universe::new(UniverseConfig::default()).unwrap();
    let (first, second, object) = two_species(&mut universe);
    universe.set_local_name(object, "foo").unwrap();

    universe.rebind(object, second).unwrap();
    assert!(!universe.has_child(first, "foo").unwrap());
    assert!(universe.has_child(second, "foo").unwrap());
    assert_eq!(universe.entity(object).unwrap().local_name(), Some("foo"));

    universe.rebind(object, first).unwrap();
    assert!(universe.has_child(first, "foo").unwrap());
    assert!(!universe.has_child(second, "foo").unwrap());
    universe.check_consistency().unwrap();
}

#[test]
fn object_global_name_is_not_a_local_name() {
    let mut universe = Universe::new(UniverseConfig::default()).unwrap();
    let (first, second, object) = two_species(&mut universe);
    universe.set_global_name(object, "foo").unwrap();
    universe.set_local_name(object, "bar").unwrap();

    universe.rebind(object, second).unwrap();
    for species in [first, second] {
        assert!(!universe.has_child(species, "foo").unwrap());
    }
    assert!(universe.has_child(second, "bar").unwrap());
    assert_eq!(universe.get_entity("foo"), Some(object));
    universe.check_consistency().unwrap();
}

#[test]
fn object_stays_put_when_new_species_has_its_local_name() {
    let mut universe = Universe::new(UniverseConfig::default()).unwrap();
    let (first, second, object) = two_species(&mut universe);
    let resident = universe.create(second, EntityKind::Object, None).unwrap();
    universe.set_local_name(object, "foo").unwrap();
    universe.set_local_name(resident, "foo").unwrap();

    let err = universe.rebind(object, second).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NameCollision { existing, .. } if existing == resident));
    assert_eq!(universe.get_parent(object).unwrap(), Some(first));
    assert_eq!(universe.get_number_of_children(first).unwrap(), 1);
    assert_eq!(universe.get_number_of_children(second).unwrap(), 1);
    assert_eq!(universe.get_child(first, "foo").unwrap(), Some(object));
    assert_eq!(universe.get_child(second, "foo").unwrap(), Some(resident));
    universe.check_consistency().unwrap();
}

#[test]
fn object_stays_put_despite_distinct_global_names() {
    let mut universe = Universe::new(UniverseConfig::default()).unwrap();
    let (first, second, object) = two_species(&mut universe);
    let resident = universe.create(second, EntityKind::Object, Some("bar")).unwrap();
    universe.set_global_name(object, "foo").unwrap();
    universe.set_local_name(object, "baz").unwrap();
    universe.set_local_name(resident, "baz").unwrap();

    assert!(universe.rebind(object, second).is_err());
    assert_eq!(universe.get_parent(object).unwrap(), Some(first));
    for species in [first, second] {
        assert!(!universe.has_child(species, "foo").unwrap());
        assert!(!universe.has_child(species, "bar").unwrap());
        assert!(universe.has_child(species, "baz").unwrap());
    }
    universe.check_consistency().unwrap();
}

#[test]
fn local_name_is_released_with_its_slot() {
    let mut universe = Universe::new(UniverseConfig::headless()).unwrap();
    let (first, _, object) = two_species(&mut universe);
    universe.set_local_name(object, "foo").unwrap();

    universe.destroy(object).unwrap();
    assert!(!universe.has_child(first, "foo").unwrap());

    let again = universe
        .build(EntityKind::Object)
        .under(first)
        .local_name("foo")
        .create()
        .unwrap();
    assert_eq!(universe.get_child(first, "foo").unwrap(), Some(again));
    assert!(universe.has_child(object, "foo").is_err());
}
