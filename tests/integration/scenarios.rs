//! End-to-end scenarios for slot reuse, compaction, cascading teardown,
//! binding failures and lookup misses.

use canopy::foundation::{BindingError, EntityId, EntityKind, ErrorKind, Relation};
use canopy::ontology::{Lifecycle, Universe, UniverseConfig};
use canopy::storage::ParentModule;

fn e(index: u32) -> EntityId {
    EntityId::new(index, 1)
}

fn three_children() -> ParentModule {
    let mut parent = ParentModule::new(e(0), Relation::Scenes);
    for index in 1..=3 {
        parent.bind_child(e(index), EntityKind::Scene).unwrap();
    }
    parent
}

#[test]
fn interior_slot_is_reused_without_growth() {
    let mut parent = three_children();
    assert!(parent.unbind_child(1));

    let module = parent.bind_child(e(4), EntityKind::Scene).unwrap();
    assert_eq!(module.child_id(), Some(1));
    assert_eq!(parent.slots().len(), 3);
}

#[test]
fn tail_release_after_interior_release_compacts_to_one() {
    let mut parent = three_children();
    assert!(parent.unbind_child(1));
    assert!(parent.unbind_child(2));

    assert_eq!(parent.slots().len(), 1);
    assert_eq!(parent.slots().free_indices().count(), 0);
    let module = parent.bind_child(e(4), EntityKind::Scene).unwrap();
    assert_eq!(module.child_id(), Some(1));
}

#[test]
fn tail_release_of_full_collection_trims_only_the_tail() {
    let mut parent = three_children();
    assert!(parent.unbind_child(2));
    assert_eq!(parent.slots().len(), 2);
}

#[test]
fn destroying_root_destroys_whole_tree() {
    let mut universe = Universe::new(UniverseConfig::default()).unwrap();
    let root = universe.root();
    let scene = universe.create(root, EntityKind::Scene, Some("scene")).unwrap();
    let shader = universe.create(scene, EntityKind::Shader, None).unwrap();
    let material = universe.create(shader, EntityKind::Material, None).unwrap();
    let species = universe.create(material, EntityKind::Species, None).unwrap();
    let object = universe.create(species, EntityKind::Object, Some("object")).unwrap();

    universe.destroy(root).unwrap();

    for id in [scene, shader, material, species, object] {
        assert_eq!(universe.lifecycle(id), Lifecycle::Destroyed);
    }
    assert_eq!(universe.get_entity("scene"), None);
    assert_eq!(universe.get_entity("object"), None);
}

#[test]
fn failed_binding_leaves_parent_untouched() {
    let mut universe = Universe::new(UniverseConfig::default()).unwrap();
    let root = universe.root();
    let scene = universe.create(root, EntityKind::Scene, None).unwrap();
    let before = universe.parent_module(root, Relation::Scenes).unwrap().clone();

    let err = universe.create(root, EntityKind::Shader, None).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::Binding(BindingError::RelationNotExposed { .. })
    ));

    let after = universe.parent_module(root, Relation::Scenes).unwrap();
    assert_eq!(after.get_number_of_children(), before.get_number_of_children());
    assert_eq!(after.slots().len(), before.slots().len());
    assert_eq!(after.get(0), Some(scene));

    let mut module = before;
    let err = module.bind_child(e(9), EntityKind::Console).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Binding(BindingError::KindMismatch { .. })));
    assert_eq!(module.get_number_of_children(), 1);
}

#[test]
fn unregistered_name_is_a_miss() {
    let universe = Universe::new(UniverseConfig::default()).unwrap();
    assert_eq!(universe.get_entity("nobody"), None);
    assert!(universe.info("nobody").is_none());
    assert!(universe.resolve_kind("nobody", EntityKind::Scene).is_none());
    assert_eq!(universe.complete("nobody"), "nobody");
}
