//! A universe shared across threads behind one lock.

use std::thread;

use canopy::foundation::EntityKind;
use canopy::ontology::{Universe, UniverseConfig};

#[test]
fn threads_create_under_a_shared_universe() {
    let shared = Universe::new(UniverseConfig::default()).unwrap().into_shared();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let shared = shared.clone();
            thread::spawn(move || {
                let mut universe = shared.lock().unwrap();
                let root = universe.root();
                let name = format!("scene_{worker}");
                universe.create(root, EntityKind::Scene, Some(&name)).unwrap()
            })
        })
        .collect();
    let scenes: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();

    let universe = shared.lock().unwrap();
    assert_eq!(universe.get_number_of_children(universe.root()).unwrap(), 4);
    for (worker, scene) in scenes.into_iter().enumerate() {
        assert_eq!(universe.get_entity(&format!("scene_{worker}")), Some(scene));
    }
    assert_eq!(universe.get_number_of_completions("scene_"), 4);
    universe.check_consistency().unwrap();
}
