//! Scenario tests for the registry facade.

use signet_core::{
    Component, EcsError, Entity, Registry, RegistryConfig, Signature, System, MAX_ENTITIES,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}
impl Component for Position {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    dx: f32,
    dy: f32,
}
impl Component for Velocity {}

struct Mover;
impl System for Mover {}

struct Integrator;
impl System for Integrator {}

fn members<S: System>(registry: &Registry) -> Vec<Entity> {
    registry
        .system_entities::<S>()
        .unwrap()
        .iter()
        .copied()
        .collect()
}

fn origin() -> Position {
    Position { x: 0.0, y: 0.0 }
}

#[test]
fn test_mover_scenario() {
    let mut registry = Registry::new();
    let position = registry.register_component::<Position>().unwrap();

    let e0 = registry.create_entity().unwrap();
    let e1 = registry.create_entity().unwrap();
    let e2 = registry.create_entity().unwrap();
    registry.add_component(e0, Position { x: 1.0, y: 0.0 }).unwrap();
    registry.add_component(e1, Position { x: 2.0, y: 0.0 }).unwrap();

    registry.register_system(Mover).unwrap();
    registry.set_system_signature::<Mover>(position.into()).unwrap();
    assert_eq!(members::<Mover>(&registry), vec![e0, e1]);

    registry.remove_component::<Position>(e0).unwrap();
    assert_eq!(members::<Mover>(&registry), vec![e1]);

    registry.destroy_entity(e1).unwrap();
    assert!(members::<Mover>(&registry).is_empty());

    // e2 never had a position.
    assert!(registry.is_alive(e2));
    assert_eq!(registry.living_count(), 2);
}

#[test]
fn test_component_round_trip() {
    let mut registry = Registry::new();
    registry.register_component::<Position>().unwrap();
    let e = registry.create_entity().unwrap();

    let value = Position { x: 3.5, y: -1.25 };
    registry.add_component(e, value).unwrap();
    assert_eq!(registry.get_component::<Position>(e).unwrap(), &value);

    registry.remove_component::<Position>(e).unwrap();
    assert!(matches!(
        registry.get_component::<Position>(e),
        Err(EcsError::MissingComponent { .. })
    ));
    assert!(matches!(
        registry.remove_component::<Position>(e),
        Err(EcsError::MissingComponent { .. })
    ));
}

#[test]
fn test_multi_component_membership() {
    let mut registry = Registry::new();
    let position = registry.register_component::<Position>().unwrap();
    let velocity = registry.register_component::<Velocity>().unwrap();

    registry.register_system(Mover).unwrap();
    registry.register_system(Integrator).unwrap();
    registry.set_system_signature::<Mover>(position.into()).unwrap();
    registry
        .set_system_signature::<Integrator>([position, velocity].into_iter().collect())
        .unwrap();

    let still = registry.create_entity().unwrap();
    let moving = registry.create_entity().unwrap();
    registry.add_component(still, origin()).unwrap();
    registry.add_component(moving, origin()).unwrap();
    registry
        .add_component(moving, Velocity { dx: 1.0, dy: 0.0 })
        .unwrap();

    assert_eq!(members::<Mover>(&registry), vec![still, moving]);
    assert_eq!(members::<Integrator>(&registry), vec![moving]);

    let v = registry.remove_component::<Velocity>(moving).unwrap();
    assert!((v.dx - 1.0).abs() < f32::EPSILON && v.dy == 0.0);
    assert_eq!(members::<Integrator>(&registry), Vec::<Entity>::new());
    assert_eq!(members::<Mover>(&registry), vec![still, moving]);
}

#[test]
fn test_signature_reassignment_replaces() {
    let mut registry = Registry::new();
    let position = registry.register_component::<Position>().unwrap();
    let velocity = registry.register_component::<Velocity>().unwrap();
    registry.register_system(Mover).unwrap();

    let a = registry.create_entity().unwrap();
    let b = registry.create_entity().unwrap();
    registry.add_component(a, origin()).unwrap();
    registry
        .add_component(b, Velocity { dx: 0.0, dy: 1.0 })
        .unwrap();

    registry.set_system_signature::<Mover>(position.into()).unwrap();
    assert_eq!(members::<Mover>(&registry), vec![a]);

    registry.set_system_signature::<Mover>(velocity.into()).unwrap();
    assert_eq!(members::<Mover>(&registry), vec![b]);
    assert_eq!(
        registry.system_signature::<Mover>().unwrap(),
        Signature::from(velocity)
    );
}

#[test]
fn test_id_reuse_starts_clean() {
    let config = RegistryConfig {
        max_entities: 1,
        ..RegistryConfig::default()
    };
    let mut registry = Registry::with_config(&config).unwrap();
    let position = registry.register_component::<Position>().unwrap();
    registry.register_system(Mover).unwrap();
    registry.set_system_signature::<Mover>(position.into()).unwrap();

    let e = registry.create_entity().unwrap();
    registry.add_component(e, origin()).unwrap();
    registry.destroy_entity(e).unwrap();

    let reused = registry.create_entity().unwrap();
    assert_eq!(reused.index(), e.index());
    assert_ne!(reused, e);
    assert_eq!(registry.signature(reused).unwrap(), Signature::EMPTY);
    assert!(!registry.has_component::<Position>(reused).unwrap());
    assert_eq!(registry.component_count::<Position>().unwrap(), 0);
    assert!(members::<Mover>(&registry).is_empty());

    // The stale handle must not reach the new occupant.
    assert_eq!(
        registry.add_component(e, origin()),
        Err(EcsError::InvalidEntity(e))
    );
}

#[test]
fn test_fifo_reuse_order() {
    let config = RegistryConfig {
        max_entities: 3,
        ..RegistryConfig::default()
    };
    let mut registry = Registry::with_config(&config).unwrap();
    let e0 = registry.create_entity().unwrap();
    let e1 = registry.create_entity().unwrap();
    registry.destroy_entity(e1).unwrap();
    registry.destroy_entity(e0).unwrap();

    // Slot 2 was never used, then slots come back in release order.
    let order: Vec<u32> = (0..3)
        .map(|_| registry.create_entity().unwrap().index())
        .collect();
    assert_eq!(order, vec![2, 1, 0]);
}

#[test]
fn test_capacity_boundary() {
    let mut registry = Registry::new();
    for _ in 0..MAX_ENTITIES {
        registry.create_entity().unwrap();
    }
    assert_eq!(registry.living_count(), MAX_ENTITIES);
    assert_eq!(
        registry.create_entity(),
        Err(EcsError::CapacityExceeded {
            pool: "entity",
            limit: MAX_ENTITIES as usize,
        })
    );

    let first = registry.entities().next().unwrap();
    registry.destroy_entity(first).unwrap();
    assert!(registry.create_entity().is_ok());
}

#[test]
fn test_component_type_capacity() {
    struct A;
    impl Component for A {}
    struct B;
    impl Component for B {}

    let config = RegistryConfig::from_toml_str("max_component_types = 1").unwrap();
    let mut registry = Registry::with_config(&config).unwrap();
    registry.register_component::<A>().unwrap();
    assert_eq!(
        registry.register_component::<B>(),
        Err(EcsError::CapacityExceeded {
            pool: "component type",
            limit: 1,
        })
    );
    assert!(matches!(
        registry.register_component::<A>(),
        Err(EcsError::DuplicateRegistration { .. })
    ));

    let e = registry.create_entity().unwrap();
    registry.add_component(e, A).unwrap();
    assert!(matches!(
        registry.add_component(e, B),
        Err(EcsError::UnregisteredType(_))
    ));
}

#[test]
fn test_destroy_with_partial_components() {
    let mut registry = Registry::new();
    registry.register_component::<Position>().unwrap();
    registry.register_component::<Velocity>().unwrap();

    let a = registry.create_entity().unwrap();
    let b = registry.create_entity().unwrap();
    registry.add_component(a, origin()).unwrap();
    registry
        .add_component(b, Velocity { dx: 2.0, dy: 2.0 })
        .unwrap();
    registry.add_component(b, origin()).unwrap();

    // `a` never had a velocity; destroying it must leave the velocity array alone.
    registry.destroy_entity(a).unwrap();
    assert_eq!(registry.component_count::<Position>().unwrap(), 1);
    assert_eq!(registry.component_count::<Velocity>().unwrap(), 1);
    assert_eq!(
        registry.get_component::<Velocity>(b).unwrap(),
        &Velocity { dx: 2.0, dy: 2.0 }
    );
    assert_eq!(registry.components::<Position>().unwrap().entities(), &[b]);
}
