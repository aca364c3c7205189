use crate::blocks;
use crate::core::components::operation::Operation;
use crate::core::components::registry::OperationRegistry;
use crate::core::components::spec::OperationSpec;
use crate::core::connections::manager::ConnectionManager;
use crate::core::error::SimError;
use crate::core::execution::config::SimulationConfig;
use crate::core::execution::cycle_engine::CycleEngine;
use crate::core::types::OperationId;

fn id(raw: u64) -> OperationId {
    OperationId::new(raw)
}

/// constant(1) -> add.in0, add.out -> add.in1 (self loop), add.out -> output
fn counter_graph(order: &[u64]) -> (OperationRegistry, ConnectionManager) {
    let mut registry = OperationRegistry::new();
    for raw in order {
        let spec = match raw {
            0 => blocks::constant(),
            1 => blocks::add(),
            _ => blocks::output(),
        };
        registry.register(Operation::new(id(*raw), spec)).unwrap();
    }

    let mut connections = ConnectionManager::new();
    connections.connect(id(0).output(0), id(1).input(0)).unwrap();
    connections.connect(id(1).output(0), id(1).input(1)).unwrap();
    connections.connect(id(1).output(0), id(2).input(0)).unwrap();
    (registry, connections)
}

#[test]
fn test_outputs_are_seeded_before_the_first_step() {
    let (mut registry, connections) = counter_graph(&[0, 1, 2]);
    let config = SimulationConfig::default().with_output_seed(2.5);
    let engine = CycleEngine::initialize(&mut registry, &connections, &config);

    assert_eq!(engine.current_step(), 0);
    assert_eq!(engine.value(&id(0).output(0)), Some(2.5));
    assert_eq!(engine.value(&id(1).output(0)), Some(2.5));
    assert_eq!(engine.snapshot().len(), 2, "sinks have no output ports");
}

#[test]
fn test_values_travel_one_hop_per_step() {
    let (mut registry, connections) = counter_graph(&[0, 1, 2]);
    let mut engine =
        CycleEngine::initialize(&mut registry, &connections, &SimulationConfig::default());

    engine.step(&mut registry).unwrap();
    assert_eq!(engine.value(&id(0).output(0)), Some(1.0));
    assert_eq!(
        engine.value(&id(1).output(0)),
        Some(0.0),
        "add must read the seeded constant, not this step's output"
    );

    engine.step(&mut registry).unwrap();
    assert_eq!(engine.value(&id(1).output(0)), Some(1.0));
}

#[test]
fn test_feedback_cycle_accumulates() {
    let (mut registry, connections) = counter_graph(&[0, 1, 2]);
    let mut engine =
        CycleEngine::initialize(&mut registry, &connections, &SimulationConfig::default());

    for _ in 0..10 {
        engine.step(&mut registry).unwrap();
    }
    assert_eq!(engine.value(&id(1).output(0)), Some(9.0));
    assert_eq!(engine.current_step(), 10);
    assert!((engine.time() - 0.1).abs() < 1e-12);
}

#[test]
fn test_registration_order_does_not_change_results() {
    let orders: [&[u64]; 3] = [&[0, 1, 2], &[2, 1, 0], &[1, 2, 0]];
    let snapshots: Vec<_> = orders
        .iter()
        .map(|order| {
            let (mut registry, connections) = counter_graph(order);
            let mut engine = CycleEngine::initialize(
                &mut registry,
                &connections,
                &SimulationConfig::default(),
            );
            for _ in 0..7 {
                engine.step(&mut registry).unwrap();
            }
            engine.snapshot().clone()
        })
        .collect();

    assert_eq!(snapshots[0], snapshots[1]);
    assert_eq!(snapshots[0], snapshots[2]);
}

#[test]
fn test_initialize_resets_operation_state() {
    let mut registry = OperationRegistry::new();
    registry.register(Operation::new(id(0), blocks::constant())).unwrap();
    registry.register(Operation::new(id(1), blocks::integral())).unwrap();
    registry.register(Operation::new(id(2), blocks::output())).unwrap();
    let mut connections = ConnectionManager::new();
    connections.connect(id(0).output(0), id(1).input(0));
    connections.connect(id(1).output(0), id(2).input(0));
    let config = SimulationConfig::default().with_dt(0.5);

    let mut engine = CycleEngine::initialize(&mut registry, &connections, &config);
    for _ in 0..4 {
        engine.step(&mut registry).unwrap();
    }
    assert_eq!(engine.value(&id(1).output(0)), Some(1.5));

    let mut engine = CycleEngine::initialize(&mut registry, &connections, &config);
    engine.step(&mut registry).unwrap();
    engine.step(&mut registry).unwrap();
    assert_eq!(
        engine.value(&id(1).output(0)),
        Some(0.5),
        "re-initialization must restart the accumulator"
    );
}

#[test]
fn test_failing_step_commits_nothing() {
    let broken = OperationSpec::new("Broken", 0, 1, (), |_| vec![1.0, 2.0]);
    let mut registry = OperationRegistry::new();
    registry.register(Operation::new(id(0), blocks::constant())).unwrap();
    registry.register(Operation::new(id(1), broken)).unwrap();
    let connections = ConnectionManager::new();
    let mut engine =
        CycleEngine::initialize(&mut registry, &connections, &SimulationConfig::default());

    let err = engine.step(&mut registry).unwrap_err();
    assert_eq!(
        err,
        SimError::TransferArity {
            operation: id(1),
            expected: 1,
            actual: 2,
        }
    );
    assert_eq!(engine.current_step(), 0);
    assert_eq!(engine.value(&id(0).output(0)), Some(0.0));
}

#[test]
fn test_missing_source_is_reported() {
    let mut registry = OperationRegistry::new();
    registry.register(Operation::new(id(0), blocks::gain())).unwrap();
    let connections = ConnectionManager::new();
    let mut engine =
        CycleEngine::initialize(&mut registry, &connections, &SimulationConfig::default());

    assert_eq!(
        engine.step(&mut registry),
        Err(SimError::IncompleteGraph {
            port: id(0).input(0)
        })
    );
}

#[test]
fn test_non_finite_values_propagate() {
    let mut zero = Operation::new(id(3), blocks::constant());
    zero.set_parameter("value", 0.0.into()).unwrap();

    let mut registry = OperationRegistry::new();
    registry.register(Operation::new(id(0), blocks::constant())).unwrap();
    registry.register(Operation::new(id(1), blocks::divide())).unwrap();
    registry.register(Operation::new(id(2), blocks::gain())).unwrap();
    registry.register(zero).unwrap();
    let mut connections = ConnectionManager::new();
    connections.connect(id(0).output(0), id(1).input(0));
    connections.connect(id(3).output(0), id(1).input(1));
    connections.connect(id(1).output(0), id(2).input(0));
    let config = SimulationConfig::default().with_output_seed(1.0);
    let mut engine = CycleEngine::initialize(&mut registry, &connections, &config);

    engine.step(&mut registry).unwrap();
    assert_eq!(engine.value(&id(1).output(0)), Some(1.0));
    engine.step(&mut registry).unwrap();
    assert_eq!(engine.value(&id(1).output(0)), Some(f64::INFINITY));
    engine.step(&mut registry).unwrap();
    assert_eq!(
        engine.value(&id(2).output(0)),
        Some(f64::INFINITY),
        "division by zero is not trapped"
    );
}
