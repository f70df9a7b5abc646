//! Foraging integration tests: ants on small hand-made graphs.

use formica_runtime::prelude::*;
use std::collections::HashMap;

/// Nest 0 - 1 - 2 food, unit edges.
fn corridor() -> Scene {
    let mut b = GraphBuilder::new();
    let n0 = b.add_node(Position::new(0.0, 0.0));
    let n1 = b.add_node(Position::new(1.0, 0.0));
    let n2 = b.add_node(Position::new(2.0, 0.0));
    b.add_edge(n0, n1).unwrap();
    b.add_edge(n1, n2).unwrap();
    b.build(n0, vec![n2]).unwrap()
}

/// Nest 0, food 3. Short route over 1, long route over 2.
fn double_bridge() -> Scene {
    let mut b = GraphBuilder::new();
    let n0 = b.add_node(Position::new(0.0, 0.0));
    let n1 = b.add_node(Position::new(1.0, 0.2));
    let n2 = b.add_node(Position::new(1.0, -1.5));
    let n3 = b.add_node(Position::new(2.0, 0.0));
    b.add_edge(n0, n1).unwrap();
    b.add_edge(n1, n3).unwrap();
    b.add_edge(n0, n2).unwrap();
    b.add_edge(n2, n3).unwrap();
    b.build(n0, vec![n3]).unwrap()
}

#[test]
fn round_trip_deposits_only_on_the_way_home() {
    let config = ColonyConfig {
        num_ants: 1,
        pheromone_decay: 0.0,
        pheromone_deposit: 1.0,
        ..ColonyConfig::default()
    };
    let mut colony = Colony::new(corridor(), config).unwrap();
    let dt = 0.1;

    // Expected deposit per edge, tracked tick by tick from the ant's state.
    let mut expected: HashMap<EdgeId, f64> = HashMap::new();
    let mut found_at = None;
    let mut delivered = false;

    for tick in 0..200 {
        let ant = &colony.ants()[0];
        if ant.carrying_food() {
            let edge = ant.current_edge().unwrap();
            let weight = colony.graph().edge(edge).unwrap().weight;
            *expected.entry(edge).or_default() += 1.0 * dt / weight;
        }
        let events = colony.tick(dt).unwrap();
        if events.contains(&ColonyEvent::FoodFound { ant: 0, node: NodeId(2) }) {
            found_at = Some(tick);
            // Nothing was laid on the way out.
            assert_eq!(colony.pheromone(NodeId(0), NodeId(1)), Some(0.1));
            assert_eq!(colony.pheromone(NodeId(1), NodeId(2)), Some(0.1));
        }
        if events.contains(&ColonyEvent::FoodDelivered { ant: 0 }) {
            delivered = true;
            break;
        }
    }

    assert!(found_at.is_some());
    assert!(delivered);
    assert_eq!(colony.stats().food_delivered, 1);

    for (a, b) in [(0, 1), (1, 2)] {
        let edge = colony.graph().find_edge(NodeId(a), NodeId(b)).unwrap();
        let laid = expected[&edge];
        let actual = colony.pheromone(NodeId(a), NodeId(b)).unwrap();
        assert!((actual - (0.1 + laid)).abs() < 1e-12, "edge {a}-{b}: {actual} vs {laid}");
        // Eleven ticks of 0.1 to cross a unit edge at unit speed.
        assert!((laid - 1.1).abs() < 1e-9, "edge {a}-{b} got {laid}");
    }
}

#[test]
fn returning_ant_is_reported_as_returning() {
    let config = ColonyConfig {
        num_ants: 1,
        ..ColonyConfig::default()
    };
    let mut colony = Colony::new(corridor(), config).unwrap();
    let mut saw_returning = false;
    for _ in 0..100 {
        colony.tick(0.1).unwrap();
        let state = colony.ant_states()[0];
        assert_eq!(state == AntState::Returning, colony.ants()[0].carrying_food());
        saw_returning |= state == AntState::Returning;
    }
    assert!(saw_returning);
}

#[test]
fn positions_stay_on_edges() {
    let config = ColonyConfig {
        num_ants: 25,
        seed: 4,
        ..ColonyConfig::default()
    };
    let mut colony = Colony::new(double_bridge(), config).unwrap();
    for _ in 0..500 {
        colony.tick(0.01).unwrap();
        for (ant, pos) in colony.ants().iter().zip(colony.positions()) {
            // Ants that just arrived sit past the end of the edge they left.
            if ant.progress() == 0.0 {
                continue;
            }
            let from = colony.graph().position(ant.from_node()).unwrap();
            let to = colony.graph().position(ant.to_node()).unwrap();
            let along = from.distance_to(pos) + pos.distance_to(&to);
            assert!((along - from.distance_to(&to)).abs() < 1e-9);
        }
    }
}

#[test]
fn pheromone_stays_positive_under_full_decay() {
    let config = ColonyConfig {
        num_ants: 10,
        pheromone_decay: 1.0,
        ..ColonyConfig::default()
    };
    let mut colony = Colony::new(double_bridge(), config).unwrap();
    for _ in 0..300 {
        colony.tick(0.05).unwrap();
        let g = colony.graph();
        for e in g.all_edges() {
            assert!(g.edge(e).unwrap().pheromone > 0.0);
        }
    }
}

#[test]
fn trail_report_on_double_bridge() {
    let config = ColonyConfig {
        num_ants: 40,
        seed: 21,
        ..ColonyConfig::default()
    };
    let mut colony = Colony::new(double_bridge(), config).unwrap();
    colony.run(3000, 0.01).unwrap();

    let report = trail_report(&colony);
    assert!(report.strongest.reaches_food);
    let shortest = report.shortest.as_ref().unwrap();
    assert_eq!(shortest.nodes, vec![NodeId(0), NodeId(1), NodeId(3)]);
    assert!(report.stretch.unwrap() >= 1.0 - 1e-12);
    assert!(report.concentration > 0.0 && report.concentration <= 1.0);
    assert_eq!(report.converged, report.strongest.nodes == shortest.nodes);
    assert!(report.stats.food_delivered > 0);
}

#[test]
fn failing_ant_aborts_the_tick() {
    // No edges at all: the first ant cannot leave the nest.
    let mut graph = PetTopologyGraph::new();
    graph.add_node(Position::new(0.0, 0.0));
    graph.add_node(Position::new(1.0, 0.0));
    let scene = Scene {
        graph,
        terminals: Terminals::new(NodeId(0), vec![NodeId(1)]),
    };
    let config = ColonyConfig {
        num_ants: 3,
        ..ColonyConfig::default()
    };
    let mut colony = Colony::new(scene, config).unwrap();
    let err = colony.tick(0.1).unwrap_err();
    assert!(matches!(err, FormicaError::AntStep { ant: 0, .. }));
    assert!(matches!(err.root(), FormicaError::Graph(GraphError::NoCandidates(NodeId(0)))));
    assert_eq!(colony.tick_count(), 0);
}
