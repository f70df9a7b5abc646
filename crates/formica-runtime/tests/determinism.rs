//! Determinism and conservation tests on generated scenes.

use formica_runtime::prelude::*;

fn colony(seed: u64, num_ants: usize) -> Colony {
    let scene = SceneBuilder::new().num_nodes(80).seed(17).build().unwrap();
    let config = ColonyConfig {
        num_ants,
        seed,
        ..ColonyConfig::default()
    };
    Colony::new(scene, config).unwrap()
}

fn pheromone(colony: &Colony) -> Vec<f64> {
    let g = colony.graph();
    g.all_edges()
        .into_iter()
        .map(|e| g.edge(e).unwrap().pheromone)
        .collect()
}

#[test]
fn same_seed_is_bit_identical() {
    let mut a = colony(99, 30);
    let mut b = colony(99, 30);
    for _ in 0..400 {
        let ea = a.tick(0.01).unwrap();
        let eb = b.tick(0.01).unwrap();
        assert_eq!(ea, eb);
    }
    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.ant_states(), b.ant_states());
    let (pa, pb) = (pheromone(&a), pheromone(&b));
    assert!(pa.iter().zip(&pb).all(|(x, y)| x.to_bits() == y.to_bits()));
}

#[test]
fn different_seeds_diverge() {
    let mut a = colony(1, 30);
    let mut b = colony(2, 30);
    a.run(100, 0.01).unwrap();
    b.run(100, 0.01).unwrap();
    assert_ne!(a.positions(), b.positions());
}

#[test]
fn decay_without_deposits_scales_the_total() {
    let mut colony = colony(5, 0);
    let dt = 0.25;
    let factor = colony.field().decay_factor(dt);
    for _ in 0..20 {
        let before = colony.stats().total_pheromone;
        colony.tick(dt).unwrap();
        let after = colony.stats().total_pheromone;
        assert!((after - before * factor).abs() <= 1e-12 * before);
    }
}

#[test]
fn pheromone_is_untouched_until_food_is_found() {
    let scene = SceneBuilder::new().num_nodes(80).seed(17).build().unwrap();
    let config = ColonyConfig {
        num_ants: 50,
        seed: 3,
        pheromone_decay: 0.0,
        ..ColonyConfig::default()
    };
    assert_eq!(config.ant.deposit_leg, DepositLeg::ReturnOnly);
    let mut colony = Colony::new(scene, config).unwrap();
    let initial = pheromone(&colony);

    let mut ticks = 0;
    while colony.stats().carrying == 0 && ticks < 100_000 {
        assert_eq!(pheromone(&colony), initial);
        colony.tick(0.01).unwrap();
        ticks += 1;
    }
    assert!(colony.stats().food_found > 0);

    // One more tick and the carriers have marked their edges.
    colony.tick(0.01).unwrap();
    let total: f64 = pheromone(&colony).iter().sum();
    assert!(total > initial.iter().sum::<f64>());
}
