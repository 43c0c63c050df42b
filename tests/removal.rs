mod common;

use common::SimBuilder;
use gatewing_core::config::Mode;

#[test]
fn test_removing_one_and_three_keeps_alignment() {
    let mut sim = SimBuilder::new(Mode::Cohort)
        .with_config(|c| {
            c.agent.start_y = 560.0;
            c.episode.max_ticks = Some(50);
        })
        .with_gaps(vec![200])
        .with_holder(560.0)
        .with_gliders(1)
        .with_holder(560.0)
        .with_gliders(1)
        .with_holder(560.0)
        .build();

    let mut deaths = Vec::new();
    while deaths.is_empty() {
        deaths = sim.step().unwrap().deaths;
    }
    assert_eq!(sim.ticks(), 10);
    assert_eq!(deaths.iter().map(|d| d.origin).collect::<Vec<_>>(), vec![1, 3]);
    assert_alive_count!(sim, 3);

    let population = sim.population();
    assert_eq!(population.origins(), &[0, 2, 4]);
    for (agent, fitness) in population.agents().iter().zip(population.fitness()) {
        assert!(agent.alive);
        assert_fitness!(*fitness, 1.0);
    }

    // Survivors keep steering with their own decision functions.
    let outcome = sim.run().unwrap();
    let fitness = outcome.fitness;
    for i in [0, 2, 4] {
        assert_fitness!(fitness[i], 5.0);
    }
    for i in [1, 3] {
        assert_fitness!(fitness[i], -0.1);
    }
}

#[test]
fn test_snapshot_lists_survivors_by_origin() {
    let mut sim = SimBuilder::new(Mode::Cohort)
        .with_config(|c| c.agent.start_y = 560.0)
        .with_gaps(vec![200])
        .with_gliders(1)
        .with_holder(560.0)
        .build();
    for _ in 0..10 {
        sim.step().unwrap();
    }
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.alive_count, 1);
    assert_eq!(snapshot.agents.len(), 1);
    assert_eq!(snapshot.agents[0].origin, 1);
}
