//! Read-only frame surface for renderers.

use crate::simulation::Simulation;
use gatewing_data::FrameSnapshot;

/// Copies the drawable state of `sim` at the end of the last tick.
#[must_use]
pub fn frame_snapshot(sim: &Simulation) -> FrameSnapshot {
    let population = sim.population();
    let stream = sim.stream();
    let active_obstacle =
        (!stream.is_empty()).then(|| stream.active_index(population.lead_x()));

    FrameSnapshot {
        tick: sim.ticks(),
        generation: sim.generation(),
        score: sim.score(),
        alive_count: population.len(),
        active_obstacle,
        agents: population.views(),
        obstacles: stream.obstacles().iter().map(|o| o.view()).collect(),
        ground: stream.ground().view(),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::decision::{boxed, policies};
    use crate::simulation::Simulation;
    use crate::stream::ScriptedGaps;

    #[test]
    fn test_snapshot_tracks_state() {
        let config = AppConfig::default();
        let gaps = Box::new(ScriptedGaps::new(vec![250], &config.obstacle).unwrap());
        let mut sim = Simulation::with_gap_source(
            config,
            vec![boxed(policies::glide), boxed(policies::glide)],
            7,
            gaps,
        )
        .unwrap();

        let before = sim.snapshot();
        assert_eq!(before.tick, 0);
        assert_eq!(before.generation, 7);
        assert_eq!(before.agents.len(), 2);
        assert_eq!(before.agents[1].origin, 1);
        assert_eq!(before.active_obstacle, Some(0));
        assert_eq!(before.obstacles[0].x, 600.0);
        assert_eq!(before.ground.x2, 672.0);

        sim.step().unwrap();
        let after = sim.snapshot();
        assert_eq!(after.tick, 1);
        assert_eq!(after.agents[0].y, 351.0);
        assert_eq!(after.obstacles[0].x, 595.0);
        assert_eq!(after.obstacles[0].gap_center, 250);
        assert_eq!(after.ground.x1, -5.0);
        assert_eq!(after.alive_count, 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let sim = Simulation::new(AppConfig::default(), vec![boxed(policies::flap)], 1).unwrap();
        let json = serde_json::to_string(&sim.snapshot()).unwrap();
        assert!(json.contains("\"alive_count\":1"));
    }
}
