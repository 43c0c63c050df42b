use gatewing_core::agent::Agent;
use gatewing_core::collision::{collides, segment_offsets, SegmentMasks};
use gatewing_core::config::ObstacleConfig;
use gatewing_core::mask::CoverageMask;
use gatewing_core::obstacle::Obstacle;
use std::sync::Arc;

/// A diamond in a 5x5 box: the four corners are clear.
fn diamond() -> Arc<CoverageMask> {
    Arc::new(CoverageMask::from_rows(&[
        "..#..", //
        ".###.", //
        "#####", //
        ".###.", //
        "..#..",
    ]))
}

fn small_obstacles() -> (ObstacleConfig, SegmentMasks) {
    let cfg = ObstacleConfig {
        width: 4,
        segment_height: 10,
        vertical_gap: 6.0,
        ..ObstacleConfig::default()
    };
    let segments = SegmentMasks::solid(cfg.width, cfg.segment_height);
    (cfg, segments)
}

#[test]
fn test_bounding_boxes_overlap_but_cells_do_not() {
    let (cfg, segments) = small_obstacles();
    // Lower segment starts at y 16; the agent's box spans y 12..17 and
    // x 10..15 against a segment spanning x 14..18.
    let agent = Agent::new(10.0, 12.0, diamond());
    let obstacle = Obstacle::new(14.0, 10, &cfg);
    assert_eq!(segment_offsets(&agent, &obstacle).1, (4, 4));
    assert!(!collides(&agent, &obstacle, &segments));

    // A solid agent of the same size does touch the corner.
    let boxy = Agent::new(10.0, 12.0, Arc::new(CoverageMask::filled(5, 5)));
    assert!(collides(&boxy, &obstacle, &segments));
}

#[test]
fn test_covered_cells_touching_collide() {
    let (cfg, segments) = small_obstacles();
    // The diamond's middle row reaches the segment's first column.
    let agent = Agent::new(10.0, 8.0, diamond());
    let obstacle = Obstacle::new(14.0, 4, &cfg);
    let (_, bottom) = segment_offsets(&agent, &obstacle);
    assert_eq!(bottom, (4, 2));
    assert!(collides(&agent, &obstacle, &segments));
}

#[test]
fn test_fractional_positions_truncate_and_round() {
    let (cfg, segments) = small_obstacles();
    // x offset 4.9 truncates to 4; y 11.5 rounds to 12.
    let agent = Agent::new(10.0, 11.5, diamond());
    let obstacle = Obstacle::new(14.9, 10, &cfg);
    assert_eq!(segment_offsets(&agent, &obstacle).1, (4, 4));
    assert!(!collides(&agent, &obstacle, &segments));
}

#[test]
fn test_upper_segment_hits() {
    let (cfg, segments) = small_obstacles();
    // Upper segment spans y 0..10; the diamond's bottom tip sits at y 9.
    let agent = Agent::new(10.0, 5.0, diamond());
    let obstacle = Obstacle::new(12.0, 10, &cfg);
    assert!(collides(&agent, &obstacle, &segments));
}
