/// Asserts the number of agents still in the simulation.
#[macro_export]
macro_rules! assert_alive_count {
    ($sim:expr, $count:expr) => {
        assert_eq!(
            $sim.population().len(),
            $count,
            "Alive count mismatch at tick {}",
            $sim.ticks()
        );
    };
}

/// Asserts two fitness values agree up to accumulated rounding error.
#[macro_export]
macro_rules! assert_fitness {
    ($actual:expr, $expected:expr) => {
        let (actual, expected): (f64, f64) = ($actual, $expected);
        assert!(
            (actual - expected).abs() < 1e-9,
            "Fitness {} differs from expected {}",
            actual,
            expected
        );
    };
}
