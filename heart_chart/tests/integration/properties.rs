//! Property tests over arbitrary tick sequences.

use heart_chart::snapshot::ChartSnapshot;
use heart_common::chart::{ChartInputs, ChartState};
use proptest::prelude::*;

use super::common::checked_driver;

fn arb_inputs() -> impl Strategy<Value = ChartInputs> {
    let voltage = prop_oneof![
        8 => -100.0f64..100.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ];
    (
        voltage,
        prop::sample::select(vec![0i8, 0, 0, 1, -1]),
        prop::sample::select(vec![0i8, 0, 0, 1, 2]),
        prop::sample::select(vec![0i8, 0, 0, 1]),
        prop::sample::select(vec![0i8, 0, 0, 1]),
        prop::sample::select(vec![0i8, 0, 0, -1, 1]),
    )
        .prop_map(|(v, event1, event2, event3, pstim, endpstim)| ChartInputs {
            v,
            event1,
            event2,
            event3,
            pstim,
            endpstim,
        })
}

proptest! {
    #[test]
    fn snapshot_restore_snapshot_is_identity(ticks in prop::collection::vec(arb_inputs(), 0..64)) {
        let mut driver = checked_driver();
        for inputs in &ticks {
            driver.step(inputs);
        }
        let snapshot = driver.snapshot();

        // Cells compare NaN by its encoding, so they stand in for the snapshot.
        let cells = snapshot.to_cells();

        let mut other = checked_driver();
        other.restore(&snapshot).unwrap();
        prop_assert_eq!(other.snapshot().to_cells(), cells.clone());

        let parsed = ChartSnapshot::from_cells(&cells).unwrap();
        prop_assert_eq!(parsed.to_cells(), cells);
    }

    #[test]
    fn reset_counter_balances(ticks in prop::collection::vec(arb_inputs(), 1..128)) {
        let mut driver = checked_driver();
        let mut expected: u64 = 0;
        for inputs in &ticks {
            let before = driver.reset_event_counter();
            let report = driver.step(inputs);
            let taken = report.transitions() as u32;

            // Only an active tick with outstanding debt may drain, by one unit.
            let drained = report.reset_toggled as u32;
            prop_assert!(drained == 0 || !report.fired.is_empty());
            prop_assert!(drained == 0 || before + taken > 0);
            prop_assert_eq!(driver.reset_event_counter(), before + taken - drained);
            expected = expected + u64::from(taken) - u64::from(drained);
        }
        prop_assert_eq!(u64::from(driver.reset_event_counter()), expected);
        prop_assert_eq!(
            driver.stats().reset_pulses + u64::from(driver.reset_event_counter()),
            driver.stats().transitions
        );
    }

    #[test]
    fn q_always_matches_state(ticks in prop::collection::vec(arb_inputs(), 1..64)) {
        let mut driver = checked_driver();
        for inputs in &ticks {
            driver.step(inputs);
            match driver.state().q_code() {
                Some(code) => prop_assert_eq!(driver.outputs().q, code),
                None => prop_assert_eq!(driver.state(), ChartState::Inactive),
            }
            prop_assert!(driver.machine().check_invariants().is_ok());
        }
    }
}
