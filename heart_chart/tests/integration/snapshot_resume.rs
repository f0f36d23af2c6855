//! Integration test: pause, persist, resume.
//!
//! A chart is paused mid-cycle, its snapshot travels through the cell form
//! and the file store, and a fresh instance resumes with identical behaviour.

use heart_chart::config::ChartConfig;
use heart_chart::driver::StepDriver;
use heart_chart::snapshot::persist::SnapshotStore;
use heart_chart::snapshot::{ChartSnapshot, RestoreError, SideEffectInfo};
use heart_chart::state::activity::ActiveStates;
use heart_common::chart::{ChartEvent, ChartInputs, ChartState, ReusableOutputs};
use serde_json::json;
use tempfile::TempDir;

use super::common::{checked_driver, pulse};

fn paused_in_upstroke() -> StepDriver {
    let mut driver = checked_driver();
    driver.set_side_effect_info(Some(SideEffectInfo(vec![0x42, 0x00, 0xff])));
    driver.step(&pulse(ChartEvent::Event1, 0.0));
    driver.step(&pulse(ChartEvent::Pstim, 5.0));
    driver.step(&pulse(ChartEvent::Event2, 6.0));
    assert_eq!(driver.state(), ChartState::Upstroke);
    driver
}

#[test]
fn resumed_chart_continues_identically() {
    let mut original = paused_in_upstroke();
    let snapshot = original.snapshot();

    let mut resumed = checked_driver();
    resumed.restore(&snapshot).unwrap();
    assert_eq!(resumed.snapshot(), snapshot);
    assert_eq!(resumed.active_states(), ActiveStates::UPSTROKE);

    for inputs in [
        pulse(ChartEvent::Event3, 7.0),
        ChartInputs::quiet(3.0),
        pulse(ChartEvent::Event1, -70.0),
    ] {
        let a = original.step(&inputs);
        let b = resumed.step(&inputs);
        assert_eq!(a.outputs, b.outputs);
        assert_eq!(original.state(), resumed.state());
    }
    assert_eq!(resumed.outputs().vno, 5.0);
}

#[test]
fn snapshot_round_trip_through_cells() {
    let driver = paused_in_upstroke();
    let snapshot = driver.snapshot();

    let restored = ChartSnapshot::from_cells(&snapshot.to_cells()).unwrap();
    let mut other = checked_driver();
    other.restore(&restored).unwrap();
    assert_eq!(other.snapshot(), snapshot);
}

#[test]
fn snapshot_of_fresh_instance_round_trips() {
    let driver = checked_driver();
    let snapshot = driver.snapshot();
    assert!(!snapshot.is_active);
    assert_eq!(snapshot.current_state, ChartState::Inactive);

    let mut other = paused_in_upstroke();
    other.restore(&snapshot).unwrap();
    assert_eq!(other.snapshot(), snapshot);
    assert!(other.active_states().is_empty());

    // The next dispatch enters the chart again.
    other.step(&pulse(ChartEvent::Pstim, 1.0));
    assert_eq!(other.state(), ChartState::Resting);
}

#[test]
fn malformed_cells_leave_instance_untouched() {
    let mut driver = paused_in_upstroke();
    let before = driver.snapshot();

    let too_short = json!([1.0, 0.0, 0.0, 0.0, false, 0, 1, 2]);
    let err = ChartSnapshot::from_cells(&too_short).unwrap_err();
    assert_eq!(err, RestoreError::Arity { expected: 9, found: 8 });

    let inconsistent = json!([3.0, 0.0, 0.0, 0.0, false, 0, 1, 2, null]);
    let err = ChartSnapshot::from_cells(&inconsistent).unwrap_err();
    assert!(matches!(err, RestoreError::Inconsistent(_)));

    let mut bad = before.clone();
    bad.is_active = false;
    assert!(driver.restore(&bad).is_err());
    assert_eq!(driver.snapshot(), before);
}

#[test]
fn persisted_snapshot_resumes() {
    let dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(dir.path().join("heart_chart.snap"));

    let driver = paused_in_upstroke();
    store.save(&driver.snapshot()).unwrap();
    let payload = driver.terminate();
    assert_eq!(payload, Some(SideEffectInfo(vec![0x42, 0x00, 0xff])));

    let loaded = store.load().unwrap().expect("snapshot present");
    let mut resumed = checked_driver();
    resumed.restore(&loaded).unwrap();
    assert_eq!(resumed.state(), ChartState::Upstroke);
    assert_eq!(resumed.side_effect_info(), payload.as_ref());

    resumed.step(&pulse(ChartEvent::Event3, 9.0));
    assert_eq!(resumed.outputs().vno, 5.0);
    assert_eq!(resumed.outputs().q, 4.0);
}

#[test]
fn reusable_outputs_survive_reinitialization() {
    let mut driver = StepDriver::new(ChartConfig {
        reusable_outputs: vec![heart_common::chart::OutputPort::Vreset],
        ..ChartConfig::default()
    });
    assert_eq!(driver.config().reusable(), ReusableOutputs::VRESET);

    driver.step(&pulse(ChartEvent::Event1, 0.0));
    driver.step(&pulse(ChartEvent::Event2, -42.0));
    driver.initialize();

    let outputs = driver.outputs();
    assert_eq!(outputs.vreset, -42.0);
    assert_eq!(outputs.q, 1.0);
    assert_eq!(outputs.vno, 0.0);
    assert!(!outputs.reset);
    assert_eq!(driver.state(), ChartState::Inactive);
}
