//! Integration test: the reference pacing scenarios.
//!
//! One chart walks resting → stimulated → upstroke → plateau → resting,
//! checking outputs and reset-pulse bookkeeping after every tick.

use heart_chart::snapshot::ChartSnapshot;
use heart_chart::state::machine::StepOutcome;
use heart_common::chart::{ChartEvent, ChartInputs, ChartState};

use super::common::{checked_driver, pulse};

#[test]
fn fresh_instance_event1_only_enters() {
    let mut driver = checked_driver();
    let report = driver.step(&pulse(ChartEvent::Event1, 0.0));

    assert_eq!(report.dispatched.len(), 1);
    assert_eq!(report.dispatched[0].outcome, StepOutcome::Entered);
    assert_eq!(driver.state(), ChartState::Resting);
    assert_eq!(driver.outputs().q, 1.0);
    assert!(!driver.outputs().reset);
    assert!(!report.reset_toggled);
    assert_eq!(driver.reset_event_counter(), 0);
}

#[test]
fn full_cycle_scenario() {
    let mut driver = checked_driver();
    driver.step(&pulse(ChartEvent::Event1, 0.0));

    // Resting --pstim--> Stimulated. The counter reaches 1 and drains in the
    // same tick, so inspect the chart through the report's dispatches and
    // the machine after the transition.
    let report = driver.step(&pulse(ChartEvent::Pstim, 5.0));
    assert_eq!(
        report.dispatched[0].outcome,
        StepOutcome::Transitioned { from: ChartState::Resting, to: ChartState::Stimulated }
    );
    assert_eq!(driver.state(), ChartState::Stimulated);
    assert_eq!(driver.outputs().q, 2.0);
    assert_eq!(driver.outputs().vreset, 5.0);
    assert_eq!(driver.machine().vn(), 5.0);
    assert!(report.reset_toggled);
    assert_eq!(driver.reset_event_counter(), 0);

    // Stimulated --event2--> Upstroke.
    driver.step(&pulse(ChartEvent::Event2, 6.0));
    assert_eq!(driver.state(), ChartState::Upstroke);
    assert_eq!(driver.outputs().q, 3.0);
    assert_eq!(driver.outputs().vreset, 6.0);

    // Upstroke --event3--> Plateau publishes vn, not the current v.
    driver.step(&pulse(ChartEvent::Event3, 7.0));
    assert_eq!(driver.state(), ChartState::Plateau);
    assert_eq!(driver.outputs().q, 4.0);
    assert_eq!(driver.outputs().vno, 5.0);
    assert_eq!(driver.outputs().vreset, 7.0);

    // Plateau --event1--> Resting.
    driver.step(&pulse(ChartEvent::Event1, -70.0));
    assert_eq!(driver.state(), ChartState::Resting);
    assert_eq!(driver.outputs().q, 1.0);
    assert_eq!(driver.stats().transitions, 4);
    assert_eq!(driver.stats().reset_pulses, 4);
}

#[test]
fn counter_accumulates_within_one_machine() {
    // Drive the machine directly to observe the counter before any drain.
    let mut driver = checked_driver();
    driver.step(&pulse(ChartEvent::Event1, 0.0));
    let mut machine = driver.machine().clone();

    machine.handle_event(ChartEvent::Pstim, 5.0);
    assert_eq!(machine.reset_event_counter(), 1);
    assert_eq!(machine.vn(), 5.0);

    machine.handle_event(ChartEvent::Event2, 5.0);
    assert_eq!(machine.reset_event_counter(), 2);
    assert_eq!(machine.q(), 3.0);

    machine.handle_event(ChartEvent::Event3, 7.0);
    assert_eq!(machine.reset_event_counter(), 3);
    assert_eq!(machine.vno(), 5.0);
    assert_eq!(machine.vreset(), 7.0);

    machine.handle_event(ChartEvent::Event1, 7.0);
    assert_eq!(machine.reset_event_counter(), 4);
    assert_eq!(machine.state(), ChartState::Resting);
}

#[test]
fn whole_cycle_in_one_tick_drains_one_unit() {
    let mut driver = checked_driver();
    driver.step(&pulse(ChartEvent::Event1, 0.0));

    // event2 (Resting → Upstroke), event3 (→ Plateau), pstim ignored,
    // endpstim ignored. event1 fires first while still Resting: ignored.
    let inputs = ChartInputs {
        v: 1.0,
        event1: 1,
        event2: 1,
        event3: 1,
        pstim: 1,
        endpstim: -1,
    };
    let report = driver.step(&inputs);
    assert_eq!(report.dispatched.len(), 5);
    assert_eq!(report.transitions(), 2);
    assert_eq!(driver.state(), ChartState::Plateau);
    assert_eq!(driver.reset_event_counter(), 1);
    assert!(driver.outputs().reset);

    // The remaining unit drains on the next active tick only.
    driver.step(&ChartInputs::quiet(0.0));
    assert_eq!(driver.reset_event_counter(), 1);
    driver.step(&pulse(ChartEvent::Event1, 0.0));
    // event1 takes Plateau → Resting (+1) and one unit drains (−1).
    assert_eq!(driver.reset_event_counter(), 1);
    assert!(!driver.outputs().reset);
}

#[test]
fn endpstim_level_one_is_not_an_event() {
    let mut driver = checked_driver();
    driver.step(&pulse(ChartEvent::Event1, 0.0));
    driver.step(&pulse(ChartEvent::Pstim, 0.0));

    let inputs = ChartInputs {
        endpstim: 1,
        ..ChartInputs::quiet(0.0)
    };
    let report = driver.step(&inputs);
    assert!(report.dispatched.is_empty());
    assert_eq!(driver.state(), ChartState::Stimulated);

    driver.step(&pulse(ChartEvent::Endpstim, 3.0));
    assert_eq!(driver.state(), ChartState::Resting);
    assert_eq!(driver.outputs().vreset, 3.0);
}

#[test]
fn plateau_return_with_outstanding_debt() {
    let mut driver = checked_driver();
    driver
        .restore(&ChartSnapshot {
            q: 4.0,
            vno: 5.0,
            vreset: 7.0,
            vn: 5.0,
            reset: false,
            reset_event_counter: 3,
            is_active: true,
            current_state: ChartState::Plateau,
            side_effect_info: None,
        })
        .unwrap();

    // Counter goes 3 → 4 on the transition, then the tick drains it to 3.
    let report = driver.step(&pulse(ChartEvent::Event1, 7.0));
    assert_eq!(driver.state(), ChartState::Resting);
    assert_eq!(driver.outputs().q, 1.0);
    assert!(report.reset_toggled);
    assert!(driver.outputs().reset);
    assert_eq!(driver.reset_event_counter(), 3);
}
