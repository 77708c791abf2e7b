//! Offline driver: replays constant-input phases through a model.
//!
//! Stands in for the firmware sampling loop when exercising the model from
//! configuration files, tests and benches.

use heapless::Vec;
use virtcap_common::capacitor::error::ArithmeticFault;
use virtcap_common::config::Phase;
use virtcap_common::consts::MAX_RECORDED_TRANSITIONS;

use crate::fixed::LogicVoltage;
use crate::model::CapacitorModel;
use crate::model::hysteresis::OutputState;
use crate::model::switch::OutputSwitch;

/// One observed output transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRecord {
    /// Zero-based index of the update that switched.
    pub sample: u64,
    pub state: OutputState,
    /// Voltage committed by that update.
    pub cap_voltage: LogicVoltage,
}

/// Aggregate of a scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub updates: u64,
    /// First `MAX_RECORDED_TRANSITIONS` transitions.
    pub transitions: Vec<TransitionRecord, MAX_RECORDED_TRANSITIONS>,
    /// Transitions beyond the recorded ones.
    pub dropped_transitions: u64,
    pub final_voltage: LogicVoltage,
    pub min_voltage: LogicVoltage,
    pub max_voltage: LogicVoltage,
    /// Union of faults raised during the run.
    pub faults: ArithmeticFault,
}

impl ScenarioSummary {
    fn new(start: LogicVoltage) -> Self {
        Self {
            updates: 0,
            transitions: Vec::new(),
            dropped_transitions: 0,
            final_voltage: start,
            min_voltage: start,
            max_voltage: start,
            faults: ArithmeticFault::empty(),
        }
    }

    /// Total transitions, recorded or not.
    pub fn transition_count(&self) -> u64 {
        self.transitions.len() as u64 + self.dropped_transitions
    }

    /// Number of Off → On transitions among the recorded ones.
    pub fn switch_on_count(&self) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.state == OutputState::On)
            .count()
    }
}

/// Run every phase in order and summarise.
pub fn run_scenario<S: OutputSwitch>(
    model: &mut CapacitorModel<S>,
    phases: &[Phase],
) -> ScenarioSummary {
    let mut summary = ScenarioSummary::new(model.cap_voltage());

    for phase in phases {
        for _ in 0..phase.samples {
            let outcome = model.update(
                phase.current_measured,
                phase.voltage_measured,
                phase.input_power,
                phase.efficiency,
            );
            let v = model.cap_voltage();

            if let Some(state) = outcome.transition {
                let record = TransitionRecord {
                    sample: summary.updates,
                    state,
                    cap_voltage: v,
                };
                if summary.transitions.push(record).is_err() {
                    summary.dropped_transitions += 1;
                }
            }
            summary.faults |= outcome.faults;
            summary.min_voltage = summary.min_voltage.min(v);
            summary.max_voltage = summary.max_voltage.max(v);
            summary.updates += 1;
        }
    }

    summary.final_voltage = model.cap_voltage();
    summary
}
