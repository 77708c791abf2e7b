//! Properties that hold for any valid settings and any input sequence.

use proptest::prelude::*;
use virtcap_common::capacitor::settings::CapacitorSettings;
use virtcap_model::OutputState;

use super::recording_model;

fn settings() -> impl Strategy<Value = CapacitorSettings> {
    (
        1000u32..3000,
        100u32..1000,
        10u32..20_000,
        1u32..10,
        1u32..4,
        prop::num::u32::ANY,
    )
        .prop_map(|(lower, band, capacitance, ratio, discretize, init_seed)| {
            let upper = lower + band;
            let (min, max) = (lower / 2, upper + 500);
            CapacitorSettings {
                lower_threshold_mv: lower,
                upper_threshold_mv: upper,
                min_cap_voltage_mv: min,
                max_cap_voltage_mv: max,
                init_cap_voltage_mv: min + init_seed % (max - min + 1),
                capacitance_uf: capacitance,
                output_cap_uf: (capacitance / (ratio + 1)).max(1),
                discretize,
                ..Default::default()
            }
        })
}

fn inputs() -> impl Strategy<Value = Vec<(i32, u32, u32, u32)>> {
    prop::collection::vec(
        (
            prop::num::i32::ANY,
            prop::num::u32::ANY,
            prop::num::u32::ANY,
            0u32..=16_384,
        ),
        1..200,
    )
}

proptest! {
    #[test]
    fn voltage_stays_within_bounds(settings in settings(), steps in inputs()) {
        let mut m = recording_model(&settings);
        let (min, max) = (m.settings().min_cap_voltage, m.settings().max_cap_voltage);

        for (current, voltage, power, efficiency) in steps {
            m.update(current, voltage, power, efficiency);
            prop_assert!(m.cap_voltage() >= min);
            prop_assert!(m.cap_voltage() <= max);
        }
    }

    #[test]
    fn every_transition_calls_switch_once(settings in settings(), steps in inputs()) {
        let mut m = recording_model(&settings);
        let mut transitions = Vec::new();

        for (current, voltage, power, efficiency) in steps {
            if let Some(state) = m.update(current, voltage, power, efficiency).transition {
                prop_assert_eq!(state, m.output_state());
                transitions.push(state == OutputState::On);
            }
        }

        prop_assert_eq!(&m.switch().calls, &transitions);
        // Starts Off, so calls alternate beginning with `true`.
        for (i, on) in transitions.iter().enumerate() {
            prop_assert_eq!(*on, i % 2 == 0);
        }
    }
}
