//! Bit-exact agreement with the PRU firmware arithmetic.
//!
//! `Firmware` mirrors the 32-bit C update literally, wrapping operators
//! included. It is only meaningful while the net current is non-negative
//! and no `u32` intermediate wraps, which is the regime driven here. Loads
//! and net currents are chosen past the `i32` range of the intermediate
//! products, where the firmware's unsigned arithmetic is still exact.

use virtcap_common::capacitor::settings::CapacitorSettings;
use virtcap_common::consts::REFERENCE_INPUT_SCALE;
use virtcap_model::CapacitorModel;
use virtcap_model::isqrt::sqrt_rounded;
use virtcap_model::units::{current_ua_to_logic, voltage_mv_to_logic};

use super::{Recorder, recording_model};

struct Firmware {
    cap_voltage: u32,
    is_outputting: bool,
    discretize_cntr: u32,
    lower: u32,
    upper: u32,
    min: u32,
    max: u32,
    leakage: i32,
    converter_efficiency: u32,
    sample_period_us: u32,
    capacitance_uf: u32,
    discretize: u32,
    outputcap_scale_factor: u32,
    calls: Vec<bool>,
}

impl Firmware {
    fn init(s: &CapacitorSettings) -> Self {
        let mv = |v| voltage_mv_to_logic(v).unwrap();
        let pre_sqrt = (s.capacitance_uf - s.output_cap_uf).wrapping_mul(1024 * 1024) / s.capacitance_uf;
        Self {
            cap_voltage: mv(s.init_cap_voltage_mv),
            is_outputting: false,
            discretize_cntr: 0,
            lower: mv(s.lower_threshold_mv),
            upper: mv(s.upper_threshold_mv),
            min: mv(s.min_cap_voltage_mv),
            max: mv(s.max_cap_voltage_mv),
            leakage: current_ua_to_logic(s.leakage_current_ua).unwrap() as i32,
            converter_efficiency: s.converter_efficiency,
            sample_period_us: s.sample_period_us,
            capacitance_uf: s.capacitance_uf,
            discretize: s.discretize,
            outputcap_scale_factor: sqrt_rounded(pre_sqrt),
            calls: Vec::new(),
        }
    }

    fn update(&mut self, current_measured: i32, voltage_measured: u32, input_power: u32, efficiency: u32) {
        let adc = self.cap_voltage >> 13;
        let input_current = (((input_power as i32).wrapping_mul(REFERENCE_INPUT_SCALE as i32) as u32 / adc)
            .wrapping_mul(efficiency)
            >> 13) as i32;
        let input_current = input_current.wrapping_sub(self.leakage);

        let current_measured = if self.is_outputting { current_measured } else { 0 };
        let output_current = (voltage_measured.wrapping_mul(current_measured as u32) / adc)
            .wrapping_mul(self.converter_efficiency)
            >> 13;

        let net = input_current.wrapping_sub(output_current as i32);
        let mut new_cap_voltage = self.cap_voltage.wrapping_add(
            ((net << 13) as u32).wrapping_mul(self.sample_period_us) / (100 * self.capacitance_uf),
        );

        if new_cap_voltage >= self.max {
            new_cap_voltage = self.max;
        } else if new_cap_voltage < self.min {
            new_cap_voltage = self.min;
        }

        self.discretize_cntr += 1;
        if self.discretize_cntr >= self.discretize {
            self.discretize_cntr = 0;
            if self.is_outputting && new_cap_voltage < self.lower {
                self.is_outputting = false;
                self.calls.push(false);
            } else if !self.is_outputting && new_cap_voltage > self.upper {
                self.is_outputting = true;
                self.calls.push(true);
                new_cap_voltage = (new_cap_voltage >> 10) * self.outputcap_scale_factor;
            }
        }
        self.cap_voltage = new_cap_voltage;
    }
}

#[test]
fn derived_constants_match() {
    let settings = CapacitorSettings {
        capacitance_uf: 4000,
        output_cap_uf: 1000,
        ..Default::default()
    };
    let fw = Firmware::init(&settings);
    let m = recording_model(&settings);
    assert_eq!(fw.outputcap_scale_factor, 887);
    assert_eq!(m.outputcap_scale_factor(), fw.outputcap_scale_factor);
    assert_eq!(m.input_scale(), REFERENCE_INPUT_SCALE);
    assert_eq!(m.leakage_current().raw(), fw.leakage);
    assert_eq!(m.cap_voltage().raw(), fw.cap_voltage);
}

/// Step both until `done`, comparing the full state after every update.
fn run_in_lockstep(
    settings: &CapacitorSettings,
    inputs: impl Fn(u32) -> (i32, u32, u32, u32),
    done: impl Fn(u32, &CapacitorModel<Recorder>) -> bool,
) -> (Firmware, CapacitorModel<Recorder>) {
    let mut fw = Firmware::init(settings);
    let mut m = recording_model(settings);

    let mut n = 0u32;
    while !done(n, &m) {
        let (current, voltage, power, efficiency) = inputs(n);
        fw.update(current, voltage, power, efficiency);
        let outcome = m.update(current, voltage, power, efficiency);
        assert!(outcome.faults.is_empty(), "update {n}: {:?}", outcome.faults);
        assert_eq!(m.cap_voltage().raw(), fw.cap_voltage, "update {n}");
        assert_eq!(m.is_outputting(), fw.is_outputting, "update {n}");
        assert_eq!(m.discretize_counter(), fw.discretize_cntr, "update {n}");
        n += 1;
        assert!(n < 1_000_000, "run did not finish");
    }
    (fw, m)
}

#[test]
fn loaded_output_matches_step_for_step() {
    let settings = CapacitorSettings {
        capacitance_uf: 4000,
        output_cap_uf: 1000,
        init_cap_voltage_mv: 3600,
        ..Default::default()
    };
    // Switch on, then a 10 mA load at 3.0 V (product 3.09e9) with harvest
    // still ahead of it.
    let (fw, m) = run_in_lockstep(
        &settings,
        |n| {
            if n == 0 {
                (0, 0, 40_000, 8192)
            } else {
                (32_160, 96_000, 40_000, 8192)
            }
        },
        |n, _| n == 100_000,
    );

    assert!(m.is_outputting());
    assert_eq!(fw.calls, [true]);
    assert_eq!(m.switch().calls, fw.calls);
}

#[test]
fn high_harvest_from_floor_matches_step_for_step() {
    let settings = CapacitorSettings {
        capacitance_uf: 4000,
        output_cap_uf: 1000,
        init_cap_voltage_mv: 1000,
        ..Default::default()
    };
    // At 1.0 V: 15000 × 102911 / 32000 = 48239 counts net, so
    // `(net << 13) × 10` exceeds i32 but not u32.
    let (fw, m) = run_in_lockstep(
        &settings,
        |_| (0, 0, 15_000, 8192),
        |_, m| m.cap_voltage() >= m.settings().max_cap_voltage,
    );

    assert_eq!(fw.calls, [true]);
    assert_eq!(m.switch().calls, fw.calls);
}

#[test]
fn charging_run_matches_step_for_step() {
    let settings = CapacitorSettings {
        capacitance_uf: 4000,
        output_cap_uf: 1000,
        discretize: 7,
        ..Default::default()
    };
    let (fw, m) = run_in_lockstep(
        &settings,
        |_| (0, 0, 8000, 7000),
        |_, m| m.cap_voltage() >= m.settings().max_cap_voltage,
    );

    assert_eq!(fw.calls, [true]);
    assert_eq!(m.switch().calls, fw.calls);
}
