//! Configuration files driven end to end through the scenario runner.

use std::io::Write;
use std::path::Path;

use virtcap_common::capacitor::error::SettingsError;
use virtcap_common::config::{ConfigError, ConfigLoader, SimConfig};
use virtcap_model::scenario::run_scenario;
use virtcap_model::{CapacitorModel, OutputState};

use super::Recorder;

const SAMPLE_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config/virtcap.toml");

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn sample_config_runs_a_full_cycle() {
    let config = SimConfig::load(Path::new(SAMPLE_CONFIG)).unwrap();
    let mut model =
        CapacitorModel::init(&config.capacitor, &config.calibration, Recorder::default()).unwrap();

    let summary = run_scenario(&mut model, &config.phases);

    assert_eq!(summary.updates, config.total_samples());
    let states: Vec<OutputState> = summary.transitions.iter().map(|t| t.state).collect();
    assert_eq!(states, [OutputState::On, OutputState::Off, OutputState::On]);
    assert_eq!(summary.dropped_transitions, 0);
    assert!(summary.faults.is_empty());
    assert_eq!(summary.final_voltage, model.settings().max_cap_voltage);
    assert_eq!(summary.max_voltage, model.settings().max_cap_voltage);
    assert_eq!(model.switch().calls, [true, false, true]);
}

#[test]
fn transition_records_carry_committed_voltage() {
    let config = SimConfig::load(Path::new(SAMPLE_CONFIG)).unwrap();
    let mut model =
        CapacitorModel::init(&config.capacitor, &config.calibration, Recorder::default()).unwrap();
    let summary = run_scenario(&mut model, &config.phases);

    let on = summary.transitions[0];
    // Connecting the output capacitor pulls the voltage under the threshold.
    assert!(on.cap_voltage < model.settings().upper_threshold);
    let off = summary.transitions[1];
    assert!(off.cap_voltage < model.settings().lower_threshold);
    assert!(off.sample > on.sample);
}

#[test]
fn tempfile_config_with_custom_calibration() {
    let file = write_config(
        r#"
[shared]
service_name = "bench-board"
log_level = "debug"

[capacitor]
capacitance_uf = 1000
output_cap_uf = 100

[calibration]
input_scale_override = 51455

[[phases]]
samples = 1000
input_power = 8000
"#,
    );

    let config = SimConfig::load(file.path()).unwrap();
    let mut model =
        CapacitorModel::init(&config.capacitor, &config.calibration, Recorder::default()).unwrap();
    assert_eq!(model.input_scale(), 51_455);

    let start = model.cap_voltage();
    let summary = run_scenario(&mut model, &config.phases);
    assert_eq!(summary.updates, 1000);
    assert!(summary.final_voltage > start);
    assert_eq!(summary.transition_count(), 0);
}

#[test]
fn invalid_settings_rejected_at_load() {
    let file = write_config(
        r#"
[shared]
service_name = "bad"

[capacitor]
capacitance_uf = 100
output_cap_uf = 100

[[phases]]
samples = 1
"#,
    );

    let err = SimConfig::load(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Settings(SettingsError::CapacitanceOrder { .. })
    ));
}
