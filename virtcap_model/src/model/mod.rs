//! Capacitor state model.
//!
//! Owns the converted settings and the working state (voltage, output state,
//! debounce counter). `update` integrates one sample period:
//!
//! 1. harvested current from input power, scaled by `1 / V_cap`, minus leakage
//! 2. load current (forced to zero while Off), scaled by `1 / V_cap`
//! 3. `V += (I_in − I_out) · dt / C`, clamped to `[min, max]`
//! 4. every `discretize` updates: hysteresis; on Off → On the output
//!    capacitor is connected and the voltage drops by `√((C − C_out) / C)`
//! 5. commit, then notify the [`OutputSwitch`] of a transition
//!
//! Execution time does not depend on the inputs. No allocation, no I/O.

pub mod charge;
pub mod hysteresis;
pub mod logic;
pub mod switch;

use tracing::{debug, info, warn};
use virtcap_common::capacitor::calibration::HardwareCalibration;
use virtcap_common::capacitor::error::{ArithmeticFault, SettingsError};
use virtcap_common::capacitor::settings::CapacitorSettings;

use crate::fixed::{LogicCurrent, LogicVoltage};
use hysteresis::{DebounceCounter, OutputState};
use logic::LogicSettings;
use switch::OutputSwitch;

/// Result of a single [`CapacitorModel::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// New output state if this update switched it.
    pub transition: Option<OutputState>,
    /// Stages that saturated during this update.
    pub faults: ArithmeticFault,
}

/// Virtual storage capacitor with hysteresis-controlled output.
#[derive(Debug)]
pub struct CapacitorModel<S> {
    settings: LogicSettings,
    cap_voltage: LogicVoltage,
    output: OutputState,
    debounce: DebounceCounter,
    faults: ArithmeticFault,
    switch: S,
}

impl<S: OutputSwitch> CapacitorModel<S> {
    /// Validate and convert `settings`, derive constants, seed the state.
    ///
    /// The model starts Off at `init_cap_voltage` with a cleared debounce
    /// counter. The switch is not called.
    ///
    /// # Errors
    ///
    /// [`SettingsError`] for any configuration that would make the update
    /// undefined (see [`CapacitorSettings::validate`]) or an unusable
    /// calibration.
    pub fn init(
        settings: &CapacitorSettings,
        calibration: &HardwareCalibration,
        switch: S,
    ) -> Result<Self, SettingsError> {
        let settings = LogicSettings::new(settings, calibration)?;

        debug!(
            input_scale = settings.input_scale,
            outputcap_scale_factor = settings.outputcap_scale_factor,
            discretize = settings.discretize,
            "capacitor model initialised"
        );
        if settings.upper_threshold >= settings.max_cap_voltage {
            warn!(
                upper_mv = settings.upper_threshold.to_millivolts(),
                max_mv = settings.max_cap_voltage.to_millivolts(),
                "upper threshold at or above the voltage clamp; output can never switch on"
            );
        }

        Ok(Self {
            cap_voltage: settings.init_cap_voltage,
            output: OutputState::Off,
            debounce: DebounceCounter::new(settings.discretize),
            faults: ArithmeticFault::empty(),
            settings,
            switch,
        })
    }

    /// Advance the model by one sample period.
    ///
    /// - `current_measured`: load current, logic units (ignored while Off)
    /// - `voltage_measured`: load voltage, same scale as `cap_voltage >> 13`
    /// - `input_power`: harvested power, measurement units
    /// - `efficiency`: input-path efficiency, Q13
    ///
    /// Calls the switch at most once, after the new state is committed.
    pub fn update(
        &mut self,
        current_measured: i32,
        voltage_measured: u32,
        input_power: u32,
        efficiency: u32,
    ) -> UpdateOutcome {
        let s = &self.settings;
        let cap = self.cap_voltage;
        let mut faults = ArithmeticFault::empty();

        let input = charge::input_current(s, cap, input_power, efficiency, &mut faults);

        // Load current is noise while nothing is connected.
        let current_measured = if self.output.is_on() {
            current_measured
        } else {
            0
        };
        let output =
            charge::output_current(s, cap, voltage_measured, current_measured, &mut faults);

        let mut next = charge::integrate(s, cap, input, output, &mut faults)
            .clamp(s.min_cap_voltage, s.max_cap_voltage);

        let mut transition = None;
        if self.debounce.tick() {
            transition = self
                .output
                .evaluate(next, s.lower_threshold, s.upper_threshold);
            if transition == Some(OutputState::On) {
                next = next
                    .redistribute(s.outputcap_scale_factor)
                    .clamp(s.min_cap_voltage, s.max_cap_voltage);
            }
        }

        self.cap_voltage = next;
        if let Some(state) = transition {
            self.output = state;
        }
        let new_faults = faults - self.faults;
        self.faults |= faults;

        if !new_faults.is_empty() {
            warn!(faults = ?new_faults, "fixed-point stage saturated");
        }
        if let Some(state) = transition {
            info!(
                state = ?state,
                cap_mv = next.to_millivolts(),
                "output switched"
            );
            self.switch.set_output(state.is_on());
        }

        UpdateOutcome { transition, faults }
    }

    /// Present capacitor voltage.
    #[inline]
    pub fn cap_voltage(&self) -> LogicVoltage {
        self.cap_voltage
    }

    #[inline]
    pub fn output_state(&self) -> OutputState {
        self.output
    }

    #[inline]
    pub fn is_outputting(&self) -> bool {
        self.output.is_on()
    }

    /// Updates since the last hysteresis evaluation.
    #[inline]
    pub fn discretize_counter(&self) -> u32 {
        self.debounce.count()
    }

    /// Converted settings and derived constants.
    #[inline]
    pub fn settings(&self) -> &LogicSettings {
        &self.settings
    }

    #[inline]
    pub fn input_scale(&self) -> u32 {
        self.settings.input_scale
    }

    #[inline]
    pub fn outputcap_scale_factor(&self) -> u32 {
        self.settings.outputcap_scale_factor
    }

    /// Leakage in effect, logic units.
    #[inline]
    pub fn leakage_current(&self) -> LogicCurrent {
        self.settings.leakage_current
    }

    /// Faults accumulated since init or the last [`Self::clear_faults`].
    #[inline]
    pub fn faults(&self) -> ArithmeticFault {
        self.faults
    }

    #[inline]
    pub fn clear_faults(&mut self) {
        self.faults = ArithmeticFault::empty();
    }

    #[inline]
    pub fn switch(&self) -> &S {
        &self.switch
    }

    #[inline]
    pub fn switch_mut(&mut self) -> &mut S {
        &mut self.switch
    }

    /// Consume the model and return the switch.
    #[inline]
    pub fn into_switch(self) -> S {
        self.switch
    }
}
