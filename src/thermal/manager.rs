//! Thermal profile manager.
//!
//! Owns the control channel, the power plan switcher and the profile list,
//! and cycles through profiles one transition at a time.

use crate::config::{ThermalProfile, default_profiles};
use crate::cooling::{CURVE_PAYLOAD_LENGTH, FanCurve};
use crate::device::{ControlChannel, PowerPlanSwitcher};
use crate::error::{Result, ThermalError};
use crate::protocol::{FanDevice, ThrottlePlan, build_fan_curve_cmd, build_throttle_cmd};

// =============================================================================
// ThermalManager
// =============================================================================

/// Cycles the laptop through a fixed list of thermal profiles.
///
/// Applying a profile always writes in this order, each step gated on the
/// previous one: throttle plan, CPU fan curve, GPU fan curve, OS power plan.
/// The firmware reads fan curves relative to the active throttle plan, so
/// the throttle plan has to go first.
///
/// Not reentrant. Callers sharing a manager across threads must serialize
/// access themselves (e.g. behind a `Mutex`).
///
/// # Example
///
/// ```no_run
/// # use rog_thermal::device::{ControlChannel, PowerPlanSwitcher};
/// # use rog_thermal::thermal::ThermalManager;
/// # fn demo(channel: impl ControlChannel, power: impl PowerPlanSwitcher) -> rog_thermal::Result<()> {
/// let mut thermal = ThermalManager::with_default_profiles(channel, power)?;
/// let name = thermal.next_profile()?;
/// println!("Switched to {}", name);
/// # Ok(())
/// # }
/// ```
pub struct ThermalManager<C, P> {
    channel: C,
    power_plans: P,
    profiles: Vec<ThermalProfile>,
    current: Option<usize>,
}

impl<C: ControlChannel, P: PowerPlanSwitcher> ThermalManager<C, P> {
    /// Create a manager over `profiles`. No profile is applied yet.
    ///
    /// # Errors
    /// Returns `NoProfiles` if `profiles` is empty.
    pub fn new(channel: C, power_plans: P, profiles: Vec<ThermalProfile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(ThermalError::NoProfiles);
        }

        Ok(Self {
            channel,
            power_plans,
            profiles,
            current: None,
        })
    }

    /// Create a manager with the built-in profiles (Fanless, Silent,
    /// Performance, Turbo).
    ///
    /// # Errors
    /// Returns a parse error if a built-in curve is malformed.
    pub fn with_default_profiles(channel: C, power_plans: P) -> Result<Self> {
        Self::new(channel, power_plans, default_profiles()?)
    }

    /// Profiles in cycling order.
    pub fn profiles(&self) -> &[ThermalProfile] {
        &self.profiles
    }

    /// Index of the active profile, `None` until the first transition succeeds.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_profile(&self) -> Option<&ThermalProfile> {
        self.current.map(|i| &self.profiles[i])
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn power_plans(&self) -> &P {
        &self.power_plans
    }

    /// Apply the next profile and return its name.
    ///
    /// Wraps around after the last profile. On any failure the error is
    /// returned and the active index is left unchanged. Hardware writes that
    /// already went through are not rolled back.
    pub fn next_profile(&mut self) -> Result<&str> {
        let next = self.current.map_or(0, |i| (i + 1) % self.profiles.len());

        let profile = &self.profiles[next];
        let throttle_plan = profile.throttle_plan;
        let cpu_table = profile.cpu_fan_curve.as_ref().map(FanCurve::to_bytes);
        let gpu_table = profile.gpu_fan_curve.as_ref().map(FanCurve::to_bytes);
        let power_plan = profile.windows_power_plan.clone();

        log::debug!("applying profile '{}' (index {})", profile.name, next);

        self.apply_throttle_plan(throttle_plan)?;
        log::info!("thermal throttle plan set");

        self.write_fan_table(FanDevice::Cpu, cpu_table.as_ref())?;
        self.write_fan_table(FanDevice::Gpu, gpu_table.as_ref())?;
        log::info!("fan profile set");

        self.power_plans.activate(&power_plan).map_err(|source| {
            log::warn!("power plan '{}' activation failed: {}", power_plan, source);
            ThermalError::PowerPlan {
                plan: power_plan.clone(),
                source,
            }
        })?;
        log::info!("windows power plan set");

        self.current = Some(next);
        let name = self.profiles[next].name.as_str();
        log::info!("thermal profile '{}' active", name);
        Ok(name)
    }

    /// Set the firmware throttle plan.
    pub fn apply_throttle_plan(&mut self, plan: ThrottlePlan) -> Result<()> {
        self.write(&build_throttle_cmd(plan))
    }

    /// Load a fan curve into one fan.
    pub fn apply_fan_curve(&mut self, device: FanDevice, curve: &FanCurve) -> Result<()> {
        self.write_fan_table(device, Some(&curve.to_bytes()))
    }

    fn write_fan_table(
        &mut self,
        device: FanDevice,
        table: Option<&[u8; CURVE_PAYLOAD_LENGTH]>,
    ) -> Result<()> {
        match table {
            Some(table) => self.write(&build_fan_curve_cmd(device, table)),
            None => {
                log::debug!("no {} fan curve, skipping", device);
                Ok(())
            }
        }
    }

    /// Send one buffer; the response content is ignored.
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        log::trace!("control write {:02X?}", buf);
        let control_code = self.channel.control_code();

        self.channel
            .write(buf)
            .map(|_| ())
            .map_err(|source| {
                log::warn!("control write failed: {}", source);
                ThermalError::ChannelWrite {
                    control_code,
                    source,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CONTROL_CODE, FAN_CURVE_COMMAND_LENGTH, THROTTLE_COMMAND_LENGTH};
    use std::io;

    /// Records every write; fails the write with index `fail_at`.
    #[derive(Default)]
    struct RecordingChannel {
        writes: Vec<Vec<u8>>,
        fail_at: Option<usize>,
    }

    impl ControlChannel for RecordingChannel {
        fn control_code(&self) -> u32 {
            CONTROL_CODE
        }

        fn write(&mut self, input: &[u8]) -> io::Result<Vec<u8>> {
            let index = self.writes.len();
            self.writes.push(input.to_vec());
            if self.fail_at == Some(index) {
                return Err(io::Error::other("device busy"));
            }
            Ok(vec![0x01])
        }
    }

    #[derive(Default)]
    struct RecordingPower {
        activated: Vec<String>,
        fail: bool,
    }

    impl PowerPlanSwitcher for RecordingPower {
        fn activate(&mut self, plan: &str) -> io::Result<()> {
            self.activated.push(plan.to_string());
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such plan"));
            }
            Ok(())
        }
    }

    fn profile(name: &str, cpu: Option<&str>, gpu: Option<&str>) -> ThermalProfile {
        ThermalProfile {
            name: name.into(),
            windows_power_plan: format!("{name} plan"),
            throttle_plan: ThrottlePlan::Performance,
            cpu_fan_curve: cpu.map(|c| FanCurve::parse(c).unwrap()),
            gpu_fan_curve: gpu.map(|c| FanCurve::parse(c).unwrap()),
        }
    }

    fn abc() -> Vec<ThermalProfile> {
        vec![
            profile("A", None, None),
            profile("B", None, None),
            profile("C", None, None),
        ]
    }

    fn manager(
        profiles: Vec<ThermalProfile>,
    ) -> ThermalManager<RecordingChannel, RecordingPower> {
        ThermalManager::new(
            RecordingChannel::default(),
            RecordingPower::default(),
            profiles,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_profiles_rejected() {
        let result = ThermalManager::new(
            RecordingChannel::default(),
            RecordingPower::default(),
            Vec::new(),
        );
        assert!(matches!(result, Err(ThermalError::NoProfiles)));
    }

    #[test]
    fn test_cycles_and_wraps() {
        let mut thermal = manager(abc());
        assert_eq!(thermal.current_index(), None);

        assert_eq!(thermal.next_profile().unwrap(), "A");
        assert_eq!(thermal.next_profile().unwrap(), "B");
        assert_eq!(thermal.next_profile().unwrap(), "C");
        assert_eq!(thermal.next_profile().unwrap(), "A");
        assert_eq!(thermal.current_index(), Some(0));
        assert_eq!(thermal.current_profile().unwrap().name, "A");

        assert_eq!(
            thermal.power_plans().activated,
            ["A plan", "B plan", "C plan", "A plan"]
        );
    }

    #[test]
    fn test_write_order() {
        let mut thermal = manager(vec![profile("A", Some("50c:10%"), Some("60c:20%"))]);
        thermal.next_profile().unwrap();

        let writes = &thermal.channel().writes;
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[0].len(), THROTTLE_COMMAND_LENGTH);
        assert_eq!(writes[0][12], ThrottlePlan::Performance.code());
        assert_eq!(writes[1].len(), FAN_CURVE_COMMAND_LENGTH);
        assert_eq!(writes[1][8], 0x24);
        assert_eq!(&writes[1][12..14], &[50, 10]);
        assert_eq!(writes[2][8], 0x25);
        assert_eq!(&writes[2][12..14], &[60, 20]);
        assert_eq!(thermal.power_plans().activated, ["A plan"]);
    }

    #[test]
    fn test_throttle_failure_aborts() {
        let mut thermal = manager(vec![profile("A", Some("50c:10%"), Some("60c:20%"))]);
        thermal.channel.fail_at = Some(0);

        let err = thermal.next_profile().unwrap_err();
        assert!(matches!(
            err,
            ThermalError::ChannelWrite {
                control_code: CONTROL_CODE,
                ..
            }
        ));
        assert_eq!(thermal.current_index(), None);
        assert_eq!(thermal.channel().writes.len(), 1);
        assert!(thermal.power_plans().activated.is_empty());
    }

    #[test]
    fn test_failure_keeps_previous_index() {
        let mut thermal = manager(abc());
        thermal.next_profile().unwrap();
        thermal.channel.fail_at = Some(1);

        assert!(thermal.next_profile().is_err());
        assert_eq!(thermal.current_index(), Some(0));

        thermal.channel.fail_at = None;
        assert_eq!(thermal.next_profile().unwrap(), "B");
    }

    #[test]
    fn test_cpu_fan_failure_skips_gpu_and_power() {
        let mut thermal = manager(vec![profile("A", Some("50c:10%"), Some("60c:20%"))]);
        thermal.channel.fail_at = Some(1);

        assert!(thermal.next_profile().is_err());
        assert_eq!(thermal.channel().writes.len(), 2);
        assert!(thermal.power_plans().activated.is_empty());
        assert_eq!(thermal.current_index(), None);
    }

    #[test]
    fn test_missing_gpu_curve_is_skipped() {
        let mut thermal = manager(vec![profile("A", Some("50c:10%"), None)]);
        thermal.next_profile().unwrap();

        let writes = &thermal.channel().writes;
        assert_eq!(writes.len(), 2);
        assert!(
            !writes
                .iter()
                .any(|w| w.len() == FAN_CURVE_COMMAND_LENGTH && w[8] == 0x25)
        );
    }

    #[test]
    fn test_power_plan_failure() {
        let mut thermal = manager(abc());
        thermal.power_plans.fail = true;

        let err = thermal.next_profile().unwrap_err();
        assert!(matches!(err, ThermalError::PowerPlan { ref plan, .. } if plan == "A plan"));
        // Hardware writes are not rolled back.
        assert_eq!(thermal.channel().writes.len(), 1);
        assert_eq!(thermal.current_index(), None);
    }

    #[test]
    fn test_apply_fan_curve_directly() {
        let mut thermal = manager(abc());
        let curve = FanCurve::parse("70c:50%").unwrap();
        thermal.apply_fan_curve(FanDevice::Gpu, &curve).unwrap();

        let writes = &thermal.channel().writes;
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0][8], 0x25);
        assert_eq!(&writes[0][12..], &curve.to_bytes());
        assert_eq!(thermal.current_index(), None);
    }

    #[test]
    fn test_default_profiles_end_to_end() {
        let mut thermal = ThermalManager::with_default_profiles(
            RecordingChannel::default(),
            RecordingPower::default(),
        )
        .unwrap();

        let names: Vec<String> = (0..5)
            .map(|_| thermal.next_profile().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            ["Fanless", "Silent", "Performance", "Turbo", "Fanless"]
        );

        // Fanless, Silent: throttle + two fans. Performance, Turbo: throttle only.
        assert_eq!(thermal.channel().writes.len(), 3 + 3 + 1 + 1 + 3);
        assert_eq!(
            thermal.power_plans().activated,
            [
                "Power saver",
                "Power saver",
                "High performance",
                "High performance",
                "Power saver"
            ]
        );
    }
}
