//! Thermal profile configurations.
//!
//! Provides the built-in profile table and conversion from serializable
//! profile definitions into parsed, ready-to-apply profiles.

use serde::{Deserialize, Serialize};

use crate::cooling::FanCurve;
use crate::error::Result;
use crate::protocol::ThrottlePlan;

// =============================================================================
// Power Plans
// =============================================================================

/// Windows "Power saver" plan label.
pub const POWER_PLAN_SAVER: &str = "Power saver";

/// Windows "High performance" plan label.
pub const POWER_PLAN_HIGH_PERFORMANCE: &str = "High performance";

// =============================================================================
// Profile Definitions
// =============================================================================

/// Profile as written in configuration, curves kept as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub name: String,
    pub windows_power_plan: String,
    pub throttle_plan: ThrottlePlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_fan_curve: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_fan_curve: Option<String>,
}

impl ProfileSpec {
    fn new(
        name: &str,
        windows_power_plan: &str,
        throttle_plan: ThrottlePlan,
        cpu_fan_curve: Option<&str>,
        gpu_fan_curve: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            windows_power_plan: windows_power_plan.into(),
            throttle_plan,
            cpu_fan_curve: cpu_fan_curve.map(String::from),
            gpu_fan_curve: gpu_fan_curve.map(String::from),
        }
    }
}

/// Built-in profiles, in cycling order.
pub fn default_profile_specs() -> Vec<ProfileSpec> {
    vec![
        ProfileSpec::new(
            "Fanless",
            POWER_PLAN_SAVER,
            ThrottlePlan::Silent,
            Some("39c:0%,49c:0%,59c:0%,69c:0%,79c:31%,89c:49%,99c:56%,109c:56%"),
            Some("39c:0%,49c:0%,59c:0%,69c:0%,79c:34%,89c:51%,99c:61%,109c:61%"),
        ),
        ProfileSpec::new(
            "Silent",
            POWER_PLAN_SAVER,
            ThrottlePlan::Silent,
            Some("39c:10%,49c:10%,59c:10%,69c:10%,79c:31%,89c:49%,99c:56%,109c:56%"),
            Some("39c:0%,49c:0%,59c:0%,69c:0%,79c:34%,89c:51%,99c:61%,109c:61%"),
        ),
        ProfileSpec::new(
            "Performance",
            POWER_PLAN_HIGH_PERFORMANCE,
            ThrottlePlan::Performance,
            None,
            None,
        ),
        ProfileSpec::new(
            "Turbo",
            POWER_PLAN_HIGH_PERFORMANCE,
            ThrottlePlan::Turbo,
            None,
            None,
        ),
    ]
}

// =============================================================================
// Thermal Profile
// =============================================================================

/// A named bundle of throttle plan, fan curves and OS power plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThermalProfile {
    pub name: String,
    pub windows_power_plan: String,
    pub throttle_plan: ThrottlePlan,
    pub cpu_fan_curve: Option<FanCurve>,
    pub gpu_fan_curve: Option<FanCurve>,
}

impl ThermalProfile {
    /// Whether applying this profile programs any fan.
    pub fn has_fan_curves(&self) -> bool {
        self.cpu_fan_curve.is_some() || self.gpu_fan_curve.is_some()
    }
}

impl TryFrom<&ProfileSpec> for ThermalProfile {
    type Error = crate::error::ThermalError;

    fn try_from(spec: &ProfileSpec) -> Result<Self> {
        let parse = |curve: &Option<String>| curve.as_deref().map(FanCurve::parse).transpose();

        Ok(Self {
            name: spec.name.clone(),
            windows_power_plan: spec.windows_power_plan.clone(),
            throttle_plan: spec.throttle_plan,
            cpu_fan_curve: parse(&spec.cpu_fan_curve)?,
            gpu_fan_curve: parse(&spec.gpu_fan_curve)?,
        })
    }
}

/// Parse a list of profile definitions, failing on the first bad curve.
pub fn build_profiles(specs: &[ProfileSpec]) -> Result<Vec<ThermalProfile>> {
    specs.iter().map(ThermalProfile::try_from).collect()
}

/// Parse the built-in profile table.
pub fn default_profiles() -> Result<Vec<ThermalProfile>> {
    build_profiles(&default_profile_specs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_order() {
        let names: Vec<_> = default_profiles()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Fanless", "Silent", "Performance", "Turbo"]);
    }

    #[test]
    fn test_default_curves() {
        let profiles = default_profiles().unwrap();
        assert!(profiles[0].has_fan_curves());
        assert!(profiles[1].has_fan_curves());
        assert!(!profiles[2].has_fan_curves());
        assert!(!profiles[3].has_fan_curves());
    }

    #[test]
    fn test_gpu_curve_parsed_from_its_own_string() {
        let fanless = &default_profiles().unwrap()[0];
        let cpu = fanless.cpu_fan_curve.as_ref().unwrap();
        let gpu = fanless.gpu_fan_curve.as_ref().unwrap();
        assert_ne!(cpu, gpu);
        assert_eq!(gpu.points()[4].percent, 34);
    }

    #[test]
    fn test_bad_curve_fails_build() {
        let mut specs = default_profile_specs();
        specs[1].gpu_fan_curve = Some("39c:0".into());
        let err = build_profiles(&specs).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_spec_json_omits_missing_curves() {
        let specs = default_profile_specs();
        let json = serde_json::to_string(&specs[3]).unwrap();
        assert!(!json.contains("fan_curve"));
        assert!(json.contains("\"throttle_plan\":\"turbo\""));
    }
}
