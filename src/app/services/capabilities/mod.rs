//! Optional runtime capabilities consumed by individual QC tests
//!
//! A test that needs a capability which is not configured is skipped by the
//! engine instead of failing the run.

pub mod climatology;
pub mod equation_of_state;

pub use climatology::{ClimatologyProvider, ClimatologyRequest, ReferenceProfile, StaticClimatology};
#[cfg(feature = "eos80")]
pub use equation_of_state::Eos80;
pub use equation_of_state::{EquationOfState, default_equation_of_state};

use std::fmt;
use std::sync::Arc;

/// Capabilities available to the tests of one engine
#[derive(Clone, Default)]
pub struct Capabilities {
    pub equation_of_state: Option<Arc<dyn EquationOfState>>,
    pub climatology: Option<Arc<dyn ClimatologyProvider>>,
}

impl Capabilities {
    /// Capabilities available in this build without further setup
    pub fn detect() -> Self {
        Self {
            equation_of_state: default_equation_of_state(),
            climatology: None,
        }
    }

    /// No capabilities at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_equation_of_state(mut self, eos: Arc<dyn EquationOfState>) -> Self {
        self.equation_of_state = Some(eos);
        self
    }

    pub fn without_equation_of_state(mut self) -> Self {
        self.equation_of_state = None;
        self
    }

    pub fn with_climatology(mut self, provider: Arc<dyn ClimatologyProvider>) -> Self {
        self.climatology = Some(provider);
        self
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field(
                "equation_of_state",
                &self.equation_of_state.as_ref().map(|eos| eos.name().to_string()),
            )
            .field("climatology", &self.climatology.is_some())
            .finish()
    }
}

#[cfg(all(test, feature = "eos80"))]
mod tests {
    use super::equation_of_state::eos80;
    use super::*;

    #[test]
    fn test_adiabatic_lapse_rate_check_value() {
        // UNESCO 1983 check value: S=40, T=40 °C (IPTS-68), P=10000 dbar
        let atg = eos80::adiabatic_lapse_rate(40.0, 40.0, 10000.0);
        assert!((atg - 3.255976e-4).abs() < 1e-9, "atg = {atg}");
    }

    #[test]
    fn test_potential_temperature_check_value() {
        let theta = eos80::potential_temperature(40.0, 40.0, 10000.0, 0.0);
        assert!((theta - 36.89073).abs() < 1e-3, "theta = {theta}");
    }

    #[test]
    fn test_potential_temperature_at_reference_pressure_is_identity() {
        let theta = eos80::potential_temperature(35.0, 10.0, 0.0, 0.0);
        assert!((theta - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_surface_density_check_values() {
        // Pure water at 5 °C and standard seawater at 5 °C
        assert!((eos80::density_surface(0.0, 5.0) - 999.96675).abs() < 1e-4);
        assert!((eos80::density_surface(35.0, 5.0) - 1027.67547).abs() < 1e-4);
    }

    #[test]
    fn test_density_increases_with_pressure() {
        let surface = eos80::density(35.0, 5.0, 0.0);
        let deep = eos80::density(35.0, 5.0, 5000.0);
        assert!(deep > surface + 20.0);
    }

    #[test]
    fn test_potential_density_is_close_to_surface_density_near_surface() {
        let eos = Eos80;
        let rho = eos.potential_density(35.0, 5.0, 10.0, 0.0);
        assert!((rho - 1027.67).abs() < 0.05, "rho = {rho}");
    }

    #[test]
    fn test_negative_salinity_is_outside_domain() {
        let eos = Eos80;
        assert!(!eos.potential_density(-1.0, 5.0, 10.0, 0.0).is_finite());
    }

    #[test]
    fn test_detect_uses_builtin_equation_of_state() {
        let capabilities = Capabilities::detect();
        assert_eq!(
            capabilities.equation_of_state.as_ref().map(|e| e.name()),
            Some("eos80")
        );
        assert!(capabilities.climatology.is_none());
        assert!(Capabilities::none().equation_of_state.is_none());
    }
}
