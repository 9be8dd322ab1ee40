//! Seawater equation of state
//!
//! The density inversion test needs potential density. The computation is an
//! injected capability so callers can plug in TEOS-10 or any other
//! implementation, and so the engine can run without one.

/// Seawater density computation
pub trait EquationOfState: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &str;

    /// Potential density (kg/m³) referenced to `reference_pressure`
    ///
    /// Salinity in PSU, in-situ temperature in °C (ITS-90), pressures in dbar.
    /// Returns a non-finite value when the inputs are outside the domain of
    /// the equation.
    fn potential_density(
        &self,
        salinity: f64,
        temperature: f64,
        pressure: f64,
        reference_pressure: f64,
    ) -> f64;
}

/// UNESCO EOS-80 (Fofonoff & Millard, 1983)
///
/// Potential temperature is integrated with the Runge-Kutta scheme of the
/// UNESCO technical paper 44 on Bryden's adiabatic lapse rate, then density is
/// evaluated at the reference pressure with the 1981 international equation
/// of state.
#[cfg(feature = "eos80")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Eos80;

#[cfg(feature = "eos80")]
impl EquationOfState for Eos80 {
    fn name(&self) -> &str {
        "eos80"
    }

    fn potential_density(
        &self,
        salinity: f64,
        temperature: f64,
        pressure: f64,
        reference_pressure: f64,
    ) -> f64 {
        let t68 = eos80::t68(temperature);
        let theta68 = eos80::potential_temperature(salinity, t68, pressure, reference_pressure);
        eos80::density(salinity, theta68, reference_pressure)
    }
}

/// The equation of state compiled into this build, if any
pub fn default_equation_of_state() -> Option<std::sync::Arc<dyn EquationOfState>> {
    #[cfg(feature = "eos80")]
    {
        Some(std::sync::Arc::new(Eos80))
    }

    #[cfg(not(feature = "eos80"))]
    {
        None
    }
}

#[cfg(feature = "eos80")]
pub(crate) mod eos80 {
    //! EOS-80 formulas. Temperatures are IPTS-68, pressures dbar.

    /// ITS-90 to IPTS-68
    pub fn t68(t90: f64) -> f64 {
        t90 * 1.00024
    }

    /// Adiabatic lapse rate (°C/dbar), Bryden 1973
    pub fn adiabatic_lapse_rate(s: f64, t: f64, p: f64) -> f64 {
        let ds = s - 35.0;
        (((-2.1687e-16 * t + 1.8676e-14) * t - 4.6206e-13) * p
            + ((2.7759e-12 * t - 1.1351e-10) * ds
                + ((-5.4481e-14 * t + 8.733e-12) * t - 6.7795e-10) * t
                + 1.8741e-8))
            * p
            + (-4.2393e-8 * t + 1.8932e-6) * ds
            + ((6.6228e-10 * t - 6.836e-8) * t + 8.5258e-6) * t
            + 3.5803e-5
    }

    /// Potential temperature at `pr` of a parcel at (s, t, p)
    pub fn potential_temperature(s: f64, t: f64, p: f64, pr: f64) -> f64 {
        let h = pr - p;
        let mut t = t;
        let mut p = p;

        let mut xk = h * adiabatic_lapse_rate(s, t, p);
        t += 0.5 * xk;
        let mut q = xk;
        p += 0.5 * h;

        xk = h * adiabatic_lapse_rate(s, t, p);
        t += 0.292_893_22 * (xk - q);
        q = 0.585_786_44 * xk + 0.121_320_344 * q;

        xk = h * adiabatic_lapse_rate(s, t, p);
        t += 1.707_106_781 * (xk - q);
        q = 3.414_213_562 * xk - 4.121_320_344 * q;
        p += 0.5 * h;

        xk = h * adiabatic_lapse_rate(s, t, p);
        t + (xk - 2.0 * q) / 6.0
    }

    /// Density at one standard atmosphere
    pub fn density_surface(s: f64, t: f64) -> f64 {
        let rho_w = 999.842594
            + t * (6.793952e-2
                + t * (-9.095290e-3 + t * (1.001685e-4 + t * (-1.120083e-6 + t * 6.536332e-9))));

        let a = 8.24493e-1
            + t * (-4.0899e-3 + t * (7.6438e-5 + t * (-8.2467e-7 + t * 5.3875e-9)));
        let b = -5.72466e-3 + t * (1.0227e-4 - t * 1.6546e-6);
        let c = 4.8314e-4;

        rho_w + a * s + b * s * s.sqrt() + c * s * s
    }

    /// Secant bulk modulus (bar)
    pub fn secant_bulk_modulus(s: f64, t: f64, p: f64) -> f64 {
        let p = p / 10.0;
        let s15 = s * s.sqrt();

        let kw = 19652.21 + t * (148.4206 + t * (-2.327105 + t * (1.360477e-2 - t * 5.155288e-5)));
        let k0 = kw
            + s * (54.6746 + t * (-0.603459 + t * (1.09987e-2 - t * 6.1670e-5)))
            + s15 * (7.944e-2 + t * (1.6483e-2 - t * 5.3009e-4));

        let aw = 3.239908 + t * (1.43713e-3 + t * (1.16092e-4 - t * 5.77905e-7));
        let a = aw + s * (2.2838e-3 + t * (-1.0981e-5 - t * 1.6078e-6)) + 1.91075e-4 * s15;

        let bw = 8.50935e-5 + t * (-6.12293e-6 + t * 5.2787e-8);
        let b = bw + s * (-9.9348e-7 + t * (2.0816e-8 + t * 9.1697e-10));

        k0 + p * (a + p * b)
    }

    /// In-situ density at pressure `p`
    pub fn density(s: f64, t: f64, p: f64) -> f64 {
        let rho0 = density_surface(s, t);
        if p == 0.0 {
            return rho0;
        }
        rho0 / (1.0 - (p / 10.0) / secant_bulk_modulus(s, t, p))
    }
}
