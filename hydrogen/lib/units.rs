#![allow(non_upper_case_globals)]

//! Physical constants and conversions out of atomic units.
//!
//! Everything else in this crate works in Hartree atomic units (ħ = mₑ = e =
//! 4πε₀ = 1). Concrete physical constants are taken from NIST (CODATA 2018).

use std::{ fmt, f64::consts::PI };
use serde::{ Deserialize, Serialize };

/// Planck constant (kg m^2 s^-1)
pub const h: f64 = 6.62607015e-34;
//             +/- 0 (exact)

/// reduced Planck constant (kg m^2 s^-1)
pub const hbar: f64 = h / 2.0 / PI;
//                +/- 0 (exact)

/// speed of light in vacuum (m s^-1)
pub const c: f64 = 2.99792458e8;
//             +/- 0 (exact)

/// elementary charge (C)
pub const e: f64 = 1.602176634e-19;
//             +/- 0 (exact)

/// electron mass (kg)
pub const me: f64 = 9.1093837015e-31;
//              +/- 0.0000000028e-31

/// Rydberg constant for an infinite-mass nucleus (m^-1)
pub const Rinf: f64 = 10973731.568160;
//                       +/- 0.000021

/// fine structure constant
pub const alpha: f64 = 7.2973525693e-3;
//                 +/- 0.0000000011e-3

/// Bohr radius (m)
pub const a0: f64 = 5.29177210903e-11;
//              +/- 0.00000000080e-11

/// Hartree energy (J) = 2\*Rinf\*h\*c
pub const Eh: f64 = 4.3597447222071e-18;
//              +/- 0.0000000000085e-18

/// Hartree energy (eV)
pub const Eh_eV: f64 = Eh / e;

/// Convert an energy in Hartree to electronvolts.
pub fn hartree_to_ev(energy: f64) -> f64 { energy * Eh_eV }

/// Convert an energy in Hartree to joules.
pub fn hartree_to_joule(energy: f64) -> f64 { energy * Eh }

/// Convert an energy in Hartree to a wavenumber in cm^-1.
pub fn hartree_to_wavenumber(energy: f64) -> f64 { energy * Eh / (h * c) / 100.0 }

/// Convert a length in Bohr radii to meters.
pub fn bohr_to_meter(length: f64) -> f64 { length * a0 }

/// Unit in which to report energies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyUnit {
    #[default]
    Hartree,
    ElectronVolt,
    Joule,
    Wavenumber,
}

impl EnergyUnit {
    /// Convert an energy given in Hartree to `self`.
    pub fn from_hartree(self, energy: f64) -> f64 {
        match self {
            Self::Hartree => energy,
            Self::ElectronVolt => hartree_to_ev(energy),
            Self::Joule => hartree_to_joule(energy),
            Self::Wavenumber => hartree_to_wavenumber(energy),
        }
    }

    /// Short symbol for the unit.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Hartree => "Ha",
            Self::ElectronVolt => "eV",
            Self::Joule => "J",
            Self::Wavenumber => "cm^-1",
        }
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for EnergyUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ha" | "hartree" => Ok(Self::Hartree),
            "ev" | "electronvolt" => Ok(Self::ElectronVolt),
            "j" | "joule" => Ok(Self::Joule),
            "cm-1" | "cm^-1" | "wavenumber" => Ok(Self::Wavenumber),
            other => Err(format!("unknown energy unit '{other}'")),
        }
    }
}
