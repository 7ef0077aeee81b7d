//! Physical parameters of a fluxonium qubit and their TOML representation.

use std::{ f64::consts::PI, path::Path };
use crate::error::{ FluxoniumError, FluxResult };

/// Default external phase bias (half flux quantum).
pub const DEF_PHI_EXT: f64 = PI;

/// Default number of eigenstates in user-facing eigenbasis operators.
pub const DEF_NLEV: usize = 5;

/// Default size of the LC basis used for diagonalization.
pub const DEF_NLEV_LC: usize = 20;

/// Default energy unit label.
pub const DEF_UNITS: &str = "GHz";

/// Name of the optional table holding the parameters in a TOML document.
pub const TOML_TABLE: &str = "fluxonium";

/// Circuit parameters of a single fluxonium.
///
/// All energies are in the (informational) units given by `units`.
#[derive(Clone, Debug, PartialEq)]
pub struct FluxoniumParams {
    /// Inductive energy; must be positive.
    pub E_L: f64,
    /// Charging energy; must be positive.
    pub E_C: f64,
    /// Josephson energy; non-positive values are accepted with a warning.
    pub E_J: f64,
    /// External phase bias entering as `-E_J cos(φ - φ_ext)`.
    pub phi_ext: f64,
    /// Default number of eigenstates in eigenbasis operators.
    pub nlev: usize,
    /// Number of LC basis states kept before diagonalization.
    pub nlev_lc: usize,
    /// Unit label, used only for display.
    pub units: String,
}

impl FluxoniumParams {
    /// Create a new set of parameters with defaults for everything except the
    /// three energies.
    pub fn new(E_L: f64, E_C: f64, E_J: f64) -> Self {
        Self {
            E_L,
            E_C,
            E_J,
            phi_ext: DEF_PHI_EXT,
            nlev: DEF_NLEV,
            nlev_lc: DEF_NLEV_LC,
            units: DEF_UNITS.to_string(),
        }
    }

    pub fn with_phi_ext(mut self, phi_ext: f64) -> Self {
        self.phi_ext = phi_ext;
        self
    }

    pub fn with_nlev(mut self, nlev: usize) -> Self {
        self.nlev = nlev;
        self
    }

    pub fn with_nlev_lc(mut self, nlev_lc: usize) -> Self {
        self.nlev_lc = nlev_lc;
        self
    }

    pub fn with_units<S>(mut self, units: S) -> Self
    where S: Into<String>
    {
        self.units = units.into();
        self
    }

    /// Check every value against its allowed range.
    ///
    /// A non-positive (but finite) `E_J` is not an error; [`warn_E_J`] is
    /// called for it instead.
    pub fn validate(&self) -> FluxResult<()> {
        check_E_L(self.E_L)?;
        check_E_C(self.E_C)?;
        check_E_J(self.E_J)?;
        check_phi_ext(self.phi_ext)?;
        check_nlev_lc(self.nlev_lc)?;
        check_nlev(self.nlev)?;
        warn_E_J(self.E_J);
        Ok(())
    }

    /// Read parameters from a TOML document.
    ///
    /// Keys may appear at the top level or inside a `[fluxonium]` table.
    /// `E_L`, `E_C`, and `E_J` are required; the rest fall back to the
    /// defaults of [`Self::new`]. The result is [validated][Self::validate].
    pub fn from_toml_str(src: &str) -> FluxResult<Self> {
        let doc: toml::Table = src.parse()?;
        let table: &toml::Table
            = match doc.get(TOML_TABLE) {
                Some(toml::Value::Table(t)) => t,
                Some(_) => {
                    return Err(FluxoniumError::config(
                        format!("`{}` must be a table", TOML_TABLE)
                    ));
                },
                None => &doc,
            };
        let E_L = get_float(table, "E_L")?
            .ok_or_else(|| missing_key("E_L"))?;
        let E_C = get_float(table, "E_C")?
            .ok_or_else(|| missing_key("E_C"))?;
        let E_J = get_float(table, "E_J")?
            .ok_or_else(|| missing_key("E_J"))?;
        let mut params = Self::new(E_L, E_C, E_J);
        if let Some(phi_ext) = get_float(table, "phi_ext")? {
            params.phi_ext = phi_ext;
        }
        if let Some(nlev) = get_count(table, "nlev")? {
            params.nlev = nlev;
        }
        if let Some(nlev_lc) = get_count(table, "nlev_lc")? {
            params.nlev_lc = nlev_lc;
        }
        if let Some(units) = table.get("units") {
            params.units
                = units.as_str()
                .ok_or_else(|| wrong_type("units", "a string"))?
                .to_string();
        }
        params.validate()?;
        Ok(params)
    }

    /// Read parameters from a TOML file; see [`Self::from_toml_str`].
    pub fn from_toml_file<P>(path: P) -> FluxResult<Self>
    where P: AsRef<Path>
    {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }
}

pub(crate) fn check_E_L(E_L: f64) -> FluxResult<()> {
    if !(E_L.is_finite() && E_L > 0.0) {
        return Err(FluxoniumError::invalid_parameter(
            format!("inductive energy must be positive and finite, got {}", E_L)
        ));
    }
    Ok(())
}

pub(crate) fn check_E_C(E_C: f64) -> FluxResult<()> {
    if !(E_C.is_finite() && E_C > 0.0) {
        return Err(FluxoniumError::invalid_parameter(
            format!("charging energy must be positive and finite, got {}", E_C)
        ));
    }
    Ok(())
}

pub(crate) fn check_E_J(E_J: f64) -> FluxResult<()> {
    if !E_J.is_finite() {
        return Err(FluxoniumError::invalid_parameter(
            format!("Josephson energy must be finite, got {}", E_J)
        ));
    }
    Ok(())
}

pub(crate) fn check_phi_ext(phi_ext: f64) -> FluxResult<()> {
    if !phi_ext.is_finite() {
        return Err(FluxoniumError::invalid_parameter(
            format!("external phase must be finite, got {}", phi_ext)
        ));
    }
    Ok(())
}

pub(crate) fn check_nlev_lc(nlev_lc: usize) -> FluxResult<()> {
    if nlev_lc == 0 {
        return Err(FluxoniumError::invalid_parameter(
            "the number of LC levels must be positive"
        ));
    }
    Ok(())
}

pub(crate) fn check_nlev(nlev: usize) -> FluxResult<()> {
    if nlev == 0 {
        return Err(FluxoniumError::invalid_parameter(
            "the number of qubit levels must be positive"
        ));
    }
    Ok(())
}

/// Log a warning if the Josephson energy is not positive.
pub(crate) fn warn_E_J(E_J: f64) {
    if !(E_J > 0.0) {
        log::warn!("Josephson energy is not positive (E_J = {})", E_J);
    }
}

fn missing_key(key: &str) -> FluxoniumError {
    FluxoniumError::config(format!("missing required key `{}`", key))
}

fn wrong_type(key: &str, expected: &str) -> FluxoniumError {
    FluxoniumError::config(format!("`{}` must be {}", key, expected))
}

fn get_float(table: &toml::Table, key: &str) -> FluxResult<Option<f64>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::Float(f)) => Ok(Some(*f)),
        Some(toml::Value::Integer(i)) => Ok(Some(*i as f64)),
        Some(_) => Err(wrong_type(key, "a number")),
    }
}

fn get_count(table: &toml::Table, key: &str) -> FluxResult<Option<usize>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::Integer(i)) => {
            usize::try_from(*i)
                .map(Some)
                .map_err(|_| {
                    FluxoniumError::invalid_parameter(
                        format!("`{}` must be positive, got {}", key, i)
                    )
                })
        },
        Some(_) => Err(wrong_type(key, "an integer")),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let p = FluxoniumParams::new(1.0, 1.0, 2.0);
        assert_eq!(p.phi_ext, PI);
        assert_eq!(p.nlev, 5);
        assert_eq!(p.nlev_lc, 20);
        assert_eq!(p.units, "GHz");
        assert!(p.validate().is_ok());
    }

    #[test]
    fn validate_rejects_nonpositive() {
        let bad = [
            FluxoniumParams::new(0.0, 1.0, 1.0),
            FluxoniumParams::new(1.0, -1.0, 1.0),
            FluxoniumParams::new(f64::NAN, 1.0, 1.0),
            FluxoniumParams::new(f64::INFINITY, 1.0, 1.0),
            FluxoniumParams::new(1.0, f64::INFINITY, 1.0),
            FluxoniumParams::new(1.0, f64::NAN, 1.0),
            FluxoniumParams::new(1.0, 1.0, f64::NAN),
            FluxoniumParams::new(1.0, 1.0, f64::NEG_INFINITY),
            FluxoniumParams::new(1.0, 1.0, 1.0).with_phi_ext(f64::NAN),
            FluxoniumParams::new(1.0, 1.0, 1.0).with_phi_ext(f64::INFINITY),
            FluxoniumParams::new(1.0, 1.0, 1.0).with_nlev_lc(0),
            FluxoniumParams::new(1.0, 1.0, 1.0).with_nlev(0),
        ];
        for p in bad.iter() {
            assert!(
                matches!(p.validate(), Err(FluxoniumError::InvalidParameter(_))),
                "{:?} should be rejected", p,
            );
        }
        // only warns
        assert!(FluxoniumParams::new(1.0, 1.0, -3.0).validate().is_ok());
    }

    #[test]
    fn toml_top_level_and_table() {
        let top = "E_L = 0.5\nE_C = 1\nE_J = 4.0\nnlev_lc = 30\n";
        let p = FluxoniumParams::from_toml_str(top).unwrap();
        assert_eq!(p.E_L, 0.5);
        assert_eq!(p.E_C, 1.0);
        assert_eq!(p.nlev_lc, 30);
        assert_eq!(p.phi_ext, PI);

        let tab = "\
            [fluxonium]\n\
            E_L = 0.5\n\
            E_C = 1.0\n\
            E_J = 4.0\n\
            phi_ext = 0.0\n\
            nlev = 3\n\
            units = \"MHz\"\n\
        ";
        let p = FluxoniumParams::from_toml_str(tab).unwrap();
        assert_eq!(p.phi_ext, 0.0);
        assert_eq!(p.nlev, 3);
        assert_eq!(p.units, "MHz");
    }

    #[test]
    fn toml_errors() {
        assert!(matches!(
            FluxoniumParams::from_toml_str("E_L = 1.0\nE_C = 1.0"),
            Err(FluxoniumError::Config(_)),
        ));
        assert!(matches!(
            FluxoniumParams::from_toml_str("E_L = \"a\"\nE_C = 1.0\nE_J = 1.0"),
            Err(FluxoniumError::Config(_)),
        ));
        assert!(matches!(
            FluxoniumParams::from_toml_str(
                "E_L = 1.0\nE_C = 1.0\nE_J = 1.0\nnlev_lc = -4"),
            Err(FluxoniumError::InvalidParameter(_)),
        ));
        assert!(matches!(
            FluxoniumParams::from_toml_str("E_L = -1.0\nE_C = 1.0\nE_J = 1.0"),
            Err(FluxoniumError::InvalidParameter(_)),
        ));
        assert!(matches!(
            FluxoniumParams::from_toml_str("E_L = [1.0"),
            Err(FluxoniumError::Toml(_)),
        ));
        assert!(matches!(
            FluxoniumParams::from_toml_file("/nonexistent/fluxonium.toml"),
            Err(FluxoniumError::Io(_)),
        ));
    }
}
