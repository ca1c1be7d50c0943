//! Unit normalization for upstream quantities
//!
//! api.weather.gov tags every quantity with a WMO unit code. Stored records
//! use degrees Celsius, km/h and millimetres.

/// Unit conversion error
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    #[error("Unknown unit code: {0}")]
    UnknownUnit(String),

    #[error("Unit {unit} is not a {group:?} unit")]
    WrongGroup { unit: String, group: UnitGroup },
}

/// Unit group for an observed quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitGroup {
    Temperature,
    Speed,
    Precipitation,
}

/// Units a quantity may be reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Celsius,
    Fahrenheit,
    Kelvin,
    KilometresPerHour,
    MetresPerSecond,
    Millimetres,
    Metres,
}

impl Unit {
    /// Parse a WMO unit code such as `wmoUnit:degC`
    pub fn from_code(code: &str) -> Result<Unit, UnitError> {
        let bare = code.rsplit(':').next().unwrap_or(code);
        match bare {
            "degC" => Ok(Unit::Celsius),
            "degF" => Ok(Unit::Fahrenheit),
            "K" => Ok(Unit::Kelvin),
            "km_h-1" => Ok(Unit::KilometresPerHour),
            "m_s-1" => Ok(Unit::MetresPerSecond),
            "mm" => Ok(Unit::Millimetres),
            "m" => Ok(Unit::Metres),
            _ => Err(UnitError::UnknownUnit(code.to_string())),
        }
    }

    pub fn group(self) -> UnitGroup {
        match self {
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => UnitGroup::Temperature,
            Unit::KilometresPerHour | Unit::MetresPerSecond => UnitGroup::Speed,
            Unit::Millimetres | Unit::Metres => UnitGroup::Precipitation,
        }
    }
}

/// Convert `value` reported in `unit_code` to the canonical unit of `group`.
///
/// A missing unit code means the value is already canonical.
pub fn to_canonical(
    value: f64,
    unit_code: Option<&str>,
    group: UnitGroup,
) -> Result<f64, UnitError> {
    let Some(code) = unit_code else {
        return Ok(value);
    };
    let unit = Unit::from_code(code)?;
    if unit.group() != group {
        return Err(UnitError::WrongGroup {
            unit: code.to_string(),
            group,
        });
    }

    Ok(match unit {
        Unit::Celsius | Unit::KilometresPerHour | Unit::Millimetres => value,
        Unit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        Unit::Kelvin => value - 273.15,
        Unit::MetresPerSecond => value * 3.6,
        Unit::Metres => value * 1000.0,
    })
}
