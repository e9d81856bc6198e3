use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::error::{CatalogError, CatalogResult};

/// Gravitational constant (m³ kg⁻¹ s⁻²)
pub const G: f64 = 6.67430e-11;

/// The concrete shape of a catalog entry. `Display` yields the record tag.
#[derive(
    strum_macros::Display, Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum BodyKind {
    Star,
    Planet,
    Galaxy,
}

impl BodyKind {
    /// Fixed lookup order used by cross-variant searches.
    pub const ALL: [BodyKind; 3] = [BodyKind::Star, BodyKind::Planet, BodyKind::Galaxy];

    /// Parses a record tag. Tags are case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Star" => Some(BodyKind::Star),
            "Planet" => Some(BodyKind::Planet),
            "Galaxy" => Some(BodyKind::Galaxy),
            _ => None,
        }
    }

    /// Number of fields following the tag in a serialized record.
    pub fn record_arity(&self) -> usize {
        match self {
            BodyKind::Star => 8,
            BodyKind::Planet => 9,
            BodyKind::Galaxy => 8,
        }
    }
}

/// Fields shared by every celestial body.
///
/// Construction validates everything at once; there is no way to obtain a
/// `BodyCore` that breaks these rules:
/// * name and type are non-blank
/// * distance from Earth (light-years) and temperature (K) are finite and ≥ 0
/// * mass (kg) is finite and > 0
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyCore {
    name: String,
    distance_from_earth: f64,
    mass: f64,
    temperature: f64,
    #[serde(rename = "type")]
    body_type: String,
}

impl BodyCore {
    pub fn new(
        name: impl Into<String>,
        distance_from_earth: f64,
        mass: f64,
        temperature: f64,
        body_type: impl Into<String>,
    ) -> CatalogResult<Self> {
        let name = name.into();
        let body_type = body_type.into();
        require_text("name", &name)?;
        require_non_negative("distance from Earth", distance_from_earth)?;
        require_positive("mass", mass)?;
        require_non_negative("temperature", temperature)?;
        require_text("type", &body_type)?;

        Ok(Self {
            name,
            distance_from_earth,
            mass,
            temperature,
            body_type,
        })
    }

    /// Rebuilds this record through the validating constructor.
    pub fn revalidated(&self) -> CatalogResult<Self> {
        Self::new(
            self.name.clone(),
            self.distance_from_earth,
            self.mass,
            self.temperature,
            self.body_type.clone(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn distance_from_earth(&self) -> f64 {
        self.distance_from_earth
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn body_type(&self) -> &str {
        &self.body_type
    }

    /// Natural order: case-insensitive lexicographic on name.
    pub fn cmp_name(&self, other: &BodyCore) -> Ordering {
        cmp_ignore_case(&self.name, &other.name)
    }

    pub fn name_matches(&self, name: &str) -> bool {
        eq_ignore_case(&self.name, name)
    }
}

impl fmt::Display for BodyCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Type: {}", self.body_type)?;
        writeln!(
            f,
            "Distance from Earth: {} light years",
            format_distance(self.distance_from_earth)
        )?;
        writeln!(f, "Mass: {} kg", scientific(self.mass, 2))?;
        write!(f, "Temperature: {:.1} K", self.temperature)
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::validation(field, "cannot be empty"));
    }
    if value.chars().any(char::is_control) {
        return Err(CatalogError::validation(
            field,
            "cannot contain line breaks or control characters",
        ));
    }
    Ok(())
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> CatalogResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CatalogError::validation(
            field,
            format!("must be a positive number, got {}", value),
        ));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> CatalogResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CatalogError::validation(
            field,
            format!("cannot be negative, got {}", value),
        ));
    }
    Ok(())
}

pub(crate) fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    cmp_ignore_case(a, b) == Ordering::Equal
}

/// Scientific notation with a signed, at least two-digit exponent: `1.989e+30`.
pub(crate) fn scientific(value: f64, precision: usize) -> String {
    let formatted = format!("{:.*e}", precision, value);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    match exponent.parse::<i32>() {
        Ok(exponent) => {
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        Err(_) => formatted,
    }
}

/// Two decimals, switching to scientific notation below 0.01 so nearby
/// objects do not read as zero.
fn format_distance(light_years: f64) -> String {
    if light_years > 0.0 && light_years < 0.01 {
        scientific(light_years, 2)
    } else {
        format!("{:.2}", light_years)
    }
}

/// `250000000000` → `250,000,000,000`
pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
