use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

use super::body::{group_thousands, require_positive, BodyCore, BodyKind, G};
use super::Body;
use crate::error::{CatalogError, CatalogResult, ComputationKind};

pub const LIGHT_YEAR_IN_METERS: f64 = 9.461e15;

/// Stars per cubic light-year, treating the galaxy as a sphere of the given
/// diameter.
pub fn star_density(number_of_stars: u64, diameter_ly: f64) -> CatalogResult<f64> {
    let radius = diameter_ly / 2.0;
    let volume = 4.0 / 3.0 * PI * radius.powi(3);
    if volume.is_nan() || volume <= 0.0 {
        return Err(CatalogError::computation(
            "star density",
            ComputationKind::ZeroVolume,
        ));
    }
    let density = number_of_stars as f64 / volume;
    if !density.is_finite() {
        return Err(CatalogError::computation(
            "star density",
            ComputationKind::NotFinite,
        ));
    }
    Ok(density)
}

/// Escape velocity at the edge in m/s, `sqrt(2 G M / r)`.
pub fn escape_velocity(mass_kg: f64, diameter_ly: f64) -> CatalogResult<f64> {
    let radius_m = diameter_ly * LIGHT_YEAR_IN_METERS / 2.0;
    if radius_m.is_nan() || radius_m <= 0.0 {
        return Err(CatalogError::computation(
            "escape velocity",
            ComputationKind::ZeroRadius,
        ));
    }
    let velocity = (2.0 * G * mass_kg / radius_m).sqrt();
    if !velocity.is_finite() {
        return Err(CatalogError::computation(
            "escape velocity",
            ComputationKind::NotFinite,
        ));
    }
    Ok(velocity)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Galaxy {
    #[serde(flatten)]
    core: BodyCore,
    number_of_stars: u64,
    /// Light-years
    diameter: f64,
    /// Billions of years
    age: f64,
}

impl Galaxy {
    pub fn new(
        core: BodyCore,
        number_of_stars: u64,
        diameter: f64,
        age: f64,
    ) -> CatalogResult<Self> {
        require_positive("diameter", diameter)?;
        require_positive("age", age)?;

        Ok(Self {
            core,
            number_of_stars,
            diameter,
            age,
        })
    }

    pub fn copy_from(source: Option<&Galaxy>) -> CatalogResult<Self> {
        let source = source.ok_or(CatalogError::MissingSource(BodyKind::Galaxy))?;
        Self::new(
            source.core.revalidated()?,
            source.number_of_stars,
            source.diameter,
            source.age,
        )
    }

    pub fn number_of_stars(&self) -> u64 {
        self.number_of_stars
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn star_density(&self) -> CatalogResult<f64> {
        star_density(self.number_of_stars, self.diameter)
    }

    pub fn escape_velocity(&self) -> CatalogResult<f64> {
        escape_velocity(self.core.mass(), self.diameter)
    }

    pub fn facts(&self) -> CatalogResult<GalaxyFacts> {
        Ok(GalaxyFacts {
            name: self.core.name().to_string(),
            star_density: self.star_density()?,
            escape_velocity: self.escape_velocity()?,
        })
    }
}

impl Body for Galaxy {
    const KIND: BodyKind = BodyKind::Galaxy;

    fn core(&self) -> &BodyCore {
        &self.core
    }

    fn facts_text(&self) -> CatalogResult<String> {
        Ok(self.facts()?.to_string())
    }
}

impl fmt::Display for Galaxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.core)?;
        writeln!(f, "Diameter: {:.2} light-years", self.diameter)?;
        writeln!(
            f,
            "Number of Stars: {}",
            group_thousands(self.number_of_stars)
        )?;
        write!(f, "Age: {:.2} billion years", self.age)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalaxyFacts {
    pub name: String,
    /// Stars per cubic light-year
    pub star_density: f64,
    /// m/s
    pub escape_velocity: f64,
}

impl fmt::Display for GalaxyFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MORE GALACTIC FACTS:")?;
        writeln!(f, "- {} is a fascinating galaxy!", self.name)?;
        writeln!(
            f,
            "- Estimated Star Density: {:.3} stars per cubic light-year",
            self.star_density
        )?;
        write!(
            f,
            "- Escape Velocity (at edge): {:.2} m/s",
            self.escape_velocity
        )
    }
}
