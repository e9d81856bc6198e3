use std::fmt;

use serde::Serialize;

use super::body::{require_positive, require_text, BodyCore, BodyKind, G};
use super::Body;
use crate::error::{CatalogError, CatalogResult, ComputationKind};

#[derive(strum_macros::Display, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonCategory {
    Moonless,
    #[strum(to_string = "Few Moons")]
    FewMoons,
    #[strum(to_string = "Multi-Mooned")]
    MultiMooned,
    #[strum(to_string = "Satellite Swarm")]
    SatelliteSwarm,
}

impl MoonCategory {
    pub fn from_count(moons: u32) -> Self {
        match moons {
            0 => MoonCategory::Moonless,
            1..=2 => MoonCategory::FewMoons,
            3..=10 => MoonCategory::MultiMooned,
            _ => MoonCategory::SatelliteSwarm,
        }
    }
}

/// Surface gravity in m/s², `G M / r²` with `r` in meters.
pub fn surface_gravity(mass_kg: f64, radius_m: f64) -> CatalogResult<f64> {
    if radius_m.is_nan() || radius_m <= 0.0 {
        return Err(CatalogError::computation(
            "surface gravity",
            ComputationKind::ZeroRadius,
        ));
    }
    let gravity = G * mass_kg / (radius_m * radius_m);
    if !gravity.is_finite() {
        return Err(CatalogError::computation(
            "surface gravity",
            ComputationKind::NotFinite,
        ));
    }
    Ok(gravity)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    #[serde(flatten)]
    core: BodyCore,
    atmospheric_composition: String,
    number_of_moons: u32,
    surface_conditions: String,
    /// Meters
    radius: f64,
}

impl Planet {
    pub fn new(
        core: BodyCore,
        atmospheric_composition: impl Into<String>,
        number_of_moons: u32,
        surface_conditions: impl Into<String>,
        radius: f64,
    ) -> CatalogResult<Self> {
        let atmospheric_composition = atmospheric_composition.into();
        let surface_conditions = surface_conditions.into();
        require_text("atmospheric composition", &atmospheric_composition)?;
        require_text("surface conditions", &surface_conditions)?;
        require_positive("radius", radius)?;

        Ok(Self {
            core,
            atmospheric_composition,
            number_of_moons,
            surface_conditions,
            radius,
        })
    }

    pub fn copy_from(source: Option<&Planet>) -> CatalogResult<Self> {
        let source = source.ok_or(CatalogError::MissingSource(BodyKind::Planet))?;
        Self::new(
            source.core.revalidated()?,
            source.atmospheric_composition.clone(),
            source.number_of_moons,
            source.surface_conditions.clone(),
            source.radius,
        )
    }

    pub fn atmospheric_composition(&self) -> &str {
        &self.atmospheric_composition
    }

    pub fn number_of_moons(&self) -> u32 {
        self.number_of_moons
    }

    pub fn surface_conditions(&self) -> &str {
        &self.surface_conditions
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn surface_gravity(&self) -> CatalogResult<f64> {
        surface_gravity(self.core.mass(), self.radius)
    }

    pub fn moon_category(&self) -> MoonCategory {
        MoonCategory::from_count(self.number_of_moons)
    }

    pub fn facts(&self) -> CatalogResult<PlanetFacts> {
        Ok(PlanetFacts {
            name: self.core.name().to_string(),
            surface_gravity: self.surface_gravity()?,
            number_of_moons: self.number_of_moons,
            moon_category: self.moon_category(),
        })
    }
}

impl Body for Planet {
    const KIND: BodyKind = BodyKind::Planet;

    fn core(&self) -> &BodyCore {
        &self.core
    }

    fn facts_text(&self) -> CatalogResult<String> {
        Ok(self.facts()?.to_string())
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.core)?;
        writeln!(f, "Radius: {:.1} km", self.radius / 1000.0)?;
        writeln!(f, "Atmosphere: {}", self.atmospheric_composition)?;
        writeln!(f, "Moons: {}", self.number_of_moons)?;
        write!(f, "Surface Conditions: {}", self.surface_conditions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetFacts {
    pub name: String,
    /// m/s²
    pub surface_gravity: f64,
    pub number_of_moons: u32,
    pub moon_category: MoonCategory,
}

impl fmt::Display for PlanetFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MORE PLANETARY FACTS:")?;
        writeln!(f, "- {} is a fascinating world!", self.name)?;
        writeln!(f)?;
        writeln!(f, "PHYSICAL CHARACTERISTICS:")?;
        writeln!(f, "- Surface Gravity: {:.2} m/s²", self.surface_gravity)?;
        writeln!(f)?;
        writeln!(f, "SATELLITE SYSTEM:")?;
        writeln!(f, "- Number of Moons: {}", self.number_of_moons)?;
        write!(f, "- Moon Category: {}", self.moon_category)
    }
}
