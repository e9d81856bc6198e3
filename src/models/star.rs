use std::fmt;

use serde::Serialize;

use super::body::{require_positive, require_text, BodyCore, BodyKind};
use super::Body;
use crate::error::{CatalogError, CatalogResult, ComputationKind};

pub const SUN_MASS_KG: f64 = 1.989e30;
pub const SUN_ABSOLUTE_MAGNITUDE: f64 = 4.83;
/// Main-sequence lifespan of the Sun in billions of years
pub const SUN_LIFESPAN_GYR: f64 = 10.0;

/// Harvard spectral class, from surface temperature.
#[derive(strum_macros::Display, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectralClass {
    O,
    B,
    A,
    F,
    G,
    K,
    M,
}

impl SpectralClass {
    pub fn from_temperature(temperature: f64) -> Self {
        match temperature {
            t if t > 30000.0 => SpectralClass::O,
            t if t > 10000.0 => SpectralClass::B,
            t if t > 7500.0 => SpectralClass::A,
            t if t > 6000.0 => SpectralClass::F,
            t if t > 5200.0 => SpectralClass::G,
            t if t > 3700.0 => SpectralClass::K,
            _ => SpectralClass::M,
        }
    }
}

/// Yerkes luminosity class, from luminosity relative to the Sun.
#[derive(strum_macros::Display, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuminosityClass {
    #[strum(to_string = "I (Supergiant)")]
    Supergiant,
    #[strum(to_string = "II (Bright Giant)")]
    BrightGiant,
    #[strum(to_string = "III (Giant)")]
    Giant,
    #[strum(to_string = "IV (Subgiant)")]
    Subgiant,
    #[strum(to_string = "V (Main-sequence)")]
    MainSequence,
    #[strum(to_string = "VII (White Dwarf)")]
    WhiteDwarf,
}

impl LuminosityClass {
    pub fn from_luminosity(luminosity: f64) -> Self {
        match luminosity {
            l if l >= 30000.0 => LuminosityClass::Supergiant,
            l if l >= 1000.0 => LuminosityClass::BrightGiant,
            l if l >= 100.0 => LuminosityClass::Giant,
            l if l >= 10.0 => LuminosityClass::Subgiant,
            l if l >= 0.01 => LuminosityClass::MainSequence,
            _ => LuminosityClass::WhiteDwarf,
        }
    }
}

/// Evolutionary stage, from mass in solar masses.
#[derive(strum_macros::Display, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeStage {
    #[strum(to_string = "Brown Dwarf (Failed Star)")]
    BrownDwarf,
    #[strum(to_string = "Low-Mass Main Sequence Star")]
    LowMassMainSequence,
    #[strum(to_string = "Main Sequence Star")]
    MainSequence,
    #[strum(to_string = "High-Mass Main Sequence Star")]
    HighMassMainSequence,
}

impl LifeStage {
    pub fn from_solar_masses(solar_masses: f64) -> Self {
        match solar_masses {
            m if m < 0.08 => LifeStage::BrownDwarf,
            m if m < 0.5 => LifeStage::LowMassMainSequence,
            m if m <= 8.0 => LifeStage::MainSequence,
            _ => LifeStage::HighMassMainSequence,
        }
    }
}

/// `M = 4.83 - 2.5 log10(L)` with `L` in solar luminosities.
pub fn absolute_magnitude(luminosity: f64) -> CatalogResult<f64> {
    if luminosity.is_nan() || luminosity <= 0.0 {
        return Err(CatalogError::computation(
            "absolute magnitude",
            ComputationKind::NonPositiveLuminosity,
        ));
    }
    finite(
        "absolute magnitude",
        SUN_ABSOLUTE_MAGNITUDE - 2.5 * luminosity.log10(),
    )
}

/// Main-sequence lifespan in billions of years, `10 (M/M☉)^-2.5`.
pub fn main_sequence_lifespan(mass_kg: f64) -> CatalogResult<f64> {
    if mass_kg.is_nan() || mass_kg <= 0.0 {
        return Err(CatalogError::computation(
            "main sequence lifespan",
            ComputationKind::NonPositiveMass,
        ));
    }
    finite(
        "main sequence lifespan",
        SUN_LIFESPAN_GYR * (mass_kg / SUN_MASS_KG).powf(-2.5),
    )
}

fn finite(quantity: &'static str, value: f64) -> CatalogResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CatalogError::computation(quantity, ComputationKind::NotFinite))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Star {
    #[serde(flatten)]
    core: BodyCore,
    color: String,
    /// Relative to the Sun
    luminosity: f64,
    /// Radius relative to the Sun
    size: f64,
}

impl Star {
    pub fn new(
        core: BodyCore,
        color: impl Into<String>,
        luminosity: f64,
        size: f64,
    ) -> CatalogResult<Self> {
        let color = color.into();
        require_text("color", &color)?;
        require_positive("luminosity", luminosity)?;
        require_positive("size", size)?;

        Ok(Self {
            core,
            color,
            luminosity,
            size,
        })
    }

    /// Rebuilds `source` through the validating constructors.
    pub fn copy_from(source: Option<&Star>) -> CatalogResult<Self> {
        let source = source.ok_or(CatalogError::MissingSource(BodyKind::Star))?;
        Self::new(
            source.core.revalidated()?,
            source.color.clone(),
            source.luminosity,
            source.size,
        )
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn luminosity(&self) -> f64 {
        self.luminosity
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn solar_masses(&self) -> f64 {
        self.core.mass() / SUN_MASS_KG
    }

    pub fn spectral_class(&self) -> SpectralClass {
        SpectralClass::from_temperature(self.core.temperature())
    }

    pub fn luminosity_class(&self) -> LuminosityClass {
        LuminosityClass::from_luminosity(self.luminosity)
    }

    pub fn life_stage(&self) -> LifeStage {
        LifeStage::from_solar_masses(self.solar_masses())
    }

    pub fn absolute_magnitude(&self) -> CatalogResult<f64> {
        absolute_magnitude(self.luminosity)
    }

    pub fn main_sequence_lifespan(&self) -> CatalogResult<f64> {
        main_sequence_lifespan(self.core.mass())
    }

    /// Whether a planet orbiting at `orbit_au` sits in the habitable zone of a
    /// G-type host.
    pub fn is_in_habitable_zone(&self, orbit_au: f64) -> bool {
        self.spectral_class() == SpectralClass::G && (0.95..=1.37).contains(&orbit_au)
    }

    pub fn facts(&self) -> CatalogResult<StarFacts> {
        Ok(StarFacts {
            name: self.core.name().to_string(),
            spectral_class: self.spectral_class(),
            luminosity_class: self.luminosity_class(),
            life_stage: self.life_stage(),
            absolute_magnitude: self.absolute_magnitude()?,
            main_sequence_lifespan: self.main_sequence_lifespan()?,
        })
    }
}

impl Body for Star {
    const KIND: BodyKind = BodyKind::Star;

    fn core(&self) -> &BodyCore {
        &self.core
    }

    fn facts_text(&self) -> CatalogResult<String> {
        Ok(self.facts()?.to_string())
    }
}

impl fmt::Display for Star {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.core)?;
        writeln!(f, "Color: {}", self.color)?;
        writeln!(f, "Luminosity: {:.2} solar units", self.luminosity)?;
        write!(f, "Size: {:.2} solar radii", self.size)
    }
}

/// Derived values for a [`Star`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarFacts {
    pub name: String,
    pub spectral_class: SpectralClass,
    pub luminosity_class: LuminosityClass,
    pub life_stage: LifeStage,
    pub absolute_magnitude: f64,
    /// Billions of years
    pub main_sequence_lifespan: f64,
}

impl fmt::Display for StarFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MORE STAR FACTS:")?;
        writeln!(f, "- {} is a shining body in space!", self.name)?;
        writeln!(f)?;
        writeln!(f, "STELLAR AND PHYSICAL CLASSIFICATION:")?;
        writeln!(
            f,
            "- Spectral Type: {}{}",
            self.spectral_class, self.luminosity_class
        )?;
        writeln!(f, "- Absolute Magnitude: {:.2}", self.absolute_magnitude)?;
        writeln!(f)?;
        writeln!(f, "LIFECYCLE INFORMATION:")?;
        writeln!(f, "- Current Stage: {}", self.life_stage)?;
        write!(
            f,
            "- Main Sequence Lifespan: {:.1} billion years",
            self.main_sequence_lifespan
        )
    }
}
