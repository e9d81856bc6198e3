//! Catalog entities.
//!
//! Every entity is a [`BodyCore`] plus a variant payload. Entities are built
//! once through validating constructors and never mutated afterwards; an
//! "update" is a new entity handed to
//! [`Astronomicon::replace`](crate::Astronomicon::replace).
//!
//! Ordering and equality are by case-insensitive name and only defined within
//! one variant. Typed values get `Ord`/`Eq`, so mixing `Star` and `Planet` does
//! not compile; the tagged [`CelestialBody`] / [`BodyRef`] forms check the
//! variant at runtime and return [`CatalogError::TypeMismatch`].

pub mod body;
pub mod galaxy;
pub mod planet;
pub mod star;

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::error::{CatalogError, CatalogResult};

pub use body::{BodyCore, BodyKind};
pub use galaxy::{Galaxy, GalaxyFacts};
pub use planet::{MoonCategory, Planet, PlanetFacts};
pub use star::{LifeStage, LuminosityClass, SpectralClass, Star, StarFacts};

/// Capabilities shared by every variant.
pub trait Body: fmt::Display {
    const KIND: BodyKind;

    fn core(&self) -> &BodyCore;

    /// Multi-line rendering of the derived values.
    fn facts_text(&self) -> CatalogResult<String>;

    fn name(&self) -> &str {
        self.core().name()
    }

    /// Multi-line description: base fields first, then the variant's own.
    fn summary(&self) -> String {
        self.to_string()
    }
}

macro_rules! impl_name_order {
    ($($variant:ty),*) => {
        $(
            impl PartialEq for $variant {
                fn eq(&self, other: &Self) -> bool {
                    self.core().cmp_name(other.core()) == Ordering::Equal
                }
            }

            impl Eq for $variant {}

            impl PartialOrd for $variant {
                fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                    Some(self.cmp(other))
                }
            }

            impl Ord for $variant {
                fn cmp(&self, other: &Self) -> Ordering {
                    self.core().cmp_name(other.core())
                }
            }
        )*
    };
}

impl_name_order!(Star, Planet, Galaxy);

/// Numeric field used by [`BodyRef::compare_by`].
#[derive(strum_macros::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMetric {
    Mass,
    Temperature,
    DistanceFromEarth,
}

impl BodyMetric {
    fn value(&self, core: &BodyCore) -> f64 {
        match self {
            BodyMetric::Mass => core.mass(),
            BodyMetric::Temperature => core.temperature(),
            BodyMetric::DistanceFromEarth => core.distance_from_earth(),
        }
    }
}

/// An owned entity of any variant.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum CelestialBody {
    Star(Star),
    Planet(Planet),
    Galaxy(Galaxy),
}

impl CelestialBody {
    pub fn as_body_ref(&self) -> BodyRef<'_> {
        match self {
            CelestialBody::Star(star) => BodyRef::Star(star),
            CelestialBody::Planet(planet) => BodyRef::Planet(planet),
            CelestialBody::Galaxy(galaxy) => BodyRef::Galaxy(galaxy),
        }
    }

    pub fn kind(&self) -> BodyKind {
        self.as_body_ref().kind()
    }

    pub fn core(&self) -> &BodyCore {
        match self {
            CelestialBody::Star(star) => star.core(),
            CelestialBody::Planet(planet) => planet.core(),
            CelestialBody::Galaxy(galaxy) => galaxy.core(),
        }
    }

    pub fn name(&self) -> &str {
        self.core().name()
    }

    pub fn summary(&self) -> String {
        self.as_body_ref().summary()
    }

    pub fn facts_text(&self) -> CatalogResult<String> {
        self.as_body_ref().facts_text()
    }

    pub fn try_cmp(&self, other: &CelestialBody) -> CatalogResult<Ordering> {
        self.as_body_ref().try_cmp(other.as_body_ref())
    }

    pub fn try_eq(&self, other: &CelestialBody) -> CatalogResult<bool> {
        self.as_body_ref().try_eq(other.as_body_ref())
    }

    pub fn compare_by(&self, other: &CelestialBody, metric: BodyMetric) -> CatalogResult<Ordering> {
        self.as_body_ref().compare_by(other.as_body_ref(), metric)
    }
}

impl From<Star> for CelestialBody {
    fn from(star: Star) -> Self {
        CelestialBody::Star(star)
    }
}

impl From<Planet> for CelestialBody {
    fn from(planet: Planet) -> Self {
        CelestialBody::Planet(planet)
    }
}

impl From<Galaxy> for CelestialBody {
    fn from(galaxy: Galaxy) -> Self {
        CelestialBody::Galaxy(galaxy)
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_body_ref(), f)
    }
}

/// A borrowed entity of any variant, as handed out by repository lookups.
#[derive(Debug, Clone, Copy)]
pub enum BodyRef<'a> {
    Star(&'a Star),
    Planet(&'a Planet),
    Galaxy(&'a Galaxy),
}

impl<'a> BodyRef<'a> {
    pub fn kind(&self) -> BodyKind {
        match self {
            BodyRef::Star(_) => BodyKind::Star,
            BodyRef::Planet(_) => BodyKind::Planet,
            BodyRef::Galaxy(_) => BodyKind::Galaxy,
        }
    }

    pub fn core(&self) -> &'a BodyCore {
        match *self {
            BodyRef::Star(star) => star.core(),
            BodyRef::Planet(planet) => planet.core(),
            BodyRef::Galaxy(galaxy) => galaxy.core(),
        }
    }

    pub fn name(&self) -> &'a str {
        self.core().name()
    }

    pub fn summary(&self) -> String {
        self.to_string()
    }

    pub fn facts_text(&self) -> CatalogResult<String> {
        match self {
            BodyRef::Star(star) => star.facts_text(),
            BodyRef::Planet(planet) => planet.facts_text(),
            BodyRef::Galaxy(galaxy) => galaxy.facts_text(),
        }
    }

    /// Natural order. Fails when the variants differ.
    pub fn try_cmp(&self, other: BodyRef<'_>) -> CatalogResult<Ordering> {
        self.same_kind(&other)?;
        Ok(self.core().cmp_name(other.core()))
    }

    /// Case-insensitive name equality. Fails when the variants differ.
    pub fn try_eq(&self, other: BodyRef<'_>) -> CatalogResult<bool> {
        Ok(self.try_cmp(other)? == Ordering::Equal)
    }

    pub fn compare_by(&self, other: BodyRef<'_>, metric: BodyMetric) -> CatalogResult<Ordering> {
        self.same_kind(&other)?;
        Ok(metric
            .value(self.core())
            .total_cmp(&metric.value(other.core())))
    }

    pub fn to_owned_body(&self) -> CelestialBody {
        match *self {
            BodyRef::Star(star) => CelestialBody::Star(star.clone()),
            BodyRef::Planet(planet) => CelestialBody::Planet(planet.clone()),
            BodyRef::Galaxy(galaxy) => CelestialBody::Galaxy(galaxy.clone()),
        }
    }

    fn same_kind(&self, other: &BodyRef<'_>) -> CatalogResult<()> {
        if self.kind() != other.kind() {
            return Err(CatalogError::TypeMismatch {
                left: self.kind(),
                right: other.kind(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for BodyRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyRef::Star(star) => fmt::Display::fmt(star, f),
            BodyRef::Planet(planet) => fmt::Display::fmt(planet, f),
            BodyRef::Galaxy(galaxy) => fmt::Display::fmt(galaxy, f),
        }
    }
}
