//! Line-oriented record format.
//!
//! One entity per line, comma separated, tag first:
//!
//! ```text
//! Star,name,distanceFromEarth,mass,temperature,type,color,luminosity,size
//! Planet,name,distanceFromEarth,mass,temperature,type,atmosphericComposition,numberOfMoons,surfaceConditions,radius
//! Galaxy,name,distanceFromEarth,mass,temperature,type,numberOfStars,diameter,age
//! ```
//!
//! Distance is written with 6 decimals, mass as `d.ddde±XX`, every other
//! float with 2 decimals, counts as plain integers. Commas inside text fields
//! are not escaped, and a positive quantity below 0.005 is written as `0.00`;
//! either record is still written but cannot be read back, see
//! [`unreadable_fields`].

use std::fmt::Display;
use std::str::FromStr;

use crate::error::{CatalogError, CatalogResult};
use crate::models::body::scientific;
use crate::models::{BodyCore, BodyKind, BodyRef, CelestialBody, Galaxy, Planet, Star};

pub fn format_record(body: BodyRef<'_>) -> String {
    let core = format_core(body.core());
    let record = match body {
        BodyRef::Star(star) => format!(
            "{},{},{},{:.2},{:.2}",
            BodyKind::Star,
            core,
            star.color(),
            star.luminosity(),
            star.size()
        ),
        BodyRef::Planet(planet) => format!(
            "{},{},{},{},{},{:.2}",
            BodyKind::Planet,
            core,
            planet.atmospheric_composition(),
            planet.number_of_moons(),
            planet.surface_conditions(),
            planet.radius()
        ),
        BodyRef::Galaxy(galaxy) => format!(
            "{},{},{},{:.2},{:.2}",
            BodyKind::Galaxy,
            core,
            galaxy.number_of_stars(),
            galaxy.diameter(),
            galaxy.age()
        ),
    };

    let unreadable = unreadable_fields(body);
    if !unreadable.is_empty() {
        tracing::warn!(
            kind = %body.kind(),
            name = body.name(),
            fields = ?unreadable,
            "record will not load back"
        );
    }
    record
}

/// Fields whose written form would be rejected on load: text containing a
/// comma, or a quantity that must be positive but rounds to zero at two
/// decimals.
pub fn unreadable_fields(body: BodyRef<'_>) -> Vec<&'static str> {
    let core = body.core();
    let mut text = vec![("name", core.name()), ("type", core.body_type())];
    let mut positive = Vec::new();
    match body {
        BodyRef::Star(star) => {
            text.push(("color", star.color()));
            positive.push(("luminosity", star.luminosity()));
            positive.push(("size", star.size()));
        }
        BodyRef::Planet(planet) => {
            text.push(("atmosphericComposition", planet.atmospheric_composition()));
            text.push(("surfaceConditions", planet.surface_conditions()));
            positive.push(("radius", planet.radius()));
        }
        BodyRef::Galaxy(galaxy) => {
            positive.push(("diameter", galaxy.diameter()));
            positive.push(("age", galaxy.age()));
        }
    }

    text.into_iter()
        .filter(|(_, value)| value.contains(','))
        .map(|(field, _)| field)
        .chain(
            positive
                .into_iter()
                .filter(|(_, value)| rounds_to_zero(*value))
                .map(|(field, _)| field),
        )
        .collect()
}

fn rounds_to_zero(value: f64) -> bool {
    format!("{:.2}", value)
        .parse::<f64>()
        .map_or(true, |rounded| rounded <= 0.0)
}

fn format_core(core: &BodyCore) -> String {
    format!(
        "{},{:.6},{},{:.2},{}",
        core.name(),
        core.distance_from_earth(),
        scientific(core.mass(), 3),
        core.temperature(),
        core.body_type()
    )
}

/// Parses one record line into a validated entity.
///
/// Fields are trimmed. The field count must match the tag exactly.
pub fn parse_record(line: &str) -> CatalogResult<CelestialBody> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let (tag, fields) = match fields.split_first() {
        Some((tag, fields)) if !tag.is_empty() => (*tag, fields),
        _ => return Err(CatalogError::Parse("missing record tag".to_string())),
    };
    let kind = BodyKind::from_tag(tag)
        .ok_or_else(|| CatalogError::Parse(format!("unknown record tag `{}`", tag)))?;
    if fields.len() != kind.record_arity() {
        return Err(CatalogError::Parse(format!(
            "{} record needs {} fields after the tag, found {}",
            kind,
            kind.record_arity(),
            fields.len()
        )));
    }

    let core = BodyCore::new(
        fields[0],
        number("distanceFromEarth", fields[1])?,
        number("mass", fields[2])?,
        number("temperature", fields[3])?,
        fields[4],
    )?;
    let body: CelestialBody = match kind {
        BodyKind::Star => Star::new(
            core,
            fields[5],
            number("luminosity", fields[6])?,
            number("size", fields[7])?,
        )?
        .into(),
        BodyKind::Planet => Planet::new(
            core,
            fields[5],
            number("numberOfMoons", fields[6])?,
            fields[7],
            number("radius", fields[8])?,
        )?
        .into(),
        BodyKind::Galaxy => Galaxy::new(
            core,
            number("numberOfStars", fields[5])?,
            number("diameter", fields[6])?,
            number("age", fields[7])?,
        )?
        .into(),
    };
    Ok(body)
}

fn number<T>(field: &str, raw: &str) -> CatalogResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|error| CatalogError::Parse(format!("{} `{}`: {}", field, raw, error)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Body;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn sun() -> Star {
        let core = BodyCore::new("Sun", 0.0000158, 1.989e30, 5778.0, "Yellow Dwarf").unwrap();
        Star::new(core, "Yellow", 1.0, 1.0).unwrap()
    }

    #[test]
    fn formats_sun_with_fixed_precision() {
        assert_eq!(
            format_record(BodyRef::Star(&sun())),
            "Star,Sun,0.000016,1.989e+30,5778.00,Yellow Dwarf,Yellow,1.00,1.00"
        );
    }

    #[test]
    fn formats_planet_and_galaxy_counts_as_integers() {
        let core = BodyCore::new("Earth", 0.0000158, 5.972e24, 288.0, "Terrestrial").unwrap();
        let earth = Planet::new(core, "Nitrogen-Oxygen", 1, "Rocky with water", 6.371e6).unwrap();
        assert_eq!(
            format_record(BodyRef::Planet(&earth)),
            "Planet,Earth,0.000016,5.972e+24,288.00,Terrestrial,Nitrogen-Oxygen,1,Rocky with water,6371000.00"
        );

        let core = BodyCore::new("Milky Way", 0.0, 1.5e42, 0.0, "Spiral").unwrap();
        let galaxy = Galaxy::new(core, 250_000_000_000, 105_700.0, 13.51).unwrap();
        assert_eq!(
            format_record(BodyRef::Galaxy(&galaxy)),
            "Galaxy,Milky Way,0.000000,1.500e+42,0.00,Spiral,250000000000,105700.00,13.51"
        );
    }

    #[test]
    fn parses_with_surrounding_whitespace() {
        let body = parse_record(" Star , Sun , 0.000016 , 1.989e+30 , 5778.00 , Yellow Dwarf , Yellow , 1.00 , 1.00 ")
            .unwrap();
        let CelestialBody::Star(star) = body else {
            panic!("expected a star");
        };
        assert_eq!(star.name(), "Sun");
        assert_eq!(star.core().body_type(), "Yellow Dwarf");
        assert_relative_eq!(star.core().mass(), 1.989e30);
        assert_eq!(star.luminosity(), 1.0);
    }

    #[test]
    fn round_trip_holds_within_record_precision() {
        let original = sun();
        let CelestialBody::Star(loaded) = parse_record(&format_record(BodyRef::Star(&original))).unwrap()
        else {
            panic!("expected a star");
        };
        assert_eq!(loaded.name(), original.name());
        assert_relative_eq!(loaded.core().mass(), original.core().mass(), max_relative = 1e-3);
        assert_relative_eq!(
            loaded.core().distance_from_earth(),
            original.core().distance_from_earth(),
            epsilon = 1e-6
        );
        assert_relative_eq!(loaded.core().temperature(), original.core().temperature(), epsilon = 0.005);
        assert_eq!(loaded.color(), original.color());
    }

    #[test]
    fn parses_planet_and_galaxy() {
        let planet = parse_record("Planet,Mars,0.000000,6.390e+23,210.00,Terrestrial,CO2,2,Dusty,3389500.00").unwrap();
        assert_eq!(planet.kind(), BodyKind::Planet);
        assert_eq!(planet.name(), "Mars");

        let galaxy = parse_record("Galaxy,Andromeda,2537000.000000,2.400e+42,0.00,Spiral,1000000000000,220000.00,10.00").unwrap();
        let CelestialBody::Galaxy(galaxy) = galaxy else {
            panic!("expected a galaxy");
        };
        assert_eq!(galaxy.number_of_stars(), 1_000_000_000_000);
    }

    #[test]
    fn rejects_malformed_lines() {
        let malformed = [
            "",
            "Comet,Halley,0.1,2.2e14,200.00,Periodic",
            "star,Sun,0.000016,1.989e+30,5778.00,Yellow Dwarf,Yellow,1.00,1.00",
            "Star,Sun,0.000016,1.989e+30,5778.00,Yellow Dwarf,Yellow,1.00",
            "Star,Sun,0.000016,1.989e+30,5778.00,Yellow Dwarf,Yellow,1.00,1.00,extra",
            "Star,Sun,far,1.989e+30,5778.00,Yellow Dwarf,Yellow,1.00,1.00",
            "Planet,Mars,0.0,6.39e23,210.00,Terrestrial,CO2,-2,Dusty,3389500.00",
            "Planet,Mars,0.0,6.39e23,210.00,Terrestrial,CO2,2.5,Dusty,3389500.00",
        ];
        for line in malformed {
            assert!(
                matches!(parse_record(line), Err(CatalogError::Parse(_))),
                "expected parse failure for {:?}",
                line
            );
        }
    }

    #[test]
    fn tiny_positive_values_are_flagged_as_unreadable() {
        let core = BodyCore::new("Proxima Centauri", 4.24, 2.4e29, 3042.0, "Red Dwarf").unwrap();
        let proxima = Star::new(core, "Red", 0.0017, 0.14).unwrap();
        assert_eq!(unreadable_fields(BodyRef::Star(&proxima)), ["luminosity"]);

        let line = format_record(BodyRef::Star(&proxima));
        assert!(line.ends_with(",Red,0.00,0.14"));
        assert!(matches!(
            parse_record(&line),
            Err(CatalogError::Validation { field: "luminosity", .. })
        ));

        let core = BodyCore::new("Young", 1.0e6, 1.0e40, 0.0, "Irregular").unwrap();
        let young = Galaxy::new(core, 1_000, 0.004, 0.001).unwrap();
        assert_eq!(unreadable_fields(BodyRef::Galaxy(&young)), ["diameter", "age"]);
    }

    #[test]
    fn commas_in_text_are_flagged_as_unreadable() {
        let core = BodyCore::new("Kepler-22b", 600.0, 2.0e25, 262.0, "Super-Earth").unwrap();
        let planet = Planet::new(core, "Nitrogen, Methane", 0, "Ocean", 1.5e7).unwrap();
        assert_eq!(
            unreadable_fields(BodyRef::Planet(&planet)),
            ["atmosphericComposition"]
        );
        assert!(unreadable_fields(BodyRef::Star(&sun())).is_empty());
    }

    #[test]
    fn construction_failures_surface_as_validation_errors() {
        let result = parse_record("Star,Sun,0.000016,0.0,5778.00,Yellow Dwarf,Yellow,1.00,1.00");
        assert!(matches!(result, Err(CatalogError::Validation { field: "mass", .. })));
        let result = parse_record("Galaxy,Void,1.0,1.0e40,0.00,Irregular,10,0.00,1.00");
        assert!(matches!(result, Err(CatalogError::Validation { field: "diameter", .. })));
    }
}
