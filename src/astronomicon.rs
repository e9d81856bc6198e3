use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Body, BodyCore, BodyKind, BodyRef, CelestialBody, Galaxy, Planet, Star};
use crate::record;

/// Defines a structure for retaining every known star, planet and galaxy,
/// backed by a record file.
///
/// Each variant lives in its own collection, kept sorted by case-insensitive
/// name with no two entries sharing a name. The collections are only reachable
/// read-only; entries are added through [`insert`](Self::insert) and swapped
/// through [`replace`](Self::replace).
///
/// Not synchronized. A multi-threaded host must wrap the whole value in a
/// single lock.
#[derive(Debug, Clone)]
pub struct Astronomicon {
    stars: Vec<Star>,
    planets: Vec<Planet>,
    galaxies: Vec<Galaxy>,
    data_file: PathBuf,
    last_load: Option<LoadReport>,
}

/// Result of an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored at `index` of its variant's collection.
    Inserted { index: usize },
    /// An entry of the same variant and name already exists; nothing changed.
    Duplicate,
}

#[derive(strum_macros::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Read from the record file.
    File,
    /// The record file did not exist; sample data was created and written.
    Seeded,
    /// The record file could not be read; sample data is held in memory only.
    Fallback,
}

/// A record line that was not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_number: usize,
    pub content: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub origin: LoadOrigin,
    pub loaded: usize,
    pub duplicates: usize,
    pub skipped: Vec<SkippedLine>,
}

impl LoadReport {
    fn new(origin: LoadOrigin) -> Self {
        Self {
            origin,
            loaded: 0,
            duplicates: 0,
            skipped: Vec::new(),
        }
    }

    fn count(&mut self, outcome: InsertOutcome) {
        match outcome {
            InsertOutcome::Inserted { .. } => self.loaded += 1,
            InsertOutcome::Duplicate => self.duplicates += 1,
        }
    }
}

#[derive(Serialize)]
struct CatalogSnapshot<'a> {
    stars: &'a [Star],
    planets: &'a [Planet],
    galaxies: &'a [Galaxy],
}

impl Astronomicon {
    /// An empty catalog bound to `data_file`. Nothing is read.
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            stars: Vec::new(),
            planets: Vec::new(),
            galaxies: Vec::new(),
            data_file: data_file.into(),
            last_load: None,
        }
    }

    /// Builds the catalog from `data_file`.
    ///
    /// A missing file is replaced by the sample catalog, which is written out
    /// immediately. Any other read failure also yields the sample catalog, but
    /// leaves the unreadable file untouched.
    pub fn open(data_file: impl Into<PathBuf>) -> Self {
        let mut astronomicon = Self::new(data_file);
        let report = match astronomicon.load() {
            Ok(report) => report,
            Err(error) if error.is_not_found() => {
                tracing::info!(
                    path = %astronomicon.data_file.display(),
                    "No catalog file, creating sample celestial objects"
                );
                let report = astronomicon.seed(LoadOrigin::Seeded);
                if let Err(error) = astronomicon.save() {
                    tracing::error!(%error, "Could not write sample catalog");
                }
                report
            }
            Err(error) => {
                tracing::warn!(%error, "Could not read catalog, falling back to sample data");
                astronomicon.clear();
                astronomicon.seed(LoadOrigin::Fallback)
            }
        };
        astronomicon.last_load = Some(report);
        astronomicon
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// What the last [`open`](Self::open) did.
    pub fn last_load(&self) -> Option<&LoadReport> {
        self.last_load.as_ref()
    }

    pub fn insert(&mut self, body: CelestialBody) -> InsertOutcome {
        match body {
            CelestialBody::Star(star) => self.insert_star(star),
            CelestialBody::Planet(planet) => self.insert_planet(planet),
            CelestialBody::Galaxy(galaxy) => self.insert_galaxy(galaxy),
        }
    }

    pub fn insert_star(&mut self, star: Star) -> InsertOutcome {
        insert_sorted(&mut self.stars, star)
    }

    pub fn insert_planet(&mut self, planet: Planet) -> InsertOutcome {
        insert_sorted(&mut self.planets, planet)
    }

    pub fn insert_galaxy(&mut self, galaxy: Galaxy) -> InsertOutcome {
        insert_sorted(&mut self.galaxies, galaxy)
    }

    /// Swaps in `body` for the entry of the same variant and name, returning
    /// the previous entry. Inserts when there was none.
    pub fn replace(&mut self, body: CelestialBody) -> Option<CelestialBody> {
        match body {
            CelestialBody::Star(star) => {
                replace_sorted(&mut self.stars, star).map(CelestialBody::Star)
            }
            CelestialBody::Planet(planet) => {
                replace_sorted(&mut self.planets, planet).map(CelestialBody::Planet)
            }
            CelestialBody::Galaxy(galaxy) => {
                replace_sorted(&mut self.galaxies, galaxy).map(CelestialBody::Galaxy)
            }
        }
    }

    pub fn find_star(&self, name: &str) -> Option<&Star> {
        find_in(&self.stars, name)
    }

    pub fn find_planet(&self, name: &str) -> Option<&Planet> {
        find_in(&self.planets, name)
    }

    pub fn find_galaxy(&self, name: &str) -> Option<&Galaxy> {
        find_in(&self.galaxies, name)
    }

    /// Exact, case-insensitive lookup within one variant.
    pub fn find_by_name(&self, name: &str, kind: BodyKind) -> Option<BodyRef<'_>> {
        match kind {
            BodyKind::Star => self.find_star(name).map(BodyRef::Star),
            BodyKind::Planet => self.find_planet(name).map(BodyRef::Planet),
            BodyKind::Galaxy => self.find_galaxy(name).map(BodyRef::Galaxy),
        }
    }

    /// First match trying stars, then planets, then galaxies.
    pub fn find_any(&self, name: &str) -> Option<BodyRef<'_>> {
        BodyKind::ALL
            .iter()
            .find_map(|kind| self.find_by_name(name, *kind))
    }

    /// Every entry whose name contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<BodyRef<'_>> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.iter()
            .filter(|body| body.name().to_lowercase().contains(&term))
            .collect()
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn galaxies(&self) -> &[Galaxy] {
        &self.galaxies
    }

    pub fn list(&self, kind: BodyKind) -> Vec<BodyRef<'_>> {
        match kind {
            BodyKind::Star => self.stars.iter().map(BodyRef::Star).collect(),
            BodyKind::Planet => self.planets.iter().map(BodyRef::Planet).collect(),
            BodyKind::Galaxy => self.galaxies.iter().map(BodyRef::Galaxy).collect(),
        }
    }

    /// Stars, then planets, then galaxies, each in natural order.
    pub fn iter(&self) -> impl Iterator<Item = BodyRef<'_>> {
        self.stars
            .iter()
            .map(BodyRef::Star)
            .chain(self.planets.iter().map(BodyRef::Planet))
            .chain(self.galaxies.iter().map(BodyRef::Galaxy))
    }

    pub fn len(&self) -> usize {
        self.stars.len() + self.planets.len() + self.galaxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn load(&mut self) -> CatalogResult<LoadReport> {
        let path = self.data_file.clone();
        self.load_from(&path)
    }

    /// Adds every readable record in `path` to the catalog.
    ///
    /// A line that cannot be decoded, parsed or validated is skipped and noted
    /// in the report; the remaining lines still load. Only a failure to open or
    /// read the file itself is an error.
    pub fn load_from(&mut self, path: &Path) -> CatalogResult<LoadReport> {
        let file = File::open(path).map_err(|source| CatalogError::io(path, source))?;
        let mut report = LoadReport::new(LoadOrigin::File);

        for (index, bytes) in BufReader::new(file).split(b'\n').enumerate() {
            let line_number = index + 1;
            let bytes = bytes.map_err(|source| CatalogError::io(path, source))?;
            let line = match String::from_utf8(bytes) {
                Ok(line) => line,
                Err(error) => {
                    let content = String::from_utf8_lossy(error.as_bytes()).into_owned();
                    skip(&mut report, path, line_number, content, "line is not valid UTF-8".to_string());
                    continue;
                }
            };
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            match record::parse_record(line) {
                Ok(body) => {
                    let outcome = self.insert(body);
                    report.count(outcome);
                }
                Err(error) => skip(&mut report, path, line_number, line.to_string(), error.to_string()),
            }
        }

        tracing::info!(
            path = %path.display(),
            loaded = report.loaded,
            duplicates = report.duplicates,
            skipped = report.skipped.len(),
            "Loaded catalog"
        );
        Ok(report)
    }

    pub fn save(&self) -> CatalogResult<()> {
        self.save_to(&self.data_file)
    }

    /// Writes one record line per entry, replacing `path`.
    pub fn save_to(&self, path: &Path) -> CatalogResult<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| CatalogError::io(parent, source))?;
        }
        let file = File::create(path).map_err(|source| CatalogError::io(path, source))?;
        let mut writer = BufWriter::new(file);
        for body in self.iter() {
            writeln!(writer, "{}", record::format_record(body))
                .map_err(|source| CatalogError::io(path, source))?;
        }
        writer
            .flush()
            .map_err(|source| CatalogError::io(path, source))?;

        tracing::info!(path = %path.display(), records = self.len(), "Saved catalog");
        Ok(())
    }

    /// The whole catalog as pretty-printed JSON.
    pub fn to_json(&self) -> CatalogResult<String> {
        let snapshot = CatalogSnapshot {
            stars: &self.stars,
            planets: &self.planets,
            galaxies: &self.galaxies,
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    fn clear(&mut self) {
        self.stars.clear();
        self.planets.clear();
        self.galaxies.clear();
    }

    fn seed(&mut self, origin: LoadOrigin) -> LoadReport {
        let mut report = LoadReport::new(origin);
        match sample_bodies() {
            Ok(bodies) => {
                for body in bodies {
                    let outcome = self.insert(body);
                    report.count(outcome);
                }
            }
            Err(error) => tracing::error!(%error, "Sample catalog failed validation"),
        }
        report
    }
}

fn sample_bodies() -> CatalogResult<Vec<CelestialBody>> {
    let sun = Star::new(
        BodyCore::new("Sun", 0.0000158, 1.989e30, 5778.0, "Yellow Dwarf")?,
        "Yellow",
        1.0,
        1.0,
    )?;
    let earth = Planet::new(
        BodyCore::new("Earth", 0.0000158, 5.972e24, 288.0, "Terrestrial")?,
        "Nitrogen-Oxygen",
        1,
        "Rocky with water",
        6.371e6,
    )?;
    let milky_way = Galaxy::new(
        BodyCore::new("Milky Way", 0.0, 1.5e42, 0.0, "Spiral")?,
        250_000_000_000,
        105_700.0,
        13.51,
    )?;
    Ok(vec![sun.into(), earth.into(), milky_way.into()])
}

fn skip(report: &mut LoadReport, path: &Path, line_number: usize, content: String, reason: String) {
    tracing::warn!(
        path = %path.display(),
        line = line_number,
        %reason,
        "Skipping record"
    );
    report.skipped.push(SkippedLine {
        line_number,
        content,
        reason,
    });
}

/// Inserts before the first entry that does not sort below `item`.
fn insert_sorted<T: Body + Ord>(list: &mut Vec<T>, item: T) -> InsertOutcome {
    if list.iter().any(|existing| *existing == item) {
        tracing::debug!(kind = %T::KIND, name = item.name(), "Skipping duplicate");
        return InsertOutcome::Duplicate;
    }
    let mut index = 0;
    while index < list.len() && list[index] < item {
        index += 1;
    }
    list.insert(index, item);
    InsertOutcome::Inserted { index }
}

fn replace_sorted<T: Body + Ord>(list: &mut Vec<T>, item: T) -> Option<T> {
    let previous = list
        .iter()
        .position(|existing| *existing == item)
        .map(|index| list.remove(index));
    let _ = insert_sorted(list, item);
    previous
}

fn find_in<'a, T: Body>(list: &'a [T], name: &str) -> Option<&'a T> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    list.iter().find(|body| body.core().name_matches(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn star(name: &str) -> Star {
        let core = BodyCore::new(name, 10.0, 2.0e30, 6000.0, "Main Sequence").unwrap();
        Star::new(core, "White", 1.5, 1.2).unwrap()
    }

    fn planet(name: &str) -> Planet {
        let core = BodyCore::new(name, 0.0, 6.39e23, 210.0, "Terrestrial").unwrap();
        Planet::new(core, "Carbon Dioxide", 2, "Dusty", 3.3895e6).unwrap()
    }

    fn names<T: Body>(list: &[T]) -> Vec<&str> {
        list.iter().map(|body| body.name()).collect()
    }

    #[test]
    fn inserts_keep_case_insensitive_order() {
        let mut astronomicon = Astronomicon::new("unused.txt");
        for name in ["vega", "Sirius", "altair", "Betelgeuse", "Deneb"] {
            astronomicon.insert_star(star(name));
        }
        assert_eq!(
            names(astronomicon.stars()),
            ["altair", "Betelgeuse", "Deneb", "Sirius", "vega"]
        );
    }

    #[test]
    fn insert_reports_position() {
        let mut astronomicon = Astronomicon::new("unused.txt");
        assert_eq!(
            astronomicon.insert_star(star("Vega")),
            InsertOutcome::Inserted { index: 0 }
        );
        assert_eq!(
            astronomicon.insert_star(star("Altair")),
            InsertOutcome::Inserted { index: 0 }
        );
        assert_eq!(
            astronomicon.insert_star(star("Rigel")),
            InsertOutcome::Inserted { index: 1 }
        );
    }

    #[test]
    fn duplicate_names_are_skipped_per_variant() {
        let mut astronomicon = Astronomicon::new("unused.txt");
        astronomicon.insert_planet(planet("Mars"));
        assert_eq!(
            astronomicon.insert_planet(planet("MARS")),
            InsertOutcome::Duplicate
        );
        assert_eq!(
            astronomicon.insert(star("Mars").into()),
            InsertOutcome::Inserted { index: 0 }
        );
        assert_eq!(astronomicon.planets().len(), 1);
        assert_eq!(astronomicon.len(), 2);
    }

    #[test]
    fn find_by_name_ignores_case_and_surrounding_space() {
        let mut astronomicon = Astronomicon::new("unused.txt");
        astronomicon.insert_planet(planet("Mars"));
        assert_eq!(astronomicon.find_planet("mars").map(|p| p.name()), Some("Mars"));
        assert!(astronomicon.find_planet("  MARS ").is_some());
        assert!(astronomicon.find_planet("Mar").is_none());
        assert!(astronomicon.find_planet("").is_none());
        assert!(astronomicon.find_by_name("Mars", BodyKind::Star).is_none());
    }

    #[test]
    fn find_any_prefers_stars_then_planets() {
        let mut astronomicon = Astronomicon::new("unused.txt");
        astronomicon.insert_planet(planet("Janus"));
        assert_eq!(
            astronomicon.find_any("janus").map(|body| body.kind()),
            Some(BodyKind::Planet)
        );
        astronomicon.insert_star(star("Janus"));
        assert_eq!(
            astronomicon.find_any("janus").map(|body| body.kind()),
            Some(BodyKind::Star)
        );
        assert!(astronomicon.find_any("Nowhere").is_none());
    }

    #[test]
    fn search_matches_substrings_across_variants() {
        let mut astronomicon = Astronomicon::new("unused.txt");
        astronomicon.insert_star(star("Alpha Centauri"));
        astronomicon.insert_star(star("Proxima Centauri"));
        astronomicon.insert_planet(planet("Centauri b"));
        astronomicon.insert_planet(planet("Mars"));

        let found: Vec<(BodyKind, &str)> = astronomicon
            .search("CENTAURI")
            .iter()
            .map(|body| (body.kind(), body.name()))
            .collect();
        assert_eq!(
            found,
            [
                (BodyKind::Star, "Alpha Centauri"),
                (BodyKind::Star, "Proxima Centauri"),
                (BodyKind::Planet, "Centauri b"),
            ]
        );
        assert!(astronomicon.search("   ").is_empty());
    }

    #[test]
    fn replace_swaps_entry_and_keeps_order() {
        let mut astronomicon = Astronomicon::new("unused.txt");
        astronomicon.insert_planet(planet("Mars"));
        astronomicon.insert_planet(planet("Venus"));

        let core = BodyCore::new("mars", 0.0, 6.39e23, 210.0, "Terrestrial").unwrap();
        let updated = Planet::new(core, "Carbon Dioxide", 2, "Dusty", 3.4e6).unwrap();
        let previous = astronomicon.replace(updated.into()).unwrap();

        assert_eq!(previous.name(), "Mars");
        assert_eq!(names(astronomicon.planets()), ["mars", "Venus"]);
        assert_eq!(astronomicon.find_planet("Mars").unwrap().radius(), 3.4e6);
        assert!(astronomicon.replace(planet("Jupiter").into()).is_none());
        assert_eq!(astronomicon.planets().len(), 3);
    }

    #[test]
    fn open_seeds_and_writes_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("space_objects.txt");

        let astronomicon = Astronomicon::open(&path);
        let report = astronomicon.last_load().unwrap();
        assert_eq!(report.origin, LoadOrigin::Seeded);
        assert_eq!(report.loaded, 3);
        assert!(astronomicon.find_star("Sun").is_some());
        assert!(astronomicon.find_planet("Earth").is_some());
        assert!(astronomicon.find_galaxy("Milky Way").is_some());

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert!(written.starts_with("Star,Sun,"));
    }

    #[test]
    fn open_falls_back_without_overwriting_unreadable_file() {
        let dir = tempdir().unwrap();

        let astronomicon = Astronomicon::open(dir.path());
        let report = astronomicon.last_load().unwrap();
        assert_eq!(report.origin, LoadOrigin::Fallback);
        assert_eq!(astronomicon.len(), 3);
        assert!(dir.path().is_dir());
    }

    #[test]
    fn load_skips_bad_lines_and_counts_duplicates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("objects.txt");
        let mut content = b"Star,Sun,0.000016,1.989e+30,5778.00,Yellow Dwarf,Yellow,1.00,1.00\n".to_vec();
        content.extend_from_slice(b"Star,Broken,0.5\n");
        content.extend_from_slice(b"\n");
        content.extend_from_slice(b"Planet,\xff\xfe,0.0,1.0e20,1.00,Dwarf,None,0,Ice,1000.00\n");
        content.extend_from_slice(b"Star,SUN,0.000016,1.989e+30,5778.00,Yellow Dwarf,Yellow,1.00,1.00\r\n");
        content.extend_from_slice(b"Galaxy,Milky Way,0.000000,1.500e+42,0.00,Spiral,250000000000,105700.00,13.51");
        fs::write(&path, content).unwrap();

        let mut astronomicon = Astronomicon::new(&path);
        let report = astronomicon.load().unwrap();

        assert_eq!(report.origin, LoadOrigin::File);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.duplicates, 1);
        let skipped: Vec<usize> = report.skipped.iter().map(|s| s.line_number).collect();
        assert_eq!(skipped, [2, 4]);
        assert!(report.skipped[1].reason.contains("UTF-8"));
    }

    #[test]
    fn load_of_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let mut astronomicon = Astronomicon::new(dir.path().join("absent.txt"));
        assert!(astronomicon.load().unwrap_err().is_not_found());
        assert!(astronomicon.is_empty());
    }

    #[test]
    fn json_export_groups_by_variant() {
        let mut astronomicon = Astronomicon::new("unused.txt");
        astronomicon.insert_star(star("Vega"));
        astronomicon.insert_planet(planet("Mars"));

        let json: serde_json::Value = serde_json::from_str(&astronomicon.to_json().unwrap()).unwrap();
        assert_eq!(json["stars"][0]["name"], "Vega");
        assert_eq!(json["planets"][0]["atmosphericComposition"], "Carbon Dioxide");
        assert_eq!(json["galaxies"].as_array().unwrap().len(), 0);
    }
}
