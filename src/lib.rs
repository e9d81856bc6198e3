pub mod astronomicon;
pub mod config;
pub mod error;
pub mod log;
pub mod models;
pub mod record;
pub mod yaml_util;

pub use astronomicon::{Astronomicon, InsertOutcome, LoadOrigin, LoadReport, SkippedLine};
pub use config::Config;
pub use error::{CatalogError, CatalogResult};
pub use models::{Body, BodyCore, BodyKind, BodyMetric, BodyRef, CelestialBody, Galaxy, Planet, Star};
