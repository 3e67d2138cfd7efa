use std::path::PathBuf;

use geo::{BoundingRect, Centroid, Contains, Geometry, MultiPolygon, Point, Rect};
use geojson::{GeoJson, JsonObject};
use tracing::{info, warn};

use crate::countries;
use crate::error::MapError;

/// Property names that may hold a country code, checked in order.
pub const CODE_PROPERTIES: [&str; 5] = ["ISO_A2", "iso_a2", "ADM0_A3", "SOV_A3", "ISO_A3"];
const NAME_PROPERTIES: [&str; 4] = ["NAME", "name", "NAME_EN", "ADMIN"];

/// Spacing of interior fill samples, in degrees.
const SAMPLE_STEP_DEGREES: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct CountryFeature {
    pub code: Option<String>,
    pub name: String,
    pub shape: MultiPolygon<f64>,
    pub samples: Vec<(f64, f64)>,
    bbox: Option<Rect<f64>>,
}

impl CountryFeature {
    pub fn new(code: Option<String>, name: String, shape: MultiPolygon<f64>) -> Self {
        let bbox = shape.bounding_rect();
        let samples = interior_samples(&shape, bbox);
        Self {
            code,
            name,
            shape,
            samples,
            bbox,
        }
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let inside_bbox = self.bbox.is_some_and(|bbox| {
            lon >= bbox.min().x && lon <= bbox.max().x && lat >= bbox.min().y && lat <= bbox.max().y
        });
        inside_bbox && self.shape.contains(&Point::new(lon, lat))
    }

    /// Exterior ring segments, closed.
    pub fn outline(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        self.shape.0.iter().flat_map(|polygon| {
            let ring = &polygon.exterior().0;
            let closing = match (ring.last(), ring.first()) {
                (Some(last), Some(first)) if last != first => Some((*last, *first)),
                _ => None,
            };
            ring.windows(2)
                .map(|pair| (pair[0], pair[1]))
                .chain(closing)
                .map(|(a, b)| ((a.x, a.y), (b.x, b.y)))
        })
    }
}

fn interior_samples(shape: &MultiPolygon<f64>, bbox: Option<Rect<f64>>) -> Vec<(f64, f64)> {
    let Some(bbox) = bbox else {
        return Vec::new();
    };

    let mut samples = Vec::new();
    let start_x = (bbox.min().x / SAMPLE_STEP_DEGREES).ceil() * SAMPLE_STEP_DEGREES;
    let start_y = (bbox.min().y / SAMPLE_STEP_DEGREES).ceil() * SAMPLE_STEP_DEGREES;

    let mut y = start_y;
    while y <= bbox.max().y {
        let mut x = start_x;
        while x <= bbox.max().x {
            if shape.contains(&Point::new(x, y)) {
                samples.push((x, y));
            }
            x += SAMPLE_STEP_DEGREES;
        }
        y += SAMPLE_STEP_DEGREES;
    }

    // Countries smaller than the grid still get one dot.
    if samples.is_empty() {
        if let Some(centroid) = shape.centroid() {
            samples.push((centroid.x(), centroid.y()));
        }
    }

    samples
}

/// First usable code property, alpha-3 codes mapped to alpha-2 when known.
pub fn feature_code(properties: &JsonObject) -> Option<String> {
    CODE_PROPERTIES.iter().find_map(|key| {
        let value = properties.get(*key)?.as_str()?.trim();
        if value.is_empty() || value == "-99" {
            return None;
        }
        let code = value.to_ascii_uppercase();
        match code.len() {
            3 => Some(
                countries::alpha2_from_alpha3(&code)
                    .map_or(code, str::to_string),
            ),
            _ => Some(code),
        }
    })
}

pub fn feature_name(properties: &JsonObject) -> String {
    NAME_PROPERTIES
        .iter()
        .find_map(|key| {
            properties
                .get(*key)
                .and_then(|value| value.as_str())
                .filter(|value| !value.trim().is_empty())
        })
        .unwrap_or("Unknown Country")
        .to_string()
}

/// Country polygons loaded once for the lifetime of the map.
#[derive(Debug, Clone, Default)]
pub struct WorldTopology {
    features: Vec<CountryFeature>,
}

impl WorldTopology {
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let raw = text
            .parse::<GeoJson>()
            .map_err(|err| MapError::Parse(err.to_string()))?;
        Self::from_geojson(raw)
    }

    pub fn from_geojson(raw: GeoJson) -> Result<Self, MapError> {
        let GeoJson::FeatureCollection(collection) = raw else {
            return Err(MapError::Parse("expected a FeatureCollection".to_string()));
        };

        let mut features = Vec::new();
        for feature in collection.features {
            let Some(geometry) = feature.geometry else {
                continue;
            };
            let geometry: Geometry<f64> = geometry
                .value
                .try_into()
                .map_err(|err: geojson::Error| MapError::Parse(err.to_string()))?;
            let shape = match geometry {
                Geometry::Polygon(polygon) => MultiPolygon(vec![polygon]),
                Geometry::MultiPolygon(multi) => multi,
                _ => continue,
            };

            let (code, name) = feature.properties.as_ref().map_or_else(
                || (None, "Unknown Country".to_string()),
                |properties| (feature_code(properties), feature_name(properties)),
            );
            features.push(CountryFeature::new(code, name, shape));
        }

        if features.is_empty() {
            return Err(MapError::Empty);
        }
        Ok(Self { features })
    }

    pub fn features(&self) -> &[CountryFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn position(&self, code: &str) -> Option<usize> {
        self.features
            .iter()
            .position(|feature| feature.code.as_deref() == Some(code))
    }

    pub fn hit_test(&self, lon: f64, lat: f64) -> Option<usize> {
        self.features
            .iter()
            .position(|feature| feature.contains(lon, lat))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologySource {
    File(PathBuf),
    Url(String),
}

impl TopologySource {
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }

    async fn read(&self, client: &reqwest::Client) -> Result<String, MapError> {
        let fetch_error = |message: String| MapError::Fetch {
            source_name: self.describe(),
            message,
        };

        match self {
            Self::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|err| fetch_error(err.to_string())),
            Self::Url(url) => {
                let response = client
                    .get(url)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|err| fetch_error(err.to_string()))?;
                response.text().await.map_err(|err| fetch_error(err.to_string()))
            }
        }
    }
}

/// Load from `primary`, then try `fallback` once before giving up.
pub async fn load_topology(
    client: &reqwest::Client,
    primary: &TopologySource,
    fallback: Option<&TopologySource>,
) -> Result<WorldTopology, MapError> {
    match load_from(client, primary).await {
        Ok(topology) => Ok(topology),
        Err(err) => {
            let Some(fallback) = fallback else {
                return Err(err);
            };
            warn!(source = %primary.describe(), error = %err, "topology load failed, trying fallback");
            load_from(client, fallback).await
        }
    }
}

async fn load_from(
    client: &reqwest::Client,
    source: &TopologySource,
) -> Result<WorldTopology, MapError> {
    let text = source.read(client).await?;
    let topology = WorldTopology::parse(&text)?;
    info!(source = %source.describe(), countries = topology.len(), "topology loaded");
    Ok(topology)
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Two square "countries" and one without a usable code.
    pub const SQUARES: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {"type": "Feature",
         "properties": {"ISO_A2": "US", "NAME": "United States"},
         "geometry": {"type": "Polygon", "coordinates": [[[-120,30],[-80,30],[-80,50],[-120,50],[-120,30]]]}},
        {"type": "Feature",
         "properties": {"ISO_A2": "-99", "ADM0_A3": "GBR", "NAME": "United Kingdom"},
         "geometry": {"type": "MultiPolygon", "coordinates": [[[[-6,50],[2,50],[2,58],[-6,58],[-6,50]]]]}},
        {"type": "Feature",
         "properties": {"ISO_A2": "BR", "ADMIN": "Brazil"},
         "geometry": {"type": "Polygon", "coordinates": [[[-70,-30],[-40,-30],[-40,0],[-70,0],[-70,-30]]]}},
        {"type": "Feature",
         "properties": {"NAME": "Somewhere"},
         "geometry": {"type": "Polygon", "coordinates": [[[100,-10],[110,-10],[110,0],[100,0],[100,-10]]]}},
        {"type": "Feature",
         "properties": {"ISO_A2": "XX"},
         "geometry": {"type": "Point", "coordinates": [0, 0]}}
      ]
    }"#;
}
