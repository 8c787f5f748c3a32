//! GeoJSON boundaries for the price choropleth
//!
//! Only the parts of GeoJSON the dashboard needs are modelled: a
//! feature collection whose features carry free-form properties and an
//! opaque geometry that is passed through to the map renderer.

use crate::reader::{IoError, IoResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A GeoJSON feature collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "feature_collection_type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

fn feature_collection_type() -> String {
    "FeatureCollection".to_string()
}

/// A single GeoJSON feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub geometry: serde_json::Value,
}

fn feature_type() -> String {
    "Feature".to_string()
}

impl Feature {
    /// Integer property, accepting both numbers and numeric strings
    pub fn property_i64(&self, key: &str) -> Option<i64> {
        match self.properties.get(key)? {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|x| x.fract() == 0.0).map(|x| x as i64)),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FeatureCollection {
    /// Create a collection from features
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: feature_collection_type(),
            features,
        }
    }

    /// Parse a collection from JSON text
    pub fn from_json(text: &str) -> IoResult<Self> {
        let collection: FeatureCollection =
            serde_json::from_str(text).map_err(|e| IoError::InvalidFormat(e.to_string()))?;
        if collection.kind != "FeatureCollection" {
            return Err(IoError::InvalidFormat(format!(
                "Expected a FeatureCollection, got {}",
                collection.kind
            )));
        }
        Ok(collection)
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if the collection has no features
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Where GeoJSON boundaries come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoSource {
    /// Local file
    Path(String),
    /// Remote URL (http or https)
    Url(String),
}

impl GeoSource {
    /// Classify a location string as URL or path
    ///
    /// `file://` URLs become paths; anything that is not an absolute URL is a path.
    pub fn parse(location: &str) -> Self {
        match url::Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => GeoSource::Url(url.to_string()),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => GeoSource::Path(path.display().to_string()),
                Err(()) => GeoSource::Path(location.to_string()),
            },
            _ => GeoSource::Path(location.to_string()),
        }
    }

    /// Load the collection from this source
    pub async fn load(&self) -> IoResult<FeatureCollection> {
        match self {
            GeoSource::Path(path) => load_geojson_file(path),
            GeoSource::Url(url) => fetch_geojson(url).await,
        }
    }
}

/// Load a GeoJSON file
pub fn load_geojson_file(path: impl AsRef<Path>) -> IoResult<FeatureCollection> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::FileNotFound(path.display().to_string()));
    }
    let text = std::fs::read_to_string(path).map_err(|e| IoError::Io(e.to_string()))?;
    let collection = FeatureCollection::from_json(&text)?;
    tracing::info!(path = %path.display(), features = collection.len(), "Loaded GeoJSON");
    Ok(collection)
}

/// Fetch GeoJSON from a URL
#[cfg(feature = "remote")]
pub async fn fetch_geojson(url: &str) -> IoResult<FeatureCollection> {
    let fetch_error = |message: String| IoError::Fetch {
        url: url.to_string(),
        message,
    };

    tracing::info!(url, "Fetching GeoJSON");
    let response = reqwest::get(url)
        .await
        .map_err(|e| fetch_error(e.to_string()))?
        .error_for_status()
        .map_err(|e| fetch_error(e.to_string()))?;
    let text = response.text().await.map_err(|e| fetch_error(e.to_string()))?;

    let collection = FeatureCollection::from_json(&text)?;
    tracing::info!(url, features = collection.len(), "Fetched GeoJSON");
    Ok(collection)
}

/// Fetch GeoJSON from a URL
#[cfg(not(feature = "remote"))]
pub async fn fetch_geojson(url: &str) -> IoResult<FeatureCollection> {
    Err(IoError::Fetch {
        url: url.to_string(),
        message: "built without the `remote` feature".to_string(),
    })
}
