use crate::core::{Pipeline, Record, Storage, TransformResult};
use crate::utils::error::{GazetteerError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Boundary datasets that get reduced to their property tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Counties,
    Places,
    States,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [Self::Counties, Self::Places, Self::States];

    pub fn name(self) -> &'static str {
        match self {
            Self::Counties => "counties",
            Self::Places => "places",
            Self::States => "states",
        }
    }

    pub fn default_input(self) -> &'static str {
        match self {
            Self::Counties => "county.json",
            Self::Places => "place.json",
            Self::States => "state.json",
        }
    }

    pub fn default_output(self) -> &'static str {
        match self {
            Self::Counties => "county_limited.json",
            Self::Places => "place_limited.json",
            Self::States => "state_limited.json",
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

/// Strips a GeoJSON FeatureCollection down to the `properties` of each feature.
pub struct FeatureReducer<S: Storage> {
    storage: S,
    kind: DatasetKind,
    input: String,
    output: String,
}

impl<S: Storage> FeatureReducer<S> {
    pub fn new(storage: S, kind: DatasetKind) -> Self {
        Self {
            storage,
            kind,
            input: kind.default_input().to_string(),
            output: kind.default_output().to_string(),
        }
    }

    pub fn with_paths(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input = input.into();
        self.output = output.into();
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for FeatureReducer<S> {
    fn name(&self) -> &str {
        self.kind.name()
    }

    async fn extract(&self) -> Result<Vec<Record>> {
        tracing::debug!("Reading feature collection from {}", self.input);
        let data = self
            .storage
            .read_file(&self.input)
            .await
            .map_err(|e| GazetteerError::load(&self.input, e))?;

        let collection: FeatureCollection =
            serde_json::from_slice(&data).map_err(|e| GazetteerError::load(&self.input, e))?;

        Ok(collection
            .features
            .into_iter()
            .map(|feature| Record {
                data: feature.properties.unwrap_or_default(),
            })
            .collect())
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        let json_output = serde_json::to_string(&data)?;
        Ok(TransformResult {
            processed_records: data,
            json_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        tracing::debug!(
            "Writing {} property records ({} bytes) to {}",
            result.processed_records.len(),
            result.json_output.len(),
            self.output
        );
        self.storage
            .write_file(&self.output, result.json_output.as_bytes())
            .await?;
        Ok(self.output.clone())
    }
}

/// Converts the gazetteer CSV into a JSON array of header -> value objects.
///
/// Every field is copied verbatim as a string.
pub struct CsvImport<S: Storage> {
    storage: S,
    input: String,
    output: String,
}

impl<S: Storage> CsvImport<S> {
    pub const DEFAULT_INPUT: &'static str = "uszips.csv";
    pub const DEFAULT_OUTPUT: &'static str = "uszips.json";

    pub fn new(storage: S) -> Self {
        Self {
            storage,
            input: Self::DEFAULT_INPUT.to_string(),
            output: Self::DEFAULT_OUTPUT.to_string(),
        }
    }

    pub fn with_paths(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input = input.into();
        self.output = output.into();
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for CsvImport<S> {
    fn name(&self) -> &str {
        "zips"
    }

    async fn extract(&self) -> Result<Vec<Record>> {
        tracing::debug!("Reading CSV from {}", self.input);
        let data = self
            .storage
            .read_file(&self.input)
            .await
            .map_err(|e| GazetteerError::load(&self.input, e))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(data.as_slice());
        let headers = reader
            .headers()
            .map_err(|e| GazetteerError::load(&self.input, e))?
            .clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| GazetteerError::load(&self.input, e))?;
            let data = headers
                .iter()
                .zip(row.iter())
                .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
                .collect();
            records.push(Record { data });
        }

        Ok(records)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        let json_output = serde_json::to_string(&data)?;
        Ok(TransformResult {
            processed_records: data,
            json_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        tracing::debug!(
            "Writing {} zip rows to {}",
            result.processed_records.len(),
            self.output
        );
        self.storage
            .write_file(&self.output, result.json_output.as_bytes())
            .await?;
        Ok(self.output.clone())
    }
}
