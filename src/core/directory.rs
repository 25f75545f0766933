use crate::domain::model::{CityState, ZipRecord};
use crate::domain::ports::Storage;
use crate::utils::error::{GazetteerError, Result};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Fail the load on a repeated zip code instead of keeping every row.
    pub reject_duplicate_zips: bool,
}

/// Read-only, ordered collection of zip-code records.
///
/// Source order is kept as-is; lookups and ranking tie-breaks rely on it.
#[derive(Debug, Clone, Default)]
pub struct ZipDirectory {
    records: Vec<ZipRecord>,
}

impl ZipDirectory {
    pub fn from_records(records: Vec<ZipRecord>) -> Self {
        Self { records }
    }

    /// Load from storage, picking the decoder by file extension.
    pub async fn load<S: Storage>(storage: &S, path: &str, options: LoadOptions) -> Result<Self> {
        let format = SourceFormat::from_path(path)?;

        tracing::debug!("Reading zip source {} ({:?})", path, format);
        let data = storage
            .read_file(path)
            .await
            .map_err(|e| GazetteerError::load(path, e))?;

        let directory = match format {
            SourceFormat::Csv => Self::from_csv_reader(data.as_slice()),
            SourceFormat::Json => Self::from_json_slice(&data),
        }
        .map_err(|e| match e {
            GazetteerError::LoadError { .. } => e,
            other => GazetteerError::load(path, other),
        })?;

        directory.check_duplicates(options)?;
        tracing::info!("Loaded {} zip records from {}", directory.len(), path);
        Ok(directory)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let records = csv_reader
            .deserialize::<ZipRecord>()
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

        Ok(Self::from_records(records))
    }

    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        let records: Vec<ZipRecord> = serde_json::from_slice(data)?;
        Ok(Self::from_records(records))
    }

    fn check_duplicates(&self, options: LoadOptions) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.records.len());
        let mut duplicates = 0usize;

        for record in &self.records {
            if !seen.insert(record.zip.as_str()) {
                if options.reject_duplicate_zips {
                    return Err(GazetteerError::DuplicateZipError {
                        zip: record.zip.clone(),
                    });
                }
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            tracing::warn!(
                "⚠️ {} duplicate zip codes kept; lookups by zip return the first occurrence",
                duplicates
            );
        }
        Ok(())
    }

    /// Every record whose city matches exactly, optionally restricted to a state.
    ///
    /// An empty `state` counts as no filter. Never fails; no match is an empty vec.
    pub fn find_by_city(&self, city: &str, state: Option<&str>) -> Vec<&ZipRecord> {
        let state = state.filter(|s| !s.is_empty());

        self.records
            .iter()
            .filter(|r| r.city == city)
            .filter(|r| state.is_none_or(|s| r.state_id == s))
            .collect()
    }

    pub fn find_by_zip(&self, zip: &str) -> Option<&ZipRecord> {
        self.records.iter().find(|r| r.zip == zip)
    }

    pub fn lookup_city_state_by_zip(&self, zip: &str) -> Option<CityState> {
        match self.find_by_zip(zip) {
            Some(record) => {
                tracing::debug!("Zip {} resolved to {:?}", zip, record);
                Some(CityState {
                    city: record.city.clone(),
                    state: record.state_id.clone(),
                })
            }
            None => {
                tracing::info!("No information found for zipcode {}", zip);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ZipRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ZipRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a ZipDirectory {
    type Item = &'a ZipRecord;
    type IntoIter = std::slice::Iter<'a, ZipRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    fn from_path(path: &str) -> Result<Self> {
        match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(GazetteerError::UnsupportedFormatError {
                path: path.to_string(),
            }),
        }
    }
}
