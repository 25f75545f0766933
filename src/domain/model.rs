use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the US zip-code gazetteer.
///
/// Decodes both from the raw CSV (numbers arrive as numbers) and from the
/// converted JSON, where every column was copied verbatim as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipRecord {
    #[serde(deserialize_with = "de_zip")]
    pub zip: String,
    pub city: String,
    pub state_id: String,
    #[serde(deserialize_with = "de_latitude")]
    pub lat: f64,
    #[serde(deserialize_with = "de_longitude")]
    pub lng: f64,
    #[serde(default, deserialize_with = "de_population")]
    pub population: Option<u64>,
}

impl ZipRecord {
    pub fn new(
        zip: impl Into<String>,
        city: impl Into<String>,
        state_id: impl Into<String>,
        lat: f64,
        lng: f64,
        population: Option<u64>,
    ) -> Self {
        Self {
            zip: zip.into(),
            city: city.into(),
            state_id: state_id.into(),
            lat,
            lng,
            population,
        }
    }
}

/// City and state resolved from a zip code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityState {
    pub city: String,
    pub state: String,
}

/// Origin of a nearest-cities ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferencePoint {
    pub lat: f64,
    pub lng: f64,
    pub city: String,
    pub state_id: String,
}

impl From<&ZipRecord> for ReferencePoint {
    fn from(record: &ZipRecord) -> Self {
        Self {
            lat: record.lat,
            lng: record.lng,
            city: record.city.clone(),
            state_id: record.state_id.clone(),
        }
    }
}

/// A directory record paired with its distance (km) from a reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedCity<'a> {
    pub record: &'a ZipRecord,
    pub distance: f64,
}

impl fmt::Display for RankedCity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "city: {}, zipcode: {}, distance: {}, population: {}",
            self.record.city,
            self.record.zip,
            self.distance,
            self.record
                .population
                .map(|p| p.to_string())
                .unwrap_or_default()
        )
    }
}

/// A flat record moved through the reducer pipelines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub processed_records: Vec<Record>,
    pub json_output: String,
}

fn de_zip<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct ZipVisitor;

    impl Visitor<'_> for ZipVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a zip code string or integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(format!("{:05}", v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            u64::try_from(v)
                .map(|v| format!("{:05}", v))
                .map_err(|_| E::custom(format!("negative zip code {}", v)))
        }
    }

    deserializer.deserialize_any(ZipVisitor)
}

fn de_coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    struct CoordinateVisitor;

    impl Visitor<'_> for CoordinateVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a coordinate in degrees")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            if v.is_finite() {
                Ok(v)
            } else {
                Err(E::custom(format!("non-finite coordinate {}", v)))
            }
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            // "NaN" and "inf" parse as f64 but are not coordinates
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|c| c.is_finite())
                .ok_or_else(|| E::custom(format!("invalid coordinate '{}'", v)))
        }
    }

    deserializer.deserialize_any(CoordinateVisitor)
}

fn de_latitude<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    within("latitude", de_coordinate(deserializer)?, 90.0)
}

fn de_longitude<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    within("longitude", de_coordinate(deserializer)?, 180.0)
}

fn within<E: de::Error>(axis: &str, value: f64, limit: f64) -> Result<f64, E> {
    if (-limit..=limit).contains(&value) {
        Ok(value)
    } else {
        Err(E::custom(format!(
            "{} {} outside [-{}, {}]",
            axis, value, limit, limit
        )))
    }
}

fn de_population<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    struct PopulationVisitor;

    impl Visitor<'_> for PopulationVisitor {
        type Value = Option<u64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative population count")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Option<u64>, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Option<u64>, E> {
            u64::try_from(v)
                .map(Some)
                .map_err(|_| E::custom(format!("negative population {}", v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Option<u64>, E> {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
                Ok(Some(v as u64))
            } else {
                Err(E::custom(format!("invalid population {}", v)))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Option<u64>, E> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            v.parse::<u64>()
                .map(Some)
                .map_err(|_| E::custom(format!("invalid population '{}'", v)))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Option<u64>, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Option<u64>, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(PopulationVisitor)
}
