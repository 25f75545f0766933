use crate::core::directory::ZipDirectory;
use crate::core::ranker::{find_closest_cities, DedupPolicy};
use crate::domain::model::{CityState, RankedCity, ReferencePoint, ZipRecord};
use crate::utils::error::{GazetteerError, Result};
use std::io::Write;

/// Everything a city query produces: its zip codes and the cities around it.
#[derive(Debug, Clone)]
pub struct CityReport<'a> {
    pub city: String,
    pub state: Option<String>,
    pub zips: Vec<&'a ZipRecord>,
    pub reference: ReferencePoint,
    pub nearest: Vec<RankedCity<'a>>,
}

impl CityReport<'_> {
    pub fn zip_codes(&self) -> Vec<&str> {
        self.zips.iter().map(|r| r.zip.as_str()).collect()
    }

    /// Print the zip list and the ranking, one item per line, then `done`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        match &self.state {
            Some(state) => writeln!(out, "Zipcodes for {}, {}:", self.city, state)?,
            None => writeln!(out, "Zipcodes for {}:", self.city)?,
        }
        for record in &self.zips {
            writeln!(out, "  {}", record.zip)?;
        }

        writeln!(out, "Nearest cities:")?;
        for ranked in &self.nearest {
            writeln!(out, "  {}", ranked)?;
        }

        writeln!(out, "done")
    }
}

/// Reverse lookup; a miss is an error, as with [`resolve_city`].
pub fn resolve_zip(directory: &ZipDirectory, zip: &str) -> Result<CityState> {
    directory
        .lookup_city_state_by_zip(zip)
        .ok_or_else(|| GazetteerError::ZipNotFound {
            zip: zip.to_string(),
        })
}

pub fn write_zip_lookup<W: Write>(out: &mut W, zip: &str, city_state: &CityState) -> std::io::Result<()> {
    writeln!(out, "{}: {}, {}", zip, city_state.city, city_state.state)?;
    writeln!(out, "done")
}

/// Look up a city and rank the cities nearest to its first zip record.
///
/// Unlike [`ZipDirectory::find_by_city`], no match is an error here since
/// there is nothing to rank from.
pub fn resolve_city<'a>(
    directory: &'a ZipDirectory,
    city: &str,
    state: Option<&str>,
    top_n: usize,
    policy: DedupPolicy,
) -> Result<CityReport<'a>> {
    let state = state.filter(|s| !s.is_empty());
    let zips = directory.find_by_city(city, state);

    let first = zips.first().ok_or_else(|| GazetteerError::CityNotFound {
        city: city.to_string(),
        state: state.map(str::to_string),
    })?;
    tracing::debug!("{} zip codes match {}; reference zip {}", zips.len(), city, first.zip);

    let reference = ReferencePoint::from(*first);
    let nearest = find_closest_cities(directory, &reference, top_n, policy);

    Ok(CityReport {
        city: city.to_string(),
        state: state.map(str::to_string),
        zips,
        reference,
        nearest,
    })
}
