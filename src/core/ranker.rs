use crate::core::directory::ZipDirectory;
use crate::core::geo::haversine;
use crate::domain::model::{RankedCity, ReferencePoint, ZipRecord};
use std::collections::HashSet;

pub const DEFAULT_TOP_N: usize = 10;

/// How two records are decided to be "the same city".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Name only: Springfield IL and Springfield MO collapse into one entry.
    CityName,
    /// Name plus state.
    #[default]
    CityAndState,
}

impl DedupPolicy {
    fn key<'a>(self, city: &'a str, state_id: &'a str) -> (&'a str, Option<&'a str>) {
        match self {
            Self::CityName => (city, None),
            Self::CityAndState => (city, Some(state_id)),
        }
    }

    fn is_reference(self, record: &ZipRecord, reference: &ReferencePoint) -> bool {
        self.key(&record.city, &record.state_id) == self.key(&reference.city, &reference.state_id)
    }
}

/// Up to `top_n` distinct cities nearest to `reference`, closest first.
///
/// The reference city itself is skipped. Equal distances keep directory
/// order, and each city is represented by its nearest record.
pub fn find_closest_cities<'a>(
    directory: &'a ZipDirectory,
    reference: &ReferencePoint,
    top_n: usize,
    policy: DedupPolicy,
) -> Vec<RankedCity<'a>> {
    if top_n == 0 {
        return Vec::new();
    }

    let mut distances: Vec<RankedCity<'a>> = directory
        .iter()
        .filter(|record| !policy.is_reference(record, reference))
        .map(|record| RankedCity {
            record,
            distance: haversine(reference.lat, reference.lng, record.lat, record.lng),
        })
        .collect();

    // sort_by is stable: ties stay in directory order
    distances.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let mut nearest = Vec::with_capacity(top_n.min(distances.len()));
    let mut used = HashSet::new();
    for ranked in distances {
        if used.insert(policy.key(&ranked.record.city, &ranked.record.state_id)) {
            nearest.push(ranked);
            if nearest.len() == top_n {
                break;
            }
        }
    }

    tracing::debug!(
        "Ranked {} nearest cities to {}, {} ({:?})",
        nearest.len(),
        reference.city,
        reference.state_id,
        policy
    );
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn springfield_directory() -> ZipDirectory {
        ZipDirectory::from_records(vec![
            ZipRecord::new("62701", "Springfield", "IL", 39.78, -89.65, Some(116_000)),
            ZipRecord::new("62629", "Chatham", "IL", 39.67, -89.70, Some(13_000)),
            ZipRecord::new("65801", "Springfield", "MO", 37.21, -93.30, Some(169_000)),
            ZipRecord::new("14604", "Rochester", "NY", 43.15, -77.60, Some(211_000)),
        ])
    }

    fn reference_of(dir: &ZipDirectory, zip: &str) -> ReferencePoint {
        ReferencePoint::from(dir.find_by_zip(zip).unwrap())
    }

    fn cities<'a>(ranked: &[RankedCity<'a>]) -> Vec<(&'a str, &'a str)> {
        ranked
            .iter()
            .map(|r| (r.record.city.as_str(), r.record.state_id.as_str()))
            .collect()
    }

    #[test]
    fn test_name_policy_drops_every_same_named_city() {
        let dir = springfield_directory();
        let reference = reference_of(&dir, "62701");

        let ranked = find_closest_cities(&dir, &reference, 10, DedupPolicy::CityName);
        assert_eq!(cities(&ranked), vec![("Chatham", "IL"), ("Rochester", "NY")]);
    }

    #[test]
    fn test_state_policy_keeps_other_states_springfield() {
        let dir = springfield_directory();
        let reference = reference_of(&dir, "62701");

        let ranked = find_closest_cities(&dir, &reference, 2, DedupPolicy::CityAndState);
        assert_eq!(cities(&ranked), vec![("Chatham", "IL"), ("Springfield", "MO")]);
    }

    #[test]
    fn test_dedup_keeps_nearest_record_per_city() {
        let dir = ZipDirectory::from_records(vec![
            ZipRecord::new("00001", "Origin", "AA", 0.0, 0.0, None),
            ZipRecord::new("00002", "Far", "AA", 0.0, 3.0, None),
            ZipRecord::new("00003", "Near", "AA", 0.0, 1.0, None),
            ZipRecord::new("00004", "Far", "AA", 0.0, 2.0, None),
            ZipRecord::new("00005", "Near", "AA", 0.0, 1.5, None),
        ]);
        let reference = reference_of(&dir, "00001");

        let ranked = find_closest_cities(&dir, &reference, 10, DedupPolicy::CityName);
        let zips: Vec<&str> = ranked.iter().map(|r| r.record.zip.as_str()).collect();
        assert_eq!(zips, vec!["00003", "00004"]);
    }

    #[test]
    fn test_ties_keep_directory_order() {
        let dir = ZipDirectory::from_records(vec![
            ZipRecord::new("00001", "Origin", "AA", 0.0, 0.0, None),
            ZipRecord::new("00002", "East", "AA", 0.0, 1.0, None),
            ZipRecord::new("00003", "West", "AA", 0.0, -1.0, None),
            ZipRecord::new("00004", "North", "AA", 1.0, 0.0, None),
        ]);
        let reference = reference_of(&dir, "00001");

        let ranked = find_closest_cities(&dir, &reference, 2, DedupPolicy::CityName);
        assert_eq!(cities(&ranked), vec![("East", "AA"), ("West", "AA")]);
    }

    #[test]
    fn test_output_properties() {
        let mut records = Vec::new();
        for i in 0..40u32 {
            let city = format!("City{}", i % 13);
            let lat = 30.0 + f64::from(i) * 0.37;
            let lng = -100.0 + f64::from(i % 7) * 1.1;
            records.push(ZipRecord::new(format!("{:05}", i), city, "TX", lat, lng, None));
        }
        let dir = ZipDirectory::from_records(records);
        let reference = reference_of(&dir, "00005");

        for top_n in [1, 3, 12, 50] {
            let ranked = find_closest_cities(&dir, &reference, top_n, DedupPolicy::CityName);

            assert!(ranked.len() <= top_n);
            assert!(ranked.len() <= 12);
            assert!(ranked.iter().all(|r| r.record.city != reference.city));
            assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance));

            let unique: HashSet<&str> = ranked.iter().map(|r| r.record.city.as_str()).collect();
            assert_eq!(unique.len(), ranked.len());
        }
    }

    #[test]
    fn test_empty_inputs() {
        let empty = ZipDirectory::default();
        let reference = ReferencePoint {
            lat: 0.0,
            lng: 0.0,
            city: "Anywhere".to_string(),
            state_id: "AA".to_string(),
        };
        let ranked = find_closest_cities(&empty, &reference, DEFAULT_TOP_N, DedupPolicy::CityName);
        assert!(ranked.is_empty());

        let dir = springfield_directory();
        assert!(find_closest_cities(&dir, &reference, 0, DedupPolicy::CityName).is_empty());
    }
}
