//! Ordering of result sets.

use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use crate::searcher::TorrentRecord;

/// How to order a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortCriterion {
    Newest,
    Oldest,
    MostSeeded,
    Largest,
    Smallest,
    Random,
}

impl SortCriterion {
    pub const ALL: [SortCriterion; 6] = [
        SortCriterion::Newest,
        SortCriterion::Oldest,
        SortCriterion::MostSeeded,
        SortCriterion::Largest,
        SortCriterion::Smallest,
        SortCriterion::Random,
    ];

    /// Single-letter menu key.
    pub fn key(&self) -> char {
        match self {
            SortCriterion::Newest => 'n',
            SortCriterion::Oldest => 'o',
            SortCriterion::MostSeeded => 's',
            SortCriterion::Largest => 'l',
            SortCriterion::Smallest => 'm',
            SortCriterion::Random => 'r',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortCriterion::Newest => "By newest",
            SortCriterion::Oldest => "By oldest",
            SortCriterion::MostSeeded => "By most seeded",
            SortCriterion::Largest => "By largest file",
            SortCriterion::Smallest => "By smallest file",
            SortCriterion::Random => "By random",
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortCriterion::Newest => "newest",
            SortCriterion::Oldest => "oldest",
            SortCriterion::MostSeeded => "most-seeded",
            SortCriterion::Largest => "largest",
            SortCriterion::Smallest => "smallest",
            SortCriterion::Random => "random",
        };
        f.write_str(name)
    }
}

impl FromStr for SortCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SortCriterion::ALL
            .into_iter()
            .find(|c| wanted == c.key().to_string() || wanted == c.to_string())
            .ok_or_else(|| format!("unknown sort criterion: {s}"))
    }
}

/// Order `records` by `criterion`.
///
/// Every criterion except `Random` is a stable sort, so ties keep their
/// input order. `Random` shuffles with `rng`.
pub fn sort_records<R: Rng + ?Sized>(
    mut records: Vec<TorrentRecord>,
    criterion: SortCriterion,
    rng: &mut R,
) -> Vec<TorrentRecord> {
    match criterion {
        SortCriterion::Newest => records.sort_by_key(|r| Reverse(r.upload_timestamp)),
        SortCriterion::Oldest => records.sort_by_key(|r| r.upload_timestamp),
        SortCriterion::MostSeeded => records.sort_by_key(|r| Reverse(r.seeders)),
        SortCriterion::Largest => records.sort_by_key(|r| Reverse(r.size_bytes)),
        SortCriterion::Smallest => records.sort_by_key(|r| r.size_bytes),
        SortCriterion::Random => records.shuffle(rng),
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn with(name: &str, added: i64, seeders: u32, size: u64) -> TorrentRecord {
        let mut record = fixtures::record(name, name);
        record.upload_timestamp = added;
        record.seeders = seeders;
        record.size_bytes = size;
        record
    }

    fn names(records: &[TorrentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_most_seeded() {
        let mut rng = StdRng::seed_from_u64(1);
        let records = vec![with("a", 0, 5, 0), with("b", 0, 20, 0), with("c", 0, 1, 0)];
        let sorted = sort_records(records, SortCriterion::MostSeeded, &mut rng);
        let seeders: Vec<_> = sorted.iter().map(|r| r.seeders).collect();
        assert_eq!(seeders, vec![20, 5, 1]);
    }

    #[test]
    fn test_newest_then_oldest_round_trip() {
        let mut rng = StdRng::seed_from_u64(1);
        let records = vec![with("a", 10, 0, 0), with("b", 30, 0, 0), with("c", 20, 0, 0)];

        let newest = sort_records(records, SortCriterion::Newest, &mut rng);
        assert_eq!(names(&newest), vec!["b", "c", "a"]);

        let oldest = sort_records(newest, SortCriterion::Oldest, &mut rng);
        assert_eq!(names(&oldest), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let records = vec![with("a", 0, 0, 7), with("b", 0, 0, 9), with("c", 0, 0, 7)];

        let largest = sort_records(records.clone(), SortCriterion::Largest, &mut rng);
        assert_eq!(names(&largest), vec!["b", "a", "c"]);

        let smallest = sort_records(records, SortCriterion::Smallest, &mut rng);
        assert_eq!(names(&smallest), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let records: Vec<_> = (0..10).map(|i| with(&i.to_string(), i, 0, 0)).collect();

        let first = sort_records(
            records.clone(),
            SortCriterion::Random,
            &mut StdRng::seed_from_u64(42),
        );
        let second = sort_records(
            records.clone(),
            SortCriterion::Random,
            &mut StdRng::seed_from_u64(42),
        );
        assert_eq!(first, second);

        let mut shuffled = names(&first);
        shuffled.sort();
        let mut original = names(&records);
        original.sort();
        assert_eq!(shuffled, original);
    }

    #[test]
    fn test_parse_criterion() {
        assert_eq!("n".parse::<SortCriterion>().unwrap(), SortCriterion::Newest);
        assert_eq!("M".parse::<SortCriterion>().unwrap(), SortCriterion::Smallest);
        assert_eq!(
            "most-seeded".parse::<SortCriterion>().unwrap(),
            SortCriterion::MostSeeded
        );
        assert!("x".parse::<SortCriterion>().is_err());
    }
}
