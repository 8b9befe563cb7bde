//! Синтез признака локации
//!
//! Две политики: случайная (фиксированный seed) и сегментация по цене.
//! В сегментации границы считаются целочисленным делением `n / 3` и
//! `2 * n / 3`, поэтому при `n`, не кратном трём, последний сегмент
//! получается больше. Это сохраняется как есть: смена правила молча
//! изменила бы обученную модель.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{PipelineError, Result};
use crate::types::{Dataset, Location, LocationPolicy, LOCATION, LOCATION_SCORE, PRICE};

pub struct LocationAssigner {
    policy: LocationPolicy,
    seed: u64,
}

impl LocationAssigner {
    pub fn new(policy: LocationPolicy, seed: u64) -> Self {
        Self { policy, seed }
    }

    pub fn policy(&self) -> LocationPolicy {
        self.policy
    }

    /// Заполняет `location` и `location_score` для каждой строки.
    ///
    /// Случайная политика сохраняет порядок строк, сегментация возвращает
    /// строки отсортированными по цене.
    pub fn assign(&self, dataset: &Dataset) -> Result<Dataset> {
        let (mut output, locations) = match self.policy {
            LocationPolicy::Random => (dataset.clone(), self.random_locations(dataset.len())),
            LocationPolicy::PriceRank => Self::rank_locations(dataset)?,
        };

        let labels = locations.iter().map(|l| l.label().to_string()).collect();
        let scores = locations.iter().map(|l| l.score().to_string()).collect();
        output.set_column(LOCATION, labels)?;
        output.set_column(LOCATION_SCORE, scores)?;

        Self::verify(&output)?;
        tracing::debug!("Assigned locations to {} rows ({:?})", output.len(), self.policy);
        Ok(output)
    }

    fn random_locations(&self, n: usize) -> Vec<Location> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..n)
            .map(|_| Location::ALL[rng.gen_range(0..Location::ALL.len())])
            .collect()
    }

    fn rank_locations(dataset: &Dataset) -> Result<(Dataset, Vec<Location>)> {
        let prices = dataset.numeric_column(PRICE)?;

        let mut order: Vec<usize> = (0..dataset.len()).collect();
        order.sort_by(|&a, &b| prices[a].total_cmp(&prices[b]));

        let rows = order.iter().map(|&i| dataset.rows()[i].clone()).collect();
        let n = order.len();
        let locations = (0..n).map(|i| Self::segment_location(i, n)).collect();

        Ok((dataset.with_rows(rows), locations))
    }

    /// Границы сегментов: `[0, a)` Atlanta, `[a, b)` Florida, `[b, n)` New York
    pub fn segment_bounds(n: usize) -> (usize, usize) {
        (n / 3, 2 * n / 3)
    }

    pub fn segment_location(index: usize, n: usize) -> Location {
        let (first, second) = Self::segment_bounds(n);
        if index < first {
            Location::Atlanta
        } else if index < second {
            Location::Florida
        } else {
            Location::NewYork
        }
    }

    /// Проверка, что каждая метка из закрытого набора, а балл ей соответствует
    pub fn verify(dataset: &Dataset) -> Result<()> {
        let location_idx = dataset.column_index(LOCATION)?;
        let score_idx = dataset.column_index(LOCATION_SCORE)?;

        for (row, cells) in dataset.rows().iter().enumerate() {
            let label = cells.get(location_idx).map(String::as_str).unwrap_or("");
            let location: Location = label.parse()?;

            let score = cells.get(score_idx).map(|s| s.trim()).unwrap_or("");
            if score.parse::<i64>().ok() != Some(location.score()) {
                return Err(PipelineError::InvalidValue {
                    column: LOCATION_SCORE.to_string(),
                    row,
                    value: score.to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::DataLoader;

    fn dataset(prices: &[u32]) -> Dataset {
        let mut csv = String::from("price,area,bedrooms\n");
        for (i, p) in prices.iter().enumerate() {
            csv.push_str(&format!("{},{},{}\n", p, 1000 + i, 1 + i % 4));
        }
        DataLoader::read(csv.as_bytes()).unwrap()
    }

    fn labels(ds: &Dataset) -> Vec<String> {
        let idx = ds.column_index(LOCATION).unwrap();
        ds.rows().iter().map(|r| r[idx].clone()).collect()
    }

    #[test]
    fn test_rank_segmentation_of_nine() {
        let ds = dataset(&[900, 100, 800, 200, 700, 300, 600, 400, 500]);
        let out = LocationAssigner::new(LocationPolicy::PriceRank, 42)
            .assign(&ds)
            .unwrap();

        let prices = out.numeric_column(PRICE).unwrap();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));

        let expected = [
            "Atlanta", "Atlanta", "Atlanta", "Florida", "Florida", "Florida", "New York",
            "New York", "New York",
        ];
        assert_eq!(labels(&out), expected);
        assert_eq!(LocationAssigner::segment_location(2, 9), Location::Atlanta);
        assert_eq!(LocationAssigner::segment_location(3, 9), Location::Florida);
        assert_eq!(LocationAssigner::segment_location(5, 9), Location::Florida);
        assert_eq!(LocationAssigner::segment_location(6, 9), Location::NewYork);
    }

    #[test]
    fn test_integer_division_boundaries() {
        assert_eq!(LocationAssigner::segment_bounds(10), (3, 6));
        assert_eq!(LocationAssigner::segment_bounds(11), (3, 7));
        assert_eq!(LocationAssigner::segment_bounds(2), (0, 1));
        assert_eq!(LocationAssigner::segment_location(0, 1), Location::NewYork);
    }

    #[test]
    fn test_segmentation_covers_every_row_once() {
        let ds = dataset(&[5, 3, 9, 1, 7, 2, 8, 6, 4, 10, 11]);
        let out = LocationAssigner::new(LocationPolicy::PriceRank, 0)
            .assign(&ds)
            .unwrap();
        assert_eq!(out.len(), ds.len());

        let mut original: Vec<Vec<String>> = ds.rows().to_vec();
        let mut assigned: Vec<Vec<String>> =
            out.rows().iter().map(|r| r[..3].to_vec()).collect();
        original.sort();
        assigned.sort();
        assert_eq!(original, assigned);

        let (a, b) = LocationAssigner::segment_bounds(out.len());
        let l = labels(&out);
        assert!(l[..a].iter().all(|x| x == "Atlanta"));
        assert!(l[a..b].iter().all(|x| x == "Florida"));
        assert!(l[b..].iter().all(|x| x == "New York"));
    }

    #[test]
    fn test_random_policy_is_reproducible_and_keeps_order() {
        let ds = dataset(&[5, 3, 9, 1, 7, 2, 8, 6, 4, 10, 11, 12]);
        let assigner = LocationAssigner::new(LocationPolicy::Random, 42);

        let first = assigner.assign(&ds).unwrap();
        let second = assigner.assign(&ds).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.numeric_column(PRICE).unwrap(), ds.numeric_column(PRICE).unwrap());
    }

    #[test]
    fn test_scores_follow_mapping() {
        let ds = dataset(&[1, 2, 3, 4, 5, 6, 7]);
        for policy in [LocationPolicy::Random, LocationPolicy::PriceRank] {
            let out = LocationAssigner::new(policy, 7).assign(&ds).unwrap();
            for record in out.records().unwrap() {
                let location = record.location.unwrap();
                assert_eq!(record.location_score, Some(location.score()));
            }
        }
    }

    #[test]
    fn test_existing_location_columns_are_overwritten() {
        let ds = dataset(&[3, 2, 1]);
        let assigner = LocationAssigner::new(LocationPolicy::PriceRank, 42);
        let once = assigner.assign(&ds).unwrap();
        let twice = assigner.assign(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.headers().len(), 5);
    }

    #[test]
    fn test_verify_rejects_unknown_label_and_wrong_score() {
        let ds = DataLoader::read("price,location,location_score\n1,Boston,9\n".as_bytes()).unwrap();
        assert!(matches!(
            LocationAssigner::verify(&ds),
            Err(PipelineError::UnknownLocation(_))
        ));

        let ds = DataLoader::read("price,location,location_score\n1,Atlanta,9\n".as_bytes()).unwrap();
        assert!(matches!(
            LocationAssigner::verify(&ds),
            Err(PipelineError::InvalidValue { .. })
        ));
    }
}
