//! Per-group aggregates over normalized breeds.
//!
//! Breeds without a group never reach a group table. Every sort here is
//! stable, so rows with equal keys stay in the order their group was first
//! seen in the input.

use crate::domain::model::{
    GroupBox, GroupCount, GroupMean, GroupSexMeans, MeasurementStats, NormalizedBreed,
    ScatterPoint,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    Weight,
    Height,
}

impl MeasurementKind {
    fn stats(self, breed: &NormalizedBreed) -> &MeasurementStats {
        match self {
            MeasurementKind::Weight => &breed.weight,
            MeasurementKind::Height => &breed.height,
        }
    }
}

/// Which per-sex columns a measurement table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SexColumns {
    Both,
    Male,
    Female,
}

/// Breeds bucketed by group, groups in first-seen order.
pub(crate) fn grouped<'a, I>(breeds: I) -> Vec<(String, Vec<&'a NormalizedBreed>)>
where
    I: IntoIterator<Item = &'a NormalizedBreed>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&'a NormalizedBreed>)> = Vec::new();

    for breed in breeds {
        let Some(group) = breed.breed_group.as_deref() else {
            continue;
        };
        match index.get(group) {
            Some(&slot) => groups[slot].1.push(breed),
            None => {
                index.insert(group, groups.len());
                groups.push((group.to_string(), vec![breed]));
            }
        }
    }

    groups
}

/// Descending by key, `None` last. `sort_by` is stable.
pub(crate) fn sort_desc_stable<T, F>(rows: &mut [T], key: F)
where
    F: Fn(&T) -> Option<f64>,
{
    rows.sort_by(|a, b| cmp_desc(key(a), key(b)));
}

fn cmp_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

pub fn count_by_group(breeds: &[NormalizedBreed]) -> Vec<GroupCount> {
    let mut rows: Vec<GroupCount> = grouped(breeds)
        .into_iter()
        .map(|(breed_group, members)| GroupCount {
            breed_group,
            count: members.len(),
        })
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Mean of `life_avg` per group, rounded to one decimal. Rows are ordered by
/// the unrounded mean.
pub fn mean_life_by_group(breeds: &[NormalizedBreed]) -> Vec<GroupMean> {
    let mut rows: Vec<(f64, GroupMean)> = grouped(breeds.iter().filter(|b| b.life_avg.is_some()))
        .into_iter()
        .filter_map(|(breed_group, members)| {
            let mean = mean(members.iter().filter_map(|b| b.life_avg))?;
            Some((
                mean,
                GroupMean {
                    breed_group,
                    count: members.len(),
                    mean: round1(mean),
                },
            ))
        })
        .collect();

    sort_desc_stable(&mut rows, |(raw, _)| Some(*raw));
    rows.into_iter().map(|(_, row)| row).collect()
}

/// Mean male and female averages of a measurement per group. Each sex is
/// averaged over its own non-null values; a group with none gets `None`.
pub fn mean_measurement_by_group(
    breeds: &[NormalizedBreed],
    kind: MeasurementKind,
    columns: SexColumns,
) -> Vec<GroupSexMeans> {
    let with_male = matches!(columns, SexColumns::Both | SexColumns::Male);
    let with_female = matches!(columns, SexColumns::Both | SexColumns::Female);

    // 排序用未四捨五入的平均，輸出時才取一位小數
    let mut rows: Vec<(Option<f64>, Option<f64>, GroupSexMeans)> = grouped(breeds)
        .into_iter()
        .map(|(breed_group, members)| {
            let male = mean(members.iter().filter_map(|b| kind.stats(b).male_avg))
                .filter(|_| with_male);
            let female = mean(members.iter().filter_map(|b| kind.stats(b).female_avg))
                .filter(|_| with_female);
            let row = GroupSexMeans {
                breed_group,
                count: members.len(),
                male_avg: male.map(round1),
                female_avg: female.map(round1),
            };
            (male, female, row)
        })
        .collect();

    match columns {
        SexColumns::Both => rows.sort_by(|a, b| cmp_desc(a.0, b.0).then_with(|| cmp_desc(a.1, b.1))),
        SexColumns::Male | SexColumns::Female => rows.sort_by(|a, b| b.2.count.cmp(&a.2.count)),
    }
    rows.into_iter().map(|(_, _, row)| row).collect()
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Five-number summary of `life_avg` per group, for box plots.
pub fn life_span_box_by_group(breeds: &[NormalizedBreed]) -> Vec<GroupBox> {
    grouped(breeds.iter().filter(|b| b.life_avg.is_some()))
        .into_iter()
        .map(|(breed_group, members)| {
            let mut values: Vec<f64> = members.iter().filter_map(|b| b.life_avg).collect();
            values.sort_by(f64::total_cmp);
            GroupBox {
                breed_group,
                count: values.len(),
                min: round1(values[0]),
                q1: round1(quantile(&values, 0.25)),
                median: round1(quantile(&values, 0.5)),
                q3: round1(quantile(&values, 0.75)),
                max: round1(values[values.len() - 1]),
            }
        })
        .collect()
}

/// Weight against life span, one point per breed that has both.
pub fn weight_life_points(breeds: &[NormalizedBreed]) -> Vec<ScatterPoint> {
    breeds
        .iter()
        .filter_map(|b| {
            let weight = b
                .weight
                .avg
                .or_else(|| mean(b.weight.male_avg.into_iter().chain(b.weight.female_avg)))?;
            Some(ScatterPoint {
                name: b.name.clone(),
                breed_group: b.breed_group.clone(),
                weight_kg: weight,
                life_avg: b.life_avg?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breed(group: Option<&str>, life_avg: Option<f64>) -> NormalizedBreed {
        NormalizedBreed {
            id: None,
            name: group.unwrap_or("none").to_string(),
            breed_group: group.map(str::to_string),
            origin: None,
            image_url: None,
            life_min: None,
            life_max: None,
            life_avg,
            weight: MeasurementStats::default(),
            height: MeasurementStats::default(),
            traits: Default::default(),
        }
    }

    fn weighted(group: &str, male: Option<f64>, female: Option<f64>) -> NormalizedBreed {
        let mut b = breed(Some(group), None);
        b.weight = MeasurementStats {
            male_avg: male,
            female_avg: female,
            avg: None,
        };
        b
    }

    #[test]
    fn test_count_by_group_descending_and_stable() {
        let breeds = vec![
            breed(Some("Toy"), None),
            breed(Some("Hound"), None),
            breed(None, None),
            breed(Some("Hound"), None),
            breed(Some("Terrier"), None),
        ];

        let counts = count_by_group(&breeds);
        let rows: Vec<(&str, usize)> = counts
            .iter()
            .map(|c| (c.breed_group.as_str(), c.count))
            .collect();
        assert_eq!(rows, vec![("Hound", 2), ("Toy", 1), ("Terrier", 1)]);
    }

    #[test]
    fn test_mean_life_rounds_and_sorts() {
        let breeds = vec![
            breed(Some("Toy"), Some(12.0)),
            breed(Some("Toy"), Some(13.25)),
            breed(Some("Working"), Some(10.0)),
            breed(Some("Working"), None),
            breed(Some("Sporting"), None),
        ];

        let rows = mean_life_by_group(&breeds);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].breed_group, "Toy");
        assert_eq!(rows[0].mean, 12.6);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].breed_group, "Working");
        assert_eq!(rows[1].count, 1);
    }

    #[test]
    fn test_mean_life_ties_keep_input_order() {
        let breeds = vec![
            breed(Some("B"), Some(11.0)),
            breed(Some("A"), Some(11.0)),
            breed(Some("C"), Some(15.0)),
        ];

        let order: Vec<String> = mean_life_by_group(&breeds)
            .into_iter()
            .map(|r| r.breed_group)
            .collect();
        assert_eq!(order, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_mean_life_near_tie_sorts_on_unrounded_mean() {
        let breeds = vec![
            breed(Some("Alpha"), Some(12.01)),
            breed(Some("Beta"), Some(12.04)),
        ];

        let rows: Vec<(String, f64)> = mean_life_by_group(&breeds)
            .into_iter()
            .map(|r| (r.breed_group, r.mean))
            .collect();
        assert_eq!(
            rows,
            vec![("Beta".to_string(), 12.0), ("Alpha".to_string(), 12.0)]
        );
    }

    #[test]
    fn test_measurement_near_tie_sorts_on_unrounded_mean() {
        let breeds = vec![
            weighted("Toy", Some(5.01), None),
            weighted("Terrier", Some(5.04), None),
        ];

        let rows = mean_measurement_by_group(&breeds, MeasurementKind::Weight, SexColumns::Both);
        let order: Vec<&str> = rows.iter().map(|r| r.breed_group.as_str()).collect();
        assert_eq!(order, vec!["Terrier", "Toy"]);
        assert!(rows.iter().all(|r| r.male_avg == Some(5.0)));
    }

    #[test]
    fn test_measurement_both_columns_sorted_with_nulls_last() {
        let breeds = vec![
            weighted("Toy", Some(3.0), Some(2.5)),
            weighted("Hound", None, Some(20.0)),
            weighted("Working", Some(40.0), None),
            weighted("Working", Some(45.0), Some(35.0)),
            weighted("Herding", Some(40.0), Some(30.0)),
        ];

        let rows = mean_measurement_by_group(&breeds, MeasurementKind::Weight, SexColumns::Both);
        let order: Vec<&str> = rows.iter().map(|r| r.breed_group.as_str()).collect();
        assert_eq!(order, vec!["Working", "Herding", "Toy", "Hound"]);
        assert_eq!(rows[0].male_avg, Some(42.5));
        assert_eq!(rows[0].female_avg, Some(35.0));
        assert_eq!(rows[3].male_avg, None);
    }

    #[test]
    fn test_measurement_single_column_sorted_by_count() {
        let breeds = vec![
            weighted("Toy", Some(3.0), Some(2.5)),
            weighted("Working", Some(40.0), Some(30.0)),
            weighted("Toy", Some(4.0), None),
        ];

        let rows = mean_measurement_by_group(&breeds, MeasurementKind::Weight, SexColumns::Male);
        assert_eq!(rows[0].breed_group, "Toy");
        assert_eq!(rows[0].male_avg, Some(3.5));
        assert_eq!(rows[0].female_avg, None);

        let heights = mean_measurement_by_group(&breeds, MeasurementKind::Height, SexColumns::Both);
        assert!(heights.iter().all(|r| r.male_avg.is_none() && r.female_avg.is_none()));
    }

    #[test]
    fn test_box_summary() {
        let breeds = vec![
            breed(Some("Toy"), Some(10.0)),
            breed(Some("Toy"), Some(14.0)),
            breed(Some("Toy"), Some(12.0)),
            breed(Some("Toy"), Some(16.0)),
            breed(Some("Hound"), None),
        ];

        let boxes = life_span_box_by_group(&breeds);
        assert_eq!(boxes.len(), 1);
        let toy = &boxes[0];
        assert_eq!((toy.min, toy.max), (10.0, 16.0));
        assert_eq!(toy.median, 13.0);
        assert_eq!(toy.q1, 11.5);
        assert_eq!(toy.q3, 14.5);
    }

    #[test]
    fn test_weight_life_points() {
        let mut plain = breed(Some("Toy"), Some(13.0));
        plain.weight.avg = Some(4.5);
        let mut split = breed(None, Some(10.0));
        split.weight.male_avg = Some(30.0);
        split.weight.female_avg = Some(26.0);
        let no_life = weighted("Working", Some(40.0), None);

        let points = weight_life_points(&[plain, split, no_life]);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].weight_kg, 4.5);
        assert_eq!(points[1].weight_kg, 28.0);
        assert_eq!(points[1].breed_group, None);
    }

    #[test]
    fn test_empty_input_gives_empty_tables() {
        assert!(count_by_group(&[]).is_empty());
        assert!(mean_life_by_group(&[]).is_empty());
        assert!(mean_measurement_by_group(&[], MeasurementKind::Height, SexColumns::Both).is_empty());
        assert!(life_span_box_by_group(&[]).is_empty());
        assert!(weight_life_points(&[]).is_empty());
    }
}
