//! Raw records in, every derived table out. Pure: no I/O, no shared state.

use crate::core::aggregate::{
    count_by_group, life_span_box_by_group, mean_life_by_group, mean_measurement_by_group,
    weight_life_points, MeasurementKind, SexColumns,
};
use crate::core::normalize::normalize_records;
use crate::core::traits::{trait_prevalence, unique_traits};
use crate::domain::model::{BreedId, BreedRecord, BreedTables, NormalizedBreed};
use crate::utils::error::Result;

pub use crate::core::normalize::MalformedRangePolicy;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub malformed: MalformedRangePolicy,
    /// Trait to compute per-group prevalence for; `None` skips that table.
    pub trait_name: Option<String>,
}

impl AnalysisOptions {
    pub fn with_trait(mut self, trait_name: impl Into<String>) -> Self {
        self.trait_name = Some(trait_name.into());
        self
    }

    pub fn strict(mut self) -> Self {
        self.malformed = MalformedRangePolicy::Strict;
        self
    }
}

pub fn analyze(records: &[BreedRecord], options: &AnalysisOptions) -> Result<BreedTables> {
    let normalized = normalize_records(records, options.malformed)?;
    let breeds = normalized.breeds;

    if !normalized.warnings.is_empty() {
        tracing::warn!(
            "⚠️ {} malformed range value(s) treated as missing",
            normalized.warnings.len()
        );
    }

    let trait_prevalence = options
        .trait_name
        .as_deref()
        .map(|name| trait_prevalence(&breeds, name))
        .transpose()?;

    Ok(BreedTables {
        count_by_group: count_by_group(&breeds),
        life_by_group: mean_life_by_group(&breeds),
        weight_by_group: mean_measurement_by_group(
            &breeds,
            MeasurementKind::Weight,
            SexColumns::Both,
        ),
        height_by_group: mean_measurement_by_group(
            &breeds,
            MeasurementKind::Height,
            SexColumns::Both,
        ),
        life_box_by_group: life_span_box_by_group(&breeds),
        weight_life_points: weight_life_points(&breeds),
        trait_prevalence,
        traits: unique_traits(&breeds),
        warnings: normalized.warnings,
        breeds,
    })
}

/// Looks up the breed the caller has selected.
pub fn select_breed<'a>(breeds: &'a [NormalizedBreed], id: &BreedId) -> Option<&'a NormalizedBreed> {
    breeds.iter().find(|b| b.id.as_ref() == Some(id))
}

/// Case-insensitive name filter; an empty query matches everything.
pub fn search_breeds<'a>(breeds: &'a [NormalizedBreed], query: &str) -> Vec<&'a NormalizedBreed> {
    let needle = query.trim().to_lowercase();
    breeds
        .iter()
        .filter(|b| needle.is_empty() || b.name.to_lowercase().contains(&needle))
        .collect()
}
