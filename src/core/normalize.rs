//! Raw breed records into typed, numeric rows.

use crate::core::range::{parse_range, Range, RangeError};
use crate::core::sex_split::{extract_sex_ranges, has_labels, Sex, SexRange, SexRanges};
use crate::core::traits::parse_temperament;
use crate::domain::model::{BreedRecord, FieldWarning, MeasurementStats, NormalizedBreed};
use crate::utils::error::{Result, StatsError};
use serde::{Deserialize, Serialize};

/// What to do with a range string that is present but unparseable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRangePolicy {
    /// Treat the field as missing and record a `FieldWarning`.
    #[default]
    Degrade,
    /// Abort the run with `StatsError::MalformedRange`.
    Strict,
}

impl std::str::FromStr for MalformedRangePolicy {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" | "skip" => Ok(MalformedRangePolicy::Degrade),
            "strict" | "fail" => Ok(MalformedRangePolicy::Strict),
            other => Err(StatsError::InvalidConfigValueError {
                field: "on_malformed_range".to_string(),
                value: other.to_string(),
                reason: "expected 'degrade' or 'strict'".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub breeds: Vec<NormalizedBreed>,
    pub warnings: Vec<FieldWarning>,
}

pub struct Normalizer {
    policy: MalformedRangePolicy,
    warnings: Vec<FieldWarning>,
}

impl Normalizer {
    pub fn new(policy: MalformedRangePolicy) -> Self {
        Self {
            policy,
            warnings: Vec::new(),
        }
    }

    pub fn normalize(&mut self, record: &BreedRecord) -> Result<NormalizedBreed> {
        let label = record.label();

        let life = self.range_field(
            &label,
            "life_span",
            record.life_span.as_deref(),
            parse_range(record.life_span.as_deref()),
        )?;
        let weight = self.measurement(&label, "weight.metric", record.metric_weight())?;
        let height = self.measurement(&label, "height.metric", record.metric_height())?;

        Ok(NormalizedBreed {
            id: record.id.clone(),
            name: record.name.clone(),
            breed_group: record.group().map(str::to_string),
            origin: record
                .origin
                .as_deref()
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string),
            image_url: record.image.as_ref().and_then(|i| i.url.clone()),
            life_min: life.map(|r| r.min),
            life_max: life.map(|r| r.max),
            life_avg: life.map(|r| r.avg()),
            weight,
            height,
            traits: parse_temperament(record.temperament.as_deref()),
        })
    }

    pub fn finish(self) -> Vec<FieldWarning> {
        self.warnings
    }

    // 有 Male:/Female: 標籤時只取分性別的值，否則只取不分性別的平均
    fn measurement(
        &mut self,
        breed: &str,
        field: &str,
        text: Option<&str>,
    ) -> Result<MeasurementStats> {
        let text = match text.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Ok(MeasurementStats::default()),
        };

        if !has_labels(text) {
            let range = self.range_field(breed, field, Some(text), parse_range(Some(text)))?;
            return Ok(MeasurementStats {
                male_avg: None,
                female_avg: None,
                avg: range.map(|r| r.avg()),
            });
        }

        let ranges = extract_sex_ranges(text);
        Ok(MeasurementStats {
            male_avg: self.sex_avg(breed, field, text, &ranges, Sex::Male)?,
            female_avg: self.sex_avg(breed, field, text, &ranges, Sex::Female)?,
            avg: None,
        })
    }

    fn sex_avg(
        &mut self,
        breed: &str,
        field: &str,
        text: &str,
        ranges: &SexRanges<'_>,
        sex: Sex,
    ) -> Result<Option<f64>> {
        let field = format!("{}({})", field, sex.label());
        let range = match ranges.get(sex) {
            SexRange::Absent => None,
            SexRange::Found(range_text) => {
                self.range_field(breed, &field, Some(text), parse_range(Some(range_text)))?
            }
            SexRange::Garbled => self.malformed(
                breed,
                &field,
                text,
                format!("'{}:' label without a range", sex.label()),
            )?,
        };
        Ok(range.map(|r| r.avg()))
    }

    fn range_field(
        &mut self,
        breed: &str,
        field: &str,
        value: Option<&str>,
        parsed: std::result::Result<Option<Range>, RangeError>,
    ) -> Result<Option<Range>> {
        match parsed {
            Ok(range) => Ok(range),
            Err(e) => self.malformed(breed, field, value.unwrap_or_default(), e.to_string()),
        }
    }

    fn malformed(
        &mut self,
        breed: &str,
        field: &str,
        value: &str,
        reason: String,
    ) -> Result<Option<Range>> {
        match self.policy {
            MalformedRangePolicy::Strict => Err(StatsError::MalformedRange {
                breed: breed.to_string(),
                field: field.to_string(),
                value: value.to_string(),
                reason,
            }),
            MalformedRangePolicy::Degrade => {
                tracing::debug!("Skipping malformed {} of '{}': {}", field, breed, reason);
                self.warnings.push(FieldWarning {
                    breed: breed.to_string(),
                    field: field.to_string(),
                    value: value.to_string(),
                    reason,
                });
                Ok(None)
            }
        }
    }
}

/// Normalizes every record, preserving input order.
pub fn normalize_records(
    records: &[BreedRecord],
    policy: MalformedRangePolicy,
) -> Result<Normalized> {
    let mut normalizer = Normalizer::new(policy);
    let breeds = records
        .iter()
        .map(|record| normalizer.normalize(record))
        .collect::<Result<Vec<_>>>()?;

    Ok(Normalized {
        breeds,
        warnings: normalizer.finish(),
    })
}
