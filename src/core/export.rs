//! CSV/JSON rendering of the derived tables and the ZIP bundle the load step writes.

use crate::domain::model::{BreedTables, NormalizedBreed};
use crate::utils::error::{Result, StatsError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const BUNDLE_FILENAME: &str = "breed_stats.zip";

/// Flat CSV row for one breed; traits joined with ", ".
#[derive(Debug, Clone, Serialize)]
pub struct BreedRow {
    pub id: String,
    pub name: String,
    pub breed_group: Option<String>,
    pub origin: Option<String>,
    pub life_min: Option<f64>,
    pub life_max: Option<f64>,
    pub life_avg: Option<f64>,
    pub male_weight_avg: Option<f64>,
    pub female_weight_avg: Option<f64>,
    pub avg_weight: Option<f64>,
    pub male_height_avg: Option<f64>,
    pub female_height_avg: Option<f64>,
    pub avg_height: Option<f64>,
    pub temperament: String,
    pub image_url: Option<String>,
}

impl From<&NormalizedBreed> for BreedRow {
    fn from(breed: &NormalizedBreed) -> Self {
        Self {
            id: breed.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            name: breed.name.clone(),
            breed_group: breed.breed_group.clone(),
            origin: breed.origin.clone(),
            life_min: breed.life_min,
            life_max: breed.life_max,
            life_avg: breed.life_avg,
            male_weight_avg: breed.weight.male_avg,
            female_weight_avg: breed.weight.female_avg,
            avg_weight: breed.weight.avg,
            male_height_avg: breed.height.male_avg,
            female_height_avg: breed.height.female_avg,
            avg_height: breed.height.avg,
            temperament: breed
                .traits
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            image_url: breed.image_url.clone(),
        }
    }
}

/// Serializes rows with a header line. An empty table renders as an empty file.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| StatsError::IoError(e.into_error()))
}

#[derive(Debug, Serialize)]
pub struct ReportManifest<'a> {
    pub generated_at: DateTime<Utc>,
    pub source: &'a str,
    pub record_count: usize,
    pub warning_count: usize,
    pub tables: &'a BreedTables,
}

/// Which renderings go into the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormats {
    pub csv: bool,
    pub json: bool,
}

impl Default for OutputFormats {
    fn default() -> Self {
        Self {
            csv: true,
            json: false,
        }
    }
}

impl OutputFormats {
    /// From format names such as `["csv", "json"]`. Unknown names are ignored.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            csv: names.iter().any(|n| n.as_ref() == "csv"),
            json: names.iter().any(|n| n.as_ref() == "json"),
        }
    }
}

/// Every table as `(filename, bytes)`, in a fixed order.
pub fn render_files(
    tables: &BreedTables,
    source: &str,
    formats: OutputFormats,
    generated_at: DateTime<Utc>,
) -> Result<Vec<(String, Vec<u8>)>> {
    let mut files = Vec::new();

    if formats.csv {
        let breed_rows: Vec<BreedRow> = tables.breeds.iter().map(BreedRow::from).collect();

        files.extend([
            ("breeds.csv".to_string(), to_csv(&breed_rows)?),
            ("count_by_group.csv".to_string(), to_csv(&tables.count_by_group)?),
            ("life_by_group.csv".to_string(), to_csv(&tables.life_by_group)?),
            ("weight_by_group.csv".to_string(), to_csv(&tables.weight_by_group)?),
            ("height_by_group.csv".to_string(), to_csv(&tables.height_by_group)?),
            ("life_box_by_group.csv".to_string(), to_csv(&tables.life_box_by_group)?),
            ("weight_life_points.csv".to_string(), to_csv(&tables.weight_life_points)?),
        ]);

        if let Some(prevalence) = &tables.trait_prevalence {
            files.push(("trait_prevalence.csv".to_string(), to_csv(&prevalence.groups)?));
        }

        if !tables.warnings.is_empty() {
            files.push(("warnings.csv".to_string(), to_csv(&tables.warnings)?));
        }
    }

    if formats.json {
        let manifest = ReportManifest {
            generated_at,
            source,
            record_count: tables.breeds.len(),
            warning_count: tables.warning_count(),
            tables,
        };
        files.push((
            "tables.json".to_string(),
            serde_json::to_vec_pretty(&manifest)?,
        ));
    }

    Ok(files)
}

pub fn zip_files(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }

    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
