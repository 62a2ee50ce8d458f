//! Temperament trait tokens and their prevalence per breed group.

use crate::core::aggregate::{grouped, sort_desc_stable};
use crate::domain::model::{NormalizedBreed, TraitPrevalence, TraitShare};
use crate::utils::error::{Result, StatsError};
use regex::RegexBuilder;
use std::collections::BTreeSet;

/// Lowercase, trimmed, internal whitespace collapsed to single spaces.
pub fn normalize_trait(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Splits a comma-separated temperament string into normalized tokens.
pub fn parse_temperament(temperament: Option<&str>) -> BTreeSet<String> {
    temperament
        .map(|t| {
            t.split(',')
                .map(normalize_trait)
                .filter(|token| !token.is_empty())
                .collect::<BTreeSet<String>>()
        })
        .unwrap_or_default()
}

/// Sorted vocabulary of every trait seen across the breeds.
pub fn unique_traits(breeds: &[NormalizedBreed]) -> Vec<String> {
    breeds
        .iter()
        .flat_map(|b| b.traits.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Union of trait sets per breed group, groups in first-seen order.
pub fn temperament_by_group(breeds: &[NormalizedBreed]) -> Vec<(String, BTreeSet<String>)> {
    grouped(breeds)
        .into_iter()
        .map(|(group, members)| {
            let traits: BTreeSet<String> =
                members.iter().flat_map(|b| b.traits.iter().cloned()).collect();
            (group, traits)
        })
        .collect()
}

/// Percentage of breeds per group whose temperament carries `trait_name` as a
/// whole word. Only breeds with both a group and at least one trait count
/// toward a group's size.
pub fn trait_prevalence(breeds: &[NormalizedBreed], trait_name: &str) -> Result<TraitPrevalence> {
    let target = normalize_trait(trait_name);
    if target.is_empty() {
        return Err(StatsError::TraitError {
            message: "trait name is empty".to_string(),
        });
    }

    let matcher = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(&target)))
        .case_insensitive(true)
        .build()
        .map_err(|e| StatsError::TraitError {
            message: format!("cannot build matcher for '{}': {}", target, e),
        })?;

    let eligible: Vec<&NormalizedBreed> = breeds
        .iter()
        .filter(|b| b.breed_group.is_some() && !b.traits.is_empty())
        .collect();

    let mut groups: Vec<TraitShare> = grouped(eligible)
        .into_iter()
        .map(|(breed_group, members)| {
            let matches = members
                .iter()
                .filter(|b| b.traits.iter().any(|token| matcher.is_match(token)))
                .count();
            TraitShare {
                breed_group,
                breeds: members.len(),
                matches,
                percent: 100.0 * matches as f64 / members.len() as f64,
            }
        })
        .collect();

    sort_desc_stable(&mut groups, |row| Some(row.percent));

    tracing::debug!(
        "Trait '{}' found in {} groups",
        target,
        groups.iter().filter(|g| g.matches > 0).count()
    );

    Ok(TraitPrevalence {
        trait_name: target,
        groups,
    })
}
