//! Per-sex ranges embedded in measurement strings, e.g.
//! `"Male: 20-32; Female: 18-29"`.

use regex::Regex;
use std::sync::LazyLock;

static MALE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bMale:").expect("valid male label regex"));
static FEMALE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bFemale:").expect("valid female label regex"));
static MALE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bMale:\s*([\d.]+\s*-\s*[\d.]+)").expect("valid male range regex")
});
static FEMALE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bFemale:\s*([\d.]+\s*-\s*[\d.]+)").expect("valid female range regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// What a measurement string says about one sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SexRange<'a> {
    /// The label does not occur.
    Absent,
    /// Label followed by a `<num>-<num>` range; holds the range text.
    Found(&'a str),
    /// Label occurs but no range follows it.
    Garbled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SexRanges<'a> {
    pub male: SexRange<'a>,
    pub female: SexRange<'a>,
}

impl<'a> SexRanges<'a> {
    pub fn get(&self, sex: Sex) -> SexRange<'a> {
        match sex {
            Sex::Male => self.male,
            Sex::Female => self.female,
        }
    }
}

/// Extracts each sex independently. Labels are the case-sensitive literals
/// `Male:` and `Female:`; order and surrounding text do not matter.
pub fn extract_sex_ranges(text: &str) -> SexRanges<'_> {
    SexRanges {
        male: extract_one(text, &MALE_LABEL, &MALE_RANGE),
        female: extract_one(text, &FEMALE_LABEL, &FEMALE_RANGE),
    }
}

fn extract_one<'a>(text: &'a str, label: &Regex, range: &Regex) -> SexRange<'a> {
    match range.captures(text).and_then(|caps| caps.get(1)) {
        Some(m) => SexRange::Found(m.as_str()),
        None if label.is_match(text) => SexRange::Garbled,
        None => SexRange::Absent,
    }
}

/// True when the string carries at least one sex label.
pub fn has_labels(text: &str) -> bool {
    MALE_LABEL.is_match(text) || FEMALE_LABEL.is_match(text)
}
