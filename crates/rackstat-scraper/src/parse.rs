//! Extraction of a [`ProfileRecord`] from a profile or resume page.
//!
//! Extraction is total: absent elements yield empty strings, zero counters
//! and empty collections. Whether the page looked like a profile at all is
//! reported through [`ProfileRecord::markup_recognized`].

use std::collections::HashSet;
use std::sync::LazyLock;

use rackstat_core::{Certificate, Counters, LanguageUsage, ProfileRecord, StatLabel};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static PROFILE_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("#j_id_s"));
static NAME_LABEL: LazyLock<Selector> = LazyLock::new(|| selector(".ui.big.label.black"));
static INFO_COLUMN: LazyLock<Selector> =
    LazyLock::new(|| selector(".ui.four.wide.center.aligned.column"));
static DEPARTMENT_LABEL: LazyLock<Selector> = LazyLock::new(|| selector(".ui.large.label"));
static GENDER_COLUMN: LazyLock<Selector> =
    LazyLock::new(|| selector(".ui.fourteen.wide.left.aligned.column"));
static STATISTIC: LazyLock<Selector> = LazyLock::new(|| selector(".statistic"));
static STAT_LABEL: LazyLock<Selector> = LazyLock::new(|| selector(".label"));
static STAT_VALUE: LazyLock<Selector> = LazyLock::new(|| selector(".value"));
static STATISTICS_GROUP: LazyLock<Selector> =
    LazyLock::new(|| selector("div.ui.six.small.statistics"));
static CERTIFICATE_CARD: LazyLock<Selector> = LazyLock::new(|| selector(".ui.brown.card"));
static BOLD: LazyLock<Selector> = LazyLock::new(|| selector("b"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{3}[0-9]{2}[A-Z]{2}[0-9]{3}").expect("valid regex"));

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\s+([0-9]{4})\)").expect("valid regex"));

static CERTIFICATE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{2}-[0-9]{2}-[0-9]{4}\s+[0-9]{2}:[0-9]{2}").expect("valid regex")
});

/// Index of the statistics group that lists per-language solve counts.
const LANGUAGE_GROUP_INDEX: usize = 1;

/// Extracts every field the page carries. Never fails.
#[must_use]
pub fn extract(document: &str) -> ProfileRecord {
    let html = Html::parse_document(document);

    let info_text = joined_text(html.select(&INFO_COLUMN));
    let department = joined_text(html.select(&DEPARTMENT_LABEL)).trim().to_owned();

    let profile_image_url = html
        .select(&PROFILE_IMAGE)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_owned);

    let name = html
        .select(&NAME_LABEL)
        .next()
        .map(|el| element_text(el).trim().to_owned())
        .unwrap_or_default();

    let identifier = IDENTIFIER_RE
        .find(&info_text)
        .map(|m| m.as_str().to_owned())
        .unwrap_or_default();

    let institution = extract_institution(&info_text, &department);

    let cohort_year = YEAR_RE
        .captures(&info_text)
        .map(|caps| caps[2].to_owned())
        .unwrap_or_default();

    let gender = joined_text(html.select(&GENDER_COLUMN)).trim().to_owned();

    let markup_recognized = html.select(&STATISTIC).next().is_some()
        || html.select(&NAME_LABEL).next().is_some()
        || html.select(&INFO_COLUMN).next().is_some();

    ProfileRecord {
        profile_image_url,
        name,
        identifier,
        institution,
        department,
        cohort_year,
        gender,
        counts: extract_counters(&html),
        language_usage: extract_languages(&html),
        certificates: extract_certificates(&html),
        markup_recognized,
    }
}

/// The institution sits on its own line between the department and the
/// parenthesised batch, e.g. `"CSE\n  Some College\n  (B.E 2027)"`.
fn extract_institution(info_text: &str, department: &str) -> String {
    if department.is_empty() {
        return String::new();
    }
    let pattern = format!(r"{}\s*\n\s*(.+?)\s*\n\s*\(", regex::escape(department));
    let Ok(re) = Regex::new(&pattern) else {
        tracing::debug!(department, "department text does not form a usable pattern");
        return String::new();
    };
    re.captures(info_text)
        .map(|caps| caps[1].trim().to_owned())
        .unwrap_or_default()
}

/// For each known label, the first statistic block carrying it wins.
fn extract_counters(html: &Html) -> Counters {
    let mut counters = Counters::default();
    let mut seen = HashSet::new();

    for block in html.select(&STATISTIC) {
        let label = joined_text(block.select(&STAT_LABEL));
        let Some(stat) = StatLabel::from_label(label.trim()) else {
            continue;
        };
        if seen.insert(stat) {
            counters.set(stat, digits(&joined_text(block.select(&STAT_VALUE))));
        }
    }

    counters
}

fn extract_languages(html: &Html) -> LanguageUsage {
    let mut languages = LanguageUsage::new();
    let Some(group) = html.select(&STATISTICS_GROUP).nth(LANGUAGE_GROUP_INDEX) else {
        return languages;
    };

    for block in group.select(&STATISTIC) {
        let label = joined_text(block.select(&STAT_LABEL));
        let label = label.trim();
        let count = digits(&joined_text(block.select(&STAT_VALUE)));
        if !label.is_empty() && count != 0 {
            languages.insert(label, count);
        }
    }

    languages
}

fn extract_certificates(html: &Html) -> Vec<Certificate> {
    html.select(&CERTIFICATE_CARD)
        .map(|card| {
            let title = joined_text(card.select(&BOLD)).trim().to_owned();
            let issued_at = CERTIFICATE_DATE_RE
                .find(&element_text(card))
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default();
            let verification_link = card
                .select(&ANCHOR)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or_default()
                .to_owned();
            Certificate {
                title,
                issued_at,
                verification_link,
            }
        })
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Concatenated text of every matched element, in document order.
fn joined_text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    elements.map(element_text).collect()
}

/// Keeps the ASCII digits of `text` and parses them; no digits, or a value
/// too large for `u64`, yields 0.
fn digits(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
