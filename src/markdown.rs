//! Navigation entries for the rules document: one per `## ` heading.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub level: u8,
}

static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"^## (.+)$").unwrap());
static EMOJI: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Extended_Pictographic}|\x{FE0F}|\x{200D}|[\x{1F1E6}-\x{1F1FF}]").unwrap());
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

pub fn remove_emojis(text: &str) -> String {
    let stripped = EMOJI.replace_all(text, "");
    SPACES.replace_all(&stripped, " ").trim().to_string()
}

/// Unicode-aware: Cyrillic and other letters and all digits stay in the id,
/// so non-English headings get readable, distinct anchors.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let kept = NON_SLUG.replace_all(&lower, "");
    let dashed = SPACES.replace_all(&kept, "-");
    DASHES.replace_all(&dashed, "-").trim().to_string()
}

pub fn parse_headers(content: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut used = HashSet::new();

    for (index, line) in content.lines().enumerate() {
        let Some(captures) = H2.captures(line) else {
            continue;
        };
        let title = remove_emojis(captures[1].trim());
        let base = slugify(&title);

        let mut id = if base.is_empty() {
            format!("section-{index}")
        } else {
            base.clone()
        };
        let mut suffix = 1;
        while used.contains(&id) {
            id = format!("{base}-{suffix}");
            suffix += 1;
        }
        used.insert(id.clone());

        sections.push(Section {
            id,
            title,
            level: 2,
        });
    }

    sections
}
