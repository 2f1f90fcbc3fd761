//! The parsing service's document shape and how it folds into the profile form.
//!
//! The parser is loose about what it returns: sections may be missing or null,
//! lists may arrive as comma-separated strings, and skills may or may not be
//! grouped by category. Everything here tolerates that, and merging never
//! blanks a field the user already filled in.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::models::{Education, Experience};
use crate::profile::ProfileForm;

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A string that may also arrive as a list of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
    List(Vec<String>),
    Text(String),
}

impl Default for TextOrList {
    fn default() -> Self {
        TextOrList::List(Vec::new())
    }
}

impl TextOrList {
    /// Items with list semantics; a plain string is split on commas.
    pub fn items(&self) -> Vec<String> {
        match self {
            TextOrList::List(items) => items
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            TextOrList::Text(text) => text
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Items with prose semantics; list entries become lines.
    pub fn text(&self) -> String {
        match self {
            TextOrList::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            TextOrList::Text(text) => text.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillGroups {
    Flat(TextOrList),
    Grouped(BTreeMap<String, Option<TextOrList>>),
}

impl Default for SkillGroups {
    fn default() -> Self {
        SkillGroups::Flat(TextOrList::default())
    }
}

impl SkillGroups {
    pub fn flatten(&self) -> Vec<String> {
        match self {
            SkillGroups::Flat(list) => list.items(),
            SkillGroups::Grouped(groups) => groups.values().flatten().flat_map(TextOrList::items).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    #[serde(alias = "fullname", alias = "full_name")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "phone_number", alias = "phoneNumber", alias = "mobile")]
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    #[serde(alias = "website")]
    pub portfolio: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "objective", alias = "about")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedEducation {
    #[serde(alias = "school", alias = "college", alias = "university")]
    pub institution: Option<String>,
    pub degree: Option<String>,
    #[serde(alias = "fieldOfStudy", alias = "field", alias = "major")]
    pub field_of_study: Option<String>,
    #[serde(alias = "dates", alias = "year", alias = "years")]
    pub duration: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
    #[serde(alias = "cgpa", alias = "gpa", alias = "score")]
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedExperience {
    #[serde(alias = "organization", alias = "employer")]
    pub company: Option<String>,
    #[serde(alias = "title", alias = "position", alias = "designation")]
    pub role: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "dates")]
    pub duration: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
    #[serde(alias = "responsibilities", alias = "highlights", deserialize_with = "lenient")]
    pub description: TextOrList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedProject {
    #[serde(alias = "title")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: TextOrList,
    #[serde(alias = "tech_stack", alias = "techStack", alias = "tools", deserialize_with = "lenient")]
    pub technologies: TextOrList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedPosition {
    #[serde(alias = "role", alias = "position")]
    pub title: Option<String>,
    #[serde(alias = "organisation", alias = "club")]
    pub organization: Option<String>,
    #[serde(alias = "dates")]
    pub duration: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: TextOrList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedAchievement {
    #[serde(alias = "name", alias = "award")]
    pub title: Option<String>,
    #[serde(alias = "year")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: TextOrList,
}

/// Achievements arrive as one block of text, a list of strings, or a list of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Achievements {
    Text(String),
    List(Vec<Entry<ParsedAchievement>>),
}

impl Default for Achievements {
    fn default() -> Self {
        Achievements::List(Vec::new())
    }
}

impl Achievements {
    /// One line per achievement; a text block is split on line breaks.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Achievements::Text(text) => text
                .lines()
                .map(|line| line.trim().trim_start_matches(['-', '*']).trim().to_string())
                .filter(|line| !line.is_empty())
                .collect(),
            Achievements::List(entries) => entries.iter().filter_map(achievement_line).collect(),
        }
    }
}

/// Entries that the parser sometimes sends as bare strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry<T> {
    Text(String),
    Detailed(T),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    #[serde(alias = "personalInfo", alias = "personal_information", alias = "contact")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(deserialize_with = "lenient")]
    pub education: Vec<ParsedEducation>,
    #[serde(alias = "work_experience", alias = "workExperience", deserialize_with = "lenient")]
    pub experience: Vec<ParsedExperience>,
    #[serde(deserialize_with = "lenient")]
    pub skills: SkillGroups,
    #[serde(deserialize_with = "lenient")]
    pub achievements: Achievements,
    #[serde(deserialize_with = "lenient")]
    pub projects: Vec<Entry<ParsedProject>>,
    #[serde(
        alias = "positionsOfResponsibility",
        alias = "positions",
        alias = "por",
        deserialize_with = "lenient"
    )]
    pub positions_of_responsibility: Vec<Entry<ParsedPosition>>,
}

// --- Date ranges ---

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
    pub current: bool,
}

const ONGOING_WORDS: &[&str] = &["present", "current", "now", "ongoing", "till date", "date"];

const SPACED_SEPARATORS: &[&str] = &[" - ", " – ", " — ", " to ", "–", "—"];

fn is_ongoing(end: &str) -> bool {
    let end = end.trim();
    end.is_empty() || ONGOING_WORDS.iter().any(|word| end.eq_ignore_ascii_case(word))
}

/// Splits a single "start-end" string. A missing end, or an end such as
/// "Present", marks the range as current with an empty end.
pub fn split_date_range(input: &str) -> DateRange {
    let input = input.trim();
    if input.is_empty() {
        return DateRange::default();
    }

    let (start, end) = split_once_on_separator(input);
    finish_range(start, end)
}

fn split_once_on_separator(input: &str) -> (&str, &str) {
    for separator in SPACED_SEPARATORS {
        if let Some((start, end)) = input.split_once(separator) {
            return (start, end);
        }
    }

    // Bare hyphens: "2019-2021" has one; "2019-01-2021-06" splits at the middle one.
    let hyphens: Vec<usize> = input.match_indices('-').map(|(i, _)| i).collect();
    if hyphens.len() % 2 == 1 {
        let at = hyphens[hyphens.len() / 2];
        return (&input[..at], &input[at + 1..]);
    }
    (input, "")
}

fn finish_range(start: &str, end: &str) -> DateRange {
    let start = start.trim().to_string();
    if is_ongoing(end) {
        DateRange {
            current: !start.is_empty(),
            start,
            end: String::new(),
        }
    } else {
        DateRange {
            start,
            end: end.trim().to_string(),
            current: false,
        }
    }
}

fn resolve_dates(duration: Option<&str>, start: Option<&str>, end: Option<&str>) -> DateRange {
    match non_empty(duration) {
        Some(duration) => split_date_range(duration),
        None => finish_range(start.unwrap_or_default(), end.unwrap_or_default()),
    }
}

// --- Mapping ---

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn overwrite(target: &mut String, source: Option<&str>) {
    if let Some(value) = non_empty(source) {
        *target = value.to_string();
    }
}

fn map_education(parsed: &ParsedEducation) -> Option<Education> {
    let institution = non_empty(parsed.institution.as_deref()).unwrap_or_default();
    let degree = non_empty(parsed.degree.as_deref()).unwrap_or_default();
    if institution.is_empty() && degree.is_empty() {
        return None;
    }
    let dates = resolve_dates(
        parsed.duration.as_deref(),
        parsed.start_date.as_deref(),
        parsed.end_date.as_deref(),
    );
    Some(Education {
        institution: institution.to_string(),
        degree: degree.to_string(),
        field_of_study: non_empty(parsed.field_of_study.as_deref()).unwrap_or_default().to_string(),
        start_date: dates.start,
        end_date: dates.end,
        current: dates.current,
        grade: non_empty(parsed.grade.as_deref()).unwrap_or_default().to_string(),
    })
}

fn map_experience(parsed: &ParsedExperience) -> Option<Experience> {
    let company = non_empty(parsed.company.as_deref()).unwrap_or_default();
    let position = non_empty(parsed.role.as_deref()).unwrap_or_default();
    if company.is_empty() && position.is_empty() {
        return None;
    }
    let dates = resolve_dates(
        parsed.duration.as_deref(),
        parsed.start_date.as_deref(),
        parsed.end_date.as_deref(),
    );
    Some(Experience {
        company: company.to_string(),
        position: position.to_string(),
        location: non_empty(parsed.location.as_deref()).unwrap_or_default().to_string(),
        start_date: dates.start,
        end_date: dates.end,
        current: dates.current,
        description: parsed.description.text(),
    })
}

/// Set union keyed case-insensitively; existing skills keep their position and spelling.
pub fn union_skills(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    existing
        .iter()
        .chain(incoming)
        .map(|skill| skill.trim())
        .filter(|skill| !skill.is_empty())
        .filter(|skill| seen.insert(skill.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn achievement_line(entry: &Entry<ParsedAchievement>) -> Option<String> {
    match entry {
        Entry::Text(text) => non_empty(Some(text.as_str())).map(str::to_string),
        Entry::Detailed(achievement) => {
            let title = non_empty(achievement.title.as_deref());
            let description = achievement.description.text().replace('\n', " ");
            let mut line = match (title, description.is_empty()) {
                (Some(title), false) => format!("{}: {}", title, description),
                (Some(title), true) => title.to_string(),
                (None, false) => description,
                (None, true) => return None,
            };
            if let Some(date) = non_empty(achievement.date.as_deref()) {
                line.push_str(&format!(" ({})", date));
            }
            Some(line)
        }
    }
}

fn project_line(entry: &Entry<ParsedProject>) -> Option<String> {
    match entry {
        Entry::Text(text) => non_empty(Some(text.as_str())).map(str::to_string),
        Entry::Detailed(project) => {
            let name = non_empty(project.name.as_deref());
            let description = project.description.text().replace('\n', " ");
            let technologies = project.technologies.items();
            let mut line = match (name, description.is_empty()) {
                (Some(name), false) => format!("{}: {}", name, description),
                (Some(name), true) => name.to_string(),
                (None, false) => description,
                (None, true) => return None,
            };
            if !technologies.is_empty() {
                line.push_str(&format!(" (Tech: {})", technologies.join(", ")));
            }
            Some(line)
        }
    }
}

fn position_line(entry: &Entry<ParsedPosition>) -> Option<String> {
    match entry {
        Entry::Text(text) => non_empty(Some(text.as_str())).map(str::to_string),
        Entry::Detailed(position) => {
            let title = non_empty(position.title.as_deref());
            let organization = non_empty(position.organization.as_deref());
            let mut line = match (title, organization) {
                (Some(title), Some(org)) => format!("{}, {}", title, org),
                (Some(only), None) | (None, Some(only)) => only.to_string(),
                (None, None) => return None,
            };
            if let Some(duration) = non_empty(position.duration.as_deref()) {
                line.push_str(&format!(" ({})", duration));
            }
            let description = position.description.text().replace('\n', " ");
            if !description.is_empty() {
                line.push_str(&format!(": {}", description));
            }
            Some(line)
        }
    }
}

/// Appends a labeled paragraph unless it is empty or already present verbatim.
fn append_paragraph(bio: &mut String, label: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let mut paragraph = format!("{}:", label);
    for line in lines {
        paragraph.push_str("\n- ");
        paragraph.push_str(line);
    }
    if bio.contains(&paragraph) {
        return;
    }
    if !bio.trim().is_empty() {
        bio.push_str("\n\n");
    }
    bio.push_str(&paragraph);
}

/// Folds a parse result into a copy of `form`. Only non-empty parsed values
/// overwrite; free-text sections are appended to the bio.
pub fn merge_into_form(form: &ProfileForm, parsed: &ParsedResume) -> ProfileForm {
    let mut merged = form.clone();

    if let Some(info) = &parsed.personal_info {
        overwrite(&mut merged.fullname, info.name.as_deref());
        overwrite(&mut merged.email, info.email.as_deref());
        if let Some(phone) = non_empty(info.phone.as_deref()) {
            let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
            if !digits.is_empty() {
                merged.phone_number = digits;
            }
        }
        overwrite(&mut merged.social_links.linkedin, info.linkedin.as_deref());
        overwrite(&mut merged.social_links.github, info.github.as_deref());
        overwrite(&mut merged.social_links.portfolio, info.portfolio.as_deref());
        if merged.bio.trim().is_empty() {
            overwrite(&mut merged.bio, info.summary.as_deref());
        }
    }

    let education: Vec<Education> = parsed.education.iter().filter_map(map_education).collect();
    if !education.is_empty() {
        merged.education = education;
    }

    let experience: Vec<Experience> = parsed.experience.iter().filter_map(map_experience).collect();
    if !experience.is_empty() {
        merged.experience = experience;
    }

    let skills = parsed.skills.flatten();
    if !skills.is_empty() {
        merged.skills = union_skills(&merged.skills, &skills);
    }

    let achievements = parsed.achievements.lines();
    let projects: Vec<String> = parsed.projects.iter().filter_map(project_line).collect();
    let positions: Vec<String> = parsed
        .positions_of_responsibility
        .iter()
        .filter_map(position_line)
        .collect();

    append_paragraph(&mut merged.bio, "Achievements", &achievements);
    append_paragraph(&mut merged.bio, "Projects", &projects);
    append_paragraph(&mut merged.bio, "Positions of Responsibility", &positions);

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled_form() -> ProfileForm {
        ProfileForm {
            fullname: "Test User".into(),
            email: "user@test.com".into(),
            bio: "I build backends.".into(),
            skills: vec!["Rust".into(), "SQL".into()],
            education: vec![Education {
                institution: "MIT".into(),
                degree: "BSc".into(),
                start_date: "2015".into(),
                end_date: "2019".into(),
                ..Default::default()
            }],
            experience: vec![Experience {
                company: "Acme".into(),
                position: "Engineer".into(),
                start_date: "2019".into(),
                current: true,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_split_date_range() {
        assert_eq!(
            split_date_range("2019-2021"),
            DateRange { start: "2019".into(), end: "2021".into(), current: false }
        );
        assert_eq!(
            split_date_range("2019-Present"),
            DateRange { start: "2019".into(), end: String::new(), current: true }
        );
        assert_eq!(
            split_date_range("Jan 2020 – Mar 2022"),
            DateRange { start: "Jan 2020".into(), end: "Mar 2022".into(), current: false }
        );
        assert_eq!(
            split_date_range("2018-06 - present"),
            DateRange { start: "2018-06".into(), end: String::new(), current: true }
        );
        assert_eq!(
            split_date_range("2019-01-2021-06"),
            DateRange { start: "2019-01".into(), end: "2021-06".into(), current: false }
        );
    }

    #[test]
    fn test_split_date_range_without_end() {
        assert_eq!(
            split_date_range("2022"),
            DateRange { start: "2022".into(), end: String::new(), current: true }
        );
        assert_eq!(split_date_range("   "), DateRange::default());
    }

    #[test]
    fn test_skills_only_parse_keeps_everything_else() {
        let form = filled_form();
        let parsed: ParsedResume = serde_json::from_value(json!({
            "skills": {
                "languages": ["rust", "Python"],
                "tools": "Docker, Git, python"
            }
        }))
        .unwrap();

        let merged = merge_into_form(&form, &parsed);
        assert_eq!(merged.education, form.education);
        assert_eq!(merged.experience, form.experience);
        assert_eq!(merged.bio, form.bio);
        assert_eq!(merged.fullname, form.fullname);
        assert_eq!(merged.skills, vec!["Rust", "SQL", "Python", "Docker", "Git"]);
    }

    #[test]
    fn test_flat_skill_list() {
        let parsed: ParsedResume = serde_json::from_value(json!({ "skills": ["Go", "SQL"] })).unwrap();
        let merged = merge_into_form(&filled_form(), &parsed);
        assert_eq!(merged.skills, vec!["Rust", "SQL", "Go"]);
    }

    #[test]
    fn test_empty_fields_never_blank_existing_data() {
        let form = filled_form();
        let parsed: ParsedResume = serde_json::from_value(json!({
            "personal_info": { "name": "", "email": null, "phone": "  " },
            "education": [{ "institution": "", "degree": "" }],
            "experience": null,
            "skills": null,
            "achievements": []
        }))
        .unwrap();
        assert_eq!(merge_into_form(&form, &parsed), form);
    }

    #[test]
    fn test_sections_map_with_dates() {
        let parsed: ParsedResume = serde_json::from_value(json!({
            "personalInfo": {
                "name": "Parsed Name",
                "phone": "+1 (555) 123-4567",
                "linkedin": "https://linkedin.com/in/parsed"
            },
            "education": [
                { "institution": "IIT Delhi", "degree": "B.Tech", "duration": "2016-2020", "cgpa": "8.9" }
            ],
            "experience": [
                {
                    "company": "Globex",
                    "title": "Intern",
                    "dates": "2021-Present",
                    "responsibilities": ["Built APIs", "Wrote tests"]
                }
            ]
        }))
        .unwrap();

        let merged = merge_into_form(&filled_form(), &parsed);
        assert_eq!(merged.fullname, "Parsed Name");
        assert_eq!(merged.email, "user@test.com");
        assert_eq!(merged.phone_number, "15551234567");
        assert_eq!(merged.social_links.linkedin, "https://linkedin.com/in/parsed");

        assert_eq!(merged.education.len(), 1);
        assert_eq!(merged.education[0].institution, "IIT Delhi");
        assert_eq!(merged.education[0].start_date, "2016");
        assert_eq!(merged.education[0].end_date, "2020");
        assert_eq!(merged.education[0].grade, "8.9");
        assert!(!merged.education[0].current);

        assert_eq!(merged.experience[0].position, "Intern");
        assert!(merged.experience[0].current);
        assert_eq!(merged.experience[0].end_date, "");
        assert_eq!(merged.experience[0].description, "Built APIs\nWrote tests");
    }

    #[test]
    fn test_free_text_sections_append_to_bio() {
        let parsed: ParsedResume = serde_json::from_value(json!({
            "achievements": ["Won hackathon"],
            "projects": [
                { "name": "Crawler", "description": "Fast web crawler", "technologies": ["Rust", "Tokio"] },
                "Side blog"
            ],
            "positions_of_responsibility": [
                { "title": "Lead", "organization": "Coding Club", "duration": "2019-2020" }
            ]
        }))
        .unwrap();

        let merged = merge_into_form(&filled_form(), &parsed);
        assert!(merged.bio.starts_with("I build backends.\n\n"));
        assert!(merged.bio.contains("Achievements:\n- Won hackathon"));
        assert!(merged.bio.contains("Projects:\n- Crawler: Fast web crawler (Tech: Rust, Tokio)\n- Side blog"));
        assert!(merged.bio.contains("Positions of Responsibility:\n- Lead, Coding Club (2019-2020)"));

        // Merging the same document again does not duplicate paragraphs.
        let again = merge_into_form(&merged, &parsed);
        assert_eq!(again.bio, merged.bio);
    }

    #[test]
    fn test_summary_only_fills_empty_bio() {
        let parsed: ParsedResume = serde_json::from_value(json!({
            "personal_info": { "summary": "Parsed summary" }
        }))
        .unwrap();
        assert_eq!(merge_into_form(&filled_form(), &parsed).bio, "I build backends.");

        let empty_bio = ProfileForm { bio: String::new(), ..filled_form() };
        assert_eq!(merge_into_form(&empty_bio, &parsed).bio, "Parsed summary");
    }

    #[test]
    fn test_union_skills_case_insensitive() {
        let existing = vec!["Rust".to_string(), "rust".to_string()];
        let incoming = vec!["RUST".to_string(), " Go ".to_string(), "".to_string()];
        assert_eq!(union_skills(&existing, &incoming), vec!["Rust", "Go"]);
    }

    #[test]
    fn test_achievements_as_text_block() {
        let parsed: ParsedResume = serde_json::from_value(json!({
            "achievements": "Won hackathon\n- Dean's list",
            "skills": ["Go"]
        }))
        .unwrap();
        assert_eq!(parsed.achievements.lines(), vec!["Won hackathon", "Dean's list"]);

        let merged = merge_into_form(&filled_form(), &parsed);
        assert!(merged.bio.contains("Achievements:\n- Won hackathon\n- Dean's list"));
        assert!(merged.skills.contains(&"Go".to_string()));
    }

    #[test]
    fn test_achievements_as_records() {
        let parsed: ParsedResume = serde_json::from_value(json!({
            "achievements": [
                { "title": "Hackathon winner", "description": "Smart India Hackathon", "year": "2022" },
                { "name": "Scholarship" },
                "Open source contributor",
                { "title": "" }
            ],
            "education": [{ "institution": "IIT Delhi", "degree": "B.Tech" }]
        }))
        .unwrap();
        assert_eq!(
            parsed.achievements.lines(),
            vec![
                "Hackathon winner: Smart India Hackathon (2022)",
                "Scholarship",
                "Open source contributor"
            ]
        );
        let merged = merge_into_form(&filled_form(), &parsed);
        assert_eq!(merged.education[0].institution, "IIT Delhi");
    }

    #[test]
    fn test_null_skill_group_is_skipped() {
        let parsed: ParsedResume = serde_json::from_value(json!({
            "skills": { "languages": ["Rust", "Go"], "frameworks": null, "tools": "Docker, Git" },
            "achievements": null
        }))
        .unwrap();
        assert_eq!(parsed.skills.flatten(), vec!["Rust", "Go", "Docker", "Git"]);
        assert!(parsed.achievements.lines().is_empty());
    }
}
