use crate::allocator::MatchPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mentees_file: String,
    pub mentors_file: String,
    pub output_directory: String,
    /// Used when a mentee's graduation year is blank or not a number.
    pub default_graduation_year: i32,
    /// chrono format of the registration timestamp column.
    pub timestamp_format: String,
    /// When set, every mentor gets this many slots regardless of the sheet.
    pub capacity_override: Option<u32>,
    pub match_policy: MatchPolicy,
    pub mentee_columns: MenteeColumns,
    pub mentor_columns: MentorColumns,
    pub country_aliases: BTreeMap<String, String>,
    pub department_codes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MenteeColumns {
    pub name: String,
    pub email: String,
    pub graduation_year: String,
    pub timestamp: String,
    pub country: String,
    pub department: String,
    pub preferences: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MentorColumns {
    pub name: String,
    pub email: String,
    pub country: String,
    pub department: String,
    pub capacity: String,
}

impl Default for MenteeColumns {
    fn default() -> Self {
        Self {
            name: "Full Name".to_string(),
            email: "Email Address".to_string(),
            graduation_year: "Year of Graduation from BMSCE".to_string(),
            timestamp: "Timestamp".to_string(),
            country: "One country you are interested in for higher education".to_string(),
            department: "Department".to_string(),
            preferences: vec![
                "Mentor 1".to_string(),
                "Mentor 2".to_string(),
                "Mentor 3".to_string(),
            ],
        }
    }
}

impl Default for MentorColumns {
    fn default() -> Self {
        Self {
            name: "Full Name".to_string(),
            email: "Email Address".to_string(),
            country: "Country in which University is located".to_string(),
            department: "Department in BMSCE".to_string(),
            capacity: "No of Mentee".to_string(),
        }
    }
}

fn default_department_codes() -> BTreeMap<String, String> {
    [
        ("Aerospace Engineering", "AE"),
        ("Artificial Intelligence & Data Science", "CS"),
        ("Artificial Intelligence & Machine Learning", "CS"),
        ("Biotechnology", "BT"),
        ("Chemical Engineering", "CH"),
        ("Civil Engineering", "CE"),
        ("Computer Science & Business Systems", "CS"),
        ("Computer Science & Data Science", "CS"),
        ("Computer Science & Engineering", "CS"),
        ("Electrical & Electronics Engineering", "ECE"),
        ("Electronics & Communication Engineering", "ECE"),
        ("Electronics & Instrumentation Engineering", "ECE"),
        ("Electronics & Telecommunication Engineering", "ECE"),
        ("Industrial Engineering & Management", "ME"),
        ("Information Science & Engineering", "CS"),
        ("Mechanical Engineering", "ME"),
        ("Medical Electronics", "ML"),
    ]
    .into_iter()
    .map(|(name, code)| (name.to_string(), code.to_string()))
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mentees_file: "mentees.csv".to_string(),
            mentors_file: "mentors.csv".to_string(),
            output_directory: "output".to_string(),
            default_graduation_year: 2026,
            timestamp_format: "%m/%d/%Y %H:%M:%S".to_string(),
            capacity_override: None,
            match_policy: MatchPolicy::default(),
            mentee_columns: MenteeColumns::default(),
            mentor_columns: MentorColumns::default(),
            country_aliases: BTreeMap::from([
                ("United States of America (USA)".to_string(), "USA".to_string()),
                ("The Netherlands".to_string(), "Netherlands".to_string()),
            ]),
            department_codes: default_department_codes(),
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }
}
