use crate::config::Config;
use crate::error::{LoadError, Result};
use crate::models::{Mentee, Mentor};
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

type Row = HashMap<String, String>;

/// Trim a cell and collapse internal whitespace runs to a single space.
pub fn clean_cell(value: &str) -> String {
    WHITESPACE.replace_all(value.trim(), " ").into_owned()
}

/// Extracts the mentor name from a preference cell such as `"USA - Jane Doe"`.
/// Returns `None` for an empty cell.
pub fn parse_preference(cell: &str) -> Option<String> {
    let cell = clean_cell(cell);
    if cell.is_empty() {
        return None;
    }

    let name = match cell.split(" - ").nth(1) {
        Some(name) => name.trim().to_string(),
        None => cell,
    };
    Some(name).filter(|n| !n.is_empty())
}

pub struct CsvLoader<'a> {
    config: &'a Config,
}

impl<'a> CsvLoader<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn load_mentees_from_path(&self, path: impl AsRef<Path>) -> Result<Vec<Mentee>> {
        let file = File::open(path.as_ref())?;
        let mentees = self.load_mentees(file)?;
        info!(path = %path.as_ref().display(), count = mentees.len(), "loaded mentees");
        Ok(mentees)
    }

    pub fn load_mentors_from_path(&self, path: impl AsRef<Path>) -> Result<Vec<Mentor>> {
        let file = File::open(path.as_ref())?;
        let mentors = self.load_mentors(file)?;
        info!(path = %path.as_ref().display(), count = mentors.len(), "loaded mentors");
        Ok(mentors)
    }

    /// Reads mentees in sheet order. Sorting into allocation priority is
    /// left to the caller.
    pub fn load_mentees<R: io::Read>(&self, input: R) -> Result<Vec<Mentee>> {
        let columns = &self.config.mentee_columns;
        let mut mentees = Vec::new();

        for (idx, row) in read_rows(input).enumerate() {
            let row_no = idx + 1;
            let row = row?;

            let name = required(&row, &columns.name, row_no)?;
            let email = required(&row, &columns.email, row_no)?;
            let graduation_year = self.parse_year(&field(&row, &columns.graduation_year, row_no)?, row_no);
            let registered_at = self.parse_timestamp(&field(&row, &columns.timestamp, row_no)?, row_no)?;
            let country = self.normalize_country(&field(&row, &columns.country, row_no)?);
            let department = self.department_code(&field(&row, &columns.department, row_no)?, row_no)?;

            let mut preferences = Vec::with_capacity(columns.preferences.len());
            for column in &columns.preferences {
                if let Some(pref) = parse_preference(&field(&row, column, row_no)?) {
                    preferences.push(pref);
                }
            }

            mentees.push(Mentee {
                name,
                email,
                graduation_year,
                registered_at,
                country,
                department,
                preferences,
            });
        }

        Ok(mentees)
    }

    pub fn load_mentors<R: io::Read>(&self, input: R) -> Result<Vec<Mentor>> {
        let columns = &self.config.mentor_columns;
        let mut mentors = Vec::new();

        for (idx, row) in read_rows(input).enumerate() {
            let row_no = idx + 1;
            let row = row?;

            let name = required(&row, &columns.name, row_no)?;
            let email = required(&row, &columns.email, row_no)?;
            let country = self.normalize_country(&field(&row, &columns.country, row_no)?);
            let department = self.department_code(&field(&row, &columns.department, row_no)?, row_no)?;
            let capacity = match self.config.capacity_override {
                Some(capacity) => capacity,
                None => parse_capacity(&field(&row, &columns.capacity, row_no)?, row_no)?,
            };

            mentors.push(Mentor::new(name, email, country, department, capacity));
        }

        Ok(mentors)
    }

    fn parse_year(&self, value: &str, row: usize) -> i32 {
        value.parse().unwrap_or_else(|_| {
            let fallback = self.config.default_graduation_year;
            warn!(row, value, fallback, "unparseable graduation year");
            fallback
        })
    }

    fn parse_timestamp(&self, value: &str, row: usize) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(value, &self.config.timestamp_format).map_err(|source| {
            LoadError::InvalidTimestamp {
                row,
                value: value.to_string(),
                source,
            }
        })
    }

    fn normalize_country(&self, value: &str) -> String {
        self.config
            .country_aliases
            .get(value)
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }

    fn department_code(&self, value: &str, row: usize) -> Result<String> {
        self.config
            .department_codes
            .get(value)
            .cloned()
            .ok_or_else(|| LoadError::UnknownDepartment {
                row,
                value: value.to_string(),
            })
    }
}

fn read_rows<R: io::Read>(input: R) -> impl Iterator<Item = Result<Row>> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input)
        .into_deserialize::<Row>()
        .map(|row| row.map_err(LoadError::from))
}

fn field(row: &Row, column: &str, row_no: usize) -> Result<String> {
    row.get(column)
        .map(|value| clean_cell(value))
        .ok_or_else(|| LoadError::MissingColumn {
            row: row_no,
            column: column.to_string(),
        })
}

fn required(row: &Row, column: &str, row_no: usize) -> Result<String> {
    let value = field(row, column, row_no)?;
    if value.is_empty() {
        return Err(LoadError::EmptyField {
            row: row_no,
            column: column.to_string(),
        });
    }
    Ok(value)
}

fn parse_capacity(value: &str, row: usize) -> Result<u32> {
    value.parse().map_err(|_| LoadError::InvalidCapacity {
        row,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const MENTEES: &str = "\
Timestamp,Full Name,Email Address,Year of Graduation from BMSCE,Department,One country you are interested in for higher education,Mentor 1,Mentor 2,Mentor 3
06/01/2023 10:15:00,  Asha   Rao ,asha@example.com,2024,Computer Science & Engineering,United States of America (USA),USA - Ravi Kumar,Germany - Meera Iyer,
06/02/2023 09:00:30,Kiran,kiran@example.com,N/A,Mechanical Engineering,Germany,Meera Iyer,,
";

    const MENTORS: &str = "\
Full Name,Email Address,Country in which University is located,Department in BMSCE,No of Mentee
Ravi Kumar,ravi@example.com,United States of America (USA),Information Science & Engineering,2
Meera Iyer,meera@example.com,Germany,Industrial Engineering & Management,1
";

    #[test]
    fn loads_mentees_with_normalized_fields() {
        let config = Config::default();
        let mentees = CsvLoader::new(&config).load_mentees(MENTEES.as_bytes()).unwrap();

        assert_eq!(mentees.len(), 2);
        let asha = &mentees[0];
        assert_eq!(asha.name, "Asha Rao");
        assert_eq!(asha.graduation_year, 2024);
        assert_eq!(asha.country, "USA");
        assert_eq!(asha.department, "CS");
        assert_eq!(asha.preferences, vec!["Ravi Kumar", "Meera Iyer"]);
        assert_eq!(
            asha.registered_at,
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap().and_hms_opt(10, 15, 0).unwrap()
        );

        let kiran = &mentees[1];
        assert_eq!(kiran.graduation_year, 2026);
        assert_eq!(kiran.department, "ME");
        assert_eq!(kiran.preferences, vec!["Meera Iyer"]);
    }

    #[test]
    fn loads_mentors_with_capacity() {
        let config = Config::default();
        let mentors = CsvLoader::new(&config).load_mentors(MENTORS.as_bytes()).unwrap();

        assert_eq!(mentors.len(), 2);
        assert_eq!(mentors[0].country, "USA");
        assert_eq!(mentors[0].department, "CS");
        assert_eq!(mentors[0].capacity, 2);
        assert_eq!(mentors[0].total_capacity, 2);
        assert_eq!(mentors[1].department, "ME");
        assert_eq!(mentors[1].capacity, 1);
    }

    #[test]
    fn capacity_override_replaces_sheet_value() {
        let config = Config {
            capacity_override: Some(2),
            ..Config::default()
        };
        let mentors = CsvLoader::new(&config).load_mentors(MENTORS.as_bytes()).unwrap();

        assert!(mentors.iter().all(|m| m.capacity == 2 && m.total_capacity == 2));
    }

    #[test]
    fn unknown_department_is_fatal() {
        let input = "\
Full Name,Email Address,Country in which University is located,Department in BMSCE,No of Mentee
Ravi,ravi@example.com,India,Astrology,1
";
        let config = Config::default();
        let err = CsvLoader::new(&config).load_mentors(input.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::UnknownDepartment { row: 1, ref value } if value == "Astrology"));
    }

    #[test]
    fn bad_timestamp_is_fatal() {
        let input = MENTEES.replace("06/02/2023 09:00:30", "yesterday");
        let config = Config::default();
        let err = CsvLoader::new(&config).load_mentees(input.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::InvalidTimestamp { row: 2, .. }));
    }

    #[test]
    fn bad_capacity_is_fatal() {
        let input = MENTORS.replace(",1\n", ",one\n");
        let config = Config::default();
        let err = CsvLoader::new(&config).load_mentors(input.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::InvalidCapacity { row: 2, .. }));
    }

    #[test]
    fn missing_column_is_reported() {
        let input = "Full Name,Email Address\nRavi,ravi@example.com\n";
        let config = Config::default();
        let err = CsvLoader::new(&config).load_mentors(input.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::MissingColumn { row: 1, ref column } if column == "Country in which University is located"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let input = MENTORS.replace("Meera Iyer,", ",");
        let config = Config::default();
        let err = CsvLoader::new(&config).load_mentors(input.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::EmptyField { row: 2, .. }));
    }

    #[test]
    fn preference_cells() {
        assert_eq!(parse_preference("USA - Ravi Kumar"), Some("Ravi Kumar".to_string()));
        assert_eq!(parse_preference("USA - Ravi Kumar - CS"), Some("Ravi Kumar".to_string()));
        assert_eq!(parse_preference("  Ravi   Kumar "), Some("Ravi Kumar".to_string()));
        assert_eq!(parse_preference("   "), None);
        assert_eq!(parse_preference(""), None);
    }
}
