//! Parsers for the user and rating sources.
//!
//! - users.dat: userId::gender::age::occupation::zipcode
//! - ratings.json: one JSON object per line with user_id, movie_id, rating
//!   and an optional timestamp
//! - ratings.dat: userId::movieId::rating::timestamp
//!
//! Every parser reports the file name and 1-based line number of the first
//! bad record and stops there.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const FIELD_DELIMITER: &str = "::";

/// Read a file with ISO-8859-1 encoding (Latin-1)
///
/// MovieLens ships Latin-1, not UTF-8. Each byte maps directly to the
/// Unicode code point of the same value, so the conversion never fails.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();

    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Split a `::` line and check it carries exactly `expected` fields
fn split_fields<'a>(line: &'a str, expected: usize, file: &str, line_no: usize) -> Result<Vec<&'a str>> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != expected {
        return Err(DataLoadError::FieldCountMismatch {
            file: file.to_string(),
            expected,
            found: fields.len(),
            line: line_no,
        });
    }
    Ok(fields)
}

/// Parse a numeric field, attaching the field name and position on failure
fn parse_number<T>(value: &str, field: &str, file: &str, line_no: usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason: format!("Invalid {}: {}", field, e),
    })
}

pub(crate) fn parse_gender(s: &str) -> Result<Gender> {
    match s {
        "M" => Ok(Gender::Male),
        "F" => Ok(Gender::Female),
        _ => Err(DataLoadError::InvalidValue {
            field: "gender".to_string(),
            value: s.to_string(),
        }),
    }
}

pub(crate) fn parse_age_group(s: &str) -> Result<AgeGroup> {
    match s {
        "1" => Ok(AgeGroup::Under18),
        "18" => Ok(AgeGroup::Age18To24),
        "25" => Ok(AgeGroup::Age25To34),
        "35" => Ok(AgeGroup::Age35To44),
        "45" => Ok(AgeGroup::Age45To49),
        "50" => Ok(AgeGroup::Age50To55),
        "56" => Ok(AgeGroup::Age56Plus),
        _ => Err(DataLoadError::InvalidValue {
            field: "age".to_string(),
            value: s.to_string(),
        }),
    }
}

pub(crate) fn parse_occupation(s: &str) -> Result<Occupation> {
    match s {
        "0" => Ok(Occupation::Other),
        "1" => Ok(Occupation::Academic),
        "2" => Ok(Occupation::Artist),
        "3" => Ok(Occupation::Clerical),
        "4" => Ok(Occupation::CollegeStudent),
        "5" => Ok(Occupation::CustomerService),
        "6" => Ok(Occupation::Doctor),
        "7" => Ok(Occupation::Executive),
        "8" => Ok(Occupation::Farmer),
        "9" => Ok(Occupation::Homemaker),
        "10" => Ok(Occupation::K12Student),
        "11" => Ok(Occupation::Lawyer),
        "12" => Ok(Occupation::Programmer),
        "13" => Ok(Occupation::Retired),
        "14" => Ok(Occupation::Sales),
        "15" => Ok(Occupation::Scientist),
        "16" => Ok(Occupation::SelfEmployed),
        "17" => Ok(Occupation::Technician),
        "18" => Ok(Occupation::Tradesman),
        "19" => Ok(Occupation::Unemployed),
        "20" => Ok(Occupation::Writer),
        _ => Err(DataLoadError::InvalidValue {
            field: "occupation".to_string(),
            value: s.to_string(),
        }),
    }
}

/// Parse the users.dat file
///
/// Format: userId::gender::age::occupation::zipcode (no header row)
pub fn parse_users(path: &Path) -> Result<Vec<User>> {
    let file = file_label(path);
    let lines = read_lines_latin1(path)?;
    let mut users = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let fields = split_fields(line_trimmed, 5, &file, line_no)?;
        users.push(User {
            id: parse_number(fields[0], "userId", &file, line_no)?,
            gender: parse_gender(fields[1])?,
            age: parse_age_group(fields[2])?,
            occupation: parse_occupation(fields[3])?,
            zipcode: fields[4].to_string(),
        });
    }

    Ok(users)
}

/// Parse a ratings source, choosing the format from the file extension.
///
/// `.dat` files use the MovieLens `::` layout; anything else is read as
/// JSON Lines.
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("dat") => parse_ratings_dat(path),
        _ => parse_ratings_json(path),
    }
}

/// Parse a JSON Lines ratings file
///
/// Each non-empty line must be an object with at least `user_id`,
/// `movie_id` and `rating`.
pub fn parse_ratings_json(path: &Path) -> Result<Vec<Rating>> {
    let file = file_label(path);
    let lines = read_lines_latin1(path)?;
    let mut ratings = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        let rating: Rating =
            serde_json::from_str(line_trimmed).map_err(|e| DataLoadError::ParseError {
                file: file.clone(),
                line: idx + 1,
                reason: e.to_string(),
            })?;
        ratings.push(rating);
    }

    Ok(ratings)
}

/// Parse the ratings.dat file
///
/// Format: userId::movieId::rating::timestamp
pub fn parse_ratings_dat(path: &Path) -> Result<Vec<Rating>> {
    let file = file_label(path);
    let lines = read_lines_latin1(path)?;
    let mut ratings = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let fields = split_fields(line_trimmed, 4, &file, line_no)?;
        ratings.push(Rating {
            user_id: parse_number(fields[0], "userId", &file, line_no)?,
            movie_id: parse_number(fields[1], "movieId", &file, line_no)?,
            rating: parse_number(fields[2], "rating", &file, line_no)?,
            timestamp: parse_number(fields[3], "timestamp", &file, line_no)?,
        });
    }

    Ok(ratings)
}
