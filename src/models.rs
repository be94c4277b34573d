use crate::errors::{Result, StudentError};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::pg;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

/// A row of the `students` table.
#[derive(Queryable, Selectable, Serialize, Debug, PartialEq, Clone)]
#[diesel(table_name = crate::schema::students)]
#[diesel(check_for_backend(pg::Pg))]
pub struct Student {
    pub student_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub grade_level: Option<String>,
    pub gpa: Option<Decimal>,
    pub address: Option<String>,
    pub enrollment_date: NaiveDateTime,
}

/// Every writable column, already coerced to its storage type.
///
/// Used for both INSERT and UPDATE; `None` is written as NULL so an update
/// always writes the full merged row.
#[derive(Insertable, AsChangeset, Debug, PartialEq, Clone)]
#[diesel(table_name = crate::schema::students)]
#[diesel(treat_none_as_null = true)]
pub struct StudentValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub grade_level: Option<String>,
    pub gpa: Option<Decimal>,
    pub address: Option<String>,
}

/// Caller-supplied fields for a new record. Date of birth and GPA stay as
/// text until the write: GPA is parsed here, the date is handed to storage
/// to interpret.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub grade_level: Option<String>,
    pub gpa: Option<String>,
    pub address: Option<String>,
}

impl NewStudent {
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        NewStudent {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    pub fn with_gpa(mut self, gpa: &str) -> Self {
        self.gpa = Some(gpa.to_string());
        self
    }

    /// Coerces the text fields. `cast_date` turns date-of-birth text into a
    /// date; the service passes a storage-side cast.
    pub fn to_values<F>(&self, cast_date: F) -> Result<StudentValues>
    where
        F: FnOnce(&str) -> Result<NaiveDate>,
    {
        let gpa = self.gpa.as_deref().map(parse_gpa).transpose()?;
        Ok(StudentValues {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            date_of_birth: self.date_of_birth.as_deref().map(cast_date).transpose()?,
            grade_level: self.grade_level.clone(),
            gpa,
            address: self.address.clone(),
        })
    }
}

/// Per-field overrides for an update. `None` keeps the stored value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StudentChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub grade_level: Option<String>,
    pub gpa: Option<String>,
    pub address: Option<String>,
}

impl StudentChanges {
    pub fn is_empty(&self) -> bool {
        *self == StudentChanges::default()
    }

    /// Merges the overrides onto `existing`. `cast_date` is only called when
    /// a new date of birth was supplied.
    pub fn apply_to<F>(&self, existing: &Student, cast_date: F) -> Result<StudentValues>
    where
        F: FnOnce(&str) -> Result<NaiveDate>,
    {
        let gpa = match self.gpa.as_deref() {
            Some(text) => Some(parse_gpa(text)?),
            None => existing.gpa,
        };
        let date_of_birth = match self.date_of_birth.as_deref() {
            Some(text) => Some(cast_date(text)?),
            None => existing.date_of_birth,
        };
        Ok(StudentValues {
            first_name: pick(&self.first_name, &existing.first_name),
            last_name: pick(&self.last_name, &existing.last_name),
            email: pick(&self.email, &existing.email),
            phone: self.phone.clone().or_else(|| existing.phone.clone()),
            date_of_birth,
            grade_level: self.grade_level.clone().or_else(|| existing.grade_level.clone()),
            gpa,
            address: self.address.clone().or_else(|| existing.address.clone()),
        })
    }
}

fn pick(over: &Option<String>, current: &str) -> String {
    over.clone().unwrap_or_else(|| current.to_string())
}

/// Grade-level bucket of the statistics report.
#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct GradeLevelCount {
    pub grade_level: String,
    pub count: i64,
}

#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct StudentStatistics {
    pub total: i64,
    /// `None` when no record has a GPA.
    pub average_gpa: Option<Decimal>,
    pub by_grade_level: Vec<GradeLevelCount>,
}

/// Parses GPA text. Only numeric syntax is checked, not the 0.00-4.00 range.
pub fn parse_gpa(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| StudentError::InvalidInput {
            field: "GPA",
            value: text.to_string(),
        })
}
