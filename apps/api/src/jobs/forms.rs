//! Employer form input and its conversion into listings.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::record::{
    NewJob, Record, CORE_FIELDS, FIELD_COMPANY, FIELD_DESCRIPTION, FIELD_SALARY, FIELD_TITLE,
};

/// Names of the employer form inputs, in display order.
pub const FORM_FIELDS: &[&str] = &[
    "job_title",
    "company",
    "job_description",
    "salary",
    "other_information_label",
    "other_information",
];

/// POST body of `/create_job`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobForm {
    pub job_title: String,
    pub company: String,
    pub job_description: String,
    pub salary: String,
    #[serde(default)]
    pub other_information_label: String,
    #[serde(default)]
    pub other_information: String,
}

/// POST body of `/save_job`: the same fields plus the confirmed category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveJobForm {
    #[serde(flatten)]
    pub job: JobForm,
    pub category: String,
}

impl JobForm {
    /// The employer-named extra field, label capitalized. An empty label means
    /// no extra field.
    pub fn extra_field(&self) -> Result<Option<(String, String)>, AppError> {
        let label = capitalize(self.other_information_label.trim());
        if label.is_empty() {
            return Ok(None);
        }
        if CORE_FIELDS.iter().any(|f| f.eq_ignore_ascii_case(&label)) {
            return Err(AppError::Validation(format!(
                "other_information_label '{label}' clashes with a standard field"
            )));
        }
        if label.contains([':', '\n', '\r']) {
            return Err(AppError::Validation(
                "other_information_label cannot contain ':' or line breaks".to_string(),
            ));
        }
        Ok(Some((label, single_line(&self.other_information))))
    }

    /// Listing as shown for confirmation: no ID or category yet.
    pub fn preview(&self) -> Result<Record, AppError> {
        let mut record = Record::new();
        record.insert(FIELD_TITLE, single_line(&self.job_title));
        record.insert(FIELD_COMPANY, single_line(&self.company));
        record.insert(FIELD_DESCRIPTION, single_line(&self.job_description));
        record.insert(FIELD_SALARY, single_line(&self.salary));
        if let Some((label, value)) = self.extra_field()? {
            record.insert(label, value);
        }
        Ok(record)
    }

    pub fn into_new_job(self, category: &str) -> Result<NewJob, AppError> {
        let extra = self.extra_field()?;
        Ok(NewJob {
            title: single_line(&self.job_title),
            category: category.trim().to_string(),
            company: single_line(&self.company),
            description: single_line(&self.job_description),
            salary: single_line(&self.salary),
            extra,
        })
    }
}

impl SaveJobForm {
    pub fn into_new_job(self) -> Result<NewJob, AppError> {
        self.job.into_new_job(&self.category)
    }
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Listing files hold one field per line, so values cannot span lines.
fn single_line(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
