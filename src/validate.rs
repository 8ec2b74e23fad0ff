use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, FieldError};

lazy_static! {
    static ref EMAIL_SHAPE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

#[derive(Debug, Default, Clone)]
pub struct SubmissionFields {
    pub full_name: String,
    pub college_name: String,
    pub department: String,
    pub year: String,
    pub email: String,
    pub phone: String,
    pub selected_events: String,
    pub transaction_id: String,
}

/// Mirrors the client-side checks; the service refuses to persist an
/// invalid record even when called directly.
pub fn validate(fields: &SubmissionFields) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if fields.full_name.trim().len() < 3 {
        errors.push(FieldError {
            field: "fullName",
            message: "Full name is required",
        });
    }
    if fields.college_name.trim().len() < 3 {
        errors.push(FieldError {
            field: "collegeName",
            message: "College name is required",
        });
    }
    if fields.department.trim().len() < 2 {
        errors.push(FieldError {
            field: "department",
            message: "Department is required",
        });
    }
    if fields.year.trim().is_empty() {
        errors.push(FieldError {
            field: "year",
            message: "Year is required",
        });
    }
    if !EMAIL_SHAPE.is_match(fields.email.trim()) {
        errors.push(FieldError {
            field: "email",
            message: "Invalid email address",
        });
    }
    if fields.phone.trim().len() < 10 {
        errors.push(FieldError {
            field: "phone",
            message: "Invalid phone number",
        });
    }
    if selected_event_count(&fields.selected_events) == 0 {
        errors.push(FieldError {
            field: "selectedEvents",
            message: "Select at least one event",
        });
    }
    if fields.transaction_id.trim().len() < 6 {
        errors.push(FieldError {
            field: "transactionId",
            message: "Valid transaction ID is required",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn selected_event_count(selected: &str) -> usize {
    selected
        .split(',')
        .filter(|event| !event.trim().is_empty())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SubmissionFields {
        SubmissionFields {
            full_name: "Ada Lovelace".to_string(),
            college_name: "Analytical College".to_string(),
            department: "CSE".to_string(),
            year: "3".to_string(),
            email: "ada@example.com".to_string(),
            phone: "9876543210".to_string(),
            selected_events: "Hackathon, Dance".to_string(),
            transaction_id: "TXN123456".to_string(),
        }
    }

    fn failing_field(fields: &SubmissionFields) -> Vec<&'static str> {
        match validate(fields) {
            Err(AppError::Validation(errors)) => errors.iter().map(|e| e.field).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn accepts_a_complete_submission() {
        assert!(validate(&valid()).is_ok());
    }

    #[test]
    fn rejects_short_fields() {
        let mut fields = valid();
        fields.full_name = "Al".to_string();
        fields.phone = "123".to_string();
        fields.transaction_id = "TXN".to_string();

        let failed = failing_field(&fields);
        assert_eq!(failed, vec!["fullName", "phone", "transactionId"]);
    }

    #[test]
    fn rejects_bad_email_shapes() {
        for email in ["", "plainaddress", "missing@tld", "two words@example.com"] {
            let mut fields = valid();
            fields.email = email.to_string();
            assert_eq!(failing_field(&fields), vec!["email"], "email: {email:?}");
        }
    }

    #[test]
    fn rejects_empty_event_selection() {
        for selected in ["", " , ,", ","] {
            let mut fields = valid();
            fields.selected_events = selected.to_string();
            assert_eq!(failing_field(&fields), vec!["selectedEvents"]);
        }
    }
}
