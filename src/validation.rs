//! Payload validation for jobs and bids. Pure: no database access, no side
//! effects. Every violation is collected so the caller sees the full list.

use crate::error::{ApiError, FieldError};
use crate::models::bids::CreateBid;
use crate::models::jobs::{AssignmentMode, CreateJob};

/// Allowed deviation between a bid's line-item sum and its declared total.
pub const BREAKDOWN_TOLERANCE: f64 = 0.01;

const TITLE_MAX: usize = 200;
const DESCRIPTION_MIN: usize = 10;
const DESCRIPTION_MAX: usize = 2000;

/// Check a job payload against the entity constraints. Returns `Ok(())` or
/// an `ApiError::Validation` carrying every field that failed.
pub fn validate_job(input: &CreateJob) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    let title_len = input.title.trim().chars().count();
    if title_len == 0 || title_len > TITLE_MAX {
        errors.push(FieldError::new(
            "title",
            format!("title must be between 1 and {TITLE_MAX} characters"),
        ));
    }

    let desc_len = input.description.trim().chars().count();
    if desc_len < DESCRIPTION_MIN || desc_len > DESCRIPTION_MAX {
        errors.push(FieldError::new(
            "description",
            format!("description must be between {DESCRIPTION_MIN} and {DESCRIPTION_MAX} characters"),
        ));
    }

    match input.assignment_mode {
        AssignmentMode::Direct => {
            let assignees = input
                .assigned_to
                .clone()
                .map(|a| a.into_ids().len())
                .unwrap_or(0);
            if assignees == 0 {
                errors.push(FieldError::new(
                    "assigned_to",
                    "direct assignment requires at least one assignee",
                ));
            }
        }
        AssignmentMode::Open => {
            if input.bid_deadline.is_none() {
                errors.push(FieldError::new(
                    "bid_deadline",
                    "open bidding requires a bid deadline",
                ));
            }
        }
    }

    if let (Some(min), Some(max)) = (input.min_budget, input.max_budget) {
        if min > max {
            errors.push(FieldError::new(
                "min_budget",
                "min_budget must not exceed max_budget",
            ));
        }
    }

    if input.required_skills.iter().all(|s| s.trim().is_empty()) {
        errors.push(FieldError::new(
            "required_skills",
            "at least one required skill must be listed",
        ));
    }

    if input.deliverables.iter().all(|d| d.trim().is_empty()) {
        errors.push(FieldError::new(
            "deliverables",
            "at least one deliverable must be listed",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Check a bid payload: a positive total, and a breakdown (when present)
/// whose line items sum to that total within [`BREAKDOWN_TOLERANCE`].
pub fn validate_bid(input: &CreateBid) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    if input.amount_total <= 0.0 {
        errors.push(FieldError::new(
            "amount_total",
            "amount_total must be greater than zero",
        ));
    }

    if let Some(breakdown) = &input.breakdown {
        if let Some(line) = breakdown.iter().find(|line| line.amount < 0.0) {
            errors.push(FieldError::new(
                "breakdown",
                format!("breakdown line '{}' has a negative amount", line.label),
            ));
        }
        let sum: f64 = breakdown.iter().map(|line| line.amount).sum();
        if (sum - input.amount_total).abs() > BREAKDOWN_TOLERANCE {
            errors.push(FieldError::new(
                "breakdown",
                format!(
                    "breakdown sums to {sum} but amount_total is {}",
                    input.amount_total
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bids::BreakdownLine;
    use crate::models::jobs::{AssignedTo, PaymentType};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn open_job() -> CreateJob {
        CreateJob {
            title: "Wire removal for chase sequence".to_string(),
            description: "Remove rigging wires across 40 shots".to_string(),
            movie_ref: None,
            assignment_mode: AssignmentMode::Open,
            assigned_to: None,
            payment_type: PaymentType::PerShot,
            currency: "USD".to_string(),
            min_budget: Some(2000.0),
            max_budget: Some(8000.0),
            total_shots: Some(40),
            total_frames: None,
            resolution: Some("4K".to_string()),
            frame_rate: Some("24".to_string()),
            shot_breakdown: vec![],
            required_skills: vec!["Paint".to_string()],
            software_preferences: vec![],
            deliverables: vec!["Graded EXRs".to_string()],
            bid_deadline: Some(Utc::now()),
            expected_start_date: None,
            final_delivery_date: NaiveDate::from_ymd_opt(2026, 11, 15).unwrap(),
            notes_for_bidders: None,
        }
    }

    fn bid(amount_total: f64, breakdown: Option<Vec<BreakdownLine>>) -> CreateBid {
        CreateBid {
            amount_total,
            currency: "USD".to_string(),
            breakdown,
            estimated_duration_days: Some(30),
            start_available_from: None,
            notes: None,
            included_services: vec![],
        }
    }

    fn field_names(err: ApiError) -> Vec<&'static str> {
        match err {
            ApiError::Validation(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_open_job_passes() {
        assert!(validate_job(&open_job()).is_ok());
    }

    #[test]
    fn open_job_without_deadline_fails() {
        let mut job = open_job();
        job.bid_deadline = None;
        assert_eq!(field_names(validate_job(&job).unwrap_err()), vec!["bid_deadline"]);
    }

    #[test]
    fn direct_job_requires_assignees() {
        let mut job = open_job();
        job.assignment_mode = AssignmentMode::Direct;
        job.assigned_to = Some(AssignedTo::Many(vec![]));
        assert_eq!(field_names(validate_job(&job).unwrap_err()), vec!["assigned_to"]);

        job.assigned_to = Some(AssignedTo::Many(vec![Uuid::new_v4()]));
        assert!(validate_job(&job).is_ok());
    }

    #[test]
    fn inverted_budget_bounds_fail() {
        let mut job = open_job();
        job.min_budget = Some(9000.0);
        job.max_budget = Some(100.0);
        assert_eq!(field_names(validate_job(&job).unwrap_err()), vec!["min_budget"]);
    }

    #[test]
    fn all_violations_reported_together() {
        let mut job = open_job();
        job.title = String::new();
        job.description = "short".to_string();
        job.required_skills = vec![];
        job.deliverables = vec!["  ".to_string()];
        let fields = field_names(validate_job(&job).unwrap_err());
        assert_eq!(
            fields,
            vec!["title", "description", "required_skills", "deliverables"]
        );
    }

    #[test]
    fn breakdown_must_sum_to_total() {
        let lines = vec![
            BreakdownLine {
                label: "A".to_string(),
                amount: 600.0,
            },
            BreakdownLine {
                label: "B".to_string(),
                amount: 400.0,
            },
        ];

        assert!(validate_bid(&bid(1000.0, Some(lines.clone()))).is_ok());
        // Within the 0.01 tolerance.
        assert!(validate_bid(&bid(1000.005, Some(lines.clone()))).is_ok());

        let err = validate_bid(&bid(900.0, Some(lines))).unwrap_err();
        assert_eq!(field_names(err), vec!["breakdown"]);
    }

    #[test]
    fn non_positive_total_fails() {
        assert_eq!(
            field_names(validate_bid(&bid(0.0, None)).unwrap_err()),
            vec!["amount_total"]
        );
        assert_eq!(
            field_names(validate_bid(&bid(-5.0, None)).unwrap_err()),
            vec!["amount_total"]
        );
    }

    #[test]
    fn bid_without_breakdown_skips_sum_check() {
        assert!(validate_bid(&bid(5000.0, None)).is_ok());
    }
}
