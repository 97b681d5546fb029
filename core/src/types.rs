//! Domain DTOs for the review-me API.
//!
//! # Design
//! These types mirror the backend's JSON schema (camelCase on the wire) and
//! are decoded strictly: a missing required field or an unknown enum value is
//! a decode error. Optional fields are the ones the backend omits for some
//! question kinds. The mock-server crate defines its own copies; the
//! integration tests catch drift between the two.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of question in a review form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Checkbox,
    Text,
}

// ---------------------------------------------------------------------------
// Writing a review
// ---------------------------------------------------------------------------

/// Payload submitted when creating a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewData {
    pub review_request_code: String,
    pub answers: Vec<AnswerData>,
}

/// One answer. Checkbox questions carry `selected_option_ids`, text
/// questions carry `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerData {
    pub question_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option_ids: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Form structure needed to render the review-writing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingReviewInfo {
    pub form_id: u64,
    pub reviewee_name: String,
    pub project_name: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_id: u64,
    #[serde(default)]
    pub section_name: Option<String>,
    /// `ALWAYS` or `CONDITIONAL`.
    #[serde(default)]
    pub visible: Option<String>,
    /// Option that must be selected for a conditional section to appear.
    #[serde(default)]
    pub on_selected_option_id: Option<u64>,
    pub header: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: u64,
    pub required: bool,
    pub content: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub option_group: Option<OptionGroup>,
    #[serde(default)]
    pub has_guideline: bool,
    #[serde(default)]
    pub guideline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionGroup {
    pub option_group_id: u64,
    pub min_count: u32,
    pub max_count: u32,
    pub options: Vec<OptionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionItem {
    pub option_id: u64,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Reading reviews
// ---------------------------------------------------------------------------

/// A single received review with every answer filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedReview {
    pub form_id: u64,
    pub reviewee_name: String,
    pub project_name: String,
    pub created_at: NaiveDate,
    pub sections: Vec<SectionAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionAnswer {
    pub section_id: u64,
    pub header: String,
    pub questions: Vec<QuestionAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnswer {
    pub question_id: u64,
    pub required: bool,
    pub content: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub option_group: Option<OptionGroupAnswer>,
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionGroupAnswer {
    pub option_group_id: u64,
    pub min_count: u32,
    pub max_count: u32,
    pub options: Vec<OptionItemAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionItemAnswer {
    pub option_id: u64,
    pub content: String,
    pub is_checked: bool,
}

/// Identifiers for one page of a reviewee's received reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewListQuery {
    pub reviewee_id: u64,
    /// Id of the last review already shown; 0 for the first page.
    pub last_review_id: u64,
    pub member_id: u64,
}

/// A page of received reviews, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewList {
    pub reviewee_name: String,
    pub project_name: String,
    pub reviews: Vec<ReviewSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub review_id: u64,
    pub created_at: NaiveDate,
    pub content_preview: String,
    pub categories: Vec<ReviewCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCategory {
    pub option_id: u64,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Review groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewGroup {
    pub reviewee_name: String,
    pub project_name: String,
}

/// Request payload for opening a new review group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewGroupCreation {
    pub reviewee_name: String,
    pub project_name: String,
    pub group_access_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewGroupCreated {
    pub review_request_code: String,
}

/// Request payload for checking a group's access code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAccessCheck {
    pub review_request_code: String,
    pub group_access_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAccess {
    pub has_access: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_omits_absent_fields() {
        let answer = AnswerData {
            question_id: 2,
            selected_option_ids: None,
            text: Some("good teammate".to_string()),
        };
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json, serde_json::json!({ "questionId": 2, "text": "good teammate" }));
    }

    #[test]
    fn question_type_uses_backend_names() {
        let json = serde_json::to_value(QuestionType::Checkbox).unwrap();
        assert_eq!(json, "CHECKBOX");
        let parsed: QuestionType = serde_json::from_str(r#""TEXT""#).unwrap();
        assert_eq!(parsed, QuestionType::Text);
    }

    #[test]
    fn unknown_question_type_is_rejected() {
        let result: Result<QuestionType, _> = serde_json::from_str(r#""RATING""#);
        assert!(result.is_err());
    }

    #[test]
    fn review_summary_parses_dates() {
        let summary: ReviewSummary = serde_json::from_str(
            r#"{"reviewId":1,"createdAt":"2024-08-01","contentPreview":"nice","categories":[]}"#,
        )
        .unwrap();
        assert_eq!(summary.created_at, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
    }

    #[test]
    fn question_defaults_optional_fields() {
        let question: Question = serde_json::from_str(
            r#"{"questionId":2,"required":false,"content":"Anything else?","questionType":"TEXT"}"#,
        )
        .unwrap();
        assert!(question.option_group.is_none());
        assert!(!question.has_guideline);
        assert!(question.guideline.is_none());
    }

    #[test]
    fn group_access_requires_flag() {
        let result: Result<GroupAccess, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }
}
