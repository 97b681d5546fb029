use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

const CATEGORY_QUESTION_ID: u64 = 1;
const TEXT_QUESTION_ID: u64 = 2;
const PREVIEW_LENGTH: usize = 150;
const GROUP_ACCESS_CODE_HEADER: &str = "groupAccessCode";

// --- wire types ---

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewGroupCreationRequest {
    pub reviewee_name: String,
    pub project_name: String,
    pub group_access_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewGroupCreationResponse {
    pub review_request_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckValidAccessRequest {
    pub review_request_code: String,
    pub group_access_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckValidAccessResponse {
    pub has_access: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewGroupResponse {
    pub reviewee_name: String,
    pub project_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRegisterRequest {
    pub review_request_code: String,
    pub answers: Vec<AnswerRequest>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question_id: u64,
    #[serde(default)]
    pub selected_option_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewCreatedResponse {
    pub id: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListElementResponse {
    pub review_id: u64,
    pub created_at: NaiveDate,
    pub content_preview: String,
    pub categories: Vec<ReviewCategoryResponse>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCategoryResponse {
    pub option_id: u64,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedReviewsResponse {
    pub reviewee_name: String,
    pub project_name: String,
    pub reviews: Vec<ReviewListElementResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeQuery {
    pub review_request_code: String,
}

// --- state ---

#[derive(Clone, Debug)]
struct Group {
    reviewee_name: String,
    project_name: String,
    group_access_code: String,
}

#[derive(Clone, Debug)]
struct Review {
    review_request_code: String,
    created_at: NaiveDate,
    answers: Vec<AnswerRequest>,
}

/// In-memory backend state.
///
/// Request codes are issued as the decimal reviewee id, so a client that
/// sends a reviewee id under `reviewRequestCode` lands on the same group.
#[derive(Default)]
pub struct Store {
    next_group_id: u64,
    next_review_id: u64,
    groups: HashMap<String, Group>,
    reviews: BTreeMap<u64, Review>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/v2/groups", get(get_review_group).post(create_review_group))
        .route("/v2/groups/check", post(check_group_access_code))
        .route("/v2/reviews", get(get_review_list).post(create_review))
        .route("/v2/reviews/write", get(get_review_form))
        .route("/v2/reviews/{id}", get(get_review_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- groups ---

async fn create_review_group(
    State(db): State<Db>,
    Json(input): Json<ReviewGroupCreationRequest>,
) -> Result<Json<ReviewGroupCreationResponse>, StatusCode> {
    if input.reviewee_name.trim().is_empty() || input.group_access_code.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut store = db.write().await;
    store.next_group_id += 1;
    let code = store.next_group_id.to_string();
    store.groups.insert(
        code.clone(),
        Group {
            reviewee_name: input.reviewee_name,
            project_name: input.project_name,
            group_access_code: input.group_access_code,
        },
    );
    tracing::info!(review_request_code = %code, "review group created");
    Ok(Json(ReviewGroupCreationResponse {
        review_request_code: code,
    }))
}

async fn check_group_access_code(
    State(db): State<Db>,
    Json(input): Json<CheckValidAccessRequest>,
) -> Result<Json<CheckValidAccessResponse>, StatusCode> {
    let store = db.read().await;
    let group = store
        .groups
        .get(&input.review_request_code)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(CheckValidAccessResponse {
        has_access: group.group_access_code == input.group_access_code,
    }))
}

async fn get_review_group(
    State(db): State<Db>,
    Query(query): Query<CodeQuery>,
) -> Result<Json<ReviewGroupResponse>, StatusCode> {
    let store = db.read().await;
    let group = store
        .groups
        .get(&query.review_request_code)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(ReviewGroupResponse {
        reviewee_name: group.reviewee_name.clone(),
        project_name: group.project_name.clone(),
    }))
}

// --- reviews ---

async fn get_review_form(
    State(db): State<Db>,
    Query(query): Query<CodeQuery>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let store = db.read().await;
    let group = store
        .groups
        .get(&query.review_request_code)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(template(group)))
}

async fn create_review(
    State(db): State<Db>,
    Json(input): Json<ReviewRegisterRequest>,
) -> Result<(StatusCode, Json<ReviewCreatedResponse>), StatusCode> {
    let mut store = db.write().await;
    if !store.groups.contains_key(&input.review_request_code) {
        return Err(StatusCode::NOT_FOUND);
    }
    if !input.answers.iter().all(is_valid_answer) {
        return Err(StatusCode::BAD_REQUEST);
    }
    store.next_review_id += 1;
    let id = store.next_review_id;
    store.reviews.insert(
        id,
        Review {
            review_request_code: input.review_request_code,
            created_at: Utc::now().date_naive(),
            answers: input.answers,
        },
    );
    Ok((StatusCode::CREATED, Json(ReviewCreatedResponse { id })))
}

/// Received reviews need the group's password in the `groupAccessCode`
/// header; a missing or wrong one is a 400.
fn authorize(headers: &HeaderMap, group: &Group) -> Result<(), StatusCode> {
    let code = headers
        .get(GROUP_ACCESS_CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    if code != group.group_access_code {
        tracing::warn!("group access code rejected");
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(())
}

async fn get_review_list(
    State(db): State<Db>,
    Query(query): Query<CodeQuery>,
    headers: HeaderMap,
) -> Result<Json<ReceivedReviewsResponse>, StatusCode> {
    let store = db.read().await;
    let group = store
        .groups
        .get(&query.review_request_code)
        .ok_or(StatusCode::NOT_FOUND)?;
    authorize(&headers, group)?;
    let reviews = store
        .reviews
        .iter()
        .rev()
        .filter(|(_, review)| review.review_request_code == query.review_request_code)
        .map(|(id, review)| summarize(*id, review))
        .collect();
    Ok(Json(ReceivedReviewsResponse {
        reviewee_name: group.reviewee_name.clone(),
        project_name: group.project_name.clone(),
        reviews,
    }))
}

/// The client sends its member id under `reviewRequestCode`, so only the
/// parameter's presence is enforced.
async fn get_review_detail(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Query(_query): Query<CodeQuery>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let store = db.read().await;
    let review = store.reviews.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let group = store
        .groups
        .get(&review.review_request_code)
        .ok_or(StatusCode::NOT_FOUND)?;
    authorize(&headers, group)?;
    Ok(Json(detail(group, review)))
}

// --- fixtures ---

const CATEGORY_OPTIONS: [(u64, &str); 3] = [(1, "communication"), (2, "problem solving"), (3, "code quality")];

fn is_valid_answer(answer: &AnswerRequest) -> bool {
    match answer.question_id {
        CATEGORY_QUESTION_ID => answer.selected_option_ids.as_ref().is_some_and(|ids| {
            (1..=2).contains(&ids.len()) && ids.iter().all(|id| CATEGORY_OPTIONS.iter().any(|(option, _)| option == id))
        }),
        TEXT_QUESTION_ID => answer.text.as_ref().is_some_and(|text| !text.trim().is_empty()),
        _ => false,
    }
}

fn template(group: &Group) -> serde_json::Value {
    let options: Vec<_> = CATEGORY_OPTIONS
        .iter()
        .map(|(id, content)| serde_json::json!({ "optionId": id, "content": content }))
        .collect();
    serde_json::json!({
        "formId": 1,
        "revieweeName": group.reviewee_name,
        "projectName": group.project_name,
        "sections": [
            {
                "sectionId": 1,
                "sectionName": "strengths",
                "visible": "ALWAYS",
                "header": format!("What did {} do well?", group.reviewee_name),
                "questions": [{
                    "questionId": CATEGORY_QUESTION_ID,
                    "required": true,
                    "content": "Pick up to two strengths",
                    "questionType": "CHECKBOX",
                    "optionGroup": { "optionGroupId": 1, "minCount": 1, "maxCount": 2, "options": options },
                    "hasGuideline": false
                }]
            },
            {
                "sectionId": 2,
                "sectionName": "comment",
                "visible": "ALWAYS",
                "header": "Anything else?",
                "questions": [{
                    "questionId": TEXT_QUESTION_ID,
                    "required": true,
                    "content": "Leave a comment",
                    "questionType": "TEXT",
                    "hasGuideline": true,
                    "guideline": "Be specific and kind"
                }]
            }
        ]
    })
}

fn detail(group: &Group, review: &Review) -> serde_json::Value {
    let selected: Vec<u64> = review
        .answers
        .iter()
        .filter_map(|answer| answer.selected_option_ids.clone())
        .flatten()
        .collect();
    let options: Vec<_> = CATEGORY_OPTIONS
        .iter()
        .map(|(id, content)| {
            serde_json::json!({ "optionId": id, "content": content, "isChecked": selected.contains(id) })
        })
        .collect();
    serde_json::json!({
        "formId": 1,
        "revieweeName": group.reviewee_name,
        "projectName": group.project_name,
        "createdAt": review.created_at,
        "sections": [
            {
                "sectionId": 1,
                "header": format!("What did {} do well?", group.reviewee_name),
                "questions": [{
                    "questionId": CATEGORY_QUESTION_ID,
                    "required": true,
                    "content": "Pick up to two strengths",
                    "questionType": "CHECKBOX",
                    "optionGroup": { "optionGroupId": 1, "minCount": 1, "maxCount": 2, "options": options }
                }]
            },
            {
                "sectionId": 2,
                "header": "Anything else?",
                "questions": [{
                    "questionId": TEXT_QUESTION_ID,
                    "required": true,
                    "content": "Leave a comment",
                    "questionType": "TEXT",
                    "answer": text_answer(review)
                }]
            }
        ]
    })
}

fn text_answer(review: &Review) -> Option<&str> {
    review.answers.iter().find_map(|answer| answer.text.as_deref())
}

fn summarize(id: u64, review: &Review) -> ReviewListElementResponse {
    let categories = review
        .answers
        .iter()
        .filter_map(|answer| answer.selected_option_ids.as_ref())
        .flatten()
        .filter_map(|selected| {
            CATEGORY_OPTIONS
                .iter()
                .find(|(option, _)| option == selected)
                .map(|(option, content)| ReviewCategoryResponse {
                    option_id: *option,
                    content: content.to_string(),
                })
        })
        .collect();
    ReviewListElementResponse {
        review_id: id,
        created_at: review.created_at,
        content_preview: text_answer(review)
            .unwrap_or_default()
            .chars()
            .take(PREVIEW_LENGTH)
            .collect(),
        categories,
    }
}
