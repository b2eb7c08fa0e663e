use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use forum_application::QuestionListQuery;
use forum_domain::{QuestionChanges, QuestionId};
use uuid::Uuid;

use crate::dto::{
    AddFormResponse, CreateQuestionRequest, ListQuestionsQuery, QuestionCapabilitiesResponse,
    QuestionResponse, UpdateQuestionRequest,
};
use crate::error::ApiResult;
use crate::middleware::CallerIdentity;
use crate::state::AppState;

pub async fn list_questions_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Query(query): Query<ListQuestionsQuery>,
) -> ApiResult<Json<Vec<QuestionResponse>>> {
    let questions = state
        .question_service
        .list_questions(identity.get(), QuestionListQuery::try_from(query)?)
        .await?
        .into_iter()
        .map(QuestionResponse::from)
        .collect();

    Ok(Json(questions))
}

pub async fn create_question_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Json(payload): Json<CreateQuestionRequest>,
) -> ApiResult<(StatusCode, Json<QuestionResponse>)> {
    let question = state
        .question_service
        .create_question(identity.get(), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from(question))))
}

pub async fn question_capabilities_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> ApiResult<Json<QuestionCapabilitiesResponse>> {
    let capabilities = state
        .question_service
        .question_capabilities(identity.get())
        .await?;

    Ok(Json(capabilities.into()))
}

pub async fn add_form_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> ApiResult<Json<AddFormResponse>> {
    let fields = state.question_service.add_form(identity.get()).await?;

    Ok(Json(fields.into()))
}

pub async fn get_question_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(question_id): Path<Uuid>,
) -> ApiResult<Json<QuestionResponse>> {
    let question = state
        .question_service
        .get_question(identity.get(), QuestionId::from_uuid(question_id))
        .await?;

    Ok(Json(question.into()))
}

pub async fn update_question_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(question_id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> ApiResult<Json<QuestionResponse>> {
    let question = state
        .question_service
        .update_question(
            identity.get(),
            QuestionId::from_uuid(question_id),
            QuestionChanges::try_from(payload)?,
        )
        .await?;

    Ok(Json(question.into()))
}

pub async fn delete_question_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(question_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .question_service
        .delete_question(identity.get(), QuestionId::from_uuid(question_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
