mod accounts;
mod common;
mod questions;

pub use accounts::{AccountResponse, CreateAccountRequest};
pub use common::HealthResponse;
pub use questions::{
    AddFormResponse, CreateQuestionRequest, FieldAccessResponse, ListQuestionsQuery,
    QuestionCapabilitiesResponse, QuestionResponse, UpdateQuestionRequest,
};
