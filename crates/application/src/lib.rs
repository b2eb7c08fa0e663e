//! Application services and ports.

#![forbid(unsafe_code)]

mod account_ports;
mod account_service;
mod authorization_service;
mod question_ports;
mod question_service;
mod site_gate;

#[cfg(test)]
mod test_support;

pub use account_ports::AccountRepository;
pub use account_service::AccountService;
pub use authorization_service::AuthorizationService;
pub use question_ports::{QuestionListQuery, QuestionRepository};
pub use question_service::{QuestionCapabilities, QuestionService, QuestionView};
pub use site_gate::SiteAccessGate;
