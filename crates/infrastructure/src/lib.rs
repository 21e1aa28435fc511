//! Infrastructure adapters for the wizard ports.

#![forbid(unsafe_code)]

mod http_submission_gateway;
mod in_memory_wizard_state_repository;
mod json_file_wizard_state_repository;
mod static_translator;
mod system_clock;

pub use http_submission_gateway::HttpSubmissionGateway;
pub use in_memory_wizard_state_repository::InMemoryWizardStateRepository;
pub use json_file_wizard_state_repository::JsonFileWizardStateRepository;
pub use static_translator::StaticTranslator;
pub use system_clock::SystemClock;
