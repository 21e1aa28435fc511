mod clock;
mod schema;
mod state;
mod submission;
mod translation;

pub use clock::Clock;
pub use schema::FormSchemaSource;
pub use state::{StoredValues, WizardStateRepository};
pub use submission::{SubmissionGateway, SubmissionResponse};
pub use translation::Translator;
