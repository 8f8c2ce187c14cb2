pub mod assessor;
pub mod models;
pub mod prompt;
pub mod providers;

pub use assessor::{AssessmentInput, RiskAssessor};
pub use providers::gateway::GatewayProvider;
