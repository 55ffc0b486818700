pub mod analysis;
pub mod analysis_service;
pub mod auth;
pub mod classifier;
pub mod market_data;
pub mod scheduler;
pub mod sqlite_store;

pub use analysis_service::AnalysisService;
pub use auth::{AuthError, AuthService};
pub use classifier::{Classifier, ClassifierError, ClassifierVerdict, RemoteClassifier};
pub use market_data::{HistoryRequest, PriceHistoryProvider, ProviderError};
pub use scheduler::{AnalysisScheduler, SchedulerHandle};
pub use sqlite_store::SqliteStore;
