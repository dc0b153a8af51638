//! Application services (use case orchestration).

mod setup_service;

pub use setup_service::ProjectSetupService;
