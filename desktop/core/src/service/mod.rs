mod error;
mod health;
mod launch;
mod process;
mod request_spec;
mod router;
mod service_state;
mod service_status;
mod supervisor;
mod timeout_policy;

pub use error::{Result as ServiceResult, ServiceError};
pub use health::{
    HealthProbe, HttpHealthProbe, delay_before_attempt, startup_budget, wait_until_healthy,
};
pub use launch::{BUNDLED_EXECUTABLE, LaunchResolver, SERVICE_DIR_ENV};
pub use process::{LaunchCommand, ProcessExit, ProcessLauncher, ServiceProcess, TokioProcessLauncher};
pub use request_spec::RequestSpec;
pub use router::RequestRouter;
pub use service_state::ServiceState;
pub use service_status::ServiceStatus;
pub use supervisor::ServiceSupervisor;
pub use timeout_policy::TimeoutPolicy;
