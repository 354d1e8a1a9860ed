mod application;
mod application_env;
mod application_shutdown;
mod application_state;
mod application_tracing;

pub use application::create_application;
pub use application_env::ApplicationEnv;
pub use application_shutdown::{close, shutdown_signal};
pub use application_state::{create_state, ApplicationState, ApplicationStateToClose};
pub use application_tracing::setup_tracing;
