pub mod config_manager;
pub mod detection;
pub mod errors;
pub mod gateway;
pub mod routes;
pub mod state;
pub mod translate;
pub mod utils;

pub use config_manager::Config;
pub use errors::{CredentialsError, DetectionError, GatewayError, TranslationError};
pub use gateway::{Gateway, Upload};
pub use state::AppState;
