pub mod firebase_provider;
pub mod plain_provider;
pub mod providers;
pub mod session_provider;

// Re-export from providers.rs so we can do "use crate::providers::*;"
pub use providers::*;
