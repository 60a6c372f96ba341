//! Server Module
//!
//! Configuration, shared state and startup wiring of the HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── config.rs       - ServerConfig, loaded from the environment
//! ├── state.rs        - AppState, Services and FromRef implementations
//! └── init.rs         - Store/client construction and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration**: `ServerConfig::from_env()` (after `.env` is loaded)
//! 2. **Services**: store, classifier, media store and notifier are built
//! 3. **State**: `AppState` wraps the services and the post pipeline
//! 4. **Background Tasks**: expired sessions are purged periodically
//! 5. **Router**: routes and layers are assembled
//!
//! # Example
//!
//! ```rust,no_run
//! use socialhub::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::{create_app, StartupError};
pub use state::{AppState, Services};
