//! POS Server - restaurant point-of-sale backend
//!
//! Order totals, discount evaluation and the order lifecycle for a small
//! restaurant. Core pieces:
//!
//! - **Pricing** (`pricing`): eligibility filter, discount amount
//!   calculation and the authoritative order-total recompute
//! - **Orders** (`orders`): order manager with per-order serialization
//!   and discount usage reservation
//! - **Database** (`db`): embedded SQLite storage via sqlx
//! - **HTTP API** (`api`): RESTful interface
//!
//! # Module layout
//!
//! ```text
//! pos-server/src/
//! ├── core/      # config, state, server
//! ├── api/       # HTTP routes and handlers
//! ├── db/        # pool, migrations, repositories
//! ├── pricing/   # discount and total arithmetic
//! ├── orders/    # order lifecycle manager
//! └── utils/     # errors, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod pricing;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use orders::OrderManager;
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env, then initialize logging from the environment
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(level.as_deref(), log_dir.as_deref());
    Ok(())
}
