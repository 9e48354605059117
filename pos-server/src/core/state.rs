use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderManager;
use crate::pricing::{BogoPolicy, PricingPolicy};

/// Shared server state handed to every handler
///
/// Cloning is shallow: the pool and the order manager are reference
/// counted.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub orders: Arc<OrderManager>,
}

impl ServerState {
    /// Initialize the working directory, the database and the order manager
    ///
    /// # Panics
    ///
    /// Panics when the working directory or database cannot be set up;
    /// the server is useless without either.
    pub async fn initialize(config: &Config) -> Self {
        std::fs::create_dir_all(&config.work_dir).expect("Failed to create work directory");

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let policy = PricingPolicy {
            vat_rate: config.vat_rate,
            bogo: BogoPolicy {
                max_granted_units: config.bogo_max_free_units,
            },
        };
        let orders = Arc::new(OrderManager::new(db.pool.clone(), policy));

        Self {
            config: config.clone(),
            pool: db.pool,
            orders,
        }
    }
}
