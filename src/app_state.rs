use sqlx::SqlitePool;

use crate::config;
use crate::core::db;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub posts_per_page: i64,
}

impl AppState {
    pub fn new(pool: SqlitePool, posts_per_page: i64) -> Self {
        AppState {
            pool,
            posts_per_page: posts_per_page.max(1),
        }
    }

    pub async fn init() -> anyhow::Result<Self> {
        let pool = db::connect(&config::database_url()).await?;
        if config::seed_demo_data() {
            db::init_demo_data(&pool).await?;
        }
        Ok(AppState::new(pool, config::posts_per_page()))
    }
}
