use std::sync::Arc;

use crate::{
    db::{DbPool, OrmConn, orm_from_pool},
    payment::PaymentGateway,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub gateway: Arc<dyn PaymentGateway>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(pool: DbPool, gateway: Arc<dyn PaymentGateway>, jwt_secret: &str) -> Self {
        let orm = orm_from_pool(&pool);
        Self {
            pool,
            orm,
            gateway,
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}
