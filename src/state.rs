use std::sync::Arc;

use crate::{db::OrmConn, gateway::PaymentGateway};

#[derive(Clone)]
pub struct AppState {
    pub orm: Arc<OrmConn>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(orm: OrmConn, gateway: Arc<dyn PaymentGateway>, jwt_secret: &str) -> Self {
        Self {
            orm: Arc::new(orm),
            gateway,
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    pub fn db(&self) -> &OrmConn {
        self.orm.as_ref()
    }
}
