use axum::extract::FromRef;

use crate::{
    db::{DbPool, OrmConn, orm_from_pool},
    middleware::auth::JwtKeys,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(pool: DbPool, jwt_secret: &str) -> Self {
        let orm = orm_from_pool(&pool);
        Self {
            pool,
            orm,
            jwt: JwtKeys::new(jwt_secret),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
