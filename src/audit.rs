use serde_json::Value;

use crate::{db::DbPool, db::new_id, error::AppResult, middleware::auth::AuthUser};

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<&str>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(new_id())
    .bind(user_id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Record a mutation. Audit failures never fail the request.
pub async fn record(pool: &DbPool, user: &AuthUser, action: &str, resource: &str, id: &str) {
    let metadata = serde_json::json!({ "id": id });
    if let Err(err) = log_audit(
        pool,
        Some(user.user_id.as_str()),
        action,
        Some(resource),
        Some(metadata),
    )
    .await
    {
        tracing::warn!(error = %err, action, resource, "audit log failed");
    }
}
