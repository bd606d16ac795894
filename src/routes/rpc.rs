//! Procedure-call endpoint mirroring the shop routes.

use axum::{Json, Router, extract::State, routing::post};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    dto::{
        rpc::{IdInput, RpcRequest},
        shops::{CreateShopRequest, UpdateShopRequest},
    },
    error::{AppError, AppResult},
    extract::JsonBody,
    middleware::auth::AuthUser,
    optimistic::Patch,
    response::ApiResponse,
    routes::params::ShopListQuery,
    services::shop_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(call))
}

/// A decoded call, ready to dispatch.
#[derive(Debug)]
pub enum ShopCall {
    List(ShopListQuery),
    Get(IdInput),
    Create(CreateShopRequest),
    Update(Patch<UpdateShopRequest>),
    Delete(IdInput),
}

impl TryFrom<RpcRequest> for ShopCall {
    type Error = AppError;

    fn try_from(request: RpcRequest) -> Result<Self, Self::Error> {
        let input = request.input;
        let call = match request.procedure.as_str() {
            "shops.list" => Self::List(if input.is_null() {
                ShopListQuery::default()
            } else {
                decode(input)?
            }),
            "shops.get" => Self::Get(decode(input)?),
            "shops.create" => Self::Create(decode(input)?),
            "shops.update" => Self::Update(decode(input)?),
            "shops.delete" => Self::Delete(decode(input)?),
            other => {
                return Err(AppError::BadRequest(format!("Unknown procedure {other}")));
            }
        };
        Ok(call)
    }
}

fn decode<T: DeserializeOwned>(input: Value) -> AppResult<T> {
    serde_json::from_value(input)
        .map_err(|err| AppError::BadRequest(format!("Invalid input: {err}")))
}

#[utoipa::path(
    post,
    path = "/api/rpc",
    request_body = RpcRequest,
    responses(
        (status = 200, description = "Procedure result in the usual envelope"),
        (status = 400, description = "Unknown procedure or invalid input"),
    ),
    security(("bearer_auth" = [])),
    tag = "RPC"
)]
pub async fn call(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(request): JsonBody<RpcRequest>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let procedure = request.procedure.clone();
    let call = ShopCall::try_from(request)?;
    tracing::debug!(%procedure, "rpc call");

    let resp = match call {
        ShopCall::List(query) => shop_service::list_shops(&state, &user, query)
            .await?
            .into_json(),
        ShopCall::Get(input) => shop_service::get_shop(&state, &user, &input.id)
            .await?
            .into_json(),
        ShopCall::Create(payload) => shop_service::create_shop(&state, &user, payload)
            .await?
            .into_json(),
        ShopCall::Update(patch) => {
            shop_service::update_shop(&state, &user, &patch.id, patch.changes)
                .await?
                .into_json()
        }
        ShopCall::Delete(input) => shop_service::delete_shop(&state, &user, &input.id)
            .await?
            .into_json(),
    };

    resp.map(Json)
        .map_err(|err| AppError::Internal(anyhow::Error::new(err)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(procedure: &str, input: Value) -> RpcRequest {
        RpcRequest {
            procedure: procedure.into(),
            input,
        }
    }

    #[test]
    fn list_accepts_missing_input() {
        let call = ShopCall::try_from(request("shops.list", Value::Null)).unwrap();
        assert!(matches!(call, ShopCall::List(q) if q.page.is_none() && q.q.is_none()));
    }

    #[test]
    fn update_splits_id_from_changes() {
        let call = ShopCall::try_from(request(
            "shops.update",
            json!({ "id": "s1", "name": "Ferris Goods" }),
        ))
        .unwrap();
        let ShopCall::Update(patch) = call else {
            panic!("expected an update call");
        };
        assert_eq!(patch.id, "s1");
        assert_eq!(patch.changes.name.as_deref(), Some("Ferris Goods"));
        assert_eq!(patch.changes.slug, None);
    }

    #[test]
    fn unknown_procedure_is_bad_request() {
        let err = ShopCall::try_from(request("products.list", Value::Null)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("products.list")));
    }

    #[test]
    fn get_requires_an_id() {
        let err = ShopCall::try_from(request("shops.get", json!({}))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
