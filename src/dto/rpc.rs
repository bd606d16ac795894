use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `{procedure, input}` call accepted by the RPC endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RpcRequest {
    pub procedure: String,
    #[serde(default)]
    pub input: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct IdInput {
    pub id: String,
}
