use crate::config::API_KEY_VAR;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use sentiment_types::wire::ProxyQuery;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

pub async fn get_sentiment(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Json<Value>, AppError> {
    let span = tracing::info_span!(
        "proxy_sentiment",
        request_id = %Uuid::now_v7(),
        desc = tracing::field::Empty,
        limit = tracing::field::Empty,
    );

    async move {
        // 1. Credential check before anything else, including the query
        let Some(api_key) = state.config.api_key.as_deref() else {
            tracing::warn!(var = API_KEY_VAR, "Rejecting request: credential missing");
            return Err(AppError::MissingCredential(API_KEY_VAR));
        };

        let params = query.to_params().map_err(|reason| {
            tracing::warn!(%reason, "Rejecting request: malformed query");
            AppError::InvalidQuery(reason)
        })?;
        let span = tracing::Span::current();
        span.record("desc", params.sort_descending);
        span.record("limit", params.limit);

        // 2. Forward
        let body = state.upstream.fetch_list(api_key, &params).await.inspect_err(|e| {
            tracing::warn!(error = %e, code = e.code().as_str(), "Upstream call failed");
        })?;

        tracing::info!("Forwarded upstream list");
        Ok(Json(body))
    }
    .instrument(span)
    .await
}
