//! HTTP surface: metrics, matching, donation totals, user actions and SMS opt-in.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swc_actions::activity::{recent_activity_text, ActivityText};
use swc_actions::{next_action, SensitiveUserAction, UserActionCta};
use swc_db::models::PerformedUserAction;
use swc_db::{queries, DbError, DbPool};
use swc_matching::{DdhqCandidate, DtsiPerson};
use swc_messaging::{MessagingError, SmsOptInResult, SmsOptInService};
use swc_telemetry::Metrics;
use tokio::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::pipeline::run_match;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub metrics: Metrics,
    pub opt_in: Arc<SmsOptInService>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub dtsi: Vec<DtsiPerson>,
    pub ddhq: Vec<DdhqCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsOptInRequest {
    pub phone_number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActionsResponse {
    pub performed: Vec<PerformedUserAction>,
    pub next_action: Option<&'static UserActionCta>,
}

#[derive(Debug, Serialize)]
pub struct UserActionResponse {
    pub action: SensitiveUserAction,
    pub activity: ActivityText,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/api/match", post(match_handler))
        .route("/api/donations/total", get(donations_handler))
        .route("/api/users/:id/actions", get(user_actions_handler))
        .route("/api/users/:id/sms-opt-in", post(sms_opt_in_handler))
        .route("/api/actions/:id", get(user_action_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    match state.metrics.gather() {
        Ok(body) => Ok((StatusCode::OK, body)),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn match_handler(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let start = Instant::now();
    let result = run_match(&request.dtsi, &request.ddhq, &state.metrics, None, None).await;
    state
        .metrics
        .observe_request_latency("match", start.elapsed().as_secs_f64());

    match result {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            error!("Match request failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn donations_handler(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let start = Instant::now();
    let result = queries::sum_donations(&state.db).await;
    state
        .metrics
        .observe_request_latency("donations_total", start.elapsed().as_secs_f64());

    match result {
        Ok(totals) => Ok(Json(totals)),
        Err(e) => {
            error!("Failed to sum donations: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn user_actions_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let start = Instant::now();
    let result = queries::performed_action_types(&state.db, &user_id).await;
    state
        .metrics
        .observe_request_latency("user_actions", start.elapsed().as_secs_f64());

    match result {
        Ok(performed) => {
            let next_action = next_action(&performed);
            Ok(Json(UserActionsResponse {
                performed,
                next_action,
            }))
        }
        Err(e) => {
            error!(user_id = %user_id, "Failed to load performed actions: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn user_action_handler(
    State(state): State<AppState>,
    Path(action_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let start = Instant::now();
    let result = load_user_action(&state.db, &action_id).await;
    state
        .metrics
        .observe_request_latency("user_action", start.elapsed().as_secs_f64());

    match result {
        Ok(response) => Ok(Json(response)),
        Err(e) => match e.downcast_ref::<DbError>() {
            Some(DbError::UserActionNotFound(_)) | Some(DbError::UserNotFound(_)) => {
                Err(StatusCode::NOT_FOUND)
            }
            _ => {
                error!(action_id = %action_id, "Failed to load user action: {}", e);
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        },
    }
}

async fn load_user_action(db: &DbPool, action_id: &str) -> anyhow::Result<UserActionResponse> {
    let record = queries::load_user_action_record(db, action_id).await?;
    let user = queries::get_user(db, &record.action.user_id).await?;
    let action = SensitiveUserAction::from_record(&record)?;
    let activity = recent_activity_text(&action, &user.first_name, &[]);
    Ok(UserActionResponse { action, activity })
}

async fn sms_opt_in_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<SmsOptInRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let start = Instant::now();
    let result = state
        .opt_in
        .update_user_has_opted_in_to_sms(&user_id, &request.phone_number)
        .await;
    state
        .metrics
        .observe_request_latency("sms_opt_in", start.elapsed().as_secs_f64());

    match result {
        Ok(outcome @ SmsOptInResult::Updated { .. }) => Ok((StatusCode::OK, Json(outcome))),
        Ok(outcome @ SmsOptInResult::Invalid { .. }) => Ok((StatusCode::BAD_REQUEST, Json(outcome))),
        Err(MessagingError::Db(DbError::UserNotFound(_))) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(user_id = %user_id, "SMS opt-in failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_actions::cta::DEFAULT_CAMPAIGN_NAME;
    use swc_db::models::{NewUser, NewUserActionDetails, OPT_IN_TYPE_SWC_SIGN_UP};
    use swc_messaging::NoopEventSink;

    async fn state() -> AppState {
        let db = DbPool::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        let opt_in = SmsOptInService::new(db.clone(), Arc::new(NoopEventSink), 1);
        AppState {
            db,
            metrics: Metrics::new().unwrap(),
            opt_in: Arc::new(opt_in),
        }
    }

    async fn spawn(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_match_route_returns_report() {
        let base = spawn(state().await).await;
        let body = serde_json::json!({
            "dtsi": [{
                "slug": "ruben---gallego",
                "firstName": "Ruben",
                "lastName": "Gallego",
                "primaryRole": { "primaryState": "AZ", "primaryDistrict": "" }
            }],
            "ddhq": [{ "cand_id": "9", "first_name": "Ruben", "last_name": "Gallego" }]
        });

        let response = reqwest::Client::new()
            .post(format!("{base}/api/match"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        let report: serde_json::Value = response.json().await.unwrap();
        assert_eq!(report["pairs"][0]["ddhq_cand_id"], "9");
        assert_eq!(report["pairs"][0]["is_direct_match"], true);
    }

    #[tokio::test]
    async fn test_opt_in_route_status_codes() {
        let base = spawn(state().await).await;
        let client = reqwest::Client::new();

        let missing = client
            .post(format!("{base}/api/users/missing/sms-opt-in"))
            .json(&serde_json::json!({ "phoneNumber": "+12025550100" }))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status().as_u16(), 404);

        let invalid = client
            .post(format!("{base}/api/users/missing/sms-opt-in"))
            .json(&serde_json::json!({ "phoneNumber": "12" }))
            .send()
            .await
            .unwrap();
        assert_eq!(invalid.status().as_u16(), 400);
        let body: serde_json::Value = invalid.json().await.unwrap();
        assert!(body["errors"]["phoneNumber"].is_array());
    }

    #[tokio::test]
    async fn test_user_action_routes() {
        let state = state().await;
        let db = state.db.clone();
        let user = queries::create_user(
            &db,
            &NewUser {
                first_name: "Hal".to_string(),
                last_name: "Finney".to_string(),
                email_address: "hal@example.com".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let action = queries::record_user_action(
            &db,
            &user.id,
            DEFAULT_CAMPAIGN_NAME,
            &NewUserActionDetails::OptIn {
                opt_in_type: OPT_IN_TYPE_SWC_SIGN_UP.to_string(),
            },
            None,
        )
        .await
        .unwrap();
        let base = spawn(state).await;

        let actions: serde_json::Value = reqwest::get(format!("{base}/api/users/{}/actions", user.id))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(actions["performed"][0]["action_type"], "OPT_IN");
        assert_eq!(actions["nextAction"]["action_type"], "CALL");

        let single: serde_json::Value = reqwest::get(format!("{base}/api/actions/{}", action.id))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(single["action"]["actionType"], "OPT_IN");
        assert_eq!(single["activity"]["main"], "Hal joined Stand With Crypto");

        let missing = reqwest::get(format!("{base}/api/actions/missing")).await.unwrap();
        assert_eq!(missing.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn test_metrics_route_exposes_counters() {
        let base = spawn(state().await).await;
        let text = reqwest::get(format!("{base}/metrics"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(text.contains("swc_match_comparisons_total"));
    }
}
