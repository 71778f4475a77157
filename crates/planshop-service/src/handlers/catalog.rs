//! Subscription catalog handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use planshop_core::Plan;

use crate::error::ApiError;
use crate::state::AppState;

/// Plan response.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    /// Plan identifier slug.
    pub id: String,
    /// Subscribed service name.
    pub service_name: String,
    /// Plan tier name.
    pub plan_name: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Price formatted as dollars.
    pub price_formatted: String,
    /// Currency code.
    pub currency: String,
    /// Billing period label.
    pub duration: String,
    /// Feature list.
    pub features: Vec<String>,
    /// Storefront image URL.
    pub image_url: String,
    /// Whether the plan is purchasable.
    pub is_active: bool,
}

impl From<&Plan> for PlanResponse {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id.clone(),
            service_name: plan.service_name.clone(),
            plan_name: plan.plan_name.clone(),
            price_cents: plan.price_cents,
            price_formatted: plan.price_formatted(),
            currency: plan.currency.clone(),
            duration: plan.duration.clone(),
            features: plan.features.clone(),
            image_url: plan.image_url.clone(),
            is_active: plan.is_active,
        }
    }
}

/// List all active subscription plans.
pub async fn list_plans(State(state): State<Arc<AppState>>) -> Json<Vec<PlanResponse>> {
    let plans = state.catalog.active_plans().map(PlanResponse::from).collect();
    Json(plans)
}

/// Get a specific subscription plan.
pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<String>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = state
        .catalog
        .find(&plan_id)
        .ok_or_else(|| ApiError::NotFound(format!("Subscription plan not found: {plan_id}")))?;

    Ok(Json(PlanResponse::from(plan)))
}
