//! Suggest Router

use axum::{
    Router,
    routing::{get, post},
};
use platform::store::DurableStore;

use crate::application::insights::InsightSource;
use crate::domain::repository::HistoryRepository;
use crate::presentation::handlers::{self, SuggestAppState};

/// Create the suggest router for any repository/store/source combination
pub fn suggest_router<H, S, G>(state: SuggestAppState<H, S, G>) -> Router
where
    H: HistoryRepository + Clone + Send + Sync + 'static,
    S: DurableStore + Clone + Send + Sync + 'static,
    G: InsightSource + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/tenants/{tenant_id}/suggest",
            get(handlers::get_suggestions::<H, S, G>),
        )
        .route(
            "/tenants/{tenant_id}/records",
            post(handlers::create_record::<H, S, G>),
        )
        .route(
            "/tenants/{tenant_id}/insights",
            get(handlers::get_insights::<H, S, G>),
        )
        .with_state(state)
}
