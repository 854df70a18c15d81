use std::time::Duration;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware,
    response::Html,
    routing::get,
    Extension, Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::require_auth;
use crate::error::AppError;
use crate::gql::PortalSchema;
use crate::routes;
use crate::state::AppState;

/// Build the Axum router: health check, authenticated REST routes under
/// `/api`, and the read-side GraphQL endpoint.
pub fn build_router(state: AppState, schema: PortalSchema) -> Router {
    let api = routes::club_routes()
        .merge(routes::sheet_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health))
        .route("/graphql", get(graphiql).post(graphql_handler))
        .nest("/api", api)
        .layer(Extension(schema))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
}

/// Liveness + quick store probe.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.store().ping().await?;
    Ok("ok")
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Execute a GraphQL request, attaching the caller's claims when a valid
/// bearer token is present. Resolvers decide whether they need them.
async fn graphql_handler(
    State(state): State<AppState>,
    Extension(schema): Extension<PortalSchema>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();
    let claims = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| state.jwt_service().verify_token(token).ok());
    if let Some(claims) = claims {
        request = request.data(claims);
    }
    schema.execute(request).await.into()
}
