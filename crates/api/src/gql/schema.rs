use async_graphql::{EmptyMutation, EmptySubscription, Schema};

use super::QueryRoot;
use crate::state::AppState;

pub type PortalSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Read-only schema; writes go through the REST routes. Resolvers reach the
/// state with `ctx.data::<AppState>()` and the caller with `ctx.data::<Claims>()`.
pub fn build_schema(state: AppState) -> PortalSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(state)
        .finish()
}
