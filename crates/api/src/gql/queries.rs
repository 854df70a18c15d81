use async_graphql::{Context, Object, Result};
use portal_infra::models::ClubRow;

use crate::auth::Claims;
use crate::gql::types::{Club, Coach, CoachRoster, Competitor, DemoTeam, Payment};
use crate::state::AppState;

pub struct QueryRoot;

fn claims<'a>(ctx: &'a Context<'_>) -> Result<&'a Claims> {
    ctx.data::<Claims>()
        .map_err(|_| async_graphql::Error::new("Authentication required"))
}

async fn owned_club(ctx: &Context<'_>, club_id: &str) -> Result<ClubRow> {
    let claims = claims(ctx)?;
    let state = ctx.data::<AppState>()?;
    Ok(state.registration().owned_club(club_id, &claims.email).await?)
}

#[Object]
impl QueryRoot {
    /// The club registered by the signed-in user, if any.
    async fn my_club(&self, ctx: &Context<'_>) -> Result<Option<Club>> {
        let claims = claims(ctx)?;
        let state = ctx.data::<AppState>()?;
        let Some(row) = state.store().club_for_user(&claims.email).await? else {
            return Ok(None);
        };
        let total = state.store().fee_total(&row.club_id).await?;
        Ok(Some(Club::from_row(row, total)))
    }

    async fn club(&self, ctx: &Context<'_>, club_id: String) -> Result<Club> {
        let row = owned_club(ctx, &club_id).await?;
        let state = ctx.data::<AppState>()?;
        let total = state.store().fee_total(&row.club_id).await?;
        Ok(Club::from_row(row, total))
    }

    async fn competitors(&self, ctx: &Context<'_>, club_id: String) -> Result<Vec<Competitor>> {
        let club = owned_club(ctx, &club_id).await?;
        let state = ctx.data::<AppState>()?;
        let rows = state.registration().competitors(&club).await?;
        Ok(rows.into_iter().map(Competitor::from).collect())
    }

    async fn coaches(&self, ctx: &Context<'_>, club_id: String) -> Result<CoachRoster> {
        let club = owned_club(ctx, &club_id).await?;
        let state = ctx.data::<AppState>()?;
        Ok(state.registration().coach_roster(&club).await?.into())
    }

    /// Coach lookup by IC/Passport number.
    async fn coach(&self, ctx: &Context<'_>, club_id: String, id_number: String) -> Result<Option<Coach>> {
        let club = owned_club(ctx, &club_id).await?;
        let state = ctx.data::<AppState>()?;
        let row = state.store().get_coach(&club.club_id, &id_number).await?;
        Ok(row.map(Coach::from))
    }

    async fn demo_team(&self, ctx: &Context<'_>, club_id: String) -> Result<DemoTeam> {
        let club = owned_club(ctx, &club_id).await?;
        let state = ctx.data::<AppState>()?;
        Ok(state.registration().demo_team(&club).await?.into())
    }

    async fn payment(&self, ctx: &Context<'_>, club_id: String) -> Result<Payment> {
        let club = owned_club(ctx, &club_id).await?;
        let state = ctx.data::<AppState>()?;
        Ok(state.payments().summary(&club).await?.into())
    }
}
