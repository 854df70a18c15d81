pub mod clubs;
pub mod coaches;
pub mod competitors;
pub mod demo;
pub mod fees;
pub mod payments;

pub use clubs::{ClubRepo, CreateClub, UpdateClubDetails};
pub use coaches::{CoachRepo, CreateCoach, UpdateCoach};
pub use competitors::{CompetitorRepo, CreateCompetitor, UpdateCompetitor};
pub use demo::{CreateDemoMember, DemoRepo, UpdateDemoMember};
pub use fees::FeeRepo;
pub use payments::PaymentRepo;

use sqlx::{Postgres, Result as SqlxResult, Transaction};

/// Serialise a per-club check-then-write for the rest of the transaction.
pub(crate) async fn lock_club(
    tx: &mut Transaction<'_, Postgres>,
    scope: &str,
    club_id: &str,
) -> SqlxResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1 || ':' || $2))")
        .bind(scope)
        .bind(club_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
