use sqlx::{PgConnection, PgPool};

use crate::errors::AppError;

use super::types::*;
use super::validate::{INVALID_MEMBER_FORMAT, check_member, check_registration};

const SELECT_REGISTRATION: &str = "\
    SELECT id, event_id, attending_count, might_attend_count, cant_attend, created_at \
    FROM registrations";

/// Persist a registration header and all of its members in one transaction.
///
/// Input is checked before the transaction opens. Once it is open, any
/// failure rolls it back before the error is returned, so a failed call
/// leaves no rows behind. Returns the new registration id.
pub async fn create(pool: &PgPool, new: &NewRegistration) -> Result<i64, AppError> {
    check_registration(new)?;

    let mut tx = pool.begin().await?;

    match insert_registration(&mut *tx, new).await {
        Ok(registration_id) => {
            tx.commit().await?;
            log::info!(
                "Saved registration {registration_id} for event {} \
                 ({} attending, {} might, cant={})",
                new.event_id,
                new.attending_count(),
                new.might_attend_count(),
                new.cant_attend()
            );
            Ok(registration_id)
        }
        Err(e) => {
            log::warn!("Registration for event {} aborted: {e}", new.event_id);
            // The original error wins; a failed rollback is only logged.
            if let Err(rollback_err) = tx.rollback().await {
                log::error!("Rollback failed for event {}: {rollback_err}", new.event_id);
            }
            Err(e)
        }
    }
}

/// Header first so member rows can reference its generated id. Counts come
/// from the same lists `members()` walks.
async fn insert_registration(
    conn: &mut PgConnection,
    new: &NewRegistration,
) -> Result<i64, AppError> {
    let registration_id: i64 = sqlx::query_scalar(
        "INSERT INTO registrations (event_id, attending_count, might_attend_count, cant_attend) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(new.event_id)
    .bind(new.attending_count())
    .bind(new.might_attend_count())
    .bind(new.cant_attend())
    .fetch_one(&mut *conn)
    .await?;

    for tagged in new.members() {
        if !check_member(tagged.member) {
            return Err(AppError::invalid(INVALID_MEMBER_FORMAT));
        }
        insert_member(&mut *conn, registration_id, tagged).await?;
    }

    Ok(registration_id)
}

async fn insert_member(
    conn: &mut PgConnection,
    registration_id: i64,
    tagged: TaggedMember<'_>,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO registration_members (registration_id, attendance_type, full_name, phone) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(registration_id)
    .bind(tagged.attendance_type.as_str())
    .bind(tagged.member.name.trim())
    .bind(tagged.member.phone.trim())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// All registration headers, newest first.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Registration>, AppError> {
    let sql = format!("{SELECT_REGISTRATION} ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, Registration>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Registration>, AppError> {
    let sql = format!("{SELECT_REGISTRATION} WHERE id = $1");
    let row = sqlx::query_as::<_, Registration>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Members of one registration in insertion order.
pub async fn find_members(
    pool: &PgPool,
    registration_id: i64,
) -> Result<Vec<RegistrationMember>, AppError> {
    let rows = sqlx::query_as::<_, RegistrationMember>(
        "SELECT attendance_type, full_name, phone \
         FROM registration_members \
         WHERE registration_id = $1 \
         ORDER BY id ASC",
    )
    .bind(registration_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_detail(pool: &PgPool, id: i64) -> Result<Option<RegistrationDetail>, AppError> {
    let Some(registration) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let members = find_members(pool, id).await?;
    Ok(Some(RegistrationDetail { registration, members }))
}
