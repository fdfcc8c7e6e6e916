use serde_json::json;
use sqlx::PgPool;

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::models::Admin;
use crate::repositories::admin_repository;
use crate::schemas::admin::{AdminCreate, AdminPassword, AdminUpdate};
use crate::services::audit_service::{self, Actor, AuditAction};
use crate::services::ServiceError;

/// The admin account with id 1 is the protected primary admin.
pub const PRIMARY_ADMIN_ID: i64 = 1;

/// Self-action prohibition: an admin never deactivates or deletes itself.
fn check_self_action(actor_id: i64, target_id: i64, verb: &str) -> Result<(), ServiceError> {
    if actor_id == target_id {
        return Err(ServiceError::Invalid(format!("You cannot {verb} your own account")));
    }
    Ok(())
}

/// Primary-admin immunity for profile and password edits: only the primary
/// admin, acting on itself, may touch its own account.
fn check_primary_edit(actor_id: i64, target_id: i64) -> Result<(), ServiceError> {
    if target_id == PRIMARY_ADMIN_ID && actor_id != PRIMARY_ADMIN_ID {
        return Err(ServiceError::Forbidden(
            "Only the primary admin can modify its own account".into(),
        ));
    }
    Ok(())
}

/// Primary-admin immunity for destructive operations: no caller may
/// deactivate or delete the primary admin, itself included.
fn check_primary_destroy(target_id: i64, verb: &str) -> Result<(), ServiceError> {
    if target_id == PRIMARY_ADMIN_ID {
        return Err(ServiceError::Forbidden(format!(
            "The primary admin account cannot be {verb}"
        )));
    }
    Ok(())
}

async fn fetch_admin(
    conn: &mut sqlx::PgConnection,
    admin_id: i64,
) -> Result<Admin, ServiceError> {
    admin_repository::find_by_id(conn, admin_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Admin not found".into()))
}

/// Validate credentials and issue a bearer token. Unknown email, wrong
/// password and inactive account are indistinguishable to the caller.
pub async fn login(
    pool: &PgPool,
    ip: &str,
    email: &str,
    password: &str,
) -> Result<(Admin, String), ServiceError> {
    let mut tx = pool.begin().await?;

    let admin = admin_repository::find_by_email(&mut tx, &email.to_lowercase())
        .await?
        .filter(|a| a.is_active);

    let admin = match admin {
        Some(a) if bcrypt::verify(password, &a.password_hash).unwrap_or(false) => a,
        _ => return Err(ServiceError::Unauthorized("Invalid credentials".into())),
    };

    let security = &config::config().security;
    let claims = Claims::new(admin.id, security.jwt_expiry_hours);
    let token = generate_jwt(&claims, &security.jwt_secret)
        .map_err(|e| ServiceError::Unauthorized(e.to_string()))?;

    let actor = Actor { admin_id: admin.id, ip: ip.to_string() };
    audit_service::record(&mut tx, &actor, AuditAction::Login, None, None, None).await?;
    tx.commit().await?;

    Ok((admin, token))
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Admin>, ServiceError> {
    let mut conn = pool.acquire().await?;
    Ok(admin_repository::list_all(&mut conn).await?)
}

pub async fn create(
    pool: &PgPool,
    actor: &Actor,
    data: AdminCreate,
) -> Result<Admin, ServiceError> {
    let mut tx = pool.begin().await?;

    if admin_repository::email_in_use(&mut tx, &data.email, None).await? {
        return Err(ServiceError::Conflict("Email is already registered".into()));
    }

    let password_hash = bcrypt::hash(&data.password, bcrypt::DEFAULT_COST)?;
    let admin = admin_repository::insert(&mut tx, &data.email, &data.name, &password_hash).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::CreateAdmin,
        Some("admin"),
        Some(admin.id),
        Some(json!({ "email": admin.email, "name": admin.name })),
    )
    .await?;
    tx.commit().await?;

    Ok(admin)
}

pub async fn update(
    pool: &PgPool,
    actor: &Actor,
    target_id: i64,
    data: AdminUpdate,
) -> Result<Admin, ServiceError> {
    check_primary_edit(actor.admin_id, target_id)?;

    let mut tx = pool.begin().await?;
    let admin = fetch_admin(&mut tx, target_id).await?;

    if let Some(new_email) = &data.email {
        if *new_email != admin.email
            && admin_repository::email_in_use(&mut tx, new_email, Some(target_id)).await?
        {
            return Err(ServiceError::Conflict("Email is already in use".into()));
        }
    }

    let old = json!({ "email": admin.email, "name": admin.name });
    let updated = admin_repository::update_profile(
        &mut tx,
        target_id,
        data.email.as_deref(),
        data.name.as_deref(),
    )
    .await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::UpdateAdmin,
        Some("admin"),
        Some(target_id),
        Some(json!({
            "old_data": old,
            "new_data": { "email": updated.email, "name": updated.name },
        })),
    )
    .await?;
    tx.commit().await?;

    Ok(updated)
}

pub async fn change_password(
    pool: &PgPool,
    actor: &Actor,
    target_id: i64,
    data: AdminPassword,
) -> Result<Admin, ServiceError> {
    check_primary_edit(actor.admin_id, target_id)?;

    let mut tx = pool.begin().await?;
    fetch_admin(&mut tx, target_id).await?;

    let password_hash = bcrypt::hash(&data.password, bcrypt::DEFAULT_COST)?;
    let admin = admin_repository::update_password(&mut tx, target_id, &password_hash).await?;

    // Never the password itself, only which account was touched.
    audit_service::record(
        &mut tx,
        actor,
        AuditAction::ChangePassword,
        Some("admin"),
        Some(target_id),
        Some(json!({ "target_admin": admin.email })),
    )
    .await?;
    tx.commit().await?;

    Ok(admin)
}

/// Flip the active flag. Returns the updated row and the action recorded.
pub async fn toggle_status(
    pool: &PgPool,
    actor: &Actor,
    target_id: i64,
) -> Result<(Admin, AuditAction), ServiceError> {
    check_self_action(actor.admin_id, target_id, "deactivate")?;
    check_primary_destroy(target_id, "deactivated")?;

    let mut tx = pool.begin().await?;
    let admin = fetch_admin(&mut tx, target_id).await?;

    let old_status = admin.is_active;
    let updated = admin_repository::set_active(&mut tx, target_id, !old_status).await?;
    let action = if updated.is_active {
        AuditAction::ActivateAdmin
    } else {
        AuditAction::DeactivateAdmin
    };

    audit_service::record(
        &mut tx,
        actor,
        action,
        Some("admin"),
        Some(target_id),
        Some(json!({
            "email": updated.email,
            "old_status": old_status,
            "new_status": updated.is_active,
        })),
    )
    .await?;
    tx.commit().await?;

    Ok((updated, action))
}

pub async fn delete(pool: &PgPool, actor: &Actor, target_id: i64) -> Result<Admin, ServiceError> {
    check_self_action(actor.admin_id, target_id, "delete")?;
    check_primary_destroy(target_id, "deleted")?;

    let mut tx = pool.begin().await?;
    let admin = fetch_admin(&mut tx, target_id).await?;

    admin_repository::delete(&mut tx, target_id).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::DeleteAdmin,
        Some("admin"),
        Some(target_id),
        Some(json!({ "email": admin.email, "name": admin.name })),
    )
    .await?;
    tx.commit().await?;

    Ok(admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    // The protection matrix from the guard functions alone; ordering of the
    // checks inside each operation mirrors the calls above.

    #[test]
    fn self_action_is_always_rejected() {
        assert!(check_self_action(5, 5, "deactivate").is_err());
        assert!(check_self_action(1, 1, "delete").is_err());
        assert!(check_self_action(5, 6, "deactivate").is_ok());
    }

    #[test]
    fn only_primary_admin_edits_itself() {
        // Another admin touching the primary account is forbidden.
        assert!(matches!(
            check_primary_edit(2, PRIMARY_ADMIN_ID),
            Err(ServiceError::Forbidden(_))
        ));
        // The primary admin may edit itself.
        assert!(check_primary_edit(PRIMARY_ADMIN_ID, PRIMARY_ADMIN_ID).is_ok());
        // Non-primary targets are open to any actor.
        assert!(check_primary_edit(2, 3).is_ok());
        assert!(check_primary_edit(PRIMARY_ADMIN_ID, 3).is_ok());
    }

    #[test]
    fn primary_admin_is_never_destroyed() {
        assert!(matches!(
            check_primary_destroy(PRIMARY_ADMIN_ID, "deleted"),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(check_primary_destroy(2, "deleted").is_ok());
    }

    #[test]
    fn toggle_guard_order_self_rule_first() {
        // The primary admin toggling itself trips the self-action rule (400)
        // before the immunity rule (403).
        let result = check_self_action(PRIMARY_ADMIN_ID, PRIMARY_ADMIN_ID, "deactivate");
        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }
}
