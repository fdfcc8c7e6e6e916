use serde_json::Value;
use sqlx::{PgConnection, PgPool};

use crate::api::{Page, PageParams, Paginated};
use crate::database::models::AuditLog;
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::client_ip::ClientIp;
use crate::repositories::audit_log_repository;
use crate::services::ServiceError;

pub const AUDIT_DEFAULT_PER_PAGE: i64 = 50;

/// Action codes recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    Create,
    Update,
    Delete,
    CreateAdmin,
    UpdateAdmin,
    ChangePassword,
    ActivateAdmin,
    DeactivateAdmin,
    DeleteAdmin,
    AddImages,
    DeleteImage,
    SetPrimaryImage,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Login => "LOGIN",
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::CreateAdmin => "CREATE_ADMIN",
            AuditAction::UpdateAdmin => "UPDATE_ADMIN",
            AuditAction::ChangePassword => "CHANGE_PASSWORD",
            AuditAction::ActivateAdmin => "ACTIVATE_ADMIN",
            AuditAction::DeactivateAdmin => "DEACTIVATE_ADMIN",
            AuditAction::DeleteAdmin => "DELETE_ADMIN",
            AuditAction::AddImages => "ADD_IMAGES",
            AuditAction::DeleteImage => "DELETE_IMAGE",
            AuditAction::SetPrimaryImage => "SET_PRIMARY_IMAGE",
        }
    }
}

/// The acting admin plus caller IP, captured once per request.
#[derive(Debug, Clone)]
pub struct Actor {
    pub admin_id: i64,
    pub ip: String,
}

impl Actor {
    pub fn new(admin: &CurrentAdmin, ip: &ClientIp) -> Self {
        Self {
            admin_id: admin.id,
            ip: ip.0.clone(),
        }
    }
}

/// Write one audit entry on the caller's open transaction. Committing is the
/// caller's job; a failure here must fail the surrounding operation.
pub async fn record(
    conn: &mut PgConnection,
    actor: &Actor,
    action: AuditAction,
    entity: Option<&str>,
    entity_id: Option<i64>,
    details: Option<Value>,
) -> Result<(), sqlx::Error> {
    audit_log_repository::insert(
        conn,
        actor.admin_id,
        action.as_str(),
        entity,
        entity_id,
        details,
        &actor.ip,
    )
    .await
}

/// Newest-first audit listing for the admin UI.
pub async fn list(pool: &PgPool, params: &PageParams) -> Result<Paginated<AuditLog>, ServiceError> {
    let page: Page = params.resolve(AUDIT_DEFAULT_PER_PAGE);
    let mut conn = pool.acquire().await?;
    let total = audit_log_repository::count(&mut conn).await?;
    let items = audit_log_repository::list_page(&mut conn, page.limit(), page.offset()).await?;
    Ok(Paginated::new(items, total, &page))
}
