//! Admin-management protection rules and the audit trail against a real
//! database. All tests skip when DATABASE_URL is not set.

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn nobody_can_deactivate_or_delete_the_primary_admin() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };

    let other_id = app
        .create_admin(&format!("{}@example.test", common::unique("admin")), "password1")
        .await?;
    let other_token = app.token_for(other_id);

    // Another admin cannot touch the primary account.
    let res = app
        .client
        .put(app.url("/api/auth/admins/1/toggle"))
        .bearer_auth(&other_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .client
        .delete(app.url("/api/auth/admins/1"))
        .bearer_auth(&other_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The primary admin cannot delete itself either: the self-action rule
    // fires first and reports 400.
    let res = app
        .client
        .delete(app.url("/api/auth/admins/1"))
        .bearer_auth(app.primary_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn only_the_primary_admin_may_edit_its_own_profile() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };

    let other_id = app
        .create_admin(&format!("{}@example.test", common::unique("admin")), "password1")
        .await?;
    let other_token = app.token_for(other_id);

    let res = app
        .client
        .put(app.url("/api/auth/admins/1"))
        .bearer_auth(&other_token)
        .json(&json!({ "name": "Hijacked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .client
        .put(app.url("/api/auth/admins/1/password"))
        .bearer_auth(&other_token)
        .json(&json!({ "password": "newpassword" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Acting on itself, the primary admin may update its profile.
    let res = app
        .client
        .put(app.url("/api/auth/admins/1"))
        .bearer_auth(app.primary_token())
        .json(&json!({ "name": "Primary Admin" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn self_deactivation_and_self_deletion_are_rejected() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };

    let own_id = app
        .create_admin(&format!("{}@example.test", common::unique("admin")), "password1")
        .await?;
    let own_token = app.token_for(own_id);

    for request in [
        app.client
            .put(app.url(&format!("/api/auth/admins/{own_id}/toggle")))
            .bearer_auth(&own_token),
        app.client
            .delete(app.url(&format!("/api/auth/admins/{own_id}")))
            .bearer_auth(&own_token),
    ] {
        let res = request.send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = res.json().await?;
        assert!(
            body["error"].as_str().unwrap_or_default().contains("own account"),
            "unexpected error body: {body}"
        );
    }

    Ok(())
}

#[tokio::test]
async fn deactivated_admins_lose_access_and_can_be_reactivated() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };

    let target_id = app
        .create_admin(&format!("{}@example.test", common::unique("admin")), "password1")
        .await?;
    let target_token = app.token_for(target_id);

    // Deactivate by the primary admin.
    let res = app
        .client
        .put(app.url(&format!("/api/auth/admins/{target_id}/toggle")))
        .bearer_auth(app.primary_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["admin"]["is_active"], false);

    // A live token no longer works for the deactivated account.
    let res = app
        .client
        .get(app.url("/api/auth/me"))
        .bearer_auth(&target_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Toggling again reactivates.
    let res = app
        .client
        .put(app.url(&format!("/api/auth/admins/{target_id}/toggle")))
        .bearer_auth(app.primary_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["admin"]["is_active"], true);

    Ok(())
}

#[tokio::test]
async fn duplicate_admin_emails_conflict() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };

    let email = format!("{}@example.test", common::unique("admin"));
    app.create_admin(&email, "password1").await?;

    let res = app
        .client
        .post(app.url("/api/auth/admins"))
        .bearer_auth(app.primary_token())
        .json(&json!({
            "email": email.to_uppercase(),
            "name": "Other",
            "password": "password2",
        }))
        .send()
        .await?;
    // Emails are stored lowercased, so a different casing is the same email.
    assert_eq!(res.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn admins_can_be_deleted_by_someone_else() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };

    let target_id = app
        .create_admin(&format!("{}@example.test", common::unique("admin")), "password1")
        .await?;

    let res = app
        .client
        .delete(app.url(&format!("/api/auth/admins/{target_id}")))
        .bearer_auth(app.primary_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // The account is gone: its token is dead and it is absent from the list.
    let res = app
        .client
        .get(app.url("/api/auth/me"))
        .bearer_auth(app.token_for(target_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let list: serde_json::Value = app
        .client
        .get(app.url("/api/auth/admins"))
        .bearer_auth(app.primary_token())
        .send()
        .await?
        .json()
        .await?;
    let still_there = list["admins"]
        .as_array()
        .expect("admins array")
        .iter()
        .any(|a| a["id"] == target_id);
    assert!(!still_there);

    Ok(())
}

#[tokio::test]
async fn mutations_leave_a_matching_audit_entry_newest_first() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };
    let token = app.primary_token();

    let name = common::unique("Audited");
    let created: serde_json::Value = app
        .client
        .post(app.url("/api/admin/categories"))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await?
        .json()
        .await?;
    let category_id = created["id"].as_i64().expect("category id");

    let page: serde_json::Value = app
        .client
        .get(app.url("/api/auth/audit?per_page=50"))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    let items = page["items"].as_array().expect("items");
    assert!(page["total"].as_i64().unwrap() >= 1);

    // Ordered newest-first.
    let timestamps: Vec<chrono::DateTime<chrono::Utc>> = items
        .iter()
        .map(|i| i["created_at"].as_str().unwrap().parse().expect("timestamp"))
        .collect();
    assert!(
        timestamps.windows(2).all(|w| w[0] >= w[1]),
        "audit page must be newest-first: {timestamps:?}"
    );

    // Our mutation is present with actor, action and entity.
    let entry = items
        .iter()
        .find(|i| i["entity"] == "category" && i["entity_id"] == category_id)
        .expect("audit entry for the new category");
    assert_eq!(entry["action"], "CREATE");
    assert_eq!(entry["admin_id"], 1);
    assert_eq!(entry["admin_email"], common::PRIMARY_ADMIN_EMAIL);
    assert_eq!(entry["details"]["name"], name.as_str());
    assert!(entry["ip_address"].is_string());

    Ok(())
}

#[tokio::test]
async fn failed_protection_checks_leave_no_audit_entry() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };

    let other_id = app
        .create_admin(&format!("{}@example.test", common::unique("admin")), "password1")
        .await?;
    let res = app
        .client
        .delete(app.url("/api/auth/admins/1"))
        .bearer_auth(app.token_for(other_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM audit_logs \
         WHERE action = 'DELETE_ADMIN' AND entity_id = 1",
    )
    .fetch_one(&app.pool)
    .await?;
    assert_eq!(count, 0, "a rejected deletion must not be audited");

    Ok(())
}
