mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, unique};
use pizza_service::models::{Role, RoleAssignment};

#[tokio::test]
async fn test_create_franchise_with_new_and_existing_admins() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let existing = app.register_diner().await;
    let placeholder_email = format!("{}@jwt.test", unique("owner"));

    let name = unique("pizzaPocket");
    let (status, franchise) = app
        .request(
            Method::POST,
            "/api/franchise",
            Some(&admin.token),
            Some(json!({
                "name": name,
                "admins": [{ "email": existing.email }, { "email": placeholder_email }, { "email": existing.email }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{franchise}");
    assert_eq!(franchise["name"], name.as_str());
    assert_eq!(franchise["admins"].as_array().unwrap().len(), 2);
    let franchise_id = franchise["id"].as_i64().unwrap() as i32;

    // The existing diner now administers the franchise.
    let (status, me) = app.request(Method::GET, "/api/user/me", Some(&existing.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let roles = me["roles"].as_array().unwrap();
    assert!(roles.contains(&json!({ "role": "franchisee", "objectId": franchise_id })));

    // Placeholder admins exist but cannot log in.
    let (status, _) = app
        .request(
            Method::PUT,
            "/api/auth",
            None,
            Some(json!({ "email": placeholder_email, "password": "" })),
        )
        .await;
    assert!(status == StatusCode::UNAUTHORIZED || status == StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/franchise",
            Some(&admin.token),
            Some(json!({ "name": name, "admins": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_non_admin_cannot_create_franchise() {
    let Some(app) = TestApp::spawn().await else { return };
    let diner = app.register_diner().await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/franchise",
            Some(&diner.token),
            Some(json!({ "name": unique("nope"), "admins": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/franchise",
            None,
            Some(json!({ "name": unique("nope"), "admins": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_listing_detail_depends_on_caller() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let owner = app.register_diner().await;
    let (franchise_id, _) = app.franchise_with_store(&admin, &[owner.email.as_str()]).await;

    let (status, franchise) = app
        .request(Method::GET, &format!("/api/franchise/{}", owner.id), Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let name = franchise[0]["name"].as_str().unwrap().to_string();
    let filter = format!("/api/franchise?page=1&name={name}");

    let (status, public) = app.request(Method::GET, &filter, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let entry = &public["franchises"][0];
    assert_eq!(entry["id"], franchise_id);
    assert!(entry.get("admins").is_none());
    assert!(entry["stores"][0].get("totalRevenue").is_none());
    assert_eq!(public["more"], false);

    let (status, detailed) = app.request(Method::GET, &filter, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let entry = &detailed["franchises"][0];
    assert_eq!(entry["admins"][0]["email"], owner.email.as_str());
    assert_eq!(entry["stores"][0]["totalRevenue"], 0.0);
}

#[tokio::test]
async fn test_name_filter_wildcard() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let stem = unique("wild");
    for suffix in ["north", "south"] {
        let (status, _) = app
            .request(
                Method::POST,
                "/api/franchise",
                Some(&admin.token),
                Some(json!({ "name": format!("{stem}-{suffix}"), "admins": [] })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, page) = app
        .request(Method::GET, &format!("/api/franchise?name={stem}*"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["franchises"].as_array().unwrap().len(), 2);

    let upper = stem.to_uppercase();
    let (_, page) = app
        .request(Method::GET, &format!("/api/franchise?name={upper}-NORTH"), None, None)
        .await;
    assert_eq!(page["franchises"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_franchises_hidden_from_other_users() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let owner = app.register_diner().await;
    let stranger = app.register_diner().await;
    app.franchise_with_store(&admin, &[owner.email.as_str()]).await;

    let (status, mine) = app
        .request(Method::GET, &format!("/api/franchise/{}", owner.id), Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, theirs) = app
        .request(Method::GET, &format!("/api/franchise/{}", owner.id), Some(&stranger.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(theirs.as_array().unwrap().is_empty());

    let (_, as_admin) = app
        .request(Method::GET, &format!("/api/franchise/{}", owner.id), Some(&admin.token), None)
        .await;
    assert_eq!(as_admin.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_franchisee_manages_own_stores_only() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let owner = app.register_diner().await;
    let (own_franchise, _) = app.franchise_with_store(&admin, &[owner.email.as_str()]).await;
    let (other_franchise, other_store) = app.franchise_with_store(&admin, &[]).await;

    // The role was granted after login; roles are reloaded on every request.
    let (status, store) = app
        .request(
            Method::POST,
            &format!("/api/franchise/{own_franchise}/store"),
            Some(&owner.token),
            Some(json!({ "name": "SLC" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store["franchiseId"], own_franchise);
    assert_eq!(store["name"], "SLC");

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/franchise/{other_franchise}/store"),
            Some(&owner.token),
            Some(json!({ "name": "Provo" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A store id from another franchise is not found under this one.
    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/franchise/{own_franchise}/store/{other_store}"),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let own_store = store["id"].as_i64().unwrap();
    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/api/franchise/{own_franchise}/store/{own_store}"),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "store deleted");
}

#[tokio::test]
async fn test_store_for_missing_franchise_is_not_found() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/franchise/2147483000/store",
            Some(&admin.token),
            Some(json!({ "name": "ghost" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_franchise_cascades() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let owner = app.register_diner().await;
    let (franchise_id, _) = app.franchise_with_store(&admin, &[owner.email.as_str()]).await;

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/franchise/{franchise_id}"), Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/franchise/{franchise_id}"), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "franchise deleted");

    let (_, mine) = app
        .request(Method::GET, &format!("/api/franchise/{}", owner.id), Some(&owner.token), None)
        .await;
    assert!(mine.as_array().unwrap().is_empty());

    let (_, me) = app.request(Method::GET, "/api/user/me", Some(&owner.token), None).await;
    assert_eq!(me["roles"], json!([{ "role": "diner" }]));

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/franchise/{franchise_id}"), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_store_creation() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let (franchise_id, _) = app.franchise_with_store(&admin, &[]).await;
    let franchisee = app
        .account_with_roles(&[RoleAssignment::scoped(Role::Franchisee, franchise_id)])
        .await;

    let mut tasks = tokio::task::JoinSet::new();
    for index in 0..8 {
        let router = app.router.clone();
        let token = franchisee.token.clone();
        tasks.spawn(async move {
            use tower::ServiceExt;
            let request = axum::http::Request::builder()
                .method(Method::POST)
                .uri(format!("/api/franchise/{franchise_id}/store"))
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(axum::body::Body::from(json!({ "name": format!("store-{index}") }).to_string()))
                .unwrap();
            router.oneshot(request).await.unwrap().status()
        });
    }
    while let Some(status) = tasks.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    let (_, franchises) = app
        .request(Method::GET, &format!("/api/franchise/{}", franchisee.id), Some(&franchisee.token), None)
        .await;
    assert_eq!(franchises[0]["stores"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_listing_filtered_by_admin_user() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let owner = app.register_diner().await;
    let (owned, _) = app.franchise_with_store(&admin, &[owner.email.as_str()]).await;
    let (other, _) = app.franchise_with_store(&admin, &[]).await;

    let (status, page) = app
        .request(Method::GET, &format!("/api/franchise?admin={}", owner.id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = page["franchises"]
        .as_array()
        .unwrap()
        .iter()
        .map(|franchise| franchise["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![i64::from(owned)]);
    assert!(!ids.contains(&i64::from(other)));
    assert_eq!(page["more"], false);

    let (_, none) = app
        .request(Method::GET, &format!("/api/franchise?admin={}", admin.id), None, None)
        .await;
    assert!(none["franchises"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_name_filter_treats_percent_and_underscore_literally() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let stem = unique("lit");
    for name in [format!("{stem}_a"), format!("{stem}xa")] {
        let (status, _) = app
            .request(
                Method::POST,
                "/api/franchise",
                Some(&admin.token),
                Some(json!({ "name": name, "admins": [] })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, page) = app
        .request(Method::GET, &format!("/api/franchise?name={stem}_a"), None, None)
        .await;
    let names: Vec<&str> = page["franchises"]
        .as_array()
        .unwrap()
        .iter()
        .map(|franchise| franchise["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec![format!("{stem}_a").as_str()]);

    let (_, page) = app
        .request(Method::GET, &format!("/api/franchise?name={stem}%25"), None, None)
        .await;
    assert!(page["franchises"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_holds_role_respects_scope() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let (franchise_id, _) = app.franchise_with_store(&admin, &[]).await;
    let (other_franchise, _) = app.franchise_with_store(&admin, &[]).await;
    let franchisee = app
        .account_with_roles(&[RoleAssignment::scoped(Role::Franchisee, franchise_id)])
        .await;
    let users = &app.state.services.users;

    assert!(users.holds_role(admin.id, Role::Admin, None).await.unwrap());
    assert!(!users.holds_role(admin.id, Role::Admin, Some(franchise_id)).await.unwrap());
    assert!(!users.holds_role(admin.id, Role::Diner, None).await.unwrap());

    assert!(users.holds_role(franchisee.id, Role::Franchisee, Some(franchise_id)).await.unwrap());
    assert!(!users.holds_role(franchisee.id, Role::Franchisee, Some(other_franchise)).await.unwrap());
    assert!(!users.holds_role(franchisee.id, Role::Franchisee, None).await.unwrap());
    assert!(!users.holds_role(franchisee.id, Role::Admin, None).await.unwrap());
}
