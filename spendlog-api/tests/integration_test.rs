/// Integration tests for the SpendLog API
///
/// These tests verify the full system end-to-end over the Axum router:
/// - Registration, login, and identity lookup
/// - Route policy enforcement (public, authenticated, role-gated)
/// - Category CRUD, uniqueness, and soft delete
/// - Expense lifecycle with ownership isolation and aggregates
/// - Person directory with partial updates
///
/// They require a running PostgreSQL (DATABASE_URL) plus JWT_SECRET, so each
/// test is `#[ignore]`; run them with `cargo test -- --ignored`.

mod common;

use axum::http::StatusCode;
use common::{unique_name, TestContext};
use serde_json::json;

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_health_is_public() {
    let mut ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_protected_routes_require_token() {
    let mut ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.request("GET", "/api/expenses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .request("GET", "/api/expenses", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_register_login_flow() {
    let mut ctx = TestContext::new().await.unwrap();

    let username = unique_name("reg");
    let email = format!("{}@example.com", username);
    let register_body = json!({
        "username": username,
        "email": email,
        "password": "secret-password"
    });

    let (status, body) = ctx
        .request("POST", "/api/auth/register", None, Some(register_body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].is_string());
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["role"], "USER");

    // Same username again is rejected as bad input, not conflict
    let (status, _) = ctx
        .request("POST", "/api/auth/register", None, Some(register_body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Wrong password is an opaque 401
    let (status, _) = ctx
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": "secret-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_me_returns_identity_without_hash() {
    let mut ctx = TestContext::new().await.unwrap();
    let token = ctx.user_token.clone();
    let username = ctx.user.username.clone();

    let (status, body) = ctx.request("GET", "/api/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["enabled"], true);
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_category_mutations_are_admin_only() {
    let mut ctx = TestContext::new().await.unwrap();
    let user_token = ctx.user_token.clone();
    let admin_token = ctx.admin_token.clone();

    let name = unique_name("cat");
    let body = json!({ "name": name });

    // USER may read but not create
    let (status, _) = ctx
        .request("POST", "/api/expense-categories", Some(&user_token), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = ctx
        .request("POST", "/api/expense-categories", Some(&admin_token), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], name.as_str());
    assert_eq!(created["is_active"], true);

    // Duplicate name is rejected
    let (status, _) = ctx
        .request("POST", "/api/expense-categories", Some(&admin_token), Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Reads stay open to any authenticated identity
    let (status, _) = ctx
        .request("GET", "/api/expense-categories", Some(&user_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_category_rename_onto_taken_name() {
    let mut ctx = TestContext::new().await.unwrap();
    let admin_token = ctx.admin_token.clone();

    let taken = ctx.create_category(&unique_name("taken")).await.unwrap();
    let other = ctx.create_category(&unique_name("other")).await.unwrap();
    let uri = format!("/api/expense-categories/{}", other.id);

    // Renaming onto an existing name is rejected
    let (status, _) = ctx
        .request("PUT", &uri, Some(&admin_token), Some(json!({ "name": taken.name })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Keeping its own name while changing other fields is fine
    let (status, body) = ctx
        .request(
            "PUT",
            &uri,
            Some(&admin_token),
            Some(json!({ "name": other.name, "description": "renumbered" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "renumbered");
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_date_range_boundaries_are_inclusive() {
    let mut ctx = TestContext::new().await.unwrap();
    let token = ctx.user_token.clone();

    let category = ctx.create_category(&unique_name("range")).await.unwrap();

    // Two boundary rows, one inside, two just outside
    for (date, amount) in [
        ("2026-08-10", "1.00"),
        ("2026-08-15", "2.00"),
        ("2026-08-20", "3.00"),
        ("2026-08-09", "10.00"),
        ("2026-08-21", "10.00"),
    ] {
        let (status, _) = ctx
            .request(
                "POST",
                "/api/expenses",
                Some(&token),
                Some(json!({
                    "description": format!("On {}", date),
                    "amount": amount,
                    "expense_date": date,
                    "category_id": category.id
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let range = "start_date=2026-08-10&end_date=2026-08-20";
    let (status, body) = ctx
        .request(
            "GET",
            &format!("/api/expenses/date-range?{}", range),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["expense_date"], "2026-08-20");
    assert_eq!(rows[2]["expense_date"], "2026-08-10");

    let (status, body) = ctx
        .request(
            "GET",
            &format!("/api/expenses/total/date-range?{}", range),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "6.00");
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_deactivate_keeps_category_row() {
    let mut ctx = TestContext::new().await.unwrap();
    let admin_token = ctx.admin_token.clone();

    let category = ctx.create_category(&unique_name("soft")).await.unwrap();
    let uri = format!("/api/expense-categories/{}/deactivate", category.id);

    let (status, body) = ctx.request("PATCH", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    // The row is still there and still readable
    let uri = format!("/api/expense-categories/{}", category.id);
    let (status, body) = ctx.request("GET", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], category.name.as_str());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_expense_lifecycle_and_totals() {
    let mut ctx = TestContext::new().await.unwrap();
    let token = ctx.user_token.clone();

    let category = ctx.create_category(&unique_name("exp")).await.unwrap();

    // Fresh credential, so totals start at zero
    let (status, body) = ctx.request("GET", "/api/expenses/total", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "0");

    let (status, created) = ctx
        .request(
            "POST",
            "/api/expenses",
            Some(&token),
            Some(json!({
                "description": "Groceries",
                "amount": "10.00",
                "expense_date": "2026-08-20",
                "category_id": category.id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["description"], "Groceries");
    assert_eq!(created["payment_method"], "CASH");
    let expense_id = created["id"].as_str().unwrap().to_string();

    let (status, _) = ctx
        .request(
            "POST",
            "/api/expenses",
            Some(&token),
            Some(json!({
                "description": "Taxi",
                "amount": "15.50",
                "expense_date": "2026-08-21",
                "category_id": category.id,
                "payment_method": "CREDIT_CARD"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Totals and counts reflect both rows
    let (_, body) = ctx.request("GET", "/api/expenses/total", Some(&token), None).await;
    assert_eq!(body["total"], "25.50");

    let (_, body) = ctx.request("GET", "/api/expenses/count", Some(&token), None).await;
    assert_eq!(body["count"], 2);

    // Update overwrites all mutable fields
    let uri = format!("/api/expenses/{}", expense_id);
    let (status, updated) = ctx
        .request(
            "PUT",
            &uri,
            Some(&token),
            Some(json!({
                "description": "Groceries (market)",
                "amount": "12.00",
                "expense_date": "2026-08-20",
                "category_id": category.id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "Groceries (market)");

    let (_, body) = ctx.request("GET", "/api/expenses/total", Some(&token), None).await;
    assert_eq!(body["total"], "27.50");

    // Delete, then the ID reads as absent
    let (status, body) = ctx.request("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Expense deleted successfully");

    let (status, _) = ctx.request("GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_expense_ownership_isolation() {
    let mut ctx = TestContext::new().await.unwrap();
    let user_token = ctx.user_token.clone();
    let admin_token = ctx.admin_token.clone();

    let category = ctx.create_category(&unique_name("own")).await.unwrap();

    let (status, created) = ctx
        .request(
            "POST",
            "/api/expenses",
            Some(&user_token),
            Some(json!({
                "description": "Private expense",
                "amount": "42.00",
                "expense_date": "2026-08-22",
                "category_id": category.id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/expenses/{}", created["id"].as_str().unwrap());

    // Another identity sees 404, never 403
    let (status, _) = ctx.request("GET", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.request("DELETE", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The owner still has it
    let (status, _) = ctx.request("GET", &uri, Some(&user_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_expense_with_unknown_category() {
    let mut ctx = TestContext::new().await.unwrap();
    let token = ctx.user_token.clone();

    let (status, _) = ctx
        .request(
            "POST",
            "/api/expenses",
            Some(&token),
            Some(json!({
                "description": "Orphan",
                "amount": "5.00",
                "expense_date": "2026-08-22",
                "category_id": uuid::Uuid::new_v4()
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_expense_pagination_envelope() {
    let mut ctx = TestContext::new().await.unwrap();
    let token = ctx.user_token.clone();

    let category = ctx.create_category(&unique_name("page")).await.unwrap();

    for day in 1..=3 {
        let (status, _) = ctx
            .request(
                "POST",
                "/api/expenses",
                Some(&token),
                Some(json!({
                    "description": format!("Expense {}", day),
                    "amount": "1.00",
                    "expense_date": format!("2026-08-{:02}", day),
                    "category_id": category.id
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = ctx
        .request("GET", "/api/expenses/paginated?page=0&size=2", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_elements"], 3);
    assert_eq!(body["total_pages"], 2);

    // Newest expense date comes first
    assert_eq!(body["content"][0]["expense_date"], "2026-08-03");

    let (status, _) = ctx
        .request("GET", "/api/expenses/paginated?page=0&size=0", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // page * size overflowing i64 is rejected, not a 500
    let (status, _) = ctx
        .request(
            "GET",
            "/api/expenses/paginated?page=9223372036854775807&size=10",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL) and JWT_SECRET"]
async fn test_person_partial_update() {
    let mut ctx = TestContext::new().await.unwrap();
    let token = ctx.user_token.clone();

    let email = format!("{}@example.com", unique_name("person"));
    let (status, created) = ctx
        .request(
            "POST",
            "/api/users",
            Some(&token),
            Some(json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": email,
                "phone_number": "5551234"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    // Duplicate email is rejected
    let (status, _) = ctx
        .request(
            "POST",
            "/api/users",
            Some(&token),
            Some(json!({
                "first_name": "Other",
                "last_name": "Person",
                "email": email
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Patch only the phone number; names and email stay put
    let uri = format!("/api/users/{}", id);
    let (status, updated) = ctx
        .request("PATCH", &uri, Some(&token), Some(json!({ "phone_number": "5559999" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["first_name"], "Ada");
    assert_eq!(updated["last_name"], "Lovelace");
    assert_eq!(updated["email"], email.as_str());
    assert_eq!(updated["phone_number"], "5559999");

    let (status, body) = ctx
        .request("GET", &format!("/api/users/{}/exists", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], true);
}
