use poem::{http::StatusCode, test::TestClient};
use serde_json::{json, Value::Null};
use sqlx::PgPool;

use crate::{
    core::{
        security::{get_user_from_token, hash_password},
        session::get_session,
        test_utils::{test_app_state, test_config},
    },
    factory::{role::RoleFactory, user::UserFactory},
    init_openapi_route,
    model::user::User,
};

#[sqlx::test]
async fn test_login_then_logout(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let role = RoleFactory::<()>::new()
        .generate_one(&app_state.db, ())
        .await?;
    let mut user_factory = UserFactory::<()>::new();
    user_factory.modified_one(|data, _| User {
        email: "login@mail.com".to_string(),
        password: hash_password("password").unwrap(),
        active: true,
        ..data.clone()
    });
    let user = user_factory
        .generate_one(&app_state.db, role.id, ())
        .await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When login
    let resp = cli
        .post("/api/auth/login")
        .header("accept-language", "en")
        .body_json(&json!({"email": "login@mail.com", "password": "password"}))
        .send()
        .await;

    // Expect login
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let body = json.value().object();
    body.get("message").assert_string("Logged in successfully");
    let data = body.get("data").object();
    data.get("token_type").assert_string("Bearer");
    data.get("exp_in").assert_i64(config.jwt_exp as i64 * 60);
    let token: String = data.get("token").deserialize();
    let mut tx = app_state.db.begin().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let user_in_token =
        get_user_from_token(&mut tx, &mut *redis_conn, &config, Some(token.clone())).await?;
    assert_eq!(user_in_token.map(|x| x.id), Some(user.id));

    // When logout
    let resp = cli
        .post("/api/auth/logout")
        .header("accept-language", "en")
        .header("authorization", format!("Bearer {}", token))
        .send()
        .await;

    // Expect logout
    resp.assert_status_is_ok();
    resp.assert_json(&json!({
        "message": "Logged out successfully",
        "status": "SUCCESSFUL",
        "data": Null
    }))
    .await;
    assert!(get_session(&mut *redis_conn, &token)?.is_none());

    // When second logout
    let resp = cli
        .post("/api/auth/logout")
        .header("accept-language", "en")
        .header("authorization", format!("Bearer {}", token))
        .send()
        .await;

    // Expect second logout
    resp.assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[sqlx::test]
async fn test_login_rejects_bad_credentials(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let role = RoleFactory::<()>::new()
        .generate_one(&app_state.db, ())
        .await?;
    let mut user_factory = UserFactory::<()>::new();
    user_factory.modified_one(|data, _| User {
        email: "inactive@mail.com".to_string(),
        password: hash_password("password").unwrap(),
        active: false,
        ..data.clone()
    });
    user_factory
        .generate_one(&app_state.db, role.id, ())
        .await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    for (email, password) in [
        ("inactive@mail.com", "password"),
        ("inactive@mail.com", "wrong-password"),
        ("nobody@mail.com", "password"),
    ] {
        // When
        let resp = cli
            .post("/api/auth/login")
            .header("accept-language", "en")
            .body_json(&json!({"email": email, "password": password}))
            .send()
            .await;

        // Expect
        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.assert_json(&json!({
            "message": "Invalid credentials",
            "status": "FAILED",
            "data": Null
        }))
        .await;
    }
    Ok(())
}
