use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use fx_engine::{db_types::User, helpers::hash_password, traits::AuthApiError, AuthApi};

use super::{helpers::*, mocks::MockAuthManager};
use crate::{
    auth::TokenIssuer,
    data_objects::TokenResponse,
    routes::{SignInRoute, SignUpRoute},
};

#[actix_web::test]
async fn sign_in_with_valid_credentials() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/sign_in").set_form([("username", "alice"), ("password", "hunter2")]);
    let (status, body) = send_request(req, None, configure_sign_in).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let response: TokenResponse = serde_json::from_str(&body).unwrap();
    let claims = TokenIssuer::new(&get_auth_config()).validate(&response.token).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.uid, 1);
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[actix_web::test]
async fn sign_in_with_wrong_password() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/sign_in").set_form([("username", "alice"), ("password", "letmein")]);
    let (status, body) = send_request(req, None, configure_sign_in).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_message(&body, "Invalid password");
}

#[actix_web::test]
async fn sign_in_with_unknown_user() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/sign_in").set_form([("username", "mallory"), ("password", "hunter2")]);
    let (status, body) = send_request(req, None, configure_sign_in).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_message(&body, "Username mallory does not exist");
}

#[actix_web::test]
async fn sign_in_without_form_fields() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/sign_in").set_form([("username", "alice")]);
    let (status, body) = send_request(req, None, configure_sign_in).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_message(&body, "Could not read request body");
}

#[actix_web::test]
async fn sign_up_creates_user() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/sign_up").set_form([
        ("username", "bob"),
        ("password", "correct horse"),
        ("email", "bob@example.com"),
    ]);
    let (status, body) = send_request(req, None, |cfg| configure_sign_up(cfg, None)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["id"], 2);
    assert_eq!(json["username"], "bob");
    assert_eq!(json["email"], "bob@example.com");
    assert!(json.get("password_hash").is_none());
}

#[actix_web::test]
async fn sign_up_with_taken_username() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/sign_up").set_form([("username", "bob"), ("password", "correct horse")]);
    let err = AuthApiError::UsernameTaken("bob".into());
    let (status, body) = send_request(req, None, |cfg| configure_sign_up(cfg, Some(err))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_message(&body, "Username bob is already taken");
}

#[actix_web::test]
async fn sign_up_with_empty_password() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/sign_up").set_form([("username", "bob"), ("password", "")]);
    let (status, body) = send_request(req, None, |cfg| configure_sign_up(cfg, None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_message(&body, "Password cannot be empty");
}

fn configure_sign_in(cfg: &mut ServiceConfig) {
    let hash = hash_password("hunter2").unwrap();
    let mut auth_manager = MockAuthManager::new();
    auth_manager
        .expect_fetch_password_hash()
        .returning(move |username| Ok((username == "alice").then(|| hash.clone())));
    auth_manager
        .expect_fetch_user_by_username()
        .returning(|username| Ok((username == "alice").then(|| user(1, "alice"))));
    cfg.app_data(web::Data::new(AuthApi::new(auth_manager))).service(SignInRoute::<MockAuthManager>::new());
}

fn configure_sign_up(cfg: &mut ServiceConfig, insert_error: Option<AuthApiError>) {
    let mut auth_manager = MockAuthManager::new();
    match insert_error {
        Some(err) => {
            auth_manager.expect_insert_user().return_once(move |_| Err(err));
        },
        None => {
            auth_manager.expect_insert_user().returning(|new_user| {
                assert!(new_user.password_hash.starts_with("$argon2"));
                Ok(User {
                    id: 2,
                    username: new_user.username,
                    first_name: new_user.first_name,
                    last_name: new_user.last_name,
                    email: new_user.email,
                })
            });
        },
    }
    cfg.app_data(web::Data::new(AuthApi::new(auth_manager))).service(SignUpRoute::<MockAuthManager>::new());
}

#[actix_web::test]
async fn health_and_status_are_open() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(TestRequest::get().uri("/health"), None, |cfg| {
        cfg.service(crate::routes::health);
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
    let (status, body) = send_request(TestRequest::get().uri("/api/"), None, |cfg| {
        cfg.service(web::scope("/api").service(crate::routes::server_status));
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"Server":"running..."}"#);
}
