use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use chrono::{TimeZone, Utc};
use fx_engine::db_types::{Currency, Deal, FixedPoint, Offer, User};
use jsonwebtoken::{encode, EncodingKey, Header};
use log::debug;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    config::AuthConfig,
    server::configure_extractors,
};

// DO NOT re-use this secret anywhere.
pub const TEST_SECRET: &str = "fx-endpoint-tests-not-a-real-secret";

pub fn get_auth_config() -> AuthConfig {
    AuthConfig::new(TEST_SECRET, 3600)
}

/// A valid access token for the given user.
pub fn issue_token(username: &str, user_id: i64) -> String {
    TokenIssuer::new(&get_auth_config()).issue_token(username, user_id).expect("Failed to sign token")
}

/// A correctly signed token that expired a day ago.
pub fn expired_token(username: &str, user_id: i64) -> String {
    let iat = Utc::now().timestamp() - 2 * 86400;
    let claims = JwtClaims { sub: username.to_string(), uid: user_id, iat, exp: iat + 86400 };
    let key = EncodingKey::from_secret(TEST_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).expect("Failed to sign token")
}

/// Sends `req` to an app made up of the routes and data in `configure`, along with the token issuer and extractor
/// configuration the real server uses. Returns the status and body of the response.
pub async fn send_request<F>(req: TestRequest, token: Option<&str>, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let req = match token {
        Some(token) => req.insert_header(("Authorization", format!("Bearer {token}"))),
        None => req,
    };
    let app = App::new()
        .app_data(web::Data::new(TokenIssuer::new(&get_auth_config())))
        .configure(configure_extractors)
        .configure(configure);
    let app = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let body = String::from_utf8_lossy(&body).into_owned();
    (status, body)
}

pub fn fp(s: &str) -> FixedPoint {
    s.parse().expect("Invalid fixed point value")
}

pub fn usd() -> Currency {
    Currency { id: 1, code: "USD".into(), name: "US Dollar".into(), image: String::new() }
}

pub fn user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.into(),
        first_name: String::new(),
        last_name: String::new(),
        email: format!("{username}@example.com"),
    }
}

/// Alice's offer to sell 1000.00 USD for EUR at 9.00
pub fn offer(id: i64, amount: &str) -> Offer {
    Offer {
        id,
        currency_to_sell_id: 1,
        currency_to_buy_id: 2,
        amount: fp(amount),
        exchange_rate: fp("9.00"),
        seller_id: 1,
        added_time: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        active_state: true,
    }
}

pub fn deal(id: i64, offer_id: i64, buyer_id: i64, amount: &str) -> Deal {
    Deal {
        id,
        buyer_id,
        offer_id,
        amount: fp(amount),
        deal_time: Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap(),
    }
}

pub fn assert_message(body: &str, expected: &str) {
    let json: serde_json::Value = serde_json::from_str(body).unwrap_or_else(|e| panic!("{e}. Body was: {body}"));
    let message = json["message"].as_str().unwrap_or_else(|| panic!("No message in {body}"));
    assert!(message.contains(expected), "Expected '{expected}' in '{message}'");
}
