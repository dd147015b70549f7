use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::Utc;
use fx_engine::{db_types::Offer, query_objects::Page, traits::MarketplaceError, CatalogApi, DealFlowApi};
use mockall::predicate::eq;
use serde_json::json;

use super::{
    helpers::*,
    mocks::{MockCatalogManager, MockDealManager},
};
use crate::routes::{CreateOfferRoute, DeleteOfferRoute, OfferByIdRoute, OffersRoute, UpdateOfferStateRoute};

#[actix_web::test]
async fn list_active_offers() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_search_offers().returning(|query, page| {
        assert_eq!(query.active_state, Some(true));
        assert!(query.seller_id.is_none());
        assert_eq!(page.limit(), 2);
        Ok(Page::new(vec![offer(1, "1000.00"), offer(2, "50.25")], 7))
    });
    let req = TestRequest::get().uri("/offers?limit=2");
    let (status, body) = send_request(req, None, |cfg| configure_catalog(cfg, catalog)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let page: Page<Offer> = serde_json::from_str(&body).unwrap();
    assert_eq!(page.count, 7);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].amount, fp("50.25"));
}

#[actix_web::test]
async fn filter_offers_by_currency_pair() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_search_offers().times(1).returning(|query, _| {
        assert_eq!(query.currency_to_sell_id, Some(1));
        assert_eq!(query.currency_to_buy_id, Some(2));
        assert_eq!(query.active_state, Some(true));
        Ok(Page::new(vec![offer(1, "1000.00")], 1))
    });
    let req = TestRequest::get().uri("/offers?currency_to_sell=1&currency_to_buy=2");
    let (status, body) = send_request(req, None, |cfg| configure_catalog(cfg, catalog)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let page: Page<Offer> = serde_json::from_str(&body).unwrap();
    assert_eq!(page.items[0].currency_to_buy_id, 2);
}

#[actix_web::test]
async fn list_inactive_offers() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_search_offers().times(1).returning(|query, page| {
        assert_eq!(query.active_state, Some(false));
        assert!(query.currency_to_sell_id.is_none());
        assert_eq!(page.limit(), 5);
        Ok(Page::new(vec![Offer { active_state: false, ..offer(3, "0.00") }], 1))
    });
    let req = TestRequest::get().uri("/offers?active_state=false&limit=5");
    let (status, body) = send_request(req, None, |cfg| configure_catalog(cfg, catalog)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["items"][0]["active_state"], false);
    assert_eq!(json["items"][0]["amount"], "0.00");
}

#[actix_web::test]
async fn offer_filter_with_bad_value() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_search_offers().never();
    let req = TestRequest::get().uri("/offers?currency_to_buy=eur");
    let (status, body) = send_request(req, None, |cfg| configure_catalog(cfg, catalog)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_message(&body, "Could not read query parameters");
}

#[actix_web::test]
async fn fetch_missing_offer() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_offer().with(eq(9)).returning(|_| Ok(None));
    let req = TestRequest::get().uri("/offers/9");
    let (status, body) = send_request(req, None, |cfg| configure_catalog(cfg, catalog)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_message(&body, "Offer 9 does not exist");
}

#[actix_web::test]
async fn create_offer_uses_token_user_as_seller() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_insert_offer().times(1).returning(|new_offer| {
        assert_eq!(new_offer.seller_id, 5);
        Ok(Offer {
            id: 11,
            currency_to_sell_id: new_offer.currency_to_sell_id,
            currency_to_buy_id: new_offer.currency_to_buy_id,
            amount: new_offer.amount,
            exchange_rate: new_offer.exchange_rate,
            seller_id: new_offer.seller_id,
            added_time: Utc::now(),
            active_state: true,
        })
    });
    let token = issue_token("carol", 5);
    let body = json!({
        "currency_to_sell_id": 1,
        "currency_to_buy_id": 2,
        "amount": "1000.00",
        "exchange_rate": 9,
        "seller_id": 1,
    });
    let req = TestRequest::post().uri("/offers").set_json(body);
    let (status, body) = send_request(req, Some(&token), |cfg| configure_catalog(cfg, catalog)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let offer: Offer = serde_json::from_str(&body).unwrap();
    assert_eq!(offer.seller_id, 5);
    assert_eq!(offer.amount, fp("1000"));
    assert_eq!(offer.exchange_rate, fp("9"));
    assert!(offer.active_state);
}

#[actix_web::test]
async fn create_offer_for_the_same_currency() {
    let _ = env_logger::try_init().ok();
    let token = issue_token("carol", 5);
    let body = json!({ "currency_to_sell_id": 1, "currency_to_buy_id": 1, "amount": 10, "exchange_rate": 1 });
    let req = TestRequest::post().uri("/offers").set_json(body);
    let (status, body) = send_request(req, Some(&token), |cfg| configure_catalog(cfg, MockCatalogManager::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_message(&body, "must be different");
}

#[actix_web::test]
async fn create_offer_with_too_many_decimals() {
    let _ = env_logger::try_init().ok();
    let token = issue_token("carol", 5);
    let body = json!({ "currency_to_sell_id": 1, "currency_to_buy_id": 2, "amount": "10.001", "exchange_rate": 1 });
    let req = TestRequest::post().uri("/offers").set_json(body);
    let (status, body) = send_request(req, Some(&token), |cfg| configure_catalog(cfg, MockCatalogManager::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_message(&body, "Could not read request body");
}

#[actix_web::test]
async fn create_offer_for_unknown_currency() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_insert_offer().returning(|_| Err(MarketplaceError::CurrencyNotFound(2)));
    let token = issue_token("carol", 5);
    let body = json!({ "currency_to_sell_id": 1, "currency_to_buy_id": 2, "amount": 10, "exchange_rate": 1 });
    let req = TestRequest::post().uri("/offers").set_json(body);
    let (status, _) = send_request(req, Some(&token), |cfg| configure_catalog(cfg, catalog)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn owner_deactivates_offer() {
    let _ = env_logger::try_init().ok();
    let mut deals = MockDealManager::new();
    deals.expect_set_offer_state().with(eq(1), eq(1), eq(false)).times(1).returning(|id, _, active| {
        Ok(Offer { active_state: active, ..offer(id, "1000.00") })
    });
    let token = issue_token("alice", 1);
    let req = TestRequest::patch().uri("/offers/1").set_json(json!({ "active_state": false }));
    let (status, body) = send_request(req, Some(&token), |cfg| configure_deals(cfg, deals)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let offer: Offer = serde_json::from_str(&body).unwrap();
    assert!(!offer.active_state);
    assert_eq!(offer.amount, fp("1000.00"));
}

#[actix_web::test]
async fn non_owner_cannot_toggle_offer() {
    let _ = env_logger::try_init().ok();
    let mut deals = MockDealManager::new();
    deals
        .expect_set_offer_state()
        .returning(|offer_id, user_id, _| Err(MarketplaceError::NotOfferOwner { offer_id, user_id }));
    let token = issue_token("bob", 2);
    let req = TestRequest::patch().uri("/offers/1").set_json(json!({ "active_state": false }));
    let (status, body) = send_request(req, Some(&token), |cfg| configure_deals(cfg, deals)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_message(&body, "User 2 does not own offer 1");
}

#[actix_web::test]
async fn toggle_without_state() {
    let _ = env_logger::try_init().ok();
    let token = issue_token("alice", 1);
    let req = TestRequest::patch().uri("/offers/1").set_json(json!({ "amount": "5.00" }));
    let (status, _) = send_request(req, Some(&token), |cfg| configure_deals(cfg, MockDealManager::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn delete_offer_without_deals() {
    let _ = env_logger::try_init().ok();
    let mut deals = MockDealManager::new();
    deals.expect_delete_offer().with(eq(3), eq(1)).times(1).returning(|_, _| Ok(()));
    let token = issue_token("alice", 1);
    let req = TestRequest::delete().uri("/offers/3");
    let (status, _) = send_request(req, Some(&token), |cfg| configure_deals(cfg, deals)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn delete_offer_with_deals() {
    let _ = env_logger::try_init().ok();
    let mut deals = MockDealManager::new();
    deals
        .expect_delete_offer()
        .returning(|id, _| Err(MarketplaceError::ReferencedByDependents(format!("Offer {id} has deals"))));
    let token = issue_token("alice", 1);
    let req = TestRequest::delete().uri("/offers/3");
    let (status, body) = send_request(req, Some(&token), |cfg| configure_deals(cfg, deals)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_message(&body, "Offer 3 has deals");
}

#[actix_web::test]
async fn delete_offer_requires_token() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::delete().uri("/offers/3");
    let (status, _) = send_request(req, None, |cfg| configure_deals(cfg, MockDealManager::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

fn configure_catalog(cfg: &mut ServiceConfig, catalog: MockCatalogManager) {
    cfg.app_data(web::Data::new(CatalogApi::new(catalog)))
        .service(OffersRoute::<MockCatalogManager>::new())
        .service(CreateOfferRoute::<MockCatalogManager>::new())
        .service(OfferByIdRoute::<MockCatalogManager>::new());
}

fn configure_deals(cfg: &mut ServiceConfig, deals: MockDealManager) {
    cfg.app_data(web::Data::new(DealFlowApi::new(deals)))
        .service(UpdateOfferStateRoute::<MockDealManager>::new())
        .service(DeleteOfferRoute::<MockDealManager>::new());
}
