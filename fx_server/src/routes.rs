//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every handler here awaits the engine, which in turn awaits the
//! database pool, so nothing blocks a worker.
//!
//! Handlers that take a [`JwtClaims`] argument require a valid access token. The rest are open.
use actix_web::{get, web, HttpResponse, Responder};
use fx_engine::{
    account_objects::NewUserRequest,
    db_types::{CurrencyUpdate, NewCurrency},
    offer_objects::{NewOfferRequest, OfferStateUpdate},
    query_objects::{OfferQueryFilter, Pagination},
    traits::{AccountManagement, AuthManagement, CatalogManagement, DealManagement},
    AccountApi,
    AuthApi,
    CatalogApi,
    DealFlowApi,
};
use log::*;
use serde_json::json;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{NewDealRequest, OfferSearchParams, SignInRequest, TokenResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

#[get("/")]
pub async fn server_status() -> impl Responder {
    trace!("💻️ Received status request");
    HttpResponse::Ok().json(json!({ "Server": "running..." }))
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(sign_in => Post "/sign_in" impl AuthManagement);
/// Route handler for the sign-in endpoint
///
/// Takes a `username` and `password` as form fields. If the credentials match, the server issues an access token
/// that must be supplied as `Authorization: Bearer <token>` on protected endpoints. Tokens are not refreshed.
pub async fn sign_in<A: AuthManagement>(
    body: web::Form<SignInRequest>,
    api: web::Data<AuthApi<A>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let SignInRequest { username, password } = body.into_inner();
    trace!("💻️ Received sign in request for {username}");
    let user = api.sign_in(&username, password.reveal()).await.map_err(|e| {
        debug!("💻️ Sign in for {username} failed. {e}");
        e
    })?;
    let token = signer.issue_token(&user.username, user.id)?;
    trace!("💻️ Issued access token for {username}");
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

route!(sign_up => Post "/sign_up" impl AuthManagement);
pub async fn sign_up<A: AuthManagement>(
    body: web::Form<NewUserRequest>,
    api: web::Data<AuthApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST sign_up for {}", request.username);
    let user = api.sign_up(request).await?;
    Ok(HttpResponse::Created().json(user))
}

//----------------------------------------------   Currencies  ----------------------------------------------------
route!(currencies => Get "/currencies" impl CatalogManagement);
pub async fn currencies<B: CatalogManagement>(
    page: web::Query<Pagination>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET currencies");
    let currencies = api.currencies(page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(currencies))
}

route!(currency_by_id => Get "/currencies/{id}" impl CatalogManagement);
pub async fn currency_by_id<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET currency #{id}");
    let currency = api.currency(id).await?;
    Ok(HttpResponse::Ok().json(currency))
}

route!(create_currency => Post "/currencies" impl CatalogManagement);
pub async fn create_currency<B: CatalogManagement>(
    claims: JwtClaims,
    body: web::Json<NewCurrency>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let currency = body.into_inner();
    debug!("💻️ POST currency {} from {}", currency.code, claims.sub);
    let currency = api.create_currency(currency).await?;
    Ok(HttpResponse::Created().json(currency))
}

route!(update_currency => Put "/currencies/{id}" impl CatalogManagement);
pub async fn update_currency<B: CatalogManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<CurrencyUpdate>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PUT currency #{id} from {}", claims.sub);
    let currency = api.update_currency(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(currency))
}

route!(delete_currency => Delete "/currencies/{id}" impl CatalogManagement);
pub async fn delete_currency<B: CatalogManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE currency #{id} from {}", claims.sub);
    api.delete_currency(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

route!(currency_offers => Get "/currencies/{id}/offers" impl CatalogManagement);
/// Lists the active offers that are selling the given currency.
pub async fn currency_offers<B: CatalogManagement>(
    path: web::Path<i64>,
    page: web::Query<Pagination>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET offers selling currency #{id}");
    let offers = api.offers_selling(id, page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(offers))
}

//----------------------------------------------   Offers  ----------------------------------------------------
route!(offers => Get "/offers" impl CatalogManagement);
/// Lists the offers that are open for trading, optionally narrowed down to a currency pair.
/// `?active_state=false` lists the withdrawn and exhausted offers instead.
pub async fn offers<B: CatalogManagement>(
    page: web::Query<Pagination>,
    search: web::Query<OfferSearchParams>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let query = OfferQueryFilter::from(search.into_inner());
    trace!("💻️ GET offers [{query}]");
    let offers = api.search_offers(query, page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(offers))
}

route!(offer_by_id => Get "/offers/{id}" impl CatalogManagement);
pub async fn offer_by_id<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET offer #{id}");
    let offer = api.offer(id).await?;
    Ok(HttpResponse::Ok().json(offer))
}

route!(create_offer => Post "/offers" impl CatalogManagement);
/// Lists a new offer. The seller is always the authenticated user.
pub async fn create_offer<B: CatalogManagement>(
    claims: JwtClaims,
    body: web::Json<NewOfferRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST offer from {} (#{})", claims.sub, claims.uid);
    let offer = api.create_offer(claims.uid, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(offer))
}

route!(update_offer_state => Patch "/offers/{id}" impl DealManagement);
pub async fn update_offer_state<B: DealManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<OfferStateUpdate>,
    api: web::Data<DealFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let active = body.active_state;
    debug!("💻️ PATCH offer #{id} to active={active} from {}", claims.sub);
    let offer = api.toggle_offer_state(id, claims.uid, active).await?;
    Ok(HttpResponse::Ok().json(offer))
}

route!(delete_offer => Delete "/offers/{id}" impl DealManagement);
pub async fn delete_offer<B: DealManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<DealFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE offer #{id} from {}", claims.sub);
    api.delete_offer(id, claims.uid).await?;
    Ok(HttpResponse::NoContent().finish())
}

//----------------------------------------------   Users  ----------------------------------------------------
route!(user_profile => Get "/users/{id}" impl AccountManagement);
/// Returns the user's details, along with the first page of their offers and deals.
pub async fn user_profile<B: AccountManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET user #{id} for {}", claims.sub);
    let profile = api.user_profile(id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

route!(user_offers => Get "/users/{id}/offers" impl AccountManagement);
pub async fn user_offers<B: AccountManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    page: web::Query<Pagination>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET offers for user #{id} for {}", claims.sub);
    let offers = api.offers_for_user(id, page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(offers))
}

//----------------------------------------------   Deals  ----------------------------------------------------
route!(deals => Get "/deals" impl AccountManagement);
pub async fn deals<B: AccountManagement>(
    claims: JwtClaims,
    page: web::Query<Pagination>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET deals for {}", claims.sub);
    let deals = api.all_deals(page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(deals))
}

route!(deal_by_id => Get "/deals/{id}" impl AccountManagement);
pub async fn deal_by_id<B: AccountManagement>(
    path: web::Path<i64>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET deal #{id}");
    let deal = api.deal(id).await?;
    Ok(HttpResponse::Ok().json(deal))
}

route!(deals_for_offer => Get "/deals/{offer_id}/offer" impl AccountManagement);
pub async fn deals_for_offer<B: AccountManagement>(
    path: web::Path<i64>,
    page: web::Query<Pagination>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let offer_id = path.into_inner();
    trace!("💻️ GET deals for offer #{offer_id}");
    let deals = api.deals_for_offer(offer_id, page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(deals))
}

route!(create_deal => Post "/deals" impl DealManagement);
/// Route handler for striking a deal against an offer.
///
/// The buyer is always the authenticated user. A `buyer_id` in the body is accepted only when it matches the token;
/// any other value is refused with 403. The engine refuses deals on missing or inactive offers, deals by the offer's
/// own seller, and deals for more than the offer has left.
pub async fn create_deal<B: DealManagement>(
    claims: JwtClaims,
    body: web::Json<NewDealRequest>,
    api: web::Data<DealFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let NewDealRequest { offer_id, buyer_id, amount } = body.into_inner();
    if let Some(id) = buyer_id.filter(|id| *id != claims.uid) {
        warn!("💻️ User #{} ({}) tried to strike a deal on behalf of user #{id}", claims.uid, claims.sub);
        return Err(ServerError::InsufficientPermissions(format!(
            "User {} cannot make a deal on behalf of user {id}",
            claims.uid
        )));
    }
    let buyer_id = claims.uid;
    debug!("💻️ POST deal for {amount} on offer #{offer_id} by user #{buyer_id} ({})", claims.sub);
    let deal = api.create_deal(offer_id, buyer_id, amount).await?;
    Ok(HttpResponse::Created().json(deal))
}
