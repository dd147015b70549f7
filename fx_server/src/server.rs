use std::time::Duration;

use actix_web::{
    dev::Server,
    error::InternalError,
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    Error,
    HttpRequest,
    HttpServer,
    ResponseError,
};
use fx_engine::{AccountApi, AuthApi, CatalogApi, DealFlowApi, SqliteDatabase};
use log::*;

use crate::{
    auth::TokenIssuer,
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        server_status,
        CreateCurrencyRoute,
        CreateDealRoute,
        CreateOfferRoute,
        CurrenciesRoute,
        CurrencyByIdRoute,
        CurrencyOffersRoute,
        DealByIdRoute,
        DealsForOfferRoute,
        DealsRoute,
        DeleteCurrencyRoute,
        DeleteOfferRoute,
        OfferByIdRoute,
        OffersRoute,
        SignInRoute,
        SignUpRoute,
        UpdateCurrencyRoute,
        UpdateOfferStateRoute,
        UserOffersRoute,
        UserProfileRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    } else {
        info!("🚀️ Skipping database migrations");
    }
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let catalog_api = CatalogApi::new(db.clone());
        let deal_flow_api = DealFlowApi::new(db.clone());
        let accounts_api = AccountApi::new(db.clone());
        let auth_api = AuthApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let api_scope = web::scope("/api")
            .service(server_status)
            .service(SignInRoute::<SqliteDatabase>::new())
            .service(SignUpRoute::<SqliteDatabase>::new())
            .service(CurrenciesRoute::<SqliteDatabase>::new())
            .service(CreateCurrencyRoute::<SqliteDatabase>::new())
            .service(CurrencyOffersRoute::<SqliteDatabase>::new())
            .service(CurrencyByIdRoute::<SqliteDatabase>::new())
            .service(UpdateCurrencyRoute::<SqliteDatabase>::new())
            .service(DeleteCurrencyRoute::<SqliteDatabase>::new())
            .service(OffersRoute::<SqliteDatabase>::new())
            .service(CreateOfferRoute::<SqliteDatabase>::new())
            .service(OfferByIdRoute::<SqliteDatabase>::new())
            .service(UpdateOfferStateRoute::<SqliteDatabase>::new())
            .service(DeleteOfferRoute::<SqliteDatabase>::new())
            .service(UserOffersRoute::<SqliteDatabase>::new())
            .service(UserProfileRoute::<SqliteDatabase>::new())
            .service(DealsRoute::<SqliteDatabase>::new())
            .service(CreateDealRoute::<SqliteDatabase>::new())
            .service(DealsForOfferRoute::<SqliteDatabase>::new())
            .service(DealByIdRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("fx::access_log"))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(deal_flow_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(jwt_signer))
            .configure(configure_extractors)
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Makes extractor failures (bad JSON, form, query string or path) produce the same `{"message": ...}` body as every
/// other error.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|e, _req| rejection(ServerError::InvalidRequestBody(e.to_string()))),
    )
    .app_data(
        web::FormConfig::default().error_handler(|e, _req| rejection(ServerError::InvalidRequestBody(e.to_string()))),
    )
    .app_data(web::QueryConfig::default().error_handler(|e, _req| rejection(ServerError::InvalidQuery(e.to_string()))))
    .app_data(web::PathConfig::default().error_handler(|e, req: &HttpRequest| {
        debug!("💻️ Could not read path {}", req.path());
        rejection(ServerError::InvalidRequestPath(e.to_string()))
    }));
}

fn rejection(err: ServerError) -> Error {
    debug!("💻️ Rejected request. {err}");
    let response = err.error_response();
    InternalError::from_response(err, response).into()
}
