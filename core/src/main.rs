mod cors;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use common::env_config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.environment == "production";
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection and run migrations
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    // payment provider client, shared by checkout and webhook handling
    let stripe_client =
        std::sync::Arc::new(common::stripe::create_client(&config.stripe_secret_key));

    HttpServer::new(move || {
        let jwt_secret = config_data.jwt_config.secret.clone();
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(stripe_client.clone()))
            .wrap(limiter::global_middleware(10)) // max 10 requests per second
            .wrap(logger::middleware())
            .wrap(cors::middleware(&origin))
            .service(
                web::scope("/api")
                    .service(api_auth::mount_auth())
                    .service(api_billing::mount_webhook())
                    .service(api_billing::mount_ingest())
                    .service(api_admin::mount_invite_public())
                    .service(
                        web::scope("/dashboard")
                            .wrap(api_auth::auth_middleware(jwt_secret.clone()))
                            .service(api_billing::mount_billing()),
                    )
                    .service(api_admin::mount_admin().wrap(api_auth::auth_middleware(jwt_secret))),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
