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

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    if config.mercado_pago.access_token.is_empty() {
        log::warn!(
            "MERCADO_PAGO_ACCESS_TOKEN is not set; payment endpoints will report a configuration error"
        );
    }

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .wrap(logger::middleware())
            .wrap(cors::default(&origin))
            .service(
                web::scope("/api")
                    .service(api_subs::mount::mount_webhook())
                    .service(api_subs::mount::mount_subs())
                    .service(
                        web::scope("/secured")
                            .wrap(auth::auth_middleware(config_data.clone()))
                            .service(api_subs::mount::mount_pay())
                            .service(api_subs::mount::mount_secure_subs()),
                    ),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
