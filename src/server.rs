use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::error::Error;
use std::sync::Arc;

use follower_scraper_lib::{logger, web as routes, Config, LookupService, RobloxClient};

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();

    let config = Config::from_env()?;
    // built outside the actix runtime; the blocking client owns its own
    let client = RobloxClient::new()?;
    let service = web::Data::new(LookupService::new(Arc::new(client), &config));

    log::info!("Starting Web Server at http://{}", config.bind_addr);

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header();

            App::new()
                .wrap(cors)
                .app_data(service.clone())
                .configure(routes::configure)
                .default_service(web::route().to(routes::not_found))
        })
        .bind(config.bind_addr)?
        .run()
        .await
    })?;

    Ok(())
}
