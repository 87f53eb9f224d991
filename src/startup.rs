use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;

use crate::auth::DecoyDigest;
use crate::configuration::{ApplicationSettings, AuthSettings};
use crate::metrics::HitCounter;
use crate::middleware::{HitCounterMiddleware, LoggerMiddleware};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, health_check, login, metrics,
    polka_webhook, refresh, reset, revoke, update_user,
};
use crate::store::Repositories;

pub fn run(
    listener: TcpListener,
    repositories: Repositories,
    application: ApplicationSettings,
    auth: AuthSettings,
) -> Result<Server, std::io::Error> {
    let decoy = DecoyDigest::generate(auth.bcrypt_cost)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let decoy = web::Data::new(decoy);
    let repositories = web::Data::new(repositories);
    let application = web::Data::new(application);
    let auth = web::Data::new(auth);
    let hits = web::Data::new(HitCounter::new());

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(repositories.clone())
            .app_data(application.clone())
            .app_data(auth.clone())
            .app_data(hits.clone())
            .app_data(decoy.clone())

            // API; handlers that need a caller take `AuthenticatedUser`
            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .route("/users", web::post().to(create_user))
                    .route("/users", web::put().to(update_user))
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .route("/chirps", web::post().to(create_chirp))
                    .route("/chirps/{chirp_id}", web::get().to(get_chirp))
                    .route("/chirps/{chirp_id}", web::delete().to(delete_chirp))
                    .route("/polka/webhooks", web::post().to(polka_webhook)),
            )
            .service(
                web::scope("/admin")
                    .route("/metrics", web::get().to(metrics))
                    .route("/reset", web::post().to(reset)),
            )

            // Static files, counted
            .service(
                web::scope("/app")
                    .wrap(HitCounterMiddleware::new(hits.clone()))
                    .service(fs::Files::new("", "./public").index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
