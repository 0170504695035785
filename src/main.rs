use std::io;

use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use jewelry_catalog::db::establish_connection_pool;
use jewelry_catalog::domain::types::MediaKind;
use jewelry_catalog::media::{ImageNormalizer, MediaPipeline, MediaStore};
use jewelry_catalog::models::config::ServerConfig;
use jewelry_catalog::repository::DieselRepository;
use jewelry_catalog::routes;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        io::Error::other(e)
    })?;

    let pool = establish_connection_pool(&config.database_url).map_err(|e| {
        log::error!("Failed to connect to {}: {e}", config.database_url);
        io::Error::other(e)
    })?;

    {
        let mut conn = pool.get().map_err(io::Error::other)?;
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            log::error!("Failed to run migrations: {e}");
            io::Error::other(e.to_string())
        })?;
    }

    let store = MediaStore::new(&config.media_root);
    store.ensure_layout()?;
    let media = MediaPipeline::new(
        store.clone(),
        ImageNormalizer::new(config.image_quality, config.image_effort),
    );

    let repo = web::Data::new(DieselRepository::new(pool));
    let media = web::Data::new(media);
    let server_config = web::Data::new(config.clone());

    log::info!(
        "Serving media from {} on {}:{}",
        store.root().display(),
        config.address,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors())
            .wrap(Logger::default())
            .app_data(repo.clone())
            .app_data(media.clone())
            .app_data(server_config.clone())
            .configure(routes::configure)
            .service(Files::new("/images", store.directory(MediaKind::Image)))
            .service(Files::new("/videos", store.directory(MediaKind::Video)))
            .service(Files::new("/public", store.root()))
    })
    .bind((config.address.as_str(), config.port))?
    .run()
    .await
}
