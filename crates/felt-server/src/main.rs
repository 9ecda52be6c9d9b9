//! Unified gateway binary.
//!
//! Binds auth, the lobby (table registry + WebSocket bridge), and the
//! per-user audit surface onto a single actix-web server. Everything below
//! `/api` is stateless HTTP or a short-lived upgrade into a table's own
//! mailbox; the only process-wide state is the [`felt_hosting::Casino`]
//! registry and the Postgres pool both share.
mod audit;
mod replay;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    felt_core::log();
    felt_core::kys();

    let db = felt_db::db().await;
    let crypto = web::Data::new(felt_auth::Crypto::from_env());
    let casino = web::Data::new(felt_hosting::Casino::new(db.clone()));
    let db = web::Data::new(db);

    log::info!(
        "auth mode {}",
        std::env::var("AUTH_MODE").unwrap_or_else(|_| "db".into())
    );

    let addr = std::env::var("SERVER_ADDR").expect("SERVER_ADDR must be set");
    log::info!("binding {}", addr);

    let shutdown = casino.clone().into_inner();
    let reaper = casino.clone().into_inner();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(30));
        loop {
            ticker.tick().await;
            reaper
                .cleanup_idle_tables(std::time::Duration::from_secs(60))
                .await;
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(db.clone())
            .app_data(crypto.clone())
            .app_data(casino.clone())
            .route("/health", web::get().to(health))
            .service(
                web::scope("/api/auth")
                    .route("/register", web::post().to(felt_auth::register))
                    .route("/login", web::post().to(felt_auth::login))
                    .route("/logout", web::post().to(felt_auth::logout))
                    .route("/me", web::get().to(felt_auth::me)),
            )
            .service(
                web::scope("/api/table")
                    .route("/personas", web::get().to(felt_hosting::handlers::personas))
                    .route("/start", web::post().to(felt_hosting::handlers::start))
                    .route(
                        "/story",
                        web::post().to(felt_hosting::handlers::start_story_chapter),
                    )
                    .route("/enter/{table_id}", web::get().to(felt_hosting::handlers::enter))
                    .route("/leave/{table_id}", web::post().to(felt_hosting::handlers::leave)),
            )
            .service(
                web::scope("/api/replay")
                    .route("/hands", web::post().to(replay::build_hand)),
            )
            .service(
                web::scope("/api/audit/{source}")
                    .route("/recent", web::get().to(audit::recent))
                    .route("/hands/{hand_id}", web::get().to(audit::get_hand))
                    .route("/hands/{hand_id}", web::post().to(audit::replay_upsert))
                    .route("/hands/{hand_id}/save", web::post().to(audit::save))
                    .route("/hands/{hand_id}/save", web::delete().to(audit::unsave)),
            )
    })
    .workers(num_cpus::get())
    .bind(addr)?
    .run()
    .await?;

    shutdown.stop().await;
    Ok(())
}
