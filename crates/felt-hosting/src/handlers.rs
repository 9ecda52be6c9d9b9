use super::*;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use felt_core::ID;
use felt_records::Room;

/// Lists the loaded persona registry so a gateway can render "who's at
/// this table" before a hand starts.
pub async fn personas(casino: web::Data<Casino>) -> impl Responder {
    HttpResponse::Ok().json(casino.personas().all())
}

/// Decodes a bearer token from the query string, if present and unexpired.
/// Shared by every handler that can operate either authenticated or
/// anonymously.
fn authenticate(
    tokens: &felt_auth::Crypto,
    query: &std::collections::HashMap<String, String>,
) -> Option<felt_auth::Claims> {
    query
        .get("token")
        .and_then(|t| tokens.decode(t).ok())
        .filter(|c| !c.expired())
}

pub async fn start(
    casino: web::Data<Casino>,
    tokens: web::Data<felt_auth::Crypto>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let user = authenticate(&tokens, &query).map(|c| c.user());
    match casino.into_inner().quick_start(user).await {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({ "table_id": id.to_string() })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[derive(serde::Deserialize)]
pub struct StartStoryChapterRequest {
    pub chapter_id: String,
}

pub async fn start_story_chapter(
    casino: web::Data<Casino>,
    tokens: web::Data<felt_auth::Crypto>,
    query: web::Query<std::collections::HashMap<String, String>>,
    body: web::Json<StartStoryChapterRequest>,
) -> impl Responder {
    let Some(user) = authenticate(&tokens, &query).map(|c| c.user()) else {
        return HttpResponse::Unauthorized().body("story mode requires a signed-in user");
    };
    match casino
        .into_inner()
        .start_story_chapter(user, &body.chapter_id)
        .await
    {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({ "table_id": id.to_string() })),
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

pub async fn leave(casino: web::Data<Casino>, path: web::Path<uuid::Uuid>) -> impl Responder {
    match casino.close(ID::from(path.into_inner())).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "left" })),
        Err(e) => HttpResponse::NotFound().body(e.to_string()),
    }
}

pub async fn enter(
    casino: web::Data<Casino>,
    tokens: web::Data<felt_auth::Crypto>,
    path: web::Path<uuid::Uuid>,
    query: web::Query<std::collections::HashMap<String, String>>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    let id: ID<Room> = ID::from(path.into_inner());
    match authenticate(&tokens, &query) {
        Some(c) => log::info!("authenticated user {} entering table {}", c.sub, id),
        None => log::info!("anonymous user entering table {}", id),
    }
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => match casino.bridge(id, session, stream).await {
            Ok(()) => response.map_into_left_body(),
            Err(e) => HttpResponse::NotFound()
                .body(e.to_string())
                .map_into_right_body(),
        },
        Err(e) => HttpResponse::InternalServerError()
            .body(e.to_string())
            .map_into_right_body(),
    }
}
