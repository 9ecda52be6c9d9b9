//! `/api/replay/hands` — deterministic replay of a single scripted hand.

use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use felt_auth::Auth;
use felt_dto::HandSpec;

pub async fn build_hand(_auth: Auth, body: web::Json<HandSpec>) -> impl Responder {
    match felt_replay::replay(&body, uuid::Uuid::now_v7()) {
        Ok(tape) => HttpResponse::Ok().json(tape),
        Err(e) if e.step_index < 0 => HttpResponse::BadRequest().json(e),
        Err(e) => HttpResponse::UnprocessableEntity().json(e),
    }
}
