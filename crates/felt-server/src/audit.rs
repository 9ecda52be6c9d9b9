//! `/api/audit/...` handlers: per-user recent listings, single-hand detail,
//! and save/unsave pinning. Shared between the `live` and `replay` sources;
//! the source is bound from the route path.

use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use felt_auth::Auth;
use felt_core::ID;
use felt_records::AuditError;
use felt_records::AuditRepository;
use felt_records::Hand;
use felt_records::LedgerEvent;
use felt_records::Source;
use serde::Deserialize;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tokio_postgres::Client;

fn parse_source(raw: &str) -> Option<Source> {
    match raw {
        "live" => Some(Source::Live),
        "replay" => Some(Source::Replay),
        _ => None,
    }
}

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time")
        .as_millis() as i64
}

#[derive(Deserialize)]
pub struct RecentQuery {
    limit: Option<i64>,
}

#[derive(Serialize)]
struct AuditItemView {
    hand_id: String,
    played_at: i64,
    summary: serde_json::Value,
    is_saved: bool,
    saved_at: Option<i64>,
}

pub async fn recent(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<String>,
    query: web::Query<RecentQuery>,
) -> impl Responder {
    let Some(source) = parse_source(&path) else {
        return HttpResponse::NotFound().body("unknown audit source");
    };
    let limit = query.limit.unwrap_or(50).clamp(1, 100);
    match db.recent(auth.user(), source, limit).await {
        Ok(items) => HttpResponse::Ok().json(serde_json::json!({
            "items": items
                .iter()
                .map(|item| AuditItemView {
                    hand_id: item.hand().to_string(),
                    played_at: item.played_at(),
                    summary: serde_json::from_str(item.summary_json())
                        .unwrap_or(serde_json::Value::Null),
                    is_saved: item.is_saved(),
                    saved_at: item.saved_at(),
                })
                .collect::<Vec<_>>(),
        })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[derive(Serialize)]
struct EventView {
    seq: u64,
    event_type: String,
    envelope_b64: String,
    server_ts_ms: i64,
}

impl From<&LedgerEvent> for EventView {
    fn from(event: &LedgerEvent) -> Self {
        Self {
            seq: event.seq(),
            event_type: event.event_type().to_string(),
            envelope_b64: event.envelope_b64().to_string(),
            server_ts_ms: event.server_ts_ms(),
        }
    }
}

pub async fn get_hand(
    db: web::Data<Arc<Client>>,
    _auth: Auth,
    path: web::Path<(String, uuid::Uuid)>,
) -> impl Responder {
    let (source_raw, hand_id) = path.into_inner();
    let Some(source) = parse_source(&source_raw) else {
        return HttpResponse::NotFound().body("unknown audit source");
    };
    let hand: ID<Hand> = ID::from(hand_id);
    match db.events(source, hand).await {
        Ok(events) => HttpResponse::Ok().json(serde_json::json!({
            "handID": hand.to_string(),
            "source": source_raw,
            "events": events.iter().map(EventView::from).collect::<Vec<_>>(),
        })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn save(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<(String, uuid::Uuid)>,
) -> impl Responder {
    let (source_raw, hand_id) = path.into_inner();
    let Some(source) = parse_source(&source_raw) else {
        return HttpResponse::NotFound().body("unknown audit source");
    };
    let hand: ID<Hand> = ID::from(hand_id);
    let mut item = match db.audit_hand(auth.user(), source, hand).await {
        Ok(Some(item)) => item,
        Ok(None) => return HttpResponse::NotFound().body("hand not in audit history"),
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    let saved_count = match db.saved_count(auth.user(), source).await {
        Ok(count) => count as usize,
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    let now = now_ms();
    match item.pin(saved_count, felt_core::AUDIT_SAVED_LIMIT_Y, now) {
        Ok(()) => {}
        Err(AuditError::SavedLimitReached) => {
            return HttpResponse::Conflict().body(AuditError::SavedLimitReached.to_string());
        }
    }
    match db.set_saved(auth.user(), source, hand, true, now).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "isSaved": true })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn unsave(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<(String, uuid::Uuid)>,
) -> impl Responder {
    let (source_raw, hand_id) = path.into_inner();
    let Some(source) = parse_source(&source_raw) else {
        return HttpResponse::NotFound().body("unknown audit source");
    };
    let hand: ID<Hand> = ID::from(hand_id);
    match db.set_saved(auth.user(), source, hand, false, now_ms()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "isSaved": false })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[derive(Deserialize)]
pub struct ReplayUpsertRequest {
    events: Vec<ReplayEventIn>,
    summary: serde_json::Value,
}

#[derive(Deserialize)]
pub struct ReplayEventIn {
    seq: u64,
    event_type: String,
    envelope_b64: String,
    server_ts_ms: Option<i64>,
}

pub async fn replay_upsert(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<(String, uuid::Uuid)>,
    body: web::Json<ReplayUpsertRequest>,
) -> impl Responder {
    let (source_raw, hand_id) = path.into_inner();
    if source_raw != "replay" {
        return HttpResponse::NotFound().body("replay upsert is only valid for the replay source");
    }
    let hand: ID<Hand> = ID::from(hand_id);
    let now = now_ms();
    for raw in &body.events {
        let event = match LedgerEvent::new(
            Source::Replay,
            "",
            hand,
            raw.seq,
            raw.event_type.clone(),
            raw.envelope_b64.clone(),
            raw.server_ts_ms.unwrap_or(now),
        ) {
            Ok(event) => event,
            Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
        };
        if let Err(e) = db.append(&event).await {
            return HttpResponse::InternalServerError().body(e.to_string());
        }
    }
    let item = felt_records::AuditHistoryItem::new(
        auth.user(),
        Source::Replay,
        hand,
        now,
        body.summary.to_string(),
    );
    match db.upsert_audit(&item).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "upserted" })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_sources_only() {
        assert_eq!(parse_source("live"), Some(Source::Live));
        assert_eq!(parse_source("replay"), Some(Source::Replay));
        assert_eq!(parse_source("sandbox"), None);
        assert_eq!(parse_source("bogus"), None);
    }
}
