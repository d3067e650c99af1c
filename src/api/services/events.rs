//! Event ingestion endpoint `POST /events`

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::services::{EventService, RecordEventRequest};

use super::helpers::{created_response, error_from_analytics};
use super::types::EventCreated;

pub async fn post_event(
    service: web::Data<Arc<EventService>>,
    body: web::Json<RecordEventRequest>,
) -> HttpResponse {
    match service.record(body.into_inner()).await {
        Ok(event_id) => created_response(EventCreated { event_id }),
        Err(e) => error_from_analytics(&e),
    }
}
