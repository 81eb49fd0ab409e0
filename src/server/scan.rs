//! Receipt-scan draft endpoint.

use crate::{
    core::scan,
    entities::user,
    server::{ApiResponse, ServerState, ok},
};
use axum::{Extension, Json, extract::State};

/// Accepts the raw scanner payload and returns a pre-filled draft. Parsing
/// is best-effort; unusable payloads yield an empty draft, never an error.
pub async fn draft(
    Extension(_user): Extension<user::Model>,
    State(_state): State<ServerState>,
    payload: String,
) -> Json<ApiResponse<scan::EntryDraft>> {
    ok("draft parsed", scan::parse_draft(&payload))
}
