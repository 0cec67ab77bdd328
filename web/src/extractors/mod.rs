pub(crate) mod recipient;

use axum::http::StatusCode;

type RejectionType = (StatusCode, String);
