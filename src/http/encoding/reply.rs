use warp::http::StatusCode;
use warp::reply::{Reply, Response};

use crate::auth::envelope::{ResponseBuilder, ResultEnvelope};
use crate::provider::error::DispatchError;

/// JSON envelope with the HTTP status taken from its type code.
pub fn envelope(env: ResultEnvelope) -> Response {
    let status = env
        .type_code
        .and_then(|c| StatusCode::from_u16(c).ok())
        .unwrap_or(StatusCode::OK);
    warp::reply::with_status(warp::reply::json(&env), status).into_response()
}

pub fn dispatch_result(result: Result<(), DispatchError>) -> Response {
    match result {
        Ok(()) => envelope(
            ResponseBuilder::success()
                .with_type_code(StatusCode::OK.as_u16())
                .build(),
        ),
        Err(e) => envelope(e.to_envelope()),
    }
}
