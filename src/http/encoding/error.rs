use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth::envelope::ResponseBuilder;

use super::reply;

#[derive(Debug, Clone)]
pub enum ApiRejection {
    Unauthorized,
}

impl warp::reject::Reject for ApiRejection {}

pub async fn handle_reject(err: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(e) = err.find::<ApiRejection>() {
        match e {
            ApiRejection::Unauthorized => {
                let env = ResponseBuilder::failed()
                    .with_type_code(StatusCode::UNAUTHORIZED.as_u16())
                    .with_detail("Missing or invalid bearer token")
                    .build();
                return Ok(reply::envelope(env));
            }
        }
    }

    if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        let env = ResponseBuilder::failed()
            .with_type_code(StatusCode::BAD_REQUEST.as_u16())
            .with_detail(e.to_string())
            .build();
        return Ok(reply::envelope(env));
    }

    if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        let env = ResponseBuilder::failed()
            .with_type_code(StatusCode::BAD_REQUEST.as_u16())
            .with_detail("Request body must be application/json")
            .build();
        return Ok(reply::envelope(env));
    }

    Err(err)
}
