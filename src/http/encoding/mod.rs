pub mod error;
pub mod reply;

use std::sync::Arc;

use crate::core::types::BearerToken;
use subtle::ConstantTimeEq;
use warp::{Filter, Rejection};

use self::error::ApiRejection;

pub fn bearer() -> impl Filter<Extract = (BearerToken,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(|s: Option<String>| async move {
        match s.as_deref().and_then(|s| s.split_once("Bearer ")) {
            Some(("", token)) if !token.is_empty() => Ok(BearerToken(token.to_string())),
            _ => Err(warp::reject::custom(ApiRejection::Unauthorized)),
        }
    })
}

/// Passes only requests presenting `expected` as their bearer token.
pub fn authorized(expected: Arc<String>) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    bearer()
        .and_then(move |token: BearerToken| {
            let expected = Arc::clone(&expected);
            async move {
                let (given, wanted) = (token.0.as_bytes(), expected.as_bytes());
                if given.len() == wanted.len() && bool::from(given.ct_eq(wanted)) {
                    Ok(())
                } else {
                    Err(warp::reject::custom(ApiRejection::Unauthorized))
                }
            }
        })
        .untuple_one()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn passes(header: Option<&str>) -> bool {
        let mut req = warp::test::request();
        if let Some(h) = header {
            req = req.header("authorization", h);
        }
        req.filter(&authorized(Arc::new("api-secret".to_string()))).await.is_ok()
    }

    #[tokio::test]
    async fn only_exact_token_is_authorized() {
        assert!(passes(Some("Bearer api-secret")).await);
        assert!(!passes(Some("Bearer api-secre")).await);
        assert!(!passes(Some("Bearer api-secret2")).await);
        assert!(!passes(Some("Bearer API-SECRET")).await);
        assert!(!passes(Some("Bearer ")).await);
        assert!(!passes(Some("api-secret")).await);
        assert!(!passes(None).await);
    }
}
