use std::sync::Arc;

use warp::Filter;

use crate::auth::envelope::ResponseBuilder;
use crate::auth::revocation::RevocationApiRequest;
use crate::core::types::AdminToken;
use crate::http::client::Transport;
use crate::http::encoding::{self, reply};
use crate::provider::RevocationDispatcher;

pub fn revocation_endpoint<T: Transport + 'static>(
    dispatcher: Arc<RevocationDispatcher<T>>,
    admin_token: AdminToken,
    api_token: Arc<String>,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_dispatcher = warp::any().map(move || dispatcher.clone());
    let with_admin_token = warp::any().map(move || admin_token.clone());

    let revoke = warp::path("revoke")
        .and(warp::path::end())
        .and(warp::post())
        .and(encoding::authorized(api_token))
        .and(warp::body::json())
        .and(with_dispatcher)
        .and(with_admin_token)
        .and_then(
            |req: RevocationApiRequest, dispatcher: Arc<RevocationDispatcher<T>>, admin_token| async move {
                let result = match req.into_request(admin_token) {
                    Ok(request) => dispatcher.try_submit_revocation(&request).await,
                    Err(e) => Err(e),
                };
                Ok::<_, warp::Rejection>(reply::dispatch_result(result))
            },
        );

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| reply::envelope(ResponseBuilder::success().with_type_code(200).build()));

    warp::path("v1").and(revoke.or(health))
}
