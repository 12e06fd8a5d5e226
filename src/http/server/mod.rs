use std::net::SocketAddr;
use std::sync::Arc;

use warp::Filter;

use crate::core::types::AdminToken;
use crate::http::client::Transport;
use crate::provider::RevocationDispatcher;

mod endpoints;

use endpoints::revocation::revocation_endpoint;

use super::encoding::error::handle_reject;

#[derive(Debug)]
pub struct Server<T> {
    dispatcher: Arc<RevocationDispatcher<T>>,
    admin_token: AdminToken,
    api_token: Arc<String>,
}

impl<T: Transport + 'static> Server<T> {
    pub fn new(dispatcher: Arc<RevocationDispatcher<T>>, admin_token: AdminToken, api_token: String) -> Self {
        Self {
            dispatcher,
            admin_token,
            api_token: Arc::new(api_token),
        }
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        warp::path("revocation")
            .and(revocation_endpoint(
                Arc::clone(&self.dispatcher),
                self.admin_token.clone(),
                Arc::clone(&self.api_token),
            ))
            .recover(handle_reject)
    }

    pub async fn serve(self, addr: SocketAddr) {
        let routes = self.routes().with(warp::log("http-api"));
        tracing::info!(%addr, "Serving revocation API");
        warp::serve(routes).run(addr).await;
    }
}
