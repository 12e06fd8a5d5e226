use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::auth::envelope::{ResponseBuilder, ResultEnvelope};
use crate::auth::revocation::RevocationApiRequest;
use crate::core::types::AdminToken;
use crate::http::client::{ClientConfig, HttpsTransport};
use crate::http::server::Server;
use crate::provider::error::DispatchError;
use crate::provider::{DispatchConfig, RevocationDispatcher};

/// Settings shared by everything that talks to resource servers.
#[derive(Args, Debug)]
pub struct ResourceServerOptions {
    #[clap(long, env = "RS_ADMIN_TOKEN", hide_env_values = true)]
    admin_token: AdminToken,
    #[clap(long, env = "RS_REVOKE_PATH", default_value = crate::provider::DEFAULT_REVOCATION_PATH)]
    revoke_path: String,
    #[clap(long, env = "RS_TOKEN_HEADER", default_value = crate::http::client::DEFAULT_TOKEN_HEADER)]
    token_header: String,
    #[clap(long, env = "RS_REQUEST_TIMEOUT_SECS", default_value = "10")]
    request_timeout_secs: u64,
    #[clap(long, env = "RS_CONNECT_TIMEOUT_SECS", default_value = "5")]
    connect_timeout_secs: u64,
    #[clap(long, env = "RS_MAX_BODY_BYTES", default_value = "65536")]
    max_body_bytes: usize,
}

impl ResourceServerOptions {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            token_header: self.token_header.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            max_body_bytes: self.max_body_bytes,
        }
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig::new(&self.revoke_path)
    }

    pub fn admin_token(&self) -> &AdminToken {
        &self.admin_token
    }

    pub fn dispatcher(&self) -> Result<RevocationDispatcher<HttpsTransport>, DispatchError> {
        let transport = HttpsTransport::new(&self.client_config())?;
        Ok(RevocationDispatcher::new(transport, self.dispatch_config()))
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "torikeshid",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct ServerOptions {
    #[clap(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8001")]
    listen_addr: SocketAddr,
    #[clap(long, env = "API_TOKEN", hide_env_values = true)]
    api_token: String,
    #[clap(flatten)]
    rs: ResourceServerOptions,
}

pub async fn run_server(opts: ServerOptions) -> Result<(), DispatchError> {
    let dispatcher = Arc::new(opts.rs.dispatcher()?);
    let server = Server::new(dispatcher, opts.rs.admin_token().clone(), opts.api_token);
    server.serve(opts.listen_addr).await;
    Ok(())
}

#[derive(Parser, Debug)]
#[clap(
    name = "torikeshi-util",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct Options {
    #[clap(flatten)]
    rs: ResourceServerOptions,
    #[clap(subcommand)]
    command: SubCommand,
}

#[derive(Subcommand, Debug)]
enum SubCommand {
    Revoke(Revoke),
}

/// Revoke one user's tokens at one resource server.
#[derive(Args, Debug)]
struct Revoke {
    #[clap(short, long)]
    rs_url: String,
    #[clap(short, long)]
    port: Option<u16>,
    #[clap(short, long)]
    user_id: String,
}

async fn revoke(c: &Revoke, opts: &Options) -> ResultEnvelope {
    let request = RevocationApiRequest {
        rs_url: c.rs_url.clone(),
        port: c.port,
        user_id: c.user_id.clone(),
    };

    let result = match (request.into_request(opts.rs.admin_token().clone()), opts.rs.dispatcher()) {
        (Ok(request), Ok(dispatcher)) => dispatcher.try_submit_revocation(&request).await,
        (Err(e), _) | (_, Err(e)) => Err(e),
    };

    match result {
        Ok(()) => ResponseBuilder::success().with_type_code(200).build(),
        Err(e) => e.to_envelope(),
    }
}

pub async fn run_cli_action(opts: Options) -> ResultEnvelope {
    match &opts.command {
        SubCommand::Revoke(c) => revoke(c, &opts).await,
    }
}
