use crate::auth::revocation::{RsRevocationRequest, RsRevocationResponse};
use crate::core::models::{RevocationOutcome, RevocationRequest};
use crate::core::types::RequestId;
use crate::http::client::Transport;
use crate::util::random::FromRandom;

use super::{error::DispatchError, RevocationDispatcher};

use tracing::{event, Level};

impl<T: Transport> RevocationDispatcher<T> {
    /// Makes exactly one revocation attempt and flattens every failure into
    /// the outcome's message.
    pub async fn submit_revocation(&self, request: &RevocationRequest) -> RevocationOutcome {
        self.try_submit_revocation(request).await.into()
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            request_id = %RequestId::from_random(),
            rs_host = %request.host().as_ref(),
            rs_port = request.port()
        )
    )]
    pub async fn try_submit_revocation(&self, request: &RevocationRequest) -> Result<(), DispatchError> {
        event!(Level::INFO, "Processing token revocation");

        let result = self.dispatch(request).await;
        match &result {
            Ok(()) => event!(Level::DEBUG, "Resource server revocation completed"),
            Err(e) => event!(
                Level::WARN,
                kind = e.kind(),
                error = %e,
                "Resource server revocation failed"
            ),
        }
        result
    }

    async fn dispatch(&self, request: &RevocationRequest) -> Result<(), DispatchError> {
        let url = self.revocation_url(request)?;
        let payload = serde_json::to_value(RsRevocationRequest {
            sub: request.user_id(),
        })
        .map_err(|e| DispatchError::InvalidRequest(e.to_string()))?;

        let response = self
            .transport
            .post_json(&url, request.admin_token(), &payload)
            .await?;

        if response.status != 200 {
            return Err(DispatchError::Protocol(format!(
                "Response status code was not 200 (got {})",
                response.status
            )));
        }
        if !response.is_json() {
            return Err(DispatchError::Protocol(format!(
                "Expected JSON response, got content type {}",
                response.content_type.as_deref().unwrap_or("<none>")
            )));
        }

        let body = match serde_json::from_slice::<serde_json::Value>(&response.body) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => return Err(DispatchError::Protocol("JSON response body is not an object".into())),
            Err(e) => return Err(DispatchError::Protocol(format!("Malformed JSON response: {}", e))),
        };
        let body: RsRevocationResponse = serde_json::from_value(serde_json::Value::Object(body))
            .map_err(|e| DispatchError::Protocol(format!("Malformed JSON response: {}", e)))?;

        if !body.is_success() {
            event!(Level::DEBUG, rs_type = body.kind(), "Unexpected response type");
            return Err(DispatchError::Semantic("Invalid type URN/type not in response".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use url::Url;

    use super::*;
    use crate::core::types::{AdminToken, ResourceServerHost, UserId};
    use crate::http::client::TransportResponse;
    use crate::provider::DispatchConfig;

    #[derive(Debug, Clone)]
    struct Seen {
        url: String,
        credential: String,
        body: serde_json::Value,
    }

    /// Replies with a canned response and counts every call.
    #[derive(Default)]
    struct ScriptedTransport {
        reply: Option<Result<TransportResponse, DispatchError>>,
        by_user: HashMap<String, TransportResponse>,
        calls: AtomicUsize,
        seen: Mutex<Vec<Seen>>,
    }

    impl ScriptedTransport {
        fn replying(reply: Result<TransportResponse, DispatchError>) -> Self {
            Self {
                reply: Some(reply),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn post_json(
            &self,
            url: &Url,
            credential: &AdminToken,
            body: &serde_json::Value,
        ) -> Result<TransportResponse, DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(Seen {
                url: url.to_string(),
                credential: credential.expose().to_string(),
                body: body.clone(),
            });
            tokio::task::yield_now().await;

            let sub = body["sub"].as_str().unwrap_or_default();
            if let Some(resp) = self.by_user.get(sub) {
                return Ok(resp.clone());
            }
            self.reply.clone().expect("no scripted reply")
        }
    }

    fn json_reply(status: u16, body: serde_json::Value) -> TransportResponse {
        TransportResponse {
            status,
            content_type: Some("application/json".into()),
            body: serde_json::to_vec(&body).unwrap(),
        }
    }

    fn request(user: &str) -> RevocationRequest {
        RevocationRequest::new(
            ResourceServerHost("rs.iudx.io".into()),
            UserId(user.into()),
            AdminToken::new("admin-token"),
        )
        .unwrap()
    }

    fn dispatcher(transport: ScriptedTransport) -> (RevocationDispatcher<Arc<ScriptedTransport>>, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        (
            RevocationDispatcher::new(Arc::clone(&transport), DispatchConfig::default()),
            transport,
        )
    }

    #[tokio::test]
    async fn success_sentinel_yields_success() {
        for kind in &["urn:dx:as:Success", "SUCCESS", "ok.success"] {
            let (d, t) = dispatcher(ScriptedTransport::replying(Ok(json_reply(
                200,
                serde_json::json!({"type": kind, "title": "Token revoked"}),
            ))));
            let outcome = d.submit_revocation(&request("u1")).await;
            assert!(outcome.succeeded(), "{} should succeed", kind);
            assert_eq!(outcome.failure_message(), None);
            assert_eq!(t.calls(), 1);
        }
    }

    #[tokio::test]
    async fn sends_sub_payload_with_credential_to_fixed_path() {
        let (d, t) = dispatcher(ScriptedTransport::replying(Ok(json_reply(
            200,
            serde_json::json!({"type": "urn:dx:rs:success"}),
        ))));
        let req = request("844e251b-574b-46e6-9247-f76f1f70a637").with_port(8443).unwrap();
        d.submit_revocation(&req).await;

        let seen = t.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "https://rs.iudx.io:8443/admin/revokeToken");
        assert_eq!(seen[0].credential, "admin-token");
        assert_eq!(seen[0].body, serde_json::json!({"sub": "844e251b-574b-46e6-9247-f76f1f70a637"}));
    }

    #[tokio::test]
    async fn missing_or_wrong_sentinel_is_semantic_failure() {
        let bodies = vec![
            serde_json::json!({}),
            serde_json::json!({"type": ""}),
            serde_json::json!({"type": "   "}),
            serde_json::json!({"type": "urn:dx:rs:failed"}),
            serde_json::json!({"type": "urn:dx:rs:successful"}),
            serde_json::json!({"type": 200}),
        ];
        for body in bodies {
            let (d, t) = dispatcher(ScriptedTransport::replying(Ok(json_reply(200, body.clone()))));
            let result = d.try_submit_revocation(&request("u1")).await;
            assert!(matches!(result, Err(DispatchError::Semantic(_))), "{} should fail", body);
            assert_eq!(t.calls(), 1);

            let outcome = d.submit_revocation(&request("u1")).await;
            assert_eq!(outcome.failure_message(), Some("Invalid type URN/type not in response"));
        }
    }

    #[tokio::test]
    async fn non_200_status_fails_regardless_of_body() {
        for status in &[201u16, 204, 400, 401, 404, 500] {
            let (d, t) = dispatcher(ScriptedTransport::replying(Ok(json_reply(
                *status,
                serde_json::json!({"type": "urn:dx:rs:success"}),
            ))));
            let result = d.try_submit_revocation(&request("u1")).await;
            assert!(matches!(result, Err(DispatchError::Protocol(_))));
            assert_eq!(t.calls(), 1);
        }
    }

    #[tokio::test]
    async fn non_json_content_type_fails_without_parsing() {
        let reply = TransportResponse {
            status: 200,
            content_type: Some("text/html".into()),
            body: b"<html>not json</html>".to_vec(),
        };
        let (d, _) = dispatcher(ScriptedTransport::replying(Ok(reply)));
        let result = d.try_submit_revocation(&request("u1")).await;
        match result {
            Err(DispatchError::Protocol(msg)) => assert!(msg.contains("text/html")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_json_body_is_protocol_failure() {
        let reply = TransportResponse {
            status: 200,
            content_type: Some("application/json".into()),
            body: b"[1, 2".to_vec(),
        };
        let (d, _) = dispatcher(ScriptedTransport::replying(Ok(reply)));
        let outcome = d.submit_revocation(&request("u1")).await;
        assert!(!outcome.succeeded());
        assert!(outcome.failure_message().unwrap().starts_with("Malformed JSON response"));
    }

    #[tokio::test]
    async fn non_object_json_body_is_protocol_failure() {
        let bodies = vec![
            serde_json::json!(["urn:dx:rs:success"]),
            serde_json::json!([]),
            serde_json::json!("urn:dx:rs:success"),
            serde_json::json!(null),
            serde_json::json!(200),
        ];
        for body in bodies {
            let (d, t) = dispatcher(ScriptedTransport::replying(Ok(json_reply(200, body.clone()))));
            let result = d.try_submit_revocation(&request("u1")).await;
            assert_eq!(
                result,
                Err(DispatchError::Protocol("JSON response body is not an object".into())),
                "{}",
                body
            );
            assert_eq!(t.calls(), 1);
        }
    }

    #[tokio::test]
    async fn transport_failure_is_reported_once() {
        let (d, t) = dispatcher(ScriptedTransport::replying(Err(DispatchError::Transport(
            "connection refused".into(),
        ))));
        let outcome = d.submit_revocation(&request("u1")).await;
        assert_eq!(outcome.failure_message(), Some("connection refused"));
        assert_eq!(t.calls(), 1);
    }

    #[tokio::test]
    async fn bad_host_never_reaches_transport() {
        let (d, t) = dispatcher(ScriptedTransport::default());
        let req = RevocationRequest::new(
            ResourceServerHost("rs.iudx.io/evil".into()),
            UserId("u1".into()),
            AdminToken::new("a"),
        )
        .unwrap();
        let result = d.try_submit_revocation(&req).await;
        assert!(matches!(result, Err(DispatchError::InvalidRequest(_))));
        assert_eq!(t.calls(), 0);
    }

    #[tokio::test]
    async fn concurrent_calls_resolve_independently() {
        let mut transport = ScriptedTransport::replying(Ok(json_reply(
            200,
            serde_json::json!({"type": "urn:dx:rs:error"}),
        )));
        for i in 0..32 {
            if i % 2 == 0 {
                transport.by_user.insert(
                    format!("user-{}", i),
                    json_reply(200, serde_json::json!({"type": "urn:dx:rs:success"})),
                );
            }
        }
        let (d, t) = dispatcher(transport);
        let d = Arc::new(d);

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let d = Arc::clone(&d);
                tokio::spawn(async move { (i, d.submit_revocation(&request(&format!("user-{}", i))).await) })
            })
            .collect();

        for handle in handles {
            let (i, outcome) = handle.await.unwrap();
            assert_eq!(outcome.succeeded(), i % 2 == 0, "user-{}", i);
        }
        assert_eq!(t.calls(), 32);
    }
}
