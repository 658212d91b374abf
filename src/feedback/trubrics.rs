//! Trubrics-style feedback logging over HTTP

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{FeedbackError, FeedbackEvent, FeedbackSink};
use crate::config::FeedbackConfig;
use crate::credentials::FeedbackCredentials;

/// Signs in with email/password, then posts thumbs feedback records
pub struct TrubricsSink {
    client: Client,
    auth_url: String,
    feedback_url: String,
    project: String,
    model: String,
    credentials: FeedbackCredentials,
    /// Bearer token from the last successful sign-in
    token: Mutex<Option<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
}

#[derive(Serialize)]
struct FeedbackRecord<'a> {
    project: &'a str,
    component: &'static str,
    model: &'a str,
    feedback_type: &'static str,
    prompt_id: Option<&'a str>,
    user_response: UserResponse<'a>,
    metadata: Metadata,
}

#[derive(Serialize)]
struct UserResponse<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    score: &'static str,
    text: Option<&'a str>,
}

#[derive(Serialize)]
struct Metadata {
    session_id: String,
}

impl TrubricsSink {
    pub fn new(config: &FeedbackConfig, credentials: FeedbackCredentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for feedback service")?;

        Ok(Self {
            client,
            auth_url: config.auth_url.clone(),
            feedback_url: config.feedback_url.clone(),
            project: config.project.clone(),
            model: config.model.clone(),
            credentials,
            token: Mutex::new(None),
        })
    }

    fn build_record<'a>(&'a self, event: &'a FeedbackEvent) -> FeedbackRecord<'a> {
        FeedbackRecord {
            project: &self.project,
            component: "default",
            model: &self.model,
            feedback_type: "thumbs",
            prompt_id: None,
            user_response: UserResponse {
                kind: "thumbs",
                score: event.rating.score(),
                text: event.comment.as_deref(),
            },
            metadata: Metadata {
                session_id: event.session_id.to_string(),
            },
        }
    }

    async fn sign_in(&self) -> Result<String, FeedbackError> {
        let response = self
            .client
            .post(&self.auth_url)
            .json(&SignInRequest {
                email: &self.credentials.email,
                password: &self.credentials.password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| FeedbackError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    FeedbackError::Auth(error_text)
                }
                _ => FeedbackError::Service {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let sign_in: SignInResponse = response
            .json()
            .await
            .map_err(|e| FeedbackError::Service {
                status: status.as_u16(),
                message: format!("unreadable sign-in response: {}", e),
            })?;
        Ok(sign_in.id_token)
    }
}

impl FeedbackSink for TrubricsSink {
    async fn record(&self, event: &FeedbackEvent) -> Result<(), FeedbackError> {
        let mut token = self.token.lock().await;
        let bearer = match token.as_ref() {
            Some(existing) => existing.clone(),
            None => {
                let fresh = self.sign_in().await?;
                tracing::debug!("Signed in to feedback service");
                *token = Some(fresh.clone());
                fresh
            }
        };

        let response = self
            .client
            .post(&self.feedback_url)
            .bearer_auth(&bearer)
            .json(&self.build_record(event))
            .send()
            .await
            .map_err(|e| FeedbackError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // Expired token; sign in again on the next attempt
            *token = None;
            return Err(FeedbackError::Auth("session token rejected".to_string()));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FeedbackError::Service {
                status: status.as_u16(),
                message: error_text,
            });
        }

        tracing::info!(
            session_id = %event.session_id,
            rating = %event.rating,
            project = %self.project,
            "Feedback sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Rating;
    use crate::http_stub::StubServer;
    use crate::session::SessionId;

    fn sink() -> TrubricsSink {
        TrubricsSink::new(
            &FeedbackConfig::default(),
            FeedbackCredentials {
                email: "me@example.com".to_string(),
                password: "secret".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_record_payload() {
        let sink = sink();
        let id = SessionId::next_after(None);
        let event = FeedbackEvent::new(id, Rating::Down, Some("too formal".into()));

        let json = serde_json::to_value(sink.build_record(&event)).unwrap();
        assert_eq!(json["project"], "Email Improver");
        assert_eq!(json["component"], "default");
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["feedback_type"], "thumbs");
        assert!(json["prompt_id"].is_null());
        assert_eq!(json["user_response"]["type"], "thumbs");
        assert_eq!(json["user_response"]["score"], "👎");
        assert_eq!(json["user_response"]["text"], "too formal");
        assert_eq!(json["metadata"]["session_id"], id.to_string());
    }

    fn stubbed_sink(server: &StubServer) -> TrubricsSink {
        let config = FeedbackConfig {
            auth_url: server.url("/auth"),
            feedback_url: server.url("/feedback"),
            timeout_secs: 5,
            ..FeedbackConfig::default()
        };
        TrubricsSink::new(
            &config,
            FeedbackCredentials {
                email: "me@example.com".to_string(),
                password: "secret".to_string(),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_rejected_token_forces_fresh_sign_in() {
        let server = StubServer::serve(vec![
            (200, r#"{"idToken": "tok-1"}"#),
            (401, ""),
            (200, r#"{"idToken": "tok-2"}"#),
            (200, "{}"),
            (200, "{}"),
        ]);
        let sink = stubbed_sink(&server);
        let event = FeedbackEvent::new(SessionId::next_after(None), Rating::Up, None);

        let first = sink.record(&event).await;
        assert!(matches!(first, Err(FeedbackError::Auth(_))));
        sink.record(&event).await.unwrap();
        sink.record(&event).await.unwrap();

        let requests = server.requests();
        let paths: Vec<&str> = requests.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            ["/auth", "/feedback", "/auth", "/feedback", "/feedback"]
        );
        assert_eq!(requests[1].authorization.as_deref(), Some("Bearer tok-1"));
        assert_eq!(requests[3].authorization.as_deref(), Some("Bearer tok-2"));
        assert_eq!(requests[4].authorization.as_deref(), Some("Bearer tok-2"));
        assert!(requests[0].body.contains("me@example.com"));
        assert!(requests[3].body.contains("👍"));
    }

    #[tokio::test]
    async fn test_sign_in_rejection_is_auth_error() {
        for status in [400, 401, 403] {
            let server = StubServer::serve(vec![(status, r#"{"error": "INVALID_PASSWORD"}"#)]);
            let sink = stubbed_sink(&server);
            let event = FeedbackEvent::new(SessionId::next_after(None), Rating::Down, None);

            let result = sink.record(&event).await;
            assert!(
                matches!(&result, Err(FeedbackError::Auth(m)) if m.contains("INVALID_PASSWORD")),
                "status {}: {:?}",
                status,
                result
            );
            // Nothing is posted without a token
            assert_eq!(server.requests().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_feedback_server_error_is_service_error() {
        let server = StubServer::serve(vec![(200, r#"{"idToken": "tok"}"#), (503, "down")]);
        let sink = stubbed_sink(&server);
        let event = FeedbackEvent::new(SessionId::next_after(None), Rating::Up, None);

        assert_eq!(
            sink.record(&event).await,
            Err(FeedbackError::Service {
                status: 503,
                message: "down".to_string()
            })
        );
    }

    #[test]
    fn test_sign_in_payload_uses_camel_case() {
        let json = serde_json::to_value(SignInRequest {
            email: "me@example.com",
            password: "secret",
            return_secure_token: true,
        })
        .unwrap();
        assert_eq!(json["returnSecureToken"], true);
        assert_eq!(json["email"], "me@example.com");
    }
}
