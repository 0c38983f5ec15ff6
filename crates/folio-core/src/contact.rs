//! Contact dispatch: validates a visitor's message and forwards it to the messaging webhook.
//! One POST per message, no retry; the caller shows the outcome to the visitor.

use serde::{Deserialize, Serialize};

use crate::config::WebhookConfig;
use crate::pages::html_escape;

pub const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("webhook credentials are not configured")]
    MissingCredentials,
    #[error("webhook request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook answered {0}")]
    Rejected(u16),
}

impl ContactError {
    /// Caused by the visitor's input rather than the delivery path.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ContactError::Invalid { .. })
    }
}

/// What the visitor typed into the footer form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::Invalid {
                field: "name",
                reason: "required",
            });
        }
        if self.email.trim().is_empty() {
            return Err(ContactError::Invalid {
                field: "email",
                reason: "required",
            });
        }
        if !looks_like_email(self.email.trim()) {
            return Err(ContactError::Invalid {
                field: "email",
                reason: "not an email address",
            });
        }
        let message = self.message.trim();
        if message.is_empty() {
            return Err(ContactError::Invalid {
                field: "message",
                reason: "required",
            });
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ContactError::Invalid {
                field: "message",
                reason: "too long",
            });
        }
        Ok(())
    }

    /// Message text for the chat, HTML parse mode.
    fn to_chat_text(&self) -> String {
        format!(
            "<b>New portfolio message</b>\n<b>Name:</b> {}\n<b>Email:</b> {}\n\n{}",
            html_escape(self.name.trim()),
            html_escape(self.email.trim()),
            html_escape(self.message.trim())
        )
    }
}

fn looks_like_email(s: &str) -> bool {
    let mut parts = s.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !s.chars().any(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        _ => false,
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: String,
    parse_mode: &'static str,
}

/// Forwards contact messages to the bot's `sendMessage` endpoint.
pub struct ContactDispatcher {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl ContactDispatcher {
    pub fn new(config: WebhookConfig) -> Result<Self, ContactError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_complete()
    }

    /// Validate and deliver. Succeeds only on a 2xx answer; the response body is ignored.
    pub async fn send(&self, msg: &ContactMessage) -> Result<(), ContactError> {
        msg.validate()?;

        let (Some(token), Some(chat_id)) = (self.config.bot_token.as_deref(), self.config.chat_id.as_deref())
        else {
            tracing::warn!("[CONTACT] Webhook credentials missing; message not delivered");
            return Err(ContactError::MissingCredentials);
        };

        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            token
        );
        let body = SendMessageRequest {
            chat_id,
            text: msg.to_chat_text(),
            parse_mode: "HTML",
        };

        // without_url: the bot token is part of the path.
        let res = self.client.post(&url).json(&body).send().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!(error = %e, "[CONTACT] Webhook unreachable");
            ContactError::Transport(e)
        })?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "[CONTACT] Webhook rejected message");
            return Err(ContactError::Rejected(status.as_u16()));
        }

        // Visitor details stay out of the logs.
        tracing::info!(chars = msg.message.trim().chars().count(), "[CONTACT] Message delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Hello <there>".into(),
        }
    }

    type Seen = Arc<Mutex<Vec<serde_json::Value>>>;

    /// Serves `/botTEST/sendMessage` with the given status and records request bodies.
    async fn mock_webhook(status: StatusCode) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let app = Router::new().route(
            "/botTEST/sendMessage",
            post(move |Json(body): Json<serde_json::Value>| {
                let recorder = Arc::clone(&recorder);
                async move {
                    recorder.lock().unwrap().push(body);
                    (status, "{}")
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    fn config(api_base: &str) -> WebhookConfig {
        WebhookConfig {
            bot_token: Some("TEST".into()),
            chat_id: Some("99".into()),
            api_base: api_base.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn validation() {
        assert!(message().validate().is_ok());
        let blank_name = ContactMessage { name: "  ".into(), ..message() };
        assert!(matches!(
            blank_name.validate(),
            Err(ContactError::Invalid { field: "name", .. })
        ));
        for bad in ["ada", "ada@", "@example.com", "ada@example", "a b@example.com", "a@b@c.com"] {
            let m = ContactMessage { email: bad.into(), ..message() };
            assert!(m.validate().unwrap_err().is_invalid_input(), "{}", bad);
        }
        let long = ContactMessage {
            message: "x".repeat(MAX_MESSAGE_CHARS + 1),
            ..message()
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn chat_text_is_escaped() {
        let text = message().to_chat_text();
        assert!(text.contains("Hello &lt;there&gt;"));
        assert!(text.contains("ada@example.com"));
    }

    #[tokio::test]
    async fn delivers_on_success() {
        let (base, seen) = mock_webhook(StatusCode::OK).await;
        let dispatcher = ContactDispatcher::new(config(&base)).unwrap();
        dispatcher.send(&message()).await.unwrap();
        let bodies = seen.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["chat_id"], "99");
        assert_eq!(bodies[0]["parse_mode"], "HTML");
        assert!(bodies[0]["text"].as_str().unwrap().contains("Ada"));
    }

    /// Collects formatted log output.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn delivery_log_leaves_out_visitor_details() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (base, _) = mock_webhook(StatusCode::OK).await;
        let dispatcher = ContactDispatcher::new(config(&base)).unwrap();
        dispatcher.send(&message()).await.unwrap();

        let out = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("[CONTACT] Message delivered"));
        assert!(!out.contains("Ada"));
        assert!(!out.contains("ada@example.com"));
    }

    #[tokio::test]
    async fn server_error_is_rejected_without_retry() {
        let (base, seen) = mock_webhook(StatusCode::INTERNAL_SERVER_ERROR).await;
        let dispatcher = ContactDispatcher::new(config(&base)).unwrap();
        let err = dispatcher.send(&message()).await.unwrap_err();
        assert!(matches!(err, ContactError::Rejected(500)));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() {
        let (base, seen) = mock_webhook(StatusCode::OK).await;
        let mut cfg = config(&base);
        cfg.chat_id = None;
        let dispatcher = ContactDispatcher::new(cfg).unwrap();
        assert!(!dispatcher.is_configured());
        let err = dispatcher.send(&message()).await.unwrap_err();
        assert!(matches!(err, ContactError::MissingCredentials));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_webhook_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let dispatcher = ContactDispatcher::new(config(&format!("http://{}", addr))).unwrap();
        let err = dispatcher.send(&message()).await.unwrap_err();
        assert!(matches!(err, ContactError::Transport(_)));
    }
}
