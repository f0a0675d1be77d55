use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session key holding the pending notice queue.
const FLASH_KEY: &str = "flash.pending";

/// Level
///
/// The two notice channels. `Error` carries rejection and failure text,
/// `Success` carries confirmation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Error,
    Success,
}

/// Notice
///
/// A single transient, read-once message queued for the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    /// Template helper: notices render with a CSS class per channel.
    pub fn css_class(&self) -> &'static str {
        match self.level {
            Level::Error => "flash-error",
            Level::Success => "flash-success",
        }
    }
}

/// Flash
///
/// Session-scoped flash queue. `push` appends to the pending queue; `drain_all`
/// returns and clears every pending notice, to be called exactly once per
/// render, immediately before producing the response body. The session store
/// serializes access per session id, so push/drain never interleave across
/// concurrent requests for the same browser.
#[derive(Clone)]
pub struct Flash {
    session: Session,
}

impl Flash {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Appends a notice to the pending queue. Storage failures are logged and
    /// swallowed: losing a notice must never fail the request that queued it.
    pub async fn push(&self, level: Level, message: impl Into<String>) {
        let mut pending: Vec<Notice> = self
            .session
            .get(FLASH_KEY)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        pending.push(Notice {
            level,
            message: message.into(),
        });
        if let Err(e) = self.session.insert(FLASH_KEY, &pending).await {
            tracing::error!("flash push error: {:?}", e);
        }
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.push(Level::Error, message).await;
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.push(Level::Success, message).await;
    }

    /// Returns and clears every pending notice. The removal is atomic with the
    /// read, so a second call within the same request cycle returns empty.
    pub async fn drain_all(&self) -> Vec<Notice> {
        match self.session.remove::<Vec<Notice>>(FLASH_KEY).await {
            Ok(pending) => pending.unwrap_or_default(),
            Err(e) => {
                tracing::error!("flash drain error: {:?}", e);
                Vec::new()
            }
        }
    }
}

/// Extractor form, so handlers can take `flash: Flash` directly.
impl<S> axum::extract::FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The session layer wraps every route; a missing extension only happens
        // in a misassembled router, where a detached session is a safe fallback.
        let session = parts.extensions.get::<Session>().cloned().unwrap_or_else(|| {
            Session::new(
                None,
                std::sync::Arc::new(tower_sessions::MemoryStore::default()),
                None,
            )
        });
        Ok(Flash::new(session))
    }
}
