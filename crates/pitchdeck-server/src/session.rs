//! Cookie-keyed session store.
//!
//! Every browser gets its own [`Session`] behind its own async mutex, so one
//! user's requests run one at a time while different users never contend.
//! Sessions live only in process memory and are dropped by the idle sweeper
//! or on restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use pitchdeck_core::session::Session;

use crate::error::AppError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "pitchdeck_session";

/// One stored session plus its last-activity mark.
#[derive(Debug)]
pub struct SessionSlot {
    session: Mutex<Session>,
    /// Seconds since the store was created.
    last_seen: AtomicU64,
}

impl SessionSlot {
    /// Lock the session for the rest of the request.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Session> {
        self.session.lock().await
    }
}

/// In-memory map from session id to session.
#[derive(Debug)]
pub struct SessionStore {
    started: Instant,
    slots: RwLock<HashMap<Uuid, Arc<SessionSlot>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            slots: RwLock::new(HashMap::new()),
        }
    }

    fn now_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// Look up `id`, or start a fresh session if it is absent or unknown.
    ///
    /// The returned flag is `true` when a new session was created.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (SessionHandle, bool) {
        let now = self.now_secs();

        if let Some(id) = id {
            if let Some(slot) = self.slots.read().await.get(&id) {
                slot.last_seen.store(now, Ordering::Relaxed);
                return (
                    SessionHandle {
                        id,
                        slot: Arc::clone(slot),
                    },
                    false,
                );
            }
        }

        let id = Uuid::new_v4();
        let slot = Arc::new(SessionSlot {
            session: Mutex::new(Session::new()),
            last_seen: AtomicU64::new(now),
        });
        self.slots.write().await.insert(id, Arc::clone(&slot));
        debug!(session = %id, "session created");
        (SessionHandle { id, slot }, true)
    }

    /// Number of live sessions.
    pub async fn count(&self) -> usize {
        self.slots.read().await.len()
    }

    /// Drop sessions idle for longer than `max_idle`. Returns how many went.
    ///
    /// A session still referenced by an in-flight request is kept.
    pub async fn sweep(&self, max_idle: Duration) -> usize {
        self.sweep_at(self.now_secs(), max_idle).await
    }

    async fn sweep_at(&self, now: u64, max_idle: Duration) -> usize {
        let max_idle = max_idle.as_secs();
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|_, slot| {
            let idle = now.saturating_sub(slot.last_seen.load(Ordering::Relaxed));
            idle <= max_idle || Arc::strong_count(slot) > 1
        });
        before.saturating_sub(slots.len())
    }
}

/// The current request's session, injected by [`session_middleware`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub id: Uuid,
    slot: Arc<SessionSlot>,
}

impl SessionHandle {
    /// Lock the session. Held across the generation call, which serializes
    /// a user's requests.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Session> {
        self.slot.lock().await
    }
}

impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(AppError::SessionMissing)
    }
}

/// Middleware that attaches a [`SessionHandle`] to every request.
///
/// Reads the session cookie; when it is missing or names an unknown session,
/// a new session is created and the cookie is set on the response.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let requested = session_id_from_headers(req.headers());
    let (handle, created) = state.sessions.get_or_create(requested).await;
    let id = handle.id;
    req.extensions_mut().insert(handle);

    let mut resp = next.run(req).await;
    if created {
        if let Ok(value) = HeaderValue::from_str(&session_cookie(id, state.secure_cookies)) {
            resp.headers_mut().append(SET_COOKIE, value);
        }
    }
    resp
}

/// Extract the session id from the `Cookie` headers, if a valid one is present.
#[must_use]
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a session id.
#[must_use]
pub fn session_cookie(id: Uuid, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pitchdeck_core::session::View;

    use super::*;

    #[test]
    fn parses_cookie_among_others() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={id}; other=1")).unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn ignores_malformed_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("pitchdeck_session=not-a-uuid"));
        assert_eq!(session_id_from_headers(&headers), None);
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn cookie_is_http_only() {
        let cookie = session_cookie(Uuid::nil(), false);
        assert!(cookie.starts_with("pitchdeck_session=00000000-0000-0000-0000-000000000000;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn secure_flag_is_appended() {
        let cookie = session_cookie(Uuid::nil(), true);
        assert!(cookie.ends_with("; Secure"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn unknown_id_gets_fresh_session() {
        let store = SessionStore::new();
        let (handle, created) = store.get_or_create(Some(Uuid::new_v4())).await;
        assert!(created);
        assert_eq!(store.count().await, 1);

        let (again, created) = store.get_or_create(Some(handle.id)).await;
        assert!(!created);
        assert_eq!(again.id, handle.id);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new();
        let (a, _) = store.get_or_create(None).await;
        let (b, _) = store.get_or_create(None).await;
        assert_ne!(a.id, b.id);

        a.lock().await.navigate(View::Login);
        assert_eq!(a.lock().await.current_view(), View::Login);
        assert_eq!(b.lock().await.current_view(), View::Landing);
    }

    #[tokio::test]
    async fn sweep_drops_only_idle_unreferenced_sessions() {
        let store = SessionStore::new();
        let (held, _) = store.get_or_create(None).await;
        let (released, _) = store.get_or_create(None).await;
        let released_id = released.id;
        drop(released);

        assert_eq!(store.sweep_at(120, Duration::from_secs(60)).await, 1);
        let slots = store.slots.read().await;
        assert!(slots.contains_key(&held.id));
        assert!(!slots.contains_key(&released_id));
    }

    #[tokio::test]
    async fn sweep_keeps_recent_sessions() {
        let store = SessionStore::new();
        let _ = store.get_or_create(None).await;
        assert_eq!(store.sweep(Duration::from_secs(60)).await, 0);
        assert_eq!(store.count().await, 1);
    }
}
