use crate::errors::AppError;
use crate::services::employee::EmployeeService;
use crate::store::{RemoteStore, StoreFactory};
use crate::views::dashboard::Dashboard;
use actix_web::HttpRequest;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedMutexGuard};

pub const MAX_SESSIONS: usize = 1024;
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct Session {
    dashboard: Arc<Mutex<Dashboard>>,
    last_seen: Instant,
}

/// Shared across workers: the backend handle and one dashboard per signed-in caller.
pub struct AppState<F: StoreFactory> {
    stores: F,
    sessions: Mutex<HashMap<String, Session>>,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl<F: StoreFactory> AppState<F> {
    pub fn new(stores: F) -> Self {
        Self::with_limits(stores, MAX_SESSIONS, SESSION_IDLE_TIMEOUT)
    }

    pub fn with_limits(stores: F, max_sessions: usize, idle_timeout: Duration) -> Self {
        AppState {
            stores,
            sessions: Mutex::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
            idle_timeout,
        }
    }

    pub fn service(&self, access_token: &str) -> EmployeeService<F::Store> {
        EmployeeService::new(self.stores.session(Some(access_token)))
    }

    /// Number of dashboards currently held.
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Existing sessions are reused. A new one is opened only once the auth
    /// service recognizes the token; idle sessions expire and the oldest is
    /// evicted when the table is full.
    async fn dashboard(
        &self,
        access_token: &str,
        service: &EmployeeService<F::Store>,
    ) -> Result<Arc<Mutex<Dashboard>>, AppError> {
        {
            let mut sessions = self.sessions.lock().await;
            let now = Instant::now();
            sessions.retain(|_, session| now.duration_since(session.last_seen) < self.idle_timeout);
            if let Some(session) = sessions.get_mut(access_token) {
                session.last_seen = now;
                return Ok(Arc::clone(&session.dashboard));
            }
        }

        if service.store().current_user().await?.is_none() {
            warn!("Rejected dashboard request with an unrecognized token");
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }

        let mut sessions = self.sessions.lock().await;
        if !sessions.contains_key(access_token) && sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, session)| session.last_seen)
                .map(|(token, _)| token.clone());
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
                info!("Evicted the least recently used dashboard session");
            }
        }

        let session = sessions
            .entry(access_token.to_string())
            .or_insert_with(|| Session {
                dashboard: Arc::new(Mutex::new(Dashboard::new())),
                last_seen: Instant::now(),
            });
        session.last_seen = Instant::now();
        Ok(Arc::clone(&session.dashboard))
    }
}

pub fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    req.headers()
        .get("Authorization")
        .and_then(|auth| auth.to_str().ok())
        .and_then(|auth| auth.split_whitespace().nth(1))
        .ok_or_else(|| AppError::Unauthorized("Missing token".to_string()))
}

/// Resolves the caller's dashboard, loading the list on first visit. The
/// guard is held for the whole request, so one caller's actions run in order.
pub async fn open_dashboard<F: StoreFactory>(
    req: &HttpRequest,
    state: &AppState<F>,
) -> Result<(EmployeeService<F::Store>, OwnedMutexGuard<Dashboard>), AppError> {
    let token = bearer_token(req)?;
    let service = state.service(token);
    let mut dashboard = state.dashboard(token, &service).await?.lock_owned().await;
    dashboard.ensure_active(&service).await;
    Ok((service, dashboard))
}
