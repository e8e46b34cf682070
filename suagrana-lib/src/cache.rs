use std::time::{Duration, Instant};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::web::Data;
use actix_web::{Error, HttpMessage};
use dashmap::DashMap;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::user::Principal;

struct CacheEntry<V> {
    value: V,
    inserted: Instant,
    tags: Vec<String>,
}

/// Concurrent string keyed cache whose entries expire after a fixed time to live.
///
/// Entries carry tags so that groups of them can be dropped together.
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    max_entries: usize,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries,
        }
    }

    /// The cached value, unless it has expired. Expired entries are removed.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let ttl = self.ttl;
        let expired = match self.entries.get(key) {
            Some(entry) if now.duration_since(entry.inserted) < ttl => {
                return Some(entry.value.clone())
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries
                .remove_if(key, |_, entry| now.duration_since(entry.inserted) >= ttl);
        }
        None
    }

    pub fn insert(&self, key: String, value: V, tags: Vec<String>) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted: Instant::now(),
                tags,
            },
        );

        if self.entries.len() > self.max_entries {
            self.gc();
        }
    }

    pub fn invalidate_tag(&self, tag: &str) {
        self.entries
            .retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
    }

    pub fn invalidate_prefix(&self, prefix: &str) {
        self.entries.retain(|key, _| !key.starts_with(prefix));
    }

    /// Drops expired entries, then the oldest ones while still over `max_entries`.
    pub fn gc(&self) {
        let now = Instant::now();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.duration_since(entry.inserted) < ttl);

        if self.entries.len() > self.max_entries {
            let mut entries: Vec<(String, Instant)> = self
                .entries
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().inserted))
                .collect();
            entries.sort_by(|a, b| a.1.cmp(&b.1));

            let excess = self.entries.len().saturating_sub(self.max_entries);
            for (key, _) in entries.into_iter().take(excess) {
                self.entries.remove(&key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub type ReportCache = TtlCache<serde_json::Value>;

/// Tag shared by every cached report of a tenant.
pub fn report_tag(tenant: &str) -> String {
    format!("reports:{}", tenant)
}

/// Drops the tenant's cached reports after every successful request that is not a read.
pub struct InvalidateReports;

impl<S, B> Transform<S, ServiceRequest> for InvalidateReports
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = InvalidateReportsMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(InvalidateReportsMiddleware { service }))
    }
}

pub struct InvalidateReportsMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for InvalidateReportsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let is_write = !matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS);
        let cache = req.app_data::<Data<ReportCache>>().cloned();
        let tenant = req
            .extensions()
            .get::<Principal>()
            .map(|principal| principal.tenant_id.clone());

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            if is_write && res.status().is_success() {
                if let (Some(cache), Some(tenant)) = (cache, tenant) {
                    debug!(%tenant, "Invalidating cached reports");
                    cache.invalidate_tag(&report_tag(&tenant));
                }
            }
            Ok(res)
        })
    }
}
