use std::sync::{Arc, Mutex};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::HttpMessage;
use async_trait::async_trait;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use suagrana_lib::user::Principal;
use suagrana_repo::user_repo::{Tenant, User, UserRepo, UserRepoError};

/// Authenticates every request as `principal`.
pub struct MockAuthentication {
    pub principal: Principal,
}

impl<S, B> Transform<S, ServiceRequest> for MockAuthentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = MockAuthenticationMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MockAuthenticationMiddleware {
            service,
            principal: self.principal.clone(),
        }))
    }
}

pub struct MockAuthenticationMiddleware<S> {
    service: S,
    principal: Principal,
}

impl<S, B> Service<ServiceRequest> for MockAuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        req.extensions_mut()
            .insert::<Principal>(self.principal.clone());
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}

/// Passes calls through to `inner`, except that every user already exists when it is created.
/// Remembers the tenants it was asked to create.
pub struct ConflictingUserRepo {
    pub inner: Arc<dyn UserRepo>,
    pub created_tenants: Mutex<Vec<String>>,
}

#[async_trait]
impl UserRepo for ConflictingUserRepo {
    async fn get_user(&self, user_id: &str) -> Result<User, UserRepoError> {
        self.inner.get_user(user_id).await
    }

    async fn create_user(&self, user: User) -> Result<(), UserRepoError> {
        Err(UserRepoError::UserAlreadyExists(user.id))
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<(), UserRepoError> {
        self.inner.update_password_hash(user_id, password_hash).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), UserRepoError> {
        self.inner.delete_user(user_id).await
    }

    async fn create_tenant(&self, tenant: Tenant) -> Result<(), UserRepoError> {
        self.created_tenants.lock().unwrap().push(tenant.id.clone());
        self.inner.create_tenant(tenant).await
    }

    async fn get_tenant(&self, tenant_id: &str) -> Result<Tenant, UserRepoError> {
        self.inner.get_tenant(tenant_id).await
    }

    async fn delete_tenant(&self, tenant_id: &str) -> Result<(), UserRepoError> {
        self.inner.delete_tenant(tenant_id).await
    }
}
