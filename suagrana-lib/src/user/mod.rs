pub mod handlers;

use actix_web::{web, Scope};
use serde::{Deserialize, Serialize};

pub type UserId = String;
pub type TenantId = String;

/// The authenticated caller. Every `/api` handler scopes its queries by `tenant_id`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Principal {
    pub user_id: UserId,
    pub tenant_id: TenantId,
}

impl Principal {
    pub fn new(user_id: UserId, tenant_id: TenantId) -> Principal {
        Principal { user_id, tenant_id }
    }
}

pub fn user_service() -> Scope {
    web::scope("/user")
        .service(handlers::get_profile)
        .service(handlers::update_password)
        .service(handlers::delete_user)
        .service(handlers::add_member)
}
