use crate::error::HandlerError;
use crate::user::Principal;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder, Scope};
use std::sync::Arc;
use suagrana_repo::category_repo::{CategoryRepo, NewCategory};

pub fn category_service() -> Scope {
    web::scope("/categories")
        .service(create_category)
        .service(get_all_categories)
        .service(update_category)
        .service(delete_category)
}

#[post("")]
async fn create_category(
    category_repo: web::Data<Arc<dyn CategoryRepo>>,
    principal: web::ReqData<Principal>,
    new_category: web::Json<NewCategory>,
) -> Result<impl Responder, HandlerError> {
    let category = category_repo
        .create_category(&principal.tenant_id, new_category.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

#[get("")]
async fn get_all_categories(
    category_repo: web::Data<Arc<dyn CategoryRepo>>,
    principal: web::ReqData<Principal>,
) -> Result<impl Responder, HandlerError> {
    let categories = category_repo
        .get_all_categories(&principal.tenant_id)
        .await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[put("/{category_id}")]
async fn update_category(
    category_repo: web::Data<Arc<dyn CategoryRepo>>,
    principal: web::ReqData<Principal>,
    category_id: web::Path<i32>,
    updated_category: web::Json<NewCategory>,
) -> Result<impl Responder, HandlerError> {
    let category = category_repo
        .update_category(
            &principal.tenant_id,
            category_id.into_inner(),
            updated_category.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

#[delete("/{category_id}")]
async fn delete_category(
    category_repo: web::Data<Arc<dyn CategoryRepo>>,
    principal: web::ReqData<Principal>,
    category_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let category = category_repo
        .delete_category(&principal.tenant_id, category_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(category))
}
