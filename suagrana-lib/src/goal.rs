use crate::error::HandlerError;
use crate::user::Principal;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder, Scope};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use suagrana_repo::goal_repo::{Goal, GoalRepo, NewGoal};

pub fn goal_service() -> Scope {
    web::scope("/goals")
        .service(create_goal)
        .service(get_all_goals)
        .service(get_goal)
        .service(update_goal)
        .service(delete_goal)
        .service(contribute)
}

/// A goal together with how far along it is.
#[derive(Serialize, Deserialize, PartialEq, Debug)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: Decimal,
    pub achieved: bool,
}

impl From<Goal> for GoalView {
    fn from(goal: Goal) -> Self {
        GoalView {
            progress: goal.progress(),
            achieved: goal.achieved(),
            goal,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct Contribution {
    pub amount: Decimal,
}

#[post("")]
async fn create_goal(
    goal_repo: web::Data<Arc<dyn GoalRepo>>,
    principal: web::ReqData<Principal>,
    new_goal: web::Json<NewGoal>,
) -> Result<impl Responder, HandlerError> {
    let goal = goal_repo
        .create_goal(&principal.tenant_id, new_goal.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(GoalView::from(goal)))
}

#[get("")]
async fn get_all_goals(
    goal_repo: web::Data<Arc<dyn GoalRepo>>,
    principal: web::ReqData<Principal>,
) -> Result<impl Responder, HandlerError> {
    let goals: Vec<GoalView> = goal_repo
        .get_all_goals(&principal.tenant_id)
        .await?
        .into_iter()
        .map(GoalView::from)
        .collect();
    Ok(HttpResponse::Ok().json(goals))
}

#[get("/{goal_id}")]
async fn get_goal(
    goal_repo: web::Data<Arc<dyn GoalRepo>>,
    principal: web::ReqData<Principal>,
    goal_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let goal = goal_repo
        .get_goal(&principal.tenant_id, goal_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(GoalView::from(goal)))
}

#[put("/{goal_id}")]
async fn update_goal(
    goal_repo: web::Data<Arc<dyn GoalRepo>>,
    principal: web::ReqData<Principal>,
    goal_id: web::Path<i32>,
    updated_goal: web::Json<NewGoal>,
) -> Result<impl Responder, HandlerError> {
    let goal = goal_repo
        .update_goal(
            &principal.tenant_id,
            goal_id.into_inner(),
            updated_goal.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(GoalView::from(goal)))
}

#[delete("/{goal_id}")]
async fn delete_goal(
    goal_repo: web::Data<Arc<dyn GoalRepo>>,
    principal: web::ReqData<Principal>,
    goal_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let goal = goal_repo
        .delete_goal(&principal.tenant_id, goal_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(GoalView::from(goal)))
}

/// Negative amounts withdraw from the goal.
#[post("/{goal_id}/contribute")]
async fn contribute(
    goal_repo: web::Data<Arc<dyn GoalRepo>>,
    principal: web::ReqData<Principal>,
    goal_id: web::Path<i32>,
    contribution: web::Json<Contribution>,
) -> Result<impl Responder, HandlerError> {
    let goal = goal_repo
        .contribute(
            &principal.tenant_id,
            goal_id.into_inner(),
            contribution.into_inner().amount,
        )
        .await?;
    Ok(HttpResponse::Ok().json(GoalView::from(goal)))
}
