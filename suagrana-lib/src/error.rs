use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use suagrana_repo::account_repo::AccountRepoError;
use suagrana_repo::bill_repo::BillRepoError;
use suagrana_repo::budget_repo::BudgetRepoError;
use suagrana_repo::category_repo::CategoryRepoError;
use suagrana_repo::goal_repo::GoalRepoError;
use suagrana_repo::investment_repo::InvestmentRepoError;
use suagrana_repo::transaction_repo::{TransactionRepoError, ValidationError};
use suagrana_repo::user_repo::UserRepoError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::Conflict(_) => StatusCode::CONFLICT,
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerError::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let message = match self {
            HandlerError::Internal(e) => {
                error!(error = ?e, "Internal error");
                "Internal server error".to_owned()
            }
            e => e.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

impl From<UserRepoError> for HandlerError {
    fn from(e: UserRepoError) -> Self {
        match e {
            UserRepoError::UserNotFound(_) | UserRepoError::TenantNotFound(_) => {
                HandlerError::NotFound(e.to_string())
            }
            UserRepoError::UserAlreadyExists(_) => HandlerError::Conflict(e.to_string()),
            UserRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<AccountRepoError> for HandlerError {
    fn from(e: AccountRepoError) -> Self {
        match e {
            AccountRepoError::AccountNotFound(_) => HandlerError::NotFound(e.to_string()),
            AccountRepoError::AccountInUse(_) => HandlerError::Conflict(e.to_string()),
            AccountRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<CategoryRepoError> for HandlerError {
    fn from(e: CategoryRepoError) -> Self {
        match e {
            CategoryRepoError::CategoryNotFound(_) => HandlerError::NotFound(e.to_string()),
            CategoryRepoError::CategoryAlreadyExists(_) | CategoryRepoError::CategoryInUse(_) => {
                HandlerError::Conflict(e.to_string())
            }
            CategoryRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<TransactionRepoError> for HandlerError {
    fn from(e: TransactionRepoError) -> Self {
        match e {
            TransactionRepoError::TransactionNotFound(_) => HandlerError::NotFound(e.to_string()),
            TransactionRepoError::InvalidReference(_) => HandlerError::BadRequest(e.to_string()),
            TransactionRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<ValidationError> for HandlerError {
    fn from(e: ValidationError) -> Self {
        HandlerError::BadRequest(e.to_string())
    }
}

impl From<BudgetRepoError> for HandlerError {
    fn from(e: BudgetRepoError) -> Self {
        match e {
            BudgetRepoError::BudgetNotFound(_) => HandlerError::NotFound(e.to_string()),
            BudgetRepoError::CategoryNotFound(_) => HandlerError::BadRequest(e.to_string()),
            BudgetRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<GoalRepoError> for HandlerError {
    fn from(e: GoalRepoError) -> Self {
        match e {
            GoalRepoError::GoalNotFound(_) => HandlerError::NotFound(e.to_string()),
            GoalRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<InvestmentRepoError> for HandlerError {
    fn from(e: InvestmentRepoError) -> Self {
        match e {
            InvestmentRepoError::InvestmentNotFound(_) => HandlerError::NotFound(e.to_string()),
            InvestmentRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<BillRepoError> for HandlerError {
    fn from(e: BillRepoError) -> Self {
        match e {
            BillRepoError::BillNotFound(_) => HandlerError::NotFound(e.to_string()),
            BillRepoError::CategoryNotFound(_) => HandlerError::BadRequest(e.to_string()),
            BillRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<argon2::Error> for HandlerError {
    fn from(e: argon2::Error) -> Self {
        HandlerError::Internal(anyhow::Error::new(e).context("Password hashing failed"))
    }
}

impl From<jsonwebtoken::errors::Error> for HandlerError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        HandlerError::Internal(anyhow::Error::new(e).context("Unable to create token"))
    }
}

#[cfg(test)]
mod tests {
    use super::HandlerError;
    use actix_web::http::StatusCode;
    use actix_web::{body, ResponseError};
    use suagrana_repo::account_repo::AccountRepoError;
    use suagrana_repo::category_repo::CategoryRepoError;
    use suagrana_repo::transaction_repo::TransactionRepoError;

    #[actix_rt::test]
    async fn maps_repo_errors() {
        let e: HandlerError = AccountRepoError::AccountInUse(3).into();
        assert_eq!(StatusCode::CONFLICT, e.status_code());

        let e: HandlerError = CategoryRepoError::CategoryNotFound(3).into();
        assert_eq!(StatusCode::NOT_FOUND, e.status_code());

        let e: HandlerError = TransactionRepoError::InvalidReference("account 9".into()).into();
        assert_eq!(StatusCode::BAD_REQUEST, e.status_code());
    }

    #[actix_rt::test]
    async fn internal_error_hides_details() {
        let e = HandlerError::Internal(anyhow::anyhow!("connection refused"));
        let response = e.error_response();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());

        let body = body::to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!("Internal server error", body["error"]);
    }
}
