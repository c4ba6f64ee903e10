use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::{page_bounds, ApiResponse, Paginated};
use crate::dto::expense_dto::{CreateExpenseRequest, ExpenseFilter, UpdateExpenseRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::expense::Expense;
use crate::repositories::expense_repository::ExpenseRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{not_found_error, AppError};

pub struct ExpenseController {
    repository: ExpenseRepository,
    vehicles: VehicleRepository,
}

impl ExpenseController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ExpenseRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateExpenseRequest,
    ) -> Result<ApiResponse<Expense>, AppError> {
        request.validate()?;
        if let Some(vehicle_id) = request.vehicle_id {
            self.ensure_vehicle(user, vehicle_id).await?;
        }

        let expense = self.repository.create(user.company_id, &request).await?;
        info!("🧾 Gasto {} de {} registrado ({})", expense.id, expense.amount, expense.category);

        Ok(ApiResponse::success_with_message(expense, "Expense recorded"))
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<Expense>, AppError> {
        let expense = self.find(user, id).await?;
        Ok(ApiResponse::success(expense))
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        filter: ExpenseFilter,
    ) -> Result<ApiResponse<Paginated<Expense>>, AppError> {
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            if end < start {
                return Err(AppError::BadRequest(
                    "end_date must not be before start_date".to_string(),
                ));
            }
        }

        let (page, per_page, _) = page_bounds(filter.page, filter.per_page);
        let (items, total) = self.repository.list(user.company_id, &filter).await?;

        Ok(ApiResponse::success(Paginated {
            items,
            total,
            page,
            per_page,
        }))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateExpenseRequest,
    ) -> Result<ApiResponse<Expense>, AppError> {
        request.validate()?;
        let mut expense = self.find(user, id).await?;

        if let Some(vehicle_id) = request.vehicle_id {
            if let Some(vehicle_id) = vehicle_id {
                self.ensure_vehicle(user, vehicle_id).await?;
            }
            expense.vehicle_id = vehicle_id;
        }
        if let Some(category) = request.category {
            expense.category = category.trim().to_string();
        }
        if let Some(amount) = request.amount {
            expense.amount = amount;
        }
        if let Some(expense_date) = request.expense_date {
            expense.expense_date = expense_date;
        }
        if let Some(description) = request.description {
            expense.description = description;
        }

        let expense = self.repository.update(&expense).await?;
        info!("✏️ Gasto {} actualizado", expense.id);

        Ok(ApiResponse::success_with_message(expense, "Expense updated"))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        user.require_admin("delete expenses")?;

        if !self.repository.delete(user.company_id, id).await? {
            return Err(not_found_error("Expense", &id.to_string()));
        }
        info!("🗑️ Gasto {} eliminado", id);

        Ok(ApiResponse::message("Expense deleted"))
    }

    async fn find(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Expense, AppError> {
        self.repository
            .find_by_id(user.company_id, id)
            .await?
            .ok_or_else(|| not_found_error("Expense", &id.to_string()))
    }

    async fn ensure_vehicle(&self, user: &AuthenticatedUser, vehicle_id: Uuid) -> Result<(), AppError> {
        self.vehicles
            .find_by_id(user.company_id, vehicle_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))
    }
}
