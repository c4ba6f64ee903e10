use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;

use crate::dto::api_response::ApiResponse;
use crate::dto::revenue_dto::{RevenueQuery, RevenueReport};
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::revenue_repository::RevenueRepository;
use crate::services::revenue::resolve;
use crate::utils::errors::AppError;

pub struct RevenueController {
    repository: RevenueRepository,
}

impl RevenueController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RevenueRepository::new(pool),
        }
    }

    /// Ingresos, gastos y neto de la ventana pedida
    pub async fn report(
        &self,
        user: &AuthenticatedUser,
        query: RevenueQuery,
    ) -> Result<ApiResponse<RevenueReport>, AppError> {
        let window = resolve(
            query.period.unwrap_or_default(),
            query.date,
            query.start_date,
            query.end_date,
            Utc::now().date_naive(),
        )?;
        let recognize_at = query.recognize_at.unwrap_or_default();

        let (revenue, sale_count) = self
            .repository
            .revenue(user.company_id, &window, recognize_at)
            .await?;
        let expenses = self.repository.expenses(user.company_id, &window).await?;

        debug!(
            "📊 Ingresos {}..{} ({:?}): {} - {} gastos",
            window.start, window.end, recognize_at, revenue, expenses
        );

        Ok(ApiResponse::success(RevenueReport {
            start_date: window.start,
            end_date: window.end,
            recognize_at,
            revenue,
            expenses,
            net: revenue - expenses,
            sale_count,
        }))
    }
}
