use crate::dto::api_response::page_bounds;
use crate::dto::expense_dto::{CreateExpenseRequest, ExpenseFilter};
use crate::models::expense::Expense;
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, company_id: Uuid, request: &CreateExpenseRequest) -> Result<Expense, AppError> {
        let result = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (id, company_id, vehicle_id, category, amount, expense_date, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(request.vehicle_id)
        .bind(request.category.trim())
        .bind(request.amount)
        .bind(request.expense_date)
        .bind(&request.description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, company_id: Uuid, id: Uuid) -> Result<Option<Expense>, AppError> {
        let result = sqlx::query_as::<_, Expense>(
            "SELECT * FROM expenses WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn list(&self, company_id: Uuid, filter: &ExpenseFilter) -> Result<(Vec<Expense>, i64), AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM expenses");
        push_expense_filter(&mut count, company_id, filter);
        let (total,): (i64,) = count.build_query_as::<(i64,)>().fetch_one(&self.pool).await?;

        let (_, per_page, offset) = page_bounds(filter.page, filter.per_page);
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM expenses");
        push_expense_filter(&mut query, company_id, filter);
        query
            .push(" ORDER BY expense_date DESC, created_at DESC LIMIT ")
            .push_bind(per_page)
            .push(" OFFSET ")
            .push_bind(offset);

        let expenses = query.build_query_as::<Expense>().fetch_all(&self.pool).await?;

        Ok((expenses, total))
    }

    pub async fn update(&self, expense: &Expense) -> Result<Expense, AppError> {
        let result = sqlx::query_as::<_, Expense>(
            r#"
            UPDATE expenses
            SET vehicle_id = $3, category = $4, amount = $5, expense_date = $6, description = $7
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(expense.id)
        .bind(expense.company_id)
        .bind(expense.vehicle_id)
        .bind(&expense.category)
        .bind(expense.amount)
        .bind(expense.expense_date)
        .bind(&expense.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn push_expense_filter(builder: &mut QueryBuilder<'_, Postgres>, company_id: Uuid, filter: &ExpenseFilter) {
    builder.push(" WHERE company_id = ").push_bind(company_id);

    if let Some(vehicle_id) = filter.vehicle_id {
        builder.push(" AND vehicle_id = ").push_bind(vehicle_id);
    }
    if let Some(category) = &filter.category {
        builder.push(" AND LOWER(category) = LOWER(").push_bind(category.clone()).push(")");
    }
    if let Some(start) = filter.start_date {
        builder.push(" AND expense_date >= ").push_bind(start);
    }
    if let Some(end) = filter.end_date {
        builder.push(" AND expense_date <= ").push_bind(end);
    }
}
