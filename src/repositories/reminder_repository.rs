use crate::dto::reminder_dto::ReminderFilter;
use crate::models::reminder::{Reminder, ReminderAcknowledgement};
use crate::utils::errors::AppError;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub struct ReminderRepository {
    pool: PgPool,
}

impl ReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, reminder: &Reminder) -> Result<Reminder, AppError> {
        let result = sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (
                id, company_id, vehicle_id, reminder_type, title, start_date,
                frequency, custom_interval, next_due_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(reminder.id)
        .bind(reminder.company_id)
        .bind(reminder.vehicle_id)
        .bind(reminder.reminder_type)
        .bind(&reminder.title)
        .bind(reminder.start_date)
        .bind(reminder.frequency)
        .bind(reminder.custom_interval)
        .bind(reminder.next_due_date)
        .bind(reminder.created_at)
        .bind(reminder.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, company_id: Uuid, id: Uuid) -> Result<Option<Reminder>, AppError> {
        let result = sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn lock(
        conn: &mut PgConnection,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Reminder>, AppError> {
        let result = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT * FROM reminders
            WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(conn)
        .await?;

        Ok(result)
    }

    pub async fn list(&self, company_id: Uuid, filter: &ReminderFilter) -> Result<Vec<Reminder>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT * FROM reminders WHERE deleted_at IS NULL AND company_id = ",
        );
        query.push_bind(company_id);
        if let Some(vehicle_id) = filter.vehicle_id {
            query.push(" AND vehicle_id = ").push_bind(vehicle_id);
        }
        if let Some(reminder_type) = filter.reminder_type {
            query.push(" AND reminder_type = ").push_bind(reminder_type);
        }
        query.push(" ORDER BY next_due_date ASC, id");

        let result = query.build_query_as::<Reminder>().fetch_all(&self.pool).await?;

        Ok(result)
    }

    /// Recordatorios cuyo día de vencimiento (UTC) es hoy o anterior
    pub async fn list_due(&self, company_id: Uuid, today: NaiveDate) -> Result<Vec<Reminder>, AppError> {
        let result = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT * FROM reminders
            WHERE company_id = $1
              AND deleted_at IS NULL
              AND (next_due_date AT TIME ZONE 'UTC')::date <= $2
            ORDER BY next_due_date ASC, id
            "#,
        )
        .bind(company_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn update(conn: &mut PgConnection, reminder: &Reminder) -> Result<Reminder, AppError> {
        let result = sqlx::query_as::<_, Reminder>(
            r#"
            UPDATE reminders
            SET reminder_type = $2, title = $3, start_date = $4, frequency = $5,
                custom_interval = $6, next_due_date = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(reminder.id)
        .bind(reminder.reminder_type)
        .bind(&reminder.title)
        .bind(reminder.start_date)
        .bind(reminder.frequency)
        .bind(reminder.custom_interval)
        .bind(reminder.next_due_date)
        .fetch_one(conn)
        .await?;

        Ok(result)
    }

    pub async fn soft_delete(&self, company_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE reminders SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Borrado físico; el historial de confirmaciones cae en cascada
    pub async fn hard_delete(&self, company_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_acknowledgement(
        conn: &mut PgConnection,
        ack: &ReminderAcknowledgement,
    ) -> Result<ReminderAcknowledgement, AppError> {
        let result = sqlx::query_as::<_, ReminderAcknowledgement>(
            r#"
            INSERT INTO reminder_acknowledgements (id, reminder_id, user_id, acknowledged_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(ack.id)
        .bind(ack.reminder_id)
        .bind(ack.user_id)
        .bind(ack.acknowledged_at)
        .fetch_one(conn)
        .await?;

        Ok(result)
    }

    /// Historial de confirmaciones, la más reciente primero
    pub async fn history(&self, reminder_id: Uuid) -> Result<Vec<ReminderAcknowledgement>, AppError> {
        let result = sqlx::query_as::<_, ReminderAcknowledgement>(
            r#"
            SELECT * FROM reminder_acknowledgements
            WHERE reminder_id = $1
            ORDER BY acknowledged_at DESC, id
            "#,
        )
        .bind(reminder_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }
}
