//! Recordatorios recurrentes por vehículo
//!
//! La confirmación inserta el registro de historial y rebasa el recordatorio
//! en la misma transacción.

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::reminder_dto::{
    AcknowledgeResponse, CreateReminderRequest, DeleteReminderQuery, ReminderFilter,
    UpdateReminderRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::reminder::{Reminder, ReminderAcknowledgement};
use crate::repositories::reminder_repository::ReminderRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::reminder_schedule::{
    apply_update, initial_next_due, rebase, Frequency, Schedule, ScheduleChange,
};
use crate::utils::errors::{not_found_error, AppError};

pub struct ReminderController {
    pool: PgPool,
    repository: ReminderRepository,
}

impl ReminderController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReminderRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateReminderRequest,
    ) -> Result<ApiResponse<Reminder>, AppError> {
        request.validate()?;
        let rule = Frequency::from_parts(request.frequency, request.custom_interval)?;

        VehicleRepository::new(self.pool.clone())
            .find_by_id(user.company_id, request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &request.vehicle_id.to_string()))?;

        let now = Utc::now();
        let reminder = Reminder {
            id: Uuid::new_v4(),
            company_id: user.company_id,
            vehicle_id: request.vehicle_id,
            reminder_type: request.reminder_type,
            title: request.title.trim().to_string(),
            start_date: request.start_date,
            frequency: request.frequency,
            custom_interval: rule.custom_interval(),
            next_due_date: initial_next_due(request.start_date, request.next_due_date),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let reminder = self.repository.insert(&reminder).await?;
        info!(
            "🔔 Recordatorio {} creado para el vehículo {}, vence {}",
            reminder.id, reminder.vehicle_id, reminder.next_due_date
        );

        Ok(ApiResponse::success_with_message(reminder, "Reminder created"))
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        filter: ReminderFilter,
    ) -> Result<ApiResponse<Vec<Reminder>>, AppError> {
        let reminders = self.repository.list(user.company_id, &filter).await?;
        Ok(ApiResponse::success(reminders))
    }

    /// Vencidos hoy o antes (fecha UTC)
    pub async fn due(&self, user: &AuthenticatedUser) -> Result<ApiResponse<Vec<Reminder>>, AppError> {
        let today = Utc::now().date_naive();
        let reminders = self.repository.list_due(user.company_id, today).await?;
        Ok(ApiResponse::success(reminders))
    }

    pub async fn acknowledge(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<ApiResponse<AcknowledgeResponse>, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut reminder = ReminderRepository::lock(&mut tx, user.company_id, id)
            .await?
            .ok_or_else(|| not_found_error("Reminder", &id.to_string()))?;
        let rule = Frequency::from_parts(reminder.frequency, reminder.custom_interval)?;

        let acknowledged_at = Utc::now();
        let acknowledgement = ReminderRepository::insert_acknowledgement(
            &mut tx,
            &ReminderAcknowledgement {
                id: Uuid::new_v4(),
                reminder_id: reminder.id,
                user_id: user.user_id,
                acknowledged_at,
            },
        )
        .await?;

        let rebased = rebase(rule, acknowledged_at)?;
        reminder.start_date = rebased.start_date;
        reminder.next_due_date = rebased.next_due_date;
        let reminder = ReminderRepository::update(&mut tx, &reminder).await?;
        tx.commit().await?;

        info!(
            "✅ Recordatorio {} confirmado por {}; próximo vencimiento {}",
            reminder.id, user.username, reminder.next_due_date
        );

        Ok(ApiResponse::success_with_message(
            AcknowledgeResponse {
                reminder,
                acknowledgement,
            },
            "Reminder acknowledged",
        ))
    }

    pub async fn history(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<ApiResponse<Vec<ReminderAcknowledgement>>, AppError> {
        let reminder = self
            .repository
            .find_by_id(user.company_id, id)
            .await?
            .ok_or_else(|| not_found_error("Reminder", &id.to_string()))?;

        let history = self.repository.history(reminder.id).await?;
        Ok(ApiResponse::success(history))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateReminderRequest,
    ) -> Result<ApiResponse<Reminder>, AppError> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        let mut reminder = ReminderRepository::lock(&mut tx, user.company_id, id)
            .await?
            .ok_or_else(|| not_found_error("Reminder", &id.to_string()))?;

        let schedule = apply_update(
            &Schedule {
                frequency: reminder.frequency,
                custom_interval: reminder.custom_interval,
                start_date: reminder.start_date,
                next_due_date: reminder.next_due_date,
            },
            &ScheduleChange {
                frequency: request.frequency,
                custom_interval: request.custom_interval,
                start_date: request.start_date,
                next_due_date: request.next_due_date,
            },
        )?;

        if let Some(reminder_type) = request.reminder_type {
            reminder.reminder_type = reminder_type;
        }
        if let Some(title) = request.title {
            reminder.title = title.trim().to_string();
        }
        reminder.frequency = schedule.frequency;
        reminder.custom_interval = schedule.custom_interval;
        reminder.start_date = schedule.start_date;
        reminder.next_due_date = schedule.next_due_date;

        let reminder = ReminderRepository::update(&mut tx, &reminder).await?;
        tx.commit().await?;

        info!("✏️ Recordatorio {} actualizado", reminder.id);

        Ok(ApiResponse::success_with_message(reminder, "Reminder updated"))
    }

    pub async fn delete(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        query: DeleteReminderQuery,
    ) -> Result<ApiResponse<()>, AppError> {
        user.require_admin("delete reminders")?;

        let deleted = if query.hard {
            self.repository.hard_delete(user.company_id, id).await?
        } else {
            self.repository.soft_delete(user.company_id, id).await?
        };
        if !deleted {
            return Err(not_found_error("Reminder", &id.to_string()));
        }

        info!("🗑️ Recordatorio {} eliminado (hard={})", id, query.hard);

        Ok(ApiResponse::message("Reminder deleted"))
    }
}
