//! Flota de la empresa y mantenimiento por kilometraje

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::{page_bounds, ApiResponse, Paginated};
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, ServicingOverview, ServicingRequest, UpdateVehicleRequest, VehicleFilter,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::vehicle::{Vehicle, VehicleServicing, VehicleStatus};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::servicing::{configure, evaluate, mark_serviced, ServicingState};
use crate::utils::errors::{conflict_error, not_found_error, validation_error, AppError};

pub struct VehicleController {
    pool: PgPool,
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        request.validate()?;
        if request.status == Some(VehicleStatus::Rented) {
            return Err(rented_is_managed_by_sales());
        }

        if self
            .repository
            .registration_exists(user.company_id, &request.registration_number, None)
            .await?
        {
            return Err(conflict_error(
                "Vehicle",
                "registration_number",
                &request.registration_number,
            ));
        }

        let vehicle = self.repository.create(user.company_id, &request).await?;
        info!("🚙 Vehículo {} ({}) creado", vehicle.id, vehicle.registration_number);

        Ok(ApiResponse::success_with_message(vehicle, "Vehicle created"))
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<Vehicle>, AppError> {
        let vehicle = self.find(user, id).await?;
        Ok(ApiResponse::success(vehicle))
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        filter: VehicleFilter,
    ) -> Result<ApiResponse<Paginated<Vehicle>>, AppError> {
        if let (Some(min), Some(max)) = (filter.min_rate, filter.max_rate) {
            if min > max {
                return Err(AppError::BadRequest(
                    "min_rate must not be greater than max_rate".to_string(),
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
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        request.validate()?;
        let mut vehicle = self.find(user, id).await?;

        if let Some(status) = request.status {
            let leaves_rented = vehicle.status == VehicleStatus::Rented && status != VehicleStatus::Rented;
            let enters_rented = vehicle.status != VehicleStatus::Rented && status == VehicleStatus::Rented;
            if leaves_rented || enters_rented {
                return Err(rented_is_managed_by_sales());
            }
            vehicle.status = status;
        }

        if let Some(registration_number) = request.registration_number {
            if registration_number != vehicle.registration_number
                && self
                    .repository
                    .registration_exists(user.company_id, &registration_number, Some(vehicle.id))
                    .await?
            {
                return Err(conflict_error("Vehicle", "registration_number", &registration_number));
            }
            vehicle.registration_number = registration_number;
        }

        if let Some(odometer) = request.current_odometer {
            if odometer < vehicle.current_odometer {
                return Err(AppError::BadRequest(format!(
                    "Odometer cannot go back from {} to {}",
                    vehicle.current_odometer, odometer
                )));
            }
            vehicle.current_odometer = odometer;
        }

        if let Some(name) = request.name {
            vehicle.name = name;
        }
        if request.brand.is_some() {
            vehicle.brand = request.brand;
        }
        if request.model.is_some() {
            vehicle.model = request.model;
        }
        if let Some(vehicle_type) = request.vehicle_type {
            vehicle.vehicle_type = vehicle_type;
        }
        if let Some(fuel_type) = request.fuel_type {
            vehicle.fuel_type = fuel_type;
        }
        if let Some(charge_per_day) = request.charge_per_day {
            vehicle.charge_per_day = charge_per_day;
        }

        let vehicle = self.repository.update(&vehicle).await?;
        info!("✏️ Vehículo {} actualizado", vehicle.id);

        Ok(ApiResponse::success_with_message(vehicle, "Vehicle updated"))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let vehicle = self.find(user, id).await?;
        if vehicle.status == VehicleStatus::Rented {
            return Err(AppError::InvalidState(
                "A rented vehicle cannot be deleted".to_string(),
            ));
        }

        if !self.repository.soft_delete(user.company_id, id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }
        info!("🗑️ Vehículo {} eliminado", id);

        Ok(ApiResponse::message("Vehicle deleted"))
    }

    pub async fn servicing_overview(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<ApiResponse<ServicingOverview>, AppError> {
        let vehicle = self.find(user, id).await?;
        let history = self.repository.servicing_history(vehicle.id).await?;

        Ok(ApiResponse::success(ServicingOverview {
            current: history.first().cloned(),
            vehicle,
            history,
        }))
    }

    /// Configurar el intervalo o registrar un servicio realizado
    pub async fn record_servicing(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: ServicingRequest,
    ) -> Result<ApiResponse<VehicleServicing>, AppError> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        let vehicle = VehicleRepository::lock(&mut tx, user.company_id, id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;
        let latest = VehicleRepository::latest_servicing(&mut tx, vehicle.id)
            .await?
            .map(|row| ServicingState::from(&row));

        let interval_km = request
            .interval_km
            .or(latest.map(|state| state.interval_km))
            .ok_or_else(|| {
                validation_error("interval_km", "interval_km is required for the first servicing record")
            })?;

        let state = match (request.serviced_at_km, latest) {
            (Some(km), Some(previous)) => mark_serviced(
                &ServicingState {
                    interval_km,
                    ..previous
                },
                km,
            ),
            (Some(km), None) => configure(km, interval_km),
            (None, Some(previous)) => configure(previous.last_servicing_km, interval_km),
            (None, None) => configure(vehicle.current_odometer, interval_km),
        };

        let odometer = request
            .serviced_at_km
            .map_or(vehicle.current_odometer, |km| km.max(vehicle.current_odometer));
        let state = evaluate(&state, odometer).unwrap_or(state);
        if state.is_due {
            warn!(
                "🔧 Vehículo {} requiere mantenimiento: {} km >= {} km",
                vehicle.registration_number, odometer, state.next_servicing_km
            );
        }

        let record = VehicleRepository::append_servicing(&mut tx, vehicle.id, &state).await?;
        if let Some(km) = request.serviced_at_km {
            VehicleRepository::bump_odometer(&mut tx, vehicle.id, km).await?;
        }
        tx.commit().await?;

        info!(
            "🔧 Mantenimiento del vehículo {}: último {} km, próximo {} km",
            vehicle.id, record.last_servicing_km, record.next_servicing_km
        );

        Ok(ApiResponse::success_with_message(record, "Servicing recorded"))
    }

    async fn find(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Vehicle, AppError> {
        self.repository
            .find_by_id(user.company_id, id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }
}

fn rented_is_managed_by_sales() -> AppError {
    AppError::InvalidState("The rented status is managed by sales".to_string())
}
