use crate::dto::api_response::page_bounds;
use crate::dto::vehicle_dto::{CreateVehicleRequest, VehicleFilter};
use crate::models::vehicle::{Vehicle, VehicleServicing, VehicleStatus};
use crate::services::servicing::ServicingState;
use crate::utils::errors::AppError;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        request: &CreateVehicleRequest,
    ) -> Result<Vehicle, AppError> {
        let now = Utc::now();
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, company_id, name, registration_number, brand, model, vehicle_type,
                fuel_type, charge_per_day, status, current_odometer, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(request.name.trim())
        .bind(request.registration_number.trim())
        .bind(&request.brand)
        .bind(&request.model)
        .bind(&request.vehicle_type)
        .bind(&request.fuel_type)
        .bind(request.charge_per_day)
        .bind(request.status.unwrap_or(VehicleStatus::Available))
        .bind(request.current_odometer.unwrap_or(Decimal::ZERO))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, company_id: Uuid, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Bloquear la fila del vehículo hasta el fin de la transacción
    pub async fn lock(
        conn: &mut PgConnection,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(conn)
        .await?;

        Ok(vehicle)
    }

    /// Listado filtrado y paginado; devuelve la página y el total
    pub async fn list(
        &self,
        company_id: Uuid,
        filter: &VehicleFilter,
    ) -> Result<(Vec<Vehicle>, i64), AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM vehicles");
        push_vehicle_filter(&mut count, company_id, filter);
        let (total,): (i64,) = count.build_query_as::<(i64,)>().fetch_one(&self.pool).await?;

        let (_, per_page, offset) = page_bounds(filter.page, filter.per_page);
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM vehicles");
        push_vehicle_filter(&mut query, company_id, filter);
        query
            .push(" ORDER BY ")
            .push(filter.sort.unwrap_or_default().column())
            .push(" ")
            .push(filter.order.unwrap_or_default().keyword())
            .push(", id LIMIT ")
            .push_bind(per_page)
            .push(" OFFSET ")
            .push_bind(offset);

        let vehicles = query
            .build_query_as::<Vehicle>()
            .fetch_all(&self.pool)
            .await?;

        Ok((vehicles, total))
    }

    pub async fn registration_exists(
        &self,
        company_id: Uuid,
        registration_number: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM vehicles
                WHERE company_id = $1
                  AND LOWER(registration_number) = LOWER($2)
                  AND deleted_at IS NULL
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(company_id)
        .bind(registration_number.trim())
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Escribir todas las columnas editables
    pub async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        let result = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET name = $3, registration_number = $4, brand = $5, model = $6,
                vehicle_type = $7, fuel_type = $8, charge_per_day = $9, status = $10,
                current_odometer = $11, updated_at = NOW()
            WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.company_id)
        .bind(&vehicle.name)
        .bind(&vehicle.registration_number)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(&vehicle.vehicle_type)
        .bind(&vehicle.fuel_type)
        .bind(vehicle.charge_per_day)
        .bind(vehicle.status)
        .bind(vehicle.current_odometer)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn set_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: VehicleStatus,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE vehicles SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// El odómetro nunca retrocede
    pub async fn bump_odometer(
        conn: &mut PgConnection,
        id: Uuid,
        reading: Decimal,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET current_odometer = GREATEST(current_odometer, $2), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(reading)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn soft_delete(&self, company_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Último registro de mantenimiento
    pub async fn latest_servicing(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
    ) -> Result<Option<VehicleServicing>, AppError> {
        let result = sqlx::query_as::<_, VehicleServicing>(
            r#"
            SELECT * FROM vehicle_servicings
            WHERE vehicle_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .fetch_optional(conn)
        .await?;

        Ok(result)
    }

    pub async fn servicing_history(&self, vehicle_id: Uuid) -> Result<Vec<VehicleServicing>, AppError> {
        let result = sqlx::query_as::<_, VehicleServicing>(
            r#"
            SELECT * FROM vehicle_servicings
            WHERE vehicle_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    /// Añadir un registro al historial (sólo inserción)
    pub async fn append_servicing(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        state: &ServicingState,
    ) -> Result<VehicleServicing, AppError> {
        let result = sqlx::query_as::<_, VehicleServicing>(
            r#"
            INSERT INTO vehicle_servicings (
                id, vehicle_id, last_servicing_km, next_servicing_km, interval_km, is_due, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(state.last_servicing_km)
        .bind(state.next_servicing_km)
        .bind(state.interval_km)
        .bind(state.is_due)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(result)
    }
}

fn push_vehicle_filter(builder: &mut QueryBuilder<'_, Postgres>, company_id: Uuid, filter: &VehicleFilter) {
    builder
        .push(" WHERE deleted_at IS NULL AND company_id = ")
        .push_bind(company_id);

    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(vehicle_type) = &filter.vehicle_type {
        builder.push(" AND vehicle_type = ").push_bind(vehicle_type.clone());
    }
    if let Some(brand) = &filter.brand {
        builder.push(" AND LOWER(brand) = LOWER(").push_bind(brand.clone()).push(")");
    }
    if let Some(fuel_type) = &filter.fuel_type {
        builder.push(" AND fuel_type = ").push_bind(fuel_type.clone());
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR registration_number ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(min_rate) = filter.min_rate {
        builder.push(" AND charge_per_day >= ").push_bind(min_rate);
    }
    if let Some(max_rate) = filter.max_rate {
        builder.push(" AND charge_per_day <= ").push_bind(max_rate);
    }
}
