//! Casos de uso de la venta
//!
//! Alta, entrega, devolución, cancelación, edición y cargos. Cada operación
//! con varios pasos corre en una única transacción con la venta (y el
//! vehículo cuando aplica) bloqueados con `FOR UPDATE`; cualquier `?`
//! descarta la transacción y deshace todo.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::{page_bounds, ApiResponse, Paginated};
use crate::dto::sale_dto::{
    ChargeRequest, CreateSaleRequest, DeliverSaleRequest, DisabledDatesQuery, PaymentInput,
    ReturnSaleRequest, SaleDetail, SaleFilter, SalePatch, UpdateChargeRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::payment::PaymentType;
use crate::models::sale::{PaymentStatus, Sale, SaleStatus, UsageType};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::payment_repository::{NewPayment, PaymentRepository};
use crate::repositories::sale_repository::SaleRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::availability::{find_conflict, BookedRange, DateRange};
use crate::services::charge_aggregator::{upsert_charge, ChargeBreakdown, ChargeFlags, ChargeLine};
use crate::services::payment_ledger::{settle, verified_total};
use crate::services::rental_calculator::{return_window, RentalPeriod, RentalPolicy, ReturnWindow};
use crate::services::sale_lifecycle::{ensure_editable, SaleEvent};
use crate::services::servicing::{evaluate, ServicingState};
use crate::utils::errors::{not_found_error, AppError};

pub struct SaleController {
    pool: PgPool,
    repository: SaleRepository,
    policy: RentalPolicy,
}

impl SaleController {
    pub fn new(pool: PgPool, policy: RentalPolicy) -> Self {
        Self {
            repository: SaleRepository::new(pool.clone()),
            pool,
            policy,
        }
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateSaleRequest,
    ) -> Result<ApiResponse<SaleDetail>, AppError> {
        request.validate()?;
        if let Some(payment) = &request.initial_payment {
            payment.validate()?;
        }

        let period = RentalPeriod::calculate(
            request.date_of_delivery,
            request.delivery_time,
            request.return_date,
            request.return_time,
            &self.policy,
        )?;

        let mut lines = Vec::new();
        for line in &request.charges {
            upsert_charge(&mut lines, *line);
        }

        let mut tx = self.pool.begin().await?;

        let vehicle = lock_bookable_vehicle(&mut tx, user.company_id, request.vehicle_id).await?;
        ensure_available(
            &mut tx,
            &vehicle,
            request.date_of_delivery,
            request.return_date,
            None,
        )
        .await?;

        let breakdown = ChargeBreakdown::compute(vehicle.charge_per_day, &period, &lines)?;
        let flags = ChargeFlags::from_charges(&lines);
        let now = Utc::now();

        let sale = Sale {
            id: Uuid::new_v4(),
            company_id: user.company_id,
            vehicle_id: vehicle.id,
            user_id: user.user_id,
            customer_name: request.customer_name.trim().to_string(),
            customer_phone: request.customer_phone.trim().to_string(),
            customer_address: request.customer_address,
            booking_date: request.booking_date.unwrap_or_else(|| now.date_naive()),
            date_of_delivery: request.date_of_delivery,
            delivery_time: request.delivery_time,
            return_date: request.return_date,
            return_time: request.return_time,
            actual_delivery_date: None,
            actual_return_date: None,
            actual_return_time: None,
            charge_per_day: breakdown.charge_per_day,
            charge_half_day: breakdown.charge_half_day,
            full_days: period.full_days,
            half_days: period.half_days,
            number_of_days: period.number_of_days(),
            base_amount: breakdown.base_amount,
            total_amount: breakdown.total_amount,
            status: SaleStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            is_damaged: flags.is_damaged,
            is_washed: flags.is_washed,
            is_delayed: flags.is_delayed,
            remarks: request.remarks,
            created_at: now,
            updated_at: now,
        };

        let sale = SaleRepository::insert(&mut tx, &sale).await?;
        for line in &lines {
            SaleRepository::upsert_charge(&mut tx, sale.id, line).await?;
        }
        if let Some(payment) = &request.initial_payment {
            record_payment(&mut tx, sale.id, PaymentType::Booking, payment).await?;
        }

        let detail = load_detail(&mut tx, sale).await?;
        tx.commit().await?;

        info!(
            "🚗 Venta {} creada: vehículo {} del {} al {}, total {}",
            detail.sale.id,
            vehicle.registration_number,
            detail.sale.date_of_delivery,
            detail.sale.return_date,
            detail.sale.total_amount
        );

        Ok(ApiResponse::success_with_message(detail, "Sale created successfully"))
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<SaleDetail>, AppError> {
        let sale = self
            .repository
            .find_by_id(user.company_id, id)
            .await?
            .ok_or_else(|| not_found_error("Sale", &id.to_string()))?;

        let mut conn = self.pool.acquire().await?;
        let detail = load_detail(&mut conn, sale).await?;

        Ok(ApiResponse::success(detail))
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        filter: SaleFilter,
    ) -> Result<ApiResponse<Paginated<Sale>>, AppError> {
        let (page, per_page, _) = page_bounds(filter.page, filter.per_page);
        let (items, total) = self.repository.list(user.company_id, &filter).await?;

        Ok(ApiResponse::success(Paginated {
            items,
            total,
            page,
            per_page,
        }))
    }

    /// Entrega: `pending → active`, vehículo `rented`
    pub async fn deliver(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: DeliverSaleRequest,
    ) -> Result<ApiResponse<SaleDetail>, AppError> {
        request.validate()?;
        if let Some(payment) = &request.payment {
            payment.validate()?;
        }

        let mut tx = self.pool.begin().await?;

        let mut sale = lock_sale(&mut tx, user.company_id, id).await?;
        let next_status = sale.status.apply(SaleEvent::Deliver)?;
        let vehicle = lock_bookable_vehicle(&mut tx, user.company_id, sale.vehicle_id).await?;

        if let Some(other) = SaleRepository::find_other_active(&mut tx, vehicle.id, sale.id).await? {
            return Err(AppError::Conflict(format!(
                "Vehicle {} is currently rented out on sale {}",
                vehicle.registration_number, other
            )));
        }

        SaleRepository::record_usage(
            &mut tx,
            sale.id,
            vehicle.id,
            UsageType::Delivery,
            request.odometer_reading,
            request.fuel_level,
        )
        .await?;
        VehicleRepository::bump_odometer(&mut tx, vehicle.id, request.odometer_reading).await?;

        if let Some(payment) = &request.payment {
            record_payment(&mut tx, sale.id, PaymentType::Delivery, payment).await?;
        }

        sale.actual_delivery_date = Some(request.delivered_at.unwrap_or_else(Utc::now));
        sale.status = next_status;
        VehicleRepository::set_status(&mut tx, vehicle.id, VehicleStatus::Rented).await?;

        let sale = SaleRepository::update(&mut tx, &sale).await?;
        let detail = load_detail(&mut tx, sale).await?;
        tx.commit().await?;

        info!("🔑 Venta {} entregada (vehículo {})", id, vehicle.registration_number);

        Ok(ApiResponse::success_with_message(detail, "Vehicle delivered"))
    }

    /// Devolución: cargos + uso + pagos + `active → completed`, vehículo `available`
    pub async fn return_vehicle(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: ReturnSaleRequest,
    ) -> Result<ApiResponse<SaleDetail>, AppError> {
        request.validate()?;
        if let Some(payment) = &request.payment {
            payment.validate()?;
        }

        let mut tx = self.pool.begin().await?;

        let mut sale = lock_sale(&mut tx, user.company_id, id).await?;
        let next_status = sale.status.apply(SaleEvent::Return)?;
        let vehicle = VehicleRepository::lock(&mut tx, user.company_id, sale.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &sale.vehicle_id.to_string()))?;

        if request.odometer_reading < vehicle.current_odometer {
            return Err(AppError::BadRequest(format!(
                "odometer_reading {} is lower than the vehicle's current reading {}",
                request.odometer_reading, vehicle.current_odometer
            )));
        }

        let ReturnWindow {
            return_date,
            return_time,
            period,
        } = return_window(
            sale.actual_delivery_date,
            (sale.date_of_delivery, sale.delivery_time),
            (request.actual_return_date, request.actual_return_time),
            Utc::now(),
            &self.policy,
        )?;

        for line in &request.charges {
            SaleRepository::upsert_charge(&mut tx, sale.id, line).await?;
        }

        SaleRepository::record_usage(
            &mut tx,
            sale.id,
            vehicle.id,
            UsageType::Return,
            request.odometer_reading,
            request.fuel_level,
        )
        .await?;
        VehicleRepository::bump_odometer(&mut tx, vehicle.id, request.odometer_reading).await?;

        if let Some(current) = VehicleRepository::latest_servicing(&mut tx, vehicle.id).await? {
            if let Some(changed) = evaluate(&ServicingState::from(&current), request.odometer_reading) {
                VehicleRepository::append_servicing(&mut tx, vehicle.id, &changed).await?;
                if changed.is_due {
                    warn!(
                        "🔧 Vehículo {} requiere mantenimiento ({} km)",
                        vehicle.registration_number, request.odometer_reading
                    );
                }
            }
        }

        if let Some(payment) = &request.payment {
            record_payment(&mut tx, sale.id, PaymentType::Return, payment).await?;
        }

        sale.actual_return_date = Some(return_date);
        sale.actual_return_time = return_time;
        if request.remarks.is_some() {
            sale.remarks = request.remarks;
        }
        recompute_totals(&mut tx, &mut sale, &period).await?;
        sale.status = next_status;
        VehicleRepository::set_status(&mut tx, vehicle.id, VehicleStatus::Available).await?;

        let sale = SaleRepository::update(&mut tx, &sale).await?;
        let detail = load_detail(&mut tx, sale).await?;
        tx.commit().await?;

        info!(
            "🏁 Venta {} completada: {} días, total {}, estado de pago {:?}",
            id, detail.sale.number_of_days, detail.sale.total_amount, detail.sale.payment_status
        );

        Ok(ApiResponse::success_with_message(detail, "Vehicle returned"))
    }

    /// Cancelación desde `pending` o `active`
    pub async fn cancel(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<Sale>, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut sale = lock_sale(&mut tx, user.company_id, id).await?;
        let next_status = sale.status.apply(SaleEvent::Cancel)?;

        if sale.status == SaleStatus::Active {
            let vehicle = VehicleRepository::lock(&mut tx, user.company_id, sale.vehicle_id).await?;
            if let Some(vehicle) = vehicle.filter(|v| v.status == VehicleStatus::Rented) {
                VehicleRepository::set_status(&mut tx, vehicle.id, VehicleStatus::Available).await?;
            }
        }

        sale.status = next_status;
        let sale = SaleRepository::update(&mut tx, &sale).await?;
        tx.commit().await?;

        info!("🚫 Venta {} cancelada", id);

        Ok(ApiResponse::success_with_message(sale, "Sale cancelled"))
    }

    /// Edición parcial de una venta abierta
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        patch: SalePatch,
    ) -> Result<ApiResponse<SaleDetail>, AppError> {
        patch.check()?;
        if patch.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let mut sale = lock_sale(&mut tx, user.company_id, id).await?;
        ensure_editable(sale.status)?;

        let reschedule = patch.touches_schedule();
        patch.apply(&mut sale);

        if reschedule {
            let period = RentalPeriod::calculate(
                sale.date_of_delivery,
                sale.delivery_time,
                sale.return_date,
                sale.return_time,
                &self.policy,
            )?;
            let vehicle = VehicleRepository::lock(&mut tx, user.company_id, sale.vehicle_id)
                .await?
                .ok_or_else(|| not_found_error("Vehicle", &sale.vehicle_id.to_string()))?;
            ensure_available(
                &mut tx,
                &vehicle,
                sale.date_of_delivery,
                sale.return_date,
                Some(sale.id),
            )
            .await?;
            recompute_totals(&mut tx, &mut sale, &period).await?;
        }

        let sale = SaleRepository::update(&mut tx, &sale).await?;
        let detail = load_detail(&mut tx, sale).await?;
        tx.commit().await?;

        info!("✏️ Venta {} actualizada", id);

        Ok(ApiResponse::success_with_message(detail, "Sale updated"))
    }

    /// Alta o sustitución de un cargo (uno por tipo)
    pub async fn add_charge(
        &self,
        user: &AuthenticatedUser,
        sale_id: Uuid,
        request: ChargeRequest,
    ) -> Result<ApiResponse<SaleDetail>, AppError> {
        user.require_admin("manage sale charges")?;
        request.validate()?;

        let line = ChargeLine {
            charge_type: request.charge_type,
            amount: request.amount,
        };
        self.change_charges(user, sale_id, ChargeChange::Upsert(line)).await
    }

    pub async fn update_charge(
        &self,
        user: &AuthenticatedUser,
        sale_id: Uuid,
        charge_id: Uuid,
        request: UpdateChargeRequest,
    ) -> Result<ApiResponse<SaleDetail>, AppError> {
        user.require_admin("manage sale charges")?;
        request.validate()?;

        let change = ChargeChange::SetAmount {
            charge_id,
            amount: request.amount,
        };
        self.change_charges(user, sale_id, change).await
    }

    pub async fn delete_charge(
        &self,
        user: &AuthenticatedUser,
        sale_id: Uuid,
        charge_id: Uuid,
    ) -> Result<ApiResponse<SaleDetail>, AppError> {
        user.require_admin("manage sale charges")?;

        self.change_charges(user, sale_id, ChargeChange::Remove(charge_id)).await
    }

    /// Aplicar un cambio de cargos y recalcular total y estado de pago
    async fn change_charges(
        &self,
        user: &AuthenticatedUser,
        sale_id: Uuid,
        change: ChargeChange,
    ) -> Result<ApiResponse<SaleDetail>, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut sale = lock_sale(&mut tx, user.company_id, sale_id).await?;
        if sale.status == SaleStatus::Cancelled {
            return Err(AppError::InvalidState(
                "Charges cannot be changed on a cancelled sale".to_string(),
            ));
        }

        match change {
            ChargeChange::Upsert(line) => {
                SaleRepository::upsert_charge(&mut tx, sale.id, &line).await?;
            }
            ChargeChange::SetAmount { charge_id, amount } => {
                SaleRepository::update_charge_amount(&mut tx, sale.id, charge_id, amount)
                    .await?
                    .ok_or_else(|| not_found_error("Charge", &charge_id.to_string()))?;
            }
            ChargeChange::Remove(charge_id) => {
                SaleRepository::delete_charge(&mut tx, sale.id, charge_id)
                    .await?
                    .ok_or_else(|| not_found_error("Charge", &charge_id.to_string()))?;
            }
        }

        let period = RentalPeriod {
            full_days: sale.full_days,
            half_days: sale.half_days,
        };
        recompute_totals(&mut tx, &mut sale, &period).await?;

        let sale = SaleRepository::update(&mut tx, &sale).await?;
        let detail = load_detail(&mut tx, sale).await?;
        tx.commit().await?;

        info!("💲 Cargos de la venta {} actualizados, total {}", sale_id, detail.sale.total_amount);

        Ok(ApiResponse::success_with_message(detail, "Charges updated"))
    }

    /// Rangos no reservables de un vehículo
    pub async fn disabled_dates(
        &self,
        user: &AuthenticatedUser,
        query: DisabledDatesQuery,
    ) -> Result<ApiResponse<Vec<BookedRange>>, AppError> {
        VehicleRepository::new(self.pool.clone())
            .find_by_id(user.company_id, query.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &query.vehicle_id.to_string()))?;

        let mut conn = self.pool.acquire().await?;
        let ranges =
            SaleRepository::booked_ranges(&mut conn, query.vehicle_id, query.exclude_sale_id).await?;

        Ok(ApiResponse::success(ranges))
    }
}

enum ChargeChange {
    Upsert(ChargeLine),
    SetAmount { charge_id: Uuid, amount: Decimal },
    Remove(Uuid),
}

async fn lock_sale(conn: &mut PgConnection, company_id: Uuid, id: Uuid) -> Result<Sale, AppError> {
    SaleRepository::lock(conn, company_id, id)
        .await?
        .ok_or_else(|| not_found_error("Sale", &id.to_string()))
}

/// Vehículo bloqueado y en un estado que admite reservas
async fn lock_bookable_vehicle(
    conn: &mut PgConnection,
    company_id: Uuid,
    vehicle_id: Uuid,
) -> Result<Vehicle, AppError> {
    let vehicle = VehicleRepository::lock(conn, company_id, vehicle_id)
        .await?
        .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;

    if !vehicle.status.is_bookable() {
        return Err(AppError::InvalidState(format!(
            "Vehicle {} is not available for rental ({:?})",
            vehicle.registration_number, vehicle.status
        )));
    }

    Ok(vehicle)
}

/// Rechazar solapes con otras ventas `pending`/`active` del vehículo.
/// El vehículo debe estar bloqueado por la transacción actual.
async fn ensure_available(
    conn: &mut PgConnection,
    vehicle: &Vehicle,
    start: NaiveDate,
    end: NaiveDate,
    exclude_sale_id: Option<Uuid>,
) -> Result<(), AppError> {
    let wanted = DateRange::new(start, end).ok_or_else(|| {
        AppError::BadRequest("return_date must not be before date_of_delivery".to_string())
    })?;
    let booked = SaleRepository::booked_ranges(conn, vehicle.id, exclude_sale_id).await?;

    if let Some(clash) = find_conflict(&wanted, &booked, exclude_sale_id) {
        return Err(AppError::Conflict(format!(
            "Vehicle {} is already booked from {} to {} (sale {})",
            vehicle.registration_number, clash.range.start, clash.range.end, clash.sale_id
        )));
    }

    Ok(())
}

async fn record_payment(
    conn: &mut PgConnection,
    sale_id: Uuid,
    payment_type: PaymentType,
    payment: &PaymentInput,
) -> Result<(), AppError> {
    PaymentRepository::insert(
        conn,
        NewPayment {
            sale_id,
            amount: payment.amount,
            payment_type,
            payment_method: &payment.payment_method,
            remarks: payment.remarks.as_deref(),
        },
    )
    .await?;

    Ok(())
}

/// Recalcular días, importes, marcas y estado de pago a partir de los cargos
/// y pagos persistidos
async fn recompute_totals(
    conn: &mut PgConnection,
    sale: &mut Sale,
    period: &RentalPeriod,
) -> Result<(), AppError> {
    let lines: Vec<ChargeLine> = SaleRepository::charges(conn, sale.id)
        .await?
        .into_iter()
        .map(|c| ChargeLine {
            charge_type: c.charge_type,
            amount: c.amount,
        })
        .collect();

    let breakdown = ChargeBreakdown::compute(sale.charge_per_day, period, &lines)?;
    let flags = ChargeFlags::from_charges(&lines);

    sale.full_days = period.full_days;
    sale.half_days = period.half_days;
    sale.number_of_days = period.number_of_days();
    sale.charge_half_day = breakdown.charge_half_day;
    sale.base_amount = breakdown.base_amount;
    sale.total_amount = breakdown.total_amount;
    sale.is_damaged = flags.is_damaged;
    sale.is_washed = flags.is_washed;
    sale.is_delayed = flags.is_delayed;

    let payments = PaymentRepository::list_for_sale(conn, sale.id).await?;
    sale.payment_status = settle(&payments, sale.total_amount);

    Ok(())
}

async fn load_detail(conn: &mut PgConnection, sale: Sale) -> Result<SaleDetail, AppError> {
    let charges = SaleRepository::charges(conn, sale.id).await?;
    let payments = PaymentRepository::list_for_sale(conn, sale.id).await?;
    let usages = SaleRepository::usages(conn, sale.id).await?;

    let total_paid = verified_total(&payments);
    let balance = (sale.total_amount - total_paid).max(Decimal::ZERO);

    Ok(SaleDetail {
        sale,
        charges,
        payments,
        usages,
        total_paid,
        balance,
    })
}
