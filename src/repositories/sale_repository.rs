use crate::dto::api_response::page_bounds;
use crate::dto::sale_dto::SaleFilter;
use crate::models::sale::{ChargeType, Sale, SalesCharge, UsageType, VehicleUsage};
use crate::services::availability::{BookedRange, DateRange};
use crate::services::charge_aggregator::ChargeLine;
use crate::utils::errors::AppError;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(conn: &mut PgConnection, sale: &Sale) -> Result<Sale, AppError> {
        let result = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (
                id, company_id, vehicle_id, user_id, customer_name, customer_phone,
                customer_address, booking_date, date_of_delivery, delivery_time,
                return_date, return_time, charge_per_day, charge_half_day, full_days,
                half_days, number_of_days, base_amount, total_amount, status,
                payment_status, is_damaged, is_washed, is_delayed, remarks,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27
            )
            RETURNING *
            "#,
        )
        .bind(sale.id)
        .bind(sale.company_id)
        .bind(sale.vehicle_id)
        .bind(sale.user_id)
        .bind(&sale.customer_name)
        .bind(&sale.customer_phone)
        .bind(&sale.customer_address)
        .bind(sale.booking_date)
        .bind(sale.date_of_delivery)
        .bind(sale.delivery_time)
        .bind(sale.return_date)
        .bind(sale.return_time)
        .bind(sale.charge_per_day)
        .bind(sale.charge_half_day)
        .bind(sale.full_days)
        .bind(sale.half_days)
        .bind(sale.number_of_days)
        .bind(sale.base_amount)
        .bind(sale.total_amount)
        .bind(sale.status)
        .bind(sale.payment_status)
        .bind(sale.is_damaged)
        .bind(sale.is_washed)
        .bind(sale.is_delayed)
        .bind(&sale.remarks)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .fetch_one(conn)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, company_id: Uuid, id: Uuid) -> Result<Option<Sale>, AppError> {
        let result = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// Bloquear la venta hasta el fin de la transacción
    pub async fn lock(
        conn: &mut PgConnection,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Sale>, AppError> {
        let result = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE id = $1 AND company_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(conn)
        .await?;

        Ok(result)
    }

    /// Escribir el estado completo de la venta
    pub async fn update(conn: &mut PgConnection, sale: &Sale) -> Result<Sale, AppError> {
        let result = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales
            SET customer_name = $2, customer_phone = $3, customer_address = $4,
                booking_date = $5, date_of_delivery = $6, delivery_time = $7,
                return_date = $8, return_time = $9, actual_delivery_date = $10,
                actual_return_date = $11, actual_return_time = $12,
                charge_per_day = $13, charge_half_day = $14, full_days = $15,
                half_days = $16, number_of_days = $17, base_amount = $18,
                total_amount = $19, status = $20, payment_status = $21,
                is_damaged = $22, is_washed = $23, is_delayed = $24, remarks = $25,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(sale.id)
        .bind(&sale.customer_name)
        .bind(&sale.customer_phone)
        .bind(&sale.customer_address)
        .bind(sale.booking_date)
        .bind(sale.date_of_delivery)
        .bind(sale.delivery_time)
        .bind(sale.return_date)
        .bind(sale.return_time)
        .bind(sale.actual_delivery_date)
        .bind(sale.actual_return_date)
        .bind(sale.actual_return_time)
        .bind(sale.charge_per_day)
        .bind(sale.charge_half_day)
        .bind(sale.full_days)
        .bind(sale.half_days)
        .bind(sale.number_of_days)
        .bind(sale.base_amount)
        .bind(sale.total_amount)
        .bind(sale.status)
        .bind(sale.payment_status)
        .bind(sale.is_damaged)
        .bind(sale.is_washed)
        .bind(sale.is_delayed)
        .bind(&sale.remarks)
        .fetch_one(conn)
        .await?;

        Ok(result)
    }

    /// Listado filtrado y paginado; devuelve la página y el total
    pub async fn list(&self, company_id: Uuid, filter: &SaleFilter) -> Result<(Vec<Sale>, i64), AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM sales");
        push_sale_filter(&mut count, company_id, filter);
        let (total,): (i64,) = count.build_query_as::<(i64,)>().fetch_one(&self.pool).await?;

        let (_, per_page, offset) = page_bounds(filter.page, filter.per_page);
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM sales");
        push_sale_filter(&mut query, company_id, filter);
        query
            .push(" ORDER BY date_of_delivery DESC, created_at DESC LIMIT ")
            .push_bind(per_page)
            .push(" OFFSET ")
            .push_bind(offset);

        let sales = query.build_query_as::<Sale>().fetch_all(&self.pool).await?;

        Ok((sales, total))
    }

    /// Rangos ocupados por ventas `pending`/`active` del vehículo
    pub async fn booked_ranges(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        exclude_sale_id: Option<Uuid>,
    ) -> Result<Vec<BookedRange>, AppError> {
        let rows: Vec<(Uuid, NaiveDate, NaiveDate)> = sqlx::query_as(
            r#"
            SELECT id, date_of_delivery, return_date
            FROM sales
            WHERE vehicle_id = $1
              AND status IN ('pending', 'active')
              AND ($2::uuid IS NULL OR id <> $2)
            ORDER BY date_of_delivery
            "#,
        )
        .bind(vehicle_id)
        .bind(exclude_sale_id)
        .fetch_all(conn)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(sale_id, start, end)| {
                DateRange::new(start, end).map(|range| BookedRange { sale_id, range })
            })
            .collect())
    }

    /// Otra venta que tenga el vehículo en la calle
    pub async fn find_other_active(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        sale_id: Uuid,
    ) -> Result<Option<Uuid>, AppError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM sales WHERE vehicle_id = $1 AND status = 'active' AND id <> $2 LIMIT 1",
        )
        .bind(vehicle_id)
        .bind(sale_id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(|(id,)| id))
    }

    // ---- Cargos ----

    pub async fn charges(conn: &mut PgConnection, sale_id: Uuid) -> Result<Vec<SalesCharge>, AppError> {
        let result = sqlx::query_as::<_, SalesCharge>(
            "SELECT * FROM sales_charges WHERE sale_id = $1 ORDER BY created_at, id",
        )
        .bind(sale_id)
        .fetch_all(conn)
        .await?;

        Ok(result)
    }

    /// Un cargo por tipo: si ya existe se sustituye el importe
    pub async fn upsert_charge(
        conn: &mut PgConnection,
        sale_id: Uuid,
        line: &ChargeLine,
    ) -> Result<SalesCharge, AppError> {
        let now = Utc::now();
        let result = sqlx::query_as::<_, SalesCharge>(
            r#"
            INSERT INTO sales_charges (id, sale_id, charge_type, amount, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (sale_id, charge_type)
            DO UPDATE SET amount = EXCLUDED.amount, updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sale_id)
        .bind(line.charge_type)
        .bind(line.amount)
        .bind(now)
        .fetch_one(conn)
        .await?;

        Ok(result)
    }

    pub async fn update_charge_amount(
        conn: &mut PgConnection,
        sale_id: Uuid,
        charge_id: Uuid,
        amount: Decimal,
    ) -> Result<Option<SalesCharge>, AppError> {
        let result = sqlx::query_as::<_, SalesCharge>(
            r#"
            UPDATE sales_charges SET amount = $3, updated_at = NOW()
            WHERE id = $1 AND sale_id = $2
            RETURNING *
            "#,
        )
        .bind(charge_id)
        .bind(sale_id)
        .bind(amount)
        .fetch_optional(conn)
        .await?;

        Ok(result)
    }

    pub async fn delete_charge(
        conn: &mut PgConnection,
        sale_id: Uuid,
        charge_id: Uuid,
    ) -> Result<Option<ChargeType>, AppError> {
        let row: Option<(ChargeType,)> = sqlx::query_as(
            "DELETE FROM sales_charges WHERE id = $1 AND sale_id = $2 RETURNING charge_type",
        )
        .bind(charge_id)
        .bind(sale_id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(|(charge_type,)| charge_type))
    }

    // ---- Registros de uso ----

    pub async fn record_usage(
        conn: &mut PgConnection,
        sale_id: Uuid,
        vehicle_id: Uuid,
        usage_type: UsageType,
        odometer_reading: Decimal,
        fuel_level: Option<Decimal>,
    ) -> Result<VehicleUsage, AppError> {
        let result = sqlx::query_as::<_, VehicleUsage>(
            r#"
            INSERT INTO vehicle_usages (
                id, sale_id, vehicle_id, usage_type, odometer_reading, fuel_level, recorded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sale_id)
        .bind(vehicle_id)
        .bind(usage_type)
        .bind(odometer_reading)
        .bind(fuel_level)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(result)
    }

    pub async fn usages(conn: &mut PgConnection, sale_id: Uuid) -> Result<Vec<VehicleUsage>, AppError> {
        let result = sqlx::query_as::<_, VehicleUsage>(
            "SELECT * FROM vehicle_usages WHERE sale_id = $1 ORDER BY recorded_at",
        )
        .bind(sale_id)
        .fetch_all(conn)
        .await?;

        Ok(result)
    }
}

fn push_sale_filter(builder: &mut QueryBuilder<'_, Postgres>, company_id: Uuid, filter: &SaleFilter) {
    builder.push(" WHERE company_id = ").push_bind(company_id);

    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(payment_status) = filter.payment_status {
        builder.push(" AND payment_status = ").push_bind(payment_status);
    }
    if let Some(vehicle_id) = filter.vehicle_id {
        builder.push(" AND vehicle_id = ").push_bind(vehicle_id);
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        builder
            .push(" AND (customer_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR customer_phone ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    // Ventas cuyo rango toca [from, to]
    if let Some(from) = filter.from {
        builder.push(" AND return_date >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        builder.push(" AND date_of_delivery <= ").push_bind(to);
    }
}
