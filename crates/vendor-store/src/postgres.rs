use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ContactId, EntityId, UserId, VendorId, VendorStatus};
use sqlx::{
    PgPool, Postgres, Row,
    postgres::{PgArguments, PgRow},
    query::Query,
};
use uuid::Uuid;

use crate::{
    NewVendor, NewVendorContact, PaymentTerm, Result, StoreError, Vendor, VendorContact,
    VendorProfile, VendorQuery, constraints, store::VendorStore,
};

const VENDOR_COLUMNS: &str = r#"
    id, entity_id, status::text AS status,
    vendor_code, vendor_name, legal_name, vendor_type::text AS vendor_type,
    tax_id, is_tax_exempt, is_1099_vendor,
    email, phone, fax, website, address_line1, address_line2,
    city, state_province, postal_code, country,
    payment_terms, payment_method::text AS payment_method, currency, credit_limit,
    bank_name, bank_account_number, bank_routing_number, swift_code, iban,
    notes, tags, current_balance,
    created_by, created_at, updated_by, updated_at
"#;

/// Profile columns in bind order; `$1..$28` in every insert and update.
const PROFILE_COLUMNS: &str = r#"
    vendor_code, vendor_name, legal_name, vendor_type,
    tax_id, is_tax_exempt, is_1099_vendor,
    email, phone, fax, website, address_line1, address_line2,
    city, state_province, postal_code, country,
    payment_terms, payment_method, currency, credit_limit,
    bank_name, bank_account_number, bank_routing_number, swift_code, iban,
    notes, tags
"#;

const PROFILE_VALUES: &str = r#"
    $1, $2, $3, $4::vendor_type,
    $5, $6, $7,
    $8, $9, $10, $11, $12, $13,
    $14, $15, $16, $17,
    $18, $19::payment_method, $20, $21,
    $22, $23, $24, $25, $26,
    $27, $28
"#;

const CONTACT_COLUMNS: &str = r#"
    id, vendor_id, contact_type::text AS contact_type, first_name, last_name,
    title, email, phone, mobile, is_primary, notes, created_at, updated_at
"#;

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// PostgreSQL-backed vendor store.
#[derive(Clone)]
pub struct PostgresVendorStore {
    pool: PgPool,
}

impl PostgresVendorStore {
    /// Creates a new PostgreSQL vendor store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("vendor schema migrations applied");
        Ok(())
    }

    fn bind_profile<'q>(query: PgQuery<'q>, p: &'q VendorProfile) -> PgQuery<'q> {
        query
            .bind(&p.vendor_code)
            .bind(&p.vendor_name)
            .bind(&p.legal_name)
            .bind(p.vendor_type.as_str())
            .bind(&p.tax_id)
            .bind(p.is_tax_exempt)
            .bind(p.is_1099_vendor)
            .bind(&p.email)
            .bind(&p.phone)
            .bind(&p.fax)
            .bind(&p.website)
            .bind(&p.address_line1)
            .bind(&p.address_line2)
            .bind(&p.city)
            .bind(&p.state_province)
            .bind(&p.postal_code)
            .bind(&p.country)
            .bind(&p.payment_terms)
            .bind(p.payment_method.map(|m| m.as_str()))
            .bind(&p.currency)
            .bind(p.credit_limit)
            .bind(&p.bank_name)
            .bind(&p.bank_account_number)
            .bind(&p.bank_routing_number)
            .bind(&p.swift_code)
            .bind(&p.iban)
            .bind(&p.notes)
            .bind(&p.tags)
    }

    fn row_to_vendor(row: PgRow) -> Result<Vendor> {
        let payment_method: Option<String> = row.try_get("payment_method")?;
        let payment_method = match payment_method {
            Some(value) => Some(parse_label("payment_method", value)?),
            None => None,
        };

        Ok(Vendor {
            id: VendorId::from_uuid(row.try_get::<Uuid, _>("id")?),
            entity_id: EntityId::from_uuid(row.try_get::<Uuid, _>("entity_id")?),
            status: parse_label("status", row.try_get("status")?)?,
            profile: VendorProfile {
                vendor_code: row.try_get("vendor_code")?,
                vendor_name: row.try_get("vendor_name")?,
                legal_name: row.try_get("legal_name")?,
                vendor_type: parse_label("vendor_type", row.try_get("vendor_type")?)?,
                tax_id: row.try_get("tax_id")?,
                is_tax_exempt: row.try_get("is_tax_exempt")?,
                is_1099_vendor: row.try_get("is_1099_vendor")?,
                email: row.try_get("email")?,
                phone: row.try_get("phone")?,
                fax: row.try_get("fax")?,
                website: row.try_get("website")?,
                address_line1: row.try_get("address_line1")?,
                address_line2: row.try_get("address_line2")?,
                city: row.try_get("city")?,
                state_province: row.try_get("state_province")?,
                postal_code: row.try_get("postal_code")?,
                country: row.try_get("country")?,
                payment_terms: row.try_get("payment_terms")?,
                payment_method,
                currency: row.try_get("currency")?,
                credit_limit: row.try_get("credit_limit")?,
                bank_name: row.try_get("bank_name")?,
                bank_account_number: row.try_get("bank_account_number")?,
                bank_routing_number: row.try_get("bank_routing_number")?,
                swift_code: row.try_get("swift_code")?,
                iban: row.try_get("iban")?,
                notes: row.try_get("notes")?,
                tags: row.try_get("tags")?,
            },
            current_balance: row.try_get("current_balance")?,
            created_by: row
                .try_get::<Option<Uuid>, _>("created_by")?
                .map(UserId::from_uuid),
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_by: row
                .try_get::<Option<Uuid>, _>("updated_by")?
                .map(UserId::from_uuid),
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }

    fn row_to_contact(row: PgRow) -> Result<VendorContact> {
        Ok(VendorContact {
            id: ContactId::from_uuid(row.try_get::<Uuid, _>("id")?),
            vendor_id: VendorId::from_uuid(row.try_get::<Uuid, _>("vendor_id")?),
            contact_type: parse_label("contact_type", row.try_get("contact_type")?)?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            title: row.try_get("title")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            mobile: row.try_get("mobile")?,
            is_primary: row.try_get("is_primary")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_payment_term(row: PgRow) -> Result<PaymentTerm> {
        Ok(PaymentTerm {
            id: row.try_get("id")?,
            code: row.try_get("code")?,
            description: row.try_get("description")?,
            net_days: row.try_get("net_days")?,
            discount_percent: row.try_get("discount_percent")?,
            discount_days: row.try_get("discount_days")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// SQLSTATE for `numeric_value_out_of_range`.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// A balance that overflows BIGINT fails the same check as one that goes
/// negative.
fn balance_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE) {
            return StoreError::CheckViolation {
                constraint: constraints::VENDOR_CURRENT_BALANCE.to_string(),
            };
        }
    }
    err.into()
}

fn parse_label<T: FromStr>(column: &'static str, value: String) -> Result<T> {
    value
        .parse()
        .map_err(|_| StoreError::InvalidColumn { column, value })
}

#[async_trait]
impl VendorStore for PostgresVendorStore {
    async fn create_vendor(&self, vendor: NewVendor) -> Result<Vendor> {
        let sql = format!(
            "INSERT INTO vendors ({PROFILE_COLUMNS}, entity_id, status, created_by)
             VALUES ({PROFILE_VALUES}, $29, $30::vendor_status, $31)
             RETURNING {VENDOR_COLUMNS}"
        );

        let row = Self::bind_profile(sqlx::query(&sql), &vendor.profile)
            .bind(vendor.entity_id.as_uuid())
            .bind(vendor.status.as_str())
            .bind(vendor.created_by.map(|u| u.as_uuid()))
            .fetch_one(&self.pool)
            .await?;

        Self::row_to_vendor(row)
    }

    async fn get_vendor(&self, id: VendorId, entity_id: EntityId) -> Result<Option<Vendor>> {
        let sql = format!("SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = $1 AND entity_id = $2");

        let row: Option<PgRow> = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(entity_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_vendor).transpose()
    }

    async fn get_vendor_by_code(
        &self,
        entity_id: EntityId,
        code: &str,
    ) -> Result<Option<Vendor>> {
        let sql = format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors WHERE entity_id = $1 AND vendor_code = $2"
        );

        let row: Option<PgRow> = sqlx::query(&sql)
            .bind(entity_id.as_uuid())
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_vendor).transpose()
    }

    async fn update_vendor(
        &self,
        id: VendorId,
        entity_id: EntityId,
        status: VendorStatus,
        profile: VendorProfile,
        updated_by: Option<UserId>,
    ) -> Result<Option<Vendor>> {
        let sql = format!(
            "UPDATE vendors SET ({PROFILE_COLUMNS}) = ROW({PROFILE_VALUES}),
                 status = $29::vendor_status,
                 updated_by = $30,
                 updated_at = NOW()
             WHERE id = $31 AND entity_id = $32
             RETURNING {VENDOR_COLUMNS}"
        );

        let row: Option<PgRow> = Self::bind_profile(sqlx::query(&sql), &profile)
            .bind(status.as_str())
            .bind(updated_by.map(|u| u.as_uuid()))
            .bind(id.as_uuid())
            .bind(entity_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_vendor).transpose()
    }

    async fn delete_vendor(&self, id: VendorId, entity_id: EntityId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = $1 AND entity_id = $2")
            .bind(id.as_uuid())
            .bind(entity_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(entity_id = %query.entity_id))]
    async fn list_vendors(&self, query: VendorQuery) -> Result<(Vec<Vendor>, u64)> {
        // Build the filter dynamically; both statements share it.
        let mut where_clause = String::from("entity_id = $1");
        let mut param_count = 1;

        if query.status.is_some() {
            param_count += 1;
            where_clause.push_str(&format!(" AND status = ${param_count}::vendor_status"));
        }
        if query.vendor_type.is_some() {
            param_count += 1;
            where_clause.push_str(&format!(" AND vendor_type = ${param_count}::vendor_type"));
        }

        let count_sql = format!("SELECT COUNT(*) FROM vendors WHERE {where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(query.entity_id.as_uuid());
        if let Some(status) = query.status {
            count_query = count_query.bind(status.as_str());
        }
        if let Some(vendor_type) = query.vendor_type {
            count_query = count_query.bind(vendor_type.as_str());
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let mut sql = format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors WHERE {where_clause} ORDER BY vendor_name, vendor_code"
        );
        if query.limit.is_some() {
            param_count += 1;
            sql.push_str(&format!(" LIMIT ${param_count}"));
        }
        if query.offset.is_some() {
            param_count += 1;
            sql.push_str(&format!(" OFFSET ${param_count}"));
        }

        let mut sqlx_query = sqlx::query(&sql).bind(query.entity_id.as_uuid());
        if let Some(status) = query.status {
            sqlx_query = sqlx_query.bind(status.as_str());
        }
        if let Some(vendor_type) = query.vendor_type {
            sqlx_query = sqlx_query.bind(vendor_type.as_str());
        }
        if let Some(limit) = query.limit {
            sqlx_query = sqlx_query.bind(i64::from(limit));
        }
        if let Some(offset) = query.offset {
            sqlx_query = sqlx_query.bind(i64::try_from(offset).unwrap_or(i64::MAX));
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        let vendors = rows
            .into_iter()
            .map(Self::row_to_vendor)
            .collect::<Result<Vec<_>>>()?;

        Ok((vendors, u64::try_from(total).unwrap_or_default()))
    }

    #[tracing::instrument(skip(self))]
    async fn adjust_balance(
        &self,
        id: VendorId,
        entity_id: EntityId,
        delta: i64,
    ) -> Result<Option<i64>> {
        let balance: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE vendors
            SET current_balance = current_balance + $3, updated_at = NOW()
            WHERE id = $1 AND entity_id = $2
            RETURNING current_balance
            "#,
        )
        .bind(id.as_uuid())
        .bind(entity_id.as_uuid())
        .bind(delta)
        .fetch_optional(&self.pool)
        .await
        .map_err(balance_error)?;

        Ok(balance)
    }

    async fn add_contact(&self, contact: NewVendorContact) -> Result<VendorContact> {
        let sql = format!(
            "INSERT INTO vendor_contacts
                 (vendor_id, contact_type, first_name, last_name, title, email, phone, mobile, is_primary, notes)
             VALUES ($1, $2::contact_type, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {CONTACT_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(contact.vendor_id.as_uuid())
            .bind(contact.contact_type.as_str())
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.title)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(&contact.mobile)
            .bind(contact.is_primary)
            .bind(&contact.notes)
            .fetch_one(&self.pool)
            .await?;

        Self::row_to_contact(row)
    }

    async fn list_contacts(&self, vendor_id: VendorId) -> Result<Vec<VendorContact>> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM vendor_contacts
             WHERE vendor_id = $1
             ORDER BY is_primary DESC, first_name, last_name"
        );

        let rows = sqlx::query(&sql)
            .bind(vendor_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_contact).collect()
    }

    async fn list_active_payment_terms(&self) -> Result<Vec<PaymentTerm>> {
        let rows = sqlx::query(
            r#"
            SELECT id, code, description, net_days,
                   discount_percent::float8 AS discount_percent, discount_days,
                   is_active, created_at
            FROM payment_terms
            WHERE is_active
            ORDER BY net_days, code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_payment_term).collect()
    }
}
