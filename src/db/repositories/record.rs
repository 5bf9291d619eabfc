use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};
use serde::Serialize;

use crate::entities::report_records;

/// One row of the invoice/service table as handed to report consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    pub contec_id: i32,
    pub reportdate: NaiveDate,
    pub designator: Option<String>,
    pub tracking_id: Option<String>,
    pub invoice_code: String,
    pub qty: i32,
    pub rate: f64,
    pub amount: f64,
    pub invoice_number: Option<String>,
    pub servicecode: String,
    pub pallet_size: Option<i32>,
    pub pallet_count: Option<i32>,
    pub model: String,
    pub test_date: Option<NaiveDate>,
    pub failure_description: Option<String>,
    pub failurecode: Option<String>,
    pub part_description: Option<String>,
    pub invoicetype: String,
    pub invoice_reference: Option<String>,
}

impl From<report_records::Model> for ReportRecord {
    fn from(model: report_records::Model) -> Self {
        Self {
            contec_id: model.contec_id,
            reportdate: model.reportdate,
            designator: model.designator,
            tracking_id: model.tracking_id,
            invoice_code: model.invoice_code,
            qty: model.qty,
            rate: model.rate,
            amount: model.amount,
            invoice_number: model.invoice_number,
            servicecode: model.servicecode,
            pallet_size: model.pallet_size,
            pallet_count: model.pallet_count,
            model: model.model,
            test_date: model.test_date,
            failure_description: model.failure_description,
            failurecode: model.failurecode,
            part_description: model.part_description,
            invoicetype: model.invoicetype,
            invoice_reference: model.invoice_reference,
        }
    }
}

pub struct RecordRepository {
    conn: DatabaseConnection,
}

impl RecordRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Full table read, oldest report date first
    pub async fn list_all(&self) -> Result<Vec<ReportRecord>> {
        let rows = report_records::Entity::find()
            .order_by_asc(report_records::Column::Reportdate)
            .order_by_asc(report_records::Column::ContecId)
            .all(&self.conn)
            .await
            .context("Failed to read report records")?;

        Ok(rows.into_iter().map(ReportRecord::from).collect())
    }

    /// Most recent rows, newest first
    pub async fn recent(&self, limit: u64) -> Result<Vec<ReportRecord>> {
        let rows = report_records::Entity::find()
            .order_by_desc(report_records::Column::Reportdate)
            .order_by_desc(report_records::Column::ContecId)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to read recent report records")?;

        Ok(rows.into_iter().map(ReportRecord::from).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        report_records::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count report records")
    }
}
