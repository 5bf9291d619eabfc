use sea_orm::entity::prelude::*;

/// One invoice/service line. Column names follow the legacy table layout.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "roku_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub contec_id: i32,

    #[sea_orm(column_type = "Date")]
    pub reportdate: Date,

    pub designator: Option<String>,

    #[sea_orm(column_name = "TrackingID")]
    pub tracking_id: Option<String>,

    pub invoice_code: String,

    pub qty: i32,

    #[sea_orm(column_type = "Double")]
    pub rate: f64,

    #[sea_orm(column_type = "Double")]
    pub amount: f64,

    pub invoice_number: Option<String>,

    pub servicecode: String,

    #[sea_orm(column_name = "Palletsize")]
    pub pallet_size: Option<i32>,

    #[sea_orm(column_name = "PalletCount")]
    pub pallet_count: Option<i32>,

    #[sea_orm(column_name = "Model")]
    pub model: String,

    #[sea_orm(column_name = "TestDate", column_type = "Date")]
    pub test_date: Option<Date>,

    #[sea_orm(column_name = "FailureDescription")]
    pub failure_description: Option<String>,

    pub failurecode: Option<String>,

    #[sea_orm(column_name = "PartDescription")]
    pub part_description: Option<String>,

    pub invoicetype: String,

    #[sea_orm(column_name = "Invoice_Reference")]
    pub invoice_reference: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
