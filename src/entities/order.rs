use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "ref")]
    pub reference: String,
    pub customer_id: i32,
    pub invoice_order_address_id: i32,
    pub delivery_order_address_id: i32,
    pub invoice_date: Option<DateTime>,
    pub invoice_ref: Option<String>,
    pub delivery_ref: Option<String>,
    pub currency_id: i32,
    pub status_id: i32,
    pub payment_module_id: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 6)))")]
    pub postage: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 6)))")]
    pub discount: Decimal,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,

    #[sea_orm(
        belongs_to = "super::order_address::Entity",
        from = "Column::InvoiceOrderAddressId",
        to = "super::order_address::Column::Id"
    )]
    InvoiceAddress,

    #[sea_orm(
        belongs_to = "super::order_address::Entity",
        from = "Column::DeliveryOrderAddressId",
        to = "super::order_address::Column::Id"
    )]
    DeliveryAddress,

    #[sea_orm(
        belongs_to = "super::currency::Entity",
        from = "Column::CurrencyId",
        to = "super::currency::Column::Id"
    )]
    Currency,

    #[sea_orm(has_many = "super::order_product::Entity")]
    Products,

    #[sea_orm(has_many = "super::order_delay::Entity")]
    Delays,

    #[sea_orm(has_many = "super::credit_note::Entity")]
    CreditNotes,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::currency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currency.def()
    }
}

impl Related<super::order_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::order_delay::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Delays.def()
    }
}

impl Related<super::credit_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditNotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
