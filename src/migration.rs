//! Schema migrations for the tables the order manager reads and mutates.
//!
//! `order_delay` and `credit_note` reference `order` with a plain (`NO ACTION`) key:
//! the bulk delete has to clear them itself before removing an order.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateOrderTables)]
    }
}

pub struct CreateOrderTables;

impl MigrationName for CreateOrderTables {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_order_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateOrderTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Currency::Table)
                    .if_not_exists()
                    .col(pk(Currency::Id))
                    .col(ColumnDef::new(Currency::Code).string().not_null())
                    .col(ColumnDef::new(Currency::Symbol).string().not_null())
                    .col(
                        ColumnDef::new(Currency::Format)
                            .string()
                            .not_null()
                            .default("%n %s"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(pk(Customer::Id))
                    .col(ColumnDef::new(Customer::Email).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderAddress::Table)
                    .if_not_exists()
                    .col(pk(OrderAddress::Id))
                    .col(ColumnDef::new(OrderAddress::Company).string().null())
                    .col(ColumnDef::new(OrderAddress::Firstname).string().not_null())
                    .col(ColumnDef::new(OrderAddress::Lastname).string().not_null())
                    .col(ColumnDef::new(OrderAddress::Phone).string().null())
                    .col(ColumnDef::new(OrderAddress::Cellphone).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderStatus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderStatus::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderStatus::Code).string().not_null())
                    .col(
                        ColumnDef::new(OrderStatus::Color)
                            .string()
                            .not_null()
                            .default("#000000"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderStatusI18n::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrderStatusI18n::Id).integer().not_null())
                    .col(ColumnDef::new(OrderStatusI18n::Locale).string().not_null())
                    .col(ColumnDef::new(OrderStatusI18n::Title).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(OrderStatusI18n::Id)
                            .col(OrderStatusI18n::Locale),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_status_i18n_status")
                            .from(OrderStatusI18n::Table, OrderStatusI18n::Id)
                            .to(OrderStatus::Table, OrderStatus::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // No key on status_id: the bulk status change may assign any id.
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(pk(Order::Id))
                    .col(ColumnDef::new(Order::Ref).string().not_null())
                    .col(ColumnDef::new(Order::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Order::InvoiceOrderAddressId).integer().not_null())
                    .col(ColumnDef::new(Order::DeliveryOrderAddressId).integer().not_null())
                    .col(ColumnDef::new(Order::InvoiceDate).date_time().null())
                    .col(ColumnDef::new(Order::InvoiceRef).string().null())
                    .col(ColumnDef::new(Order::DeliveryRef).string().null())
                    .col(ColumnDef::new(Order::CurrencyId).integer().not_null())
                    .col(ColumnDef::new(Order::StatusId).integer().not_null())
                    .col(
                        ColumnDef::new(Order::PaymentModuleId)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Order::Postage)
                            .decimal_len(16, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Order::Discount)
                            .decimal_len(16, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Order::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_customer")
                            .from(Order::Table, Order::CustomerId)
                            .to(Customer::Table, Customer::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_invoice_address")
                            .from(Order::Table, Order::InvoiceOrderAddressId)
                            .to(OrderAddress::Table, OrderAddress::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_delivery_address")
                            .from(Order::Table, Order::DeliveryOrderAddressId)
                            .to(OrderAddress::Table, OrderAddress::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_currency")
                            .from(Order::Table, Order::CurrencyId)
                            .to(Currency::Table, Currency::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderProduct::Table)
                    .if_not_exists()
                    .col(pk(OrderProduct::Id))
                    .col(ColumnDef::new(OrderProduct::OrderId).integer().not_null())
                    .col(ColumnDef::new(OrderProduct::ProductRef).string().not_null())
                    .col(ColumnDef::new(OrderProduct::Title).string().not_null())
                    .col(ColumnDef::new(OrderProduct::Price).decimal_len(16, 6).not_null())
                    .col(
                        ColumnDef::new(OrderProduct::TaxAmount)
                            .decimal_len(16, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(OrderProduct::Quantity).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_product_order")
                            .from(OrderProduct::Table, OrderProduct::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderDelay::Table)
                    .if_not_exists()
                    .col(pk(OrderDelay::Id))
                    .col(ColumnDef::new(OrderDelay::OrderId).integer().not_null())
                    .col(ColumnDef::new(OrderDelay::Reason).string().not_null())
                    .col(ColumnDef::new(OrderDelay::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_delay_order")
                            .from(OrderDelay::Table, OrderDelay::OrderId)
                            .to(Order::Table, Order::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditNote::Table)
                    .if_not_exists()
                    .col(pk(CreditNote::Id))
                    .col(ColumnDef::new(CreditNote::OrderId).integer().not_null())
                    .col(ColumnDef::new(CreditNote::Ref).string().not_null())
                    .col(ColumnDef::new(CreditNote::Amount).decimal_len(16, 6).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_note_order")
                            .from(CreditNote::Table, CreditNote::OrderId)
                            .to(Order::Table, Order::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreditNote::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderDelay::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderProduct::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Order::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderStatusI18n::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderStatus::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderAddress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customer::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Currency::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn pk<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[derive(DeriveIden)]
enum Currency {
    Table,
    Id,
    Code,
    Symbol,
    Format,
}

#[derive(DeriveIden)]
enum Customer {
    Table,
    Id,
    Email,
}

#[derive(DeriveIden)]
enum OrderAddress {
    Table,
    Id,
    Company,
    Firstname,
    Lastname,
    Phone,
    Cellphone,
}

#[derive(DeriveIden)]
enum OrderStatus {
    Table,
    Id,
    Code,
    Color,
}

#[derive(DeriveIden)]
enum OrderStatusI18n {
    #[sea_orm(iden = "order_status_i18n")]
    Table,
    Id,
    Locale,
    Title,
}

#[derive(DeriveIden)]
enum Order {
    Table,
    Id,
    Ref,
    CustomerId,
    InvoiceOrderAddressId,
    DeliveryOrderAddressId,
    InvoiceDate,
    InvoiceRef,
    DeliveryRef,
    CurrencyId,
    StatusId,
    PaymentModuleId,
    Postage,
    Discount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OrderProduct {
    Table,
    Id,
    OrderId,
    ProductRef,
    Title,
    Price,
    TaxAmount,
    Quantity,
}

#[derive(DeriveIden)]
enum OrderDelay {
    Table,
    Id,
    OrderId,
    Reason,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CreditNote {
    Table,
    Id,
    OrderId,
    Ref,
    Amount,
}
