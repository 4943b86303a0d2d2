use super::{
    AddressView, Cascade, CurrencyView, CustomerView, DeleteError, OrderLine, OrderRecord,
    OrderRepository, StatusView,
};
use crate::entities::{
    credit_note, currency, customer, order, order_address, order_delay, order_product,
    order_status, order_status_i18n,
};
use crate::filtering::criteria::{DELIVERY_ADDRESS_ALIAS, INVOICE_ADDRESS_ALIAS};
use crate::filtering::{Join, OrderCriteria};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Select, Set, TransactionTrait, sea_query::Alias,
};
use std::collections::{BTreeSet, HashMap};

/// [`OrderRepository`] over a SeaORM connection.
///
/// Pages are read in two steps: the filtered, sorted and paginated order
/// rows, then one batched query per related table for that page.
#[derive(Debug, Clone)]
pub struct SeaOrmOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn select(&self, criteria: &OrderCriteria) -> Select<order::Entity> {
        let backend = self.db.get_database_backend();
        let mut select = order::Entity::find();

        for join in criteria.joins() {
            select = match join {
                Join::Customer => select.join(JoinType::InnerJoin, order::Relation::Customer.def()),
                Join::InvoiceAddress => select.join_as(
                    JoinType::InnerJoin,
                    order::Relation::InvoiceAddress.def(),
                    Alias::new(INVOICE_ADDRESS_ALIAS),
                ),
                Join::DeliveryAddress => select.join_as(
                    JoinType::LeftJoin,
                    order::Relation::DeliveryAddress.def(),
                    Alias::new(DELIVERY_ADDRESS_ALIAS),
                ),
            };
        }

        let condition = criteria
            .predicates()
            .iter()
            .fold(Condition::all(), |condition, predicate| {
                condition.add(predicate.to_condition(backend))
            });
        select = select.filter(condition);

        if criteria.is_grouped_by_id() {
            select = select.group_by(order::Column::Id);
        }
        select
    }

    async fn load_records(
        &self,
        orders: Vec<order::Model>,
        locale: &str,
    ) -> Result<Vec<OrderRecord>, DbErr> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        let customer_ids = unique(orders.iter().map(|o| o.customer_id));
        let address_ids = unique(
            orders
                .iter()
                .flat_map(|o| [o.invoice_order_address_id, o.delivery_order_address_id]),
        );
        let currency_ids = unique(orders.iter().map(|o| o.currency_id));
        let status_ids = unique(orders.iter().map(|o| o.status_id));

        let customers: HashMap<i32, customer::Model> = customer::Entity::find()
            .filter(customer::Column::Id.is_in(customer_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        let addresses: HashMap<i32, order_address::Model> = order_address::Entity::find()
            .filter(order_address::Column::Id.is_in(address_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        let currencies: HashMap<i32, currency::Model> = currency::Entity::find()
            .filter(currency::Column::Id.is_in(currency_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        let statuses: HashMap<i32, order_status::Model> = order_status::Entity::find()
            .filter(order_status::Column::Id.is_in(status_ids.clone()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        let titles: HashMap<i32, String> = order_status_i18n::Entity::find()
            .filter(order_status_i18n::Column::Id.is_in(status_ids))
            .filter(order_status_i18n::Column::Locale.eq(locale))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.title))
            .collect();

        let mut lines: HashMap<i32, Vec<OrderLine>> = HashMap::new();
        for line in order_product::Entity::find()
            .filter(order_product::Column::OrderId.is_in(order_ids))
            .order_by_asc(order_product::Column::Id)
            .all(&self.db)
            .await?
        {
            lines.entry(line.order_id).or_default().push(OrderLine {
                product_ref: line.product_ref,
                title: line.title,
                price: line.price,
                tax_amount: line.tax_amount,
                quantity: line.quantity,
            });
        }

        let address_view = |id: i32| {
            addresses.get(&id).map(|address| AddressView {
                company: address.company.clone(),
                firstname: address.firstname.clone(),
                lastname: address.lastname.clone(),
                phone: address.phone.clone(),
                cellphone: address.cellphone.clone(),
            })
        };

        Ok(orders
            .into_iter()
            .map(|model| OrderRecord {
                customer: customers.get(&model.customer_id).map(|customer| CustomerView {
                    id: customer.id,
                    email: customer.email.clone(),
                }),
                invoice_address: address_view(model.invoice_order_address_id),
                delivery_address: address_view(model.delivery_order_address_id),
                status: statuses.get(&model.status_id).map(|status| StatusView {
                    id: status.id,
                    code: status.code.clone(),
                    color: status.color.clone(),
                    title: titles.get(&status.id).cloned(),
                }),
                currency: currencies.get(&model.currency_id).map(|currency| CurrencyView {
                    code: currency.code.clone(),
                    symbol: currency.symbol.clone(),
                    format: currency.format.clone(),
                }),
                lines: lines.remove(&model.id).unwrap_or_default(),
                id: model.id,
                reference: model.reference,
                created_at: model.created_at,
                invoice_date: model.invoice_date,
                invoice_ref: model.invoice_ref,
                delivery_ref: model.delivery_ref,
                status_id: model.status_id,
                payment_module_id: model.payment_module_id,
                postage: model.postage,
                discount: model.discount,
            })
            .collect())
    }
}

fn unique(ids: impl Iterator<Item = i32>) -> Vec<i32> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn count(&self, criteria: &OrderCriteria) -> Result<u64, DbErr> {
        self.select(criteria).count(&self.db).await
    }

    async fn find(
        &self,
        criteria: &OrderCriteria,
        locale: &str,
    ) -> Result<Vec<OrderRecord>, DbErr> {
        let mut select = self.select(criteria);
        if let Some((field, direction)) = criteria.sort() {
            select = select.order_by(field.column(), direction.into());
        }
        if criteria.offset() > 0 {
            select = select.offset(criteria.offset());
        }
        if let Some(limit) = criteria.limit() {
            select = select.limit(limit);
        }

        let orders = select.all(&self.db).await?;
        tracing::debug!(rows = orders.len(), "Fetched order page");
        self.load_records(orders, locale).await
    }

    async fn delete_order(&self, id: i32, cascade: Cascade) -> Result<(), DeleteError> {
        let txn = self.db.begin().await?;

        match cascade {
            Cascade::Delays => {
                order_delay::Entity::delete_many()
                    .filter(order_delay::Column::OrderId.eq(id))
                    .exec(&txn)
                    .await?;
            }
            Cascade::CreditNotes => {
                credit_note::Entity::delete_many()
                    .filter(credit_note::Column::OrderId.eq(id))
                    .exec(&txn)
                    .await?;
            }
            Cascade::None => {}
        }

        // Order lines go with the order through their cascading key.
        order::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn update_status(&self, ids: &[i32], status_id: i32) -> Result<Vec<i32>, DbErr> {
        let mut updated = Vec::new();
        for &id in ids {
            if updated.contains(&id) {
                continue;
            }
            let Some(model) = order::Entity::find_by_id(id).one(&self.db).await? else {
                continue;
            };
            let mut active: order::ActiveModel = model.into();
            active.status_id = Set(status_id);
            active.update(&self.db).await?;
            updated.push(id);
        }
        Ok(updated)
    }
}
