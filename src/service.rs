use crate::bulk;
use crate::columns::{ColumnDefinition, ColumnRegistry};
use crate::config::ManagerConfig;
use crate::errors::ApiError;
use crate::export::{self, CsvExport};
use crate::filtering::{Join, OrderCriteria, apply_filters, apply_pagination, apply_sort};
use crate::formatting::{CatalogTranslator, MoneyFormatter, Translator, UrlBuilder};
use crate::hooks::{Hooks, TemplateFields};
use crate::models::{
    DeleteSelectedResponse, GridRequest, GridResponse, StatusSelectedResponse,
    UpdatedOrdersResponse,
};
use crate::projection::{ProjectionContext, project_rows};
use crate::repository::{OrderRecord, OrderRepository};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// One grid page of at most the configured page size.
    Grid,
    /// Everything up to the CSV cap.
    Export,
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<OrderRecord>,
    pub records_total: u64,
    pub records_filtered: u64,
    pub is_filtered: bool,
}

/// What the HTML list page needs.
#[derive(Debug, Clone)]
pub struct ListPage {
    pub module_name: &'static str,
    pub module_version: &'static str,
    /// Public column definitions, without backing fields.
    pub columns: Vec<ColumnDefinition>,
    pub template_fields: TemplateFields,
}

pub struct OrderManagerService {
    repository: Arc<dyn OrderRepository>,
    config: Arc<ManagerConfig>,
    hooks: Hooks,
    translator: Arc<dyn Translator>,
    money: MoneyFormatter,
    urls: UrlBuilder,
}

impl OrderManagerService {
    pub fn new(repository: Arc<dyn OrderRepository>, config: Arc<ManagerConfig>) -> Self {
        let urls = UrlBuilder::new(&config.base_url);
        Self {
            repository,
            config,
            hooks: Hooks::default(),
            translator: Arc::new(CatalogTranslator),
            money: MoneyFormatter,
            urls,
        }
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    #[must_use]
    pub fn repository(&self) -> &dyn OrderRepository {
        self.repository.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// The request's `locale`, else the configured default.
    #[must_use]
    pub fn locale<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.config.default_locale)
    }

    /// Default columns with every column-definition hook applied.
    #[must_use]
    pub fn column_registry(&self, locale: &str) -> ColumnRegistry {
        let mut registry = ColumnRegistry::init(self.translator.as_ref(), locale);
        self.hooks.define_columns(&mut registry, locale);
        registry
    }

    /// Run the filter pipeline: sort, count, hook, filter, count, paginate, fetch.
    ///
    /// # Errors
    ///
    /// Propagates database errors.
    pub async fn get_order_filter(
        &self,
        request: &GridRequest,
        columns: &[ColumnDefinition],
        mode: FetchMode,
    ) -> Result<OrderPage, ApiError> {
        let locale = self.locale(request.locale.as_deref());

        let criteria = OrderCriteria::new().with_join(Join::Customer);
        let criteria = apply_sort(criteria, &request.order, columns);
        let records_total = self.repository.count(&criteria).await?;

        let criteria = self.hooks.before_filter(request, criteria);
        let criteria = apply_filters(criteria, &request.filters);
        let records_filtered = self.repository.count(&criteria).await?;

        let criteria = match mode {
            FetchMode::Grid => apply_pagination(
                criteria,
                request.start,
                Some(self.config.grid_limit(request.length)),
            ),
            FetchMode::Export => {
                let filters = &request.filters;
                let criteria =
                    if filters.search_company.is_empty() && filters.search_customer.is_empty() {
                        criteria.with_join(Join::DeliveryAddress)
                    } else {
                        criteria
                    };
                apply_pagination(criteria, request.start, self.config.csv_limit)
            }
        };

        let orders = self.repository.find(&criteria, locale).await?;
        tracing::debug!(
            records_total,
            records_filtered,
            rows = orders.len(),
            ?mode,
            "Order filter done"
        );

        Ok(OrderPage {
            orders,
            records_total,
            records_filtered,
            is_filtered: request.filters.is_filtered,
        })
    }

    /// # Errors
    ///
    /// Propagates database errors.
    pub async fn grid(&self, request: &GridRequest) -> Result<GridResponse, ApiError> {
        let locale = self.locale(request.locale.as_deref());
        let registry = self.column_registry(locale);
        let columns = registry.column_definitions(true);

        let page = self.get_order_filter(request, &columns, FetchMode::Grid).await?;
        let ctx = ProjectionContext {
            money: &self.money,
            urls: &self.urls,
        };
        let data = project_rows(&columns, &page.orders, &ctx);

        Ok(GridResponse {
            draw: request.draw,
            records_total: page.records_total,
            records_filtered: page.records_filtered,
            orders: data.len(),
            data,
        })
    }

    /// # Errors
    ///
    /// Propagates database errors and export write failures.
    pub async fn export_csv(&self, request: &GridRequest) -> Result<CsvExport, ApiError> {
        let locale = self.locale(request.locale.as_deref());
        let columns = self.column_registry(locale).column_definitions(true);
        let page = self
            .get_order_filter(request, &columns, FetchMode::Export)
            .await?;
        export::write_export(&self.config.export_dir, &page.orders).await
    }

    #[must_use]
    pub fn list_page(&self, locale: &str) -> ListPage {
        ListPage {
            module_name: crate::MODULE_NAME,
            module_version: crate::MODULE_VERSION,
            columns: self.column_registry(locale).column_definitions(false),
            template_fields: self.hooks.template_fields(),
        }
    }

    /// # Errors
    ///
    /// Propagates database errors other than remaining references.
    pub async fn delete_selected(
        &self,
        order_ids: &[i32],
        locale: &str,
    ) -> Result<DeleteSelectedResponse, ApiError> {
        Ok(bulk::delete_selected(
            self.repository.as_ref(),
            self.translator.as_ref(),
            locale,
            order_ids,
        )
        .await?)
    }

    /// # Errors
    ///
    /// Propagates database errors.
    pub async fn change_status_selected(
        &self,
        order_ids: &[i32],
        status_id: i32,
    ) -> Result<UpdatedOrdersResponse, ApiError> {
        Ok(bulk::change_status_selected(self.repository.as_ref(), order_ids, status_id).await?)
    }

    /// # Errors
    ///
    /// Propagates database errors.
    pub async fn get_status_selected(
        &self,
        order_ids: &[i32],
        locale: &str,
    ) -> Result<StatusSelectedResponse, ApiError> {
        Ok(bulk::get_status_selected(self.repository.as_ref(), locale, order_ids).await?)
    }
}

impl std::fmt::Debug for OrderManagerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderManagerService")
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
