//! Grid column registry.
//!
//! Column `targets` always equal the column's position: the browser sorts by
//! column index, so every mutation renumbers the list.

use crate::filtering::SortField;
use crate::formatting::Translator;
use serde::Serialize;

/// What a column shows for each order. Drives cell extraction in the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Checkbox,
    OrderIdLink,
    OrderRefLink,
    CreatedDate,
    InvoiceDate,
    Company,
    CustomerLink,
    Amount,
    StatusBadge,
    Actions,
    InvoiceRef,
    DeliveryRef,
    CustomerEmail,
}

impl ColumnKind {
    #[must_use]
    pub fn default_render(self) -> RenderKind {
        match self {
            Self::Checkbox => RenderKind::Checkbox,
            Self::OrderIdLink | Self::OrderRefLink | Self::CustomerLink => RenderKind::Href,
            Self::StatusBadge => RenderKind::Label,
            Self::Actions => RenderKind::Actions,
            Self::CreatedDate
            | Self::InvoiceDate
            | Self::Company
            | Self::Amount
            | Self::InvoiceRef
            | Self::DeliveryRef
            | Self::CustomerEmail => RenderKind::Default,
        }
    }
}

/// Client-side renderer name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderKind {
    #[serde(rename = "checkboxRender")]
    Checkbox,
    #[serde(rename = "hrefRender")]
    Href,
    #[serde(rename = "defaultRender")]
    Default,
    #[serde(rename = "labelRender")]
    Label,
    #[serde(rename = "actionsRender")]
    Actions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    pub name: String,
    pub targets: usize,
    /// Backing field used for sorting. Never sent to the browser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orm: Option<SortField>,
    pub title: String,
    pub orderable: bool,
    pub searchable: bool,
    pub class_name: String,
    pub render: RenderKind,
    #[serde(skip)]
    pub kind: ColumnKind,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, kind: ColumnKind, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: 0,
            orm: None,
            title: title.into(),
            orderable: true,
            searchable: true,
            class_name: "text-center".to_string(),
            render: kind.default_render(),
            kind,
        }
    }

    #[must_use]
    pub fn orm(mut self, field: SortField) -> Self {
        self.orm = Some(field);
        self
    }

    #[must_use]
    pub fn not_orderable(mut self) -> Self {
        self.orderable = false;
        self
    }

    #[must_use]
    pub fn not_searchable(mut self) -> Self {
        self.searchable = false;
        self
    }

    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    #[must_use]
    pub fn render(mut self, render: RenderKind) -> Self {
        self.render = render;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRegistry {
    columns: Vec<ColumnDefinition>,
}

impl ColumnRegistry {
    #[must_use]
    pub fn new(columns: Vec<ColumnDefinition>) -> Self {
        let mut registry = Self { columns };
        registry.reindex();
        registry
    }

    /// The default grid columns, titles translated for `locale`.
    #[must_use]
    pub fn init(translator: &dyn Translator, locale: &str) -> Self {
        let title = |key: &str| translator.translate(key, locale);

        Self::new(vec![
            ColumnDefinition::new(
                "checkbox",
                ColumnKind::Checkbox,
                r#"<input type="checkbox" id="select-all" />"#,
            )
            .not_orderable()
            .not_searchable(),
            ColumnDefinition::new("id", ColumnKind::OrderIdLink, title("Id")).orm(SortField::Id),
            ColumnDefinition::new("ref", ColumnKind::OrderRefLink, title("Reference"))
                .orm(SortField::Ref),
            ColumnDefinition::new("create_date", ColumnKind::CreatedDate, title("Creation date"))
                .orm(SortField::CreatedAt),
            ColumnDefinition::new("invoice_date", ColumnKind::InvoiceDate, title("Invoice date"))
                .orm(SortField::InvoiceDate),
            ColumnDefinition::new("company", ColumnKind::Company, title("Company")).not_orderable(),
            ColumnDefinition::new("client", ColumnKind::CustomerLink, title("Customer name"))
                .not_orderable(),
            ColumnDefinition::new("amount", ColumnKind::Amount, title("Amount")).not_orderable(),
            ColumnDefinition::new("status", ColumnKind::StatusBadge, title("Status"))
                .not_orderable(),
            ColumnDefinition::new("action", ColumnKind::Actions, title("Action"))
                .not_orderable()
                .class_name("text-right"),
        ])
    }

    /// Insert at `index`, or append when `index` is `None` or past the end.
    pub fn add_column(&mut self, definition: ColumnDefinition, index: Option<usize>) {
        match index {
            Some(index) if index <= self.columns.len() => self.columns.insert(index, definition),
            _ => self.columns.push(definition),
        }
        self.reindex();
    }

    /// Remove every column called `name`. Returns whether one was removed.
    pub fn remove_column(&mut self, name: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|column| column.name != name);
        self.reindex();
        self.columns.len() != before
    }

    /// Move the column called `name` to `index` (clamped to the last position).
    pub fn move_column(&mut self, name: &str, index: usize) -> bool {
        let Some(position) = self.columns.iter().position(|column| column.name == name) else {
            return false;
        };
        let column = self.columns.remove(position);
        let index = index.min(self.columns.len());
        self.columns.insert(index, column);
        self.reindex();
        true
    }

    fn reindex(&mut self) {
        for (position, column) in self.columns.iter_mut().enumerate() {
            column.targets = position;
        }
    }

    /// Column definitions; backing fields are stripped unless `with_private_data`.
    #[must_use]
    pub fn column_definitions(&self, with_private_data: bool) -> Vec<ColumnDefinition> {
        if with_private_data {
            return self.columns.clone();
        }
        self.columns
            .iter()
            .cloned()
            .map(|mut column| {
                column.orm = None;
                column
            })
            .collect()
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::CatalogTranslator;

    fn targets(registry: &ColumnRegistry) -> Vec<usize> {
        registry.columns().iter().map(|column| column.targets).collect()
    }

    fn five_columns() -> ColumnRegistry {
        let mut registry = ColumnRegistry::init(&CatalogTranslator, "en_US");
        for name in ["invoice_date", "company", "client", "amount", "status"] {
            registry.remove_column(name);
        }
        registry
    }

    #[test]
    fn test_default_columns() {
        let registry = ColumnRegistry::init(&CatalogTranslator, "en_US");
        let names: Vec<&str> = registry.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "checkbox",
                "id",
                "ref",
                "create_date",
                "invoice_date",
                "company",
                "client",
                "amount",
                "status",
                "action"
            ]
        );
        assert_eq!(targets(&registry), (0..10).collect::<Vec<_>>());
        assert!(!registry.columns()[0].orderable);
        assert!(!registry.columns()[0].searchable);
    }

    #[test]
    fn test_titles_are_translated() {
        let registry = ColumnRegistry::init(&CatalogTranslator, "fr_FR");
        assert_eq!(registry.columns()[2].title, "Référence");
        assert_eq!(registry.columns()[8].title, "Etat");
    }

    #[test]
    fn test_insert_reindexes_without_gaps() {
        let mut registry = five_columns();
        assert_eq!(registry.len(), 5);

        registry.add_column(
            ColumnDefinition::new("email", ColumnKind::CustomerEmail, "Email"),
            Some(2),
        );

        assert_eq!(targets(&registry), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(registry.columns()[2].name, "email");
    }

    #[test]
    fn test_insert_at_zero_and_append() {
        let mut registry = five_columns();
        registry.add_column(ColumnDefinition::new("first", ColumnKind::InvoiceRef, "A"), Some(0));
        registry.add_column(ColumnDefinition::new("last", ColumnKind::DeliveryRef, "B"), None);
        registry.add_column(ColumnDefinition::new("far", ColumnKind::DeliveryRef, "C"), Some(99));

        assert_eq!(registry.columns()[0].name, "first");
        assert_eq!(registry.columns()[6].name, "last");
        assert_eq!(registry.columns()[7].name, "far");
        assert_eq!(targets(&registry), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_remove_and_move() {
        let mut registry = ColumnRegistry::init(&CatalogTranslator, "en_US");
        assert!(registry.remove_column("company"));
        assert!(!registry.remove_column("company"));
        assert!(registry.move_column("action", 1));
        assert!(!registry.move_column("missing", 0));

        assert_eq!(registry.columns()[1].name, "action");
        assert_eq!(targets(&registry), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_backing_fields_stay_private() {
        let registry = ColumnRegistry::init(&CatalogTranslator, "en_US");

        let public = serde_json::to_value(registry.column_definitions(false)).unwrap();
        assert!(public.as_array().unwrap().iter().all(|c| c.get("orm").is_none()));
        assert_eq!(public[1]["className"], "text-center");
        assert_eq!(public[1]["render"], "hrefRender");

        let private = serde_json::to_value(registry.column_definitions(true)).unwrap();
        assert_eq!(private[1]["orm"], "order.id");
        assert!(private[5].get("orm").is_none());
    }
}
