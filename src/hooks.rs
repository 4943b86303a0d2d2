//! Extension points run while serving the grid.
//!
//! ```rust,ignore
//! struct OnlyPaid;
//!
//! impl BeforeFilterHook for OnlyPaid {
//!     fn before_filter(&self, _request: &GridRequest, criteria: OrderCriteria) -> OrderCriteria {
//!         criteria.filter(Predicate::StatusIn(vec![2, 3, 4]))
//!     }
//! }
//!
//! let hooks = Hooks::default().with_before_filter(Arc::new(OnlyPaid));
//! ```

use crate::columns::ColumnRegistry;
use crate::filtering::OrderCriteria;
use crate::models::GridRequest;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Runs after the total count and before the request filters.
pub trait BeforeFilterHook: Send + Sync {
    fn before_filter(&self, request: &GridRequest, criteria: OrderCriteria) -> OrderCriteria;
}

/// Adds, removes or moves grid columns after the defaults are built.
pub trait ColumnDefinitionHook: Send + Sync {
    fn define_columns(&self, registry: &mut ColumnRegistry, locale: &str);
}

/// Contributes named HTML snippets to the list page.
pub trait TemplateFieldHook: Send + Sync {
    fn template_fields(&self, fields: &mut TemplateFields);
}

/// Named HTML snippets rendered by the list page, in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFields {
    fields: BTreeMap<String, String>,
}

impl TemplateFields {
    pub fn add(&mut self, name: impl Into<String>, html: impl Into<String>) {
        self.fields.insert(name.into(), html.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, html)| (name.as_str(), html.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Clone, Default)]
pub struct Hooks {
    before_filter: Vec<Arc<dyn BeforeFilterHook>>,
    column_definition: Vec<Arc<dyn ColumnDefinitionHook>>,
    template_field: Vec<Arc<dyn TemplateFieldHook>>,
}

impl Hooks {
    #[must_use]
    pub fn with_before_filter(mut self, hook: Arc<dyn BeforeFilterHook>) -> Self {
        self.before_filter.push(hook);
        self
    }

    #[must_use]
    pub fn with_column_definition(mut self, hook: Arc<dyn ColumnDefinitionHook>) -> Self {
        self.column_definition.push(hook);
        self
    }

    #[must_use]
    pub fn with_template_field(mut self, hook: Arc<dyn TemplateFieldHook>) -> Self {
        self.template_field.push(hook);
        self
    }

    #[must_use]
    pub fn before_filter(&self, request: &GridRequest, criteria: OrderCriteria) -> OrderCriteria {
        self.before_filter
            .iter()
            .fold(criteria, |criteria, hook| hook.before_filter(request, criteria))
    }

    pub fn define_columns(&self, registry: &mut ColumnRegistry, locale: &str) {
        for hook in &self.column_definition {
            hook.define_columns(registry, locale);
        }
    }

    #[must_use]
    pub fn template_fields(&self) -> TemplateFields {
        let mut fields = TemplateFields::default();
        for hook in &self.template_field {
            hook.template_fields(&mut fields);
        }
        fields
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("before_filter", &self.before_filter.len())
            .field("column_definition", &self.column_definition.len())
            .field("template_field", &self.template_field.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{ColumnDefinition, ColumnKind};
    use crate::filtering::Predicate;
    use crate::formatting::CatalogTranslator;

    struct ExcludeCancelled;

    impl BeforeFilterHook for ExcludeCancelled {
        fn before_filter(&self, _request: &GridRequest, criteria: OrderCriteria) -> OrderCriteria {
            criteria.filter(Predicate::StatusIn(vec![1, 2, 3, 4]))
        }
    }

    struct EmailColumn;

    impl ColumnDefinitionHook for EmailColumn {
        fn define_columns(&self, registry: &mut ColumnRegistry, _locale: &str) {
            registry.remove_column("company");
            registry.add_column(
                ColumnDefinition::new("email", ColumnKind::CustomerEmail, "Email"),
                Some(5),
            );
        }
    }

    struct Banner;

    impl TemplateFieldHook for Banner {
        fn template_fields(&self, fields: &mut TemplateFields) {
            fields.add("banner", "<p>Export runs nightly</p>");
            fields.add("obsolete", "<p>old</p>");
            fields.remove("obsolete");
        }
    }

    #[test]
    fn test_hooks_run_in_order() {
        let hooks = Hooks::default()
            .with_before_filter(Arc::new(ExcludeCancelled))
            .with_column_definition(Arc::new(EmailColumn))
            .with_template_field(Arc::new(Banner));

        let criteria = hooks.before_filter(&GridRequest::default(), OrderCriteria::new());
        assert_eq!(criteria.predicates().len(), 1);

        let mut registry = ColumnRegistry::init(&CatalogTranslator, "en_US");
        hooks.define_columns(&mut registry, "en_US");
        assert_eq!(registry.columns()[5].name, "email");
        assert_eq!(registry.columns()[5].targets, 5);
        assert_eq!(registry.len(), 10);

        let fields = hooks.template_fields();
        assert_eq!(fields.get("banner"), Some("<p>Export runs nightly</p>"));
        assert_eq!(fields.get("obsolete"), None);
    }
}
