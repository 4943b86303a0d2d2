//! HTML shell of the order list page. The grid itself is filled by the client
//! from the JSON endpoints.

use crate::service::ListPage;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Column definitions as JSON, safe to embed in a `<script>` element.
fn columns_json(page: &ListPage) -> String {
    serde_json::to_string(&page.columns)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

#[must_use]
pub fn list_page(page: &ListPage, list_url: &str, csv_url: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (page.module_name) }
            }
            body {
                div #easy-order-manager
                    data-module=(page.module_name)
                    data-version=(page.module_version)
                    data-list-url=(list_url)
                    data-csv-url=(csv_url) {
                    @for (name, snippet) in page.template_fields.iter() {
                        div class="template-field" data-field=(name) { (PreEscaped(snippet)) }
                    }
                    table #order-grid class="table table-striped" {}
                }
                script #columns-definition type="application/json" {
                    (PreEscaped(columns_json(page)))
                }
            }
        }
    }
}
