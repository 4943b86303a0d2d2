use axum::http::{StatusCode, header};
use tower::ServiceExt;

mod common;
use common::{BASE, OrderSeed, ajax_request, insert_orders, setup_test_app, setup_test_db};

const HEADER: &str =
    "ID;Ref;CreateDate;InvoiceDate;Company;Customer firstName;Customer lastName;Amount;Status";

async fn export(app: &axum::Router, query: &str) -> (StatusCode, String, String) {
    let response = app
        .clone()
        .oneshot(ajax_request("GET", &format!("{BASE}/list/csv?{query}"), None))
        .await
        .unwrap();
    let status = response.status();
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .map(|value| value.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, disposition, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_export_has_exact_header_and_a_row_per_line() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let mut seed = OrderSeed::new(1, 2);
    seed.lines = vec![(20, 4, 2), (3, 1, 1)];
    insert_orders(&db, vec![seed, OrderSeed::new(2, 4)])
        .await
        .unwrap();
    let app = setup_test_app(db);

    let (status, disposition, body) = export(&app, "order[0][column]=1&order[0][dir]=asc").await;
    let lines: Vec<&str> = body.lines().collect();

    assert_eq!(status, StatusCode::OK);
    assert!(disposition.starts_with("attachment; filename=\"export_list_order_datatable"));
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[1],
        "1;ORD000001;2024-03-01 12:00:00;;Company 1;First1;Last1;48.00;paid"
    );
    assert_eq!(
        lines[2],
        "1;ORD000001;2024-03-01 12:00:00;;Company 1;First1;Last1;4.00;paid"
    );
    assert!(lines[3].starts_with("2;ORD000002;"));
    assert!(lines[3].ends_with(";12.00;sent"));
}

#[tokio::test]
async fn test_export_ignores_page_size_but_honours_filters() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    insert_orders(&db, (1..=40).map(|id| OrderSeed::new(id, id % 2 + 1)).collect())
        .await
        .unwrap();
    let app = setup_test_app(db);

    let (_, _, body) = export(&app, "length=10").await;
    assert_eq!(body.lines().count(), 41);

    let (_, _, body) = export(&app, "filter[status]=1").await;
    assert_eq!(body.lines().count(), 21);
    assert!(body.lines().skip(1).all(|line| line.ends_with(";not_paid")));
}

#[tokio::test]
async fn test_export_with_no_orders_is_header_only() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, _, body) = export(&app, "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, format!("{HEADER}\n"));
}
