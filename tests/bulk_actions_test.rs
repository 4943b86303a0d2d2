use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use easy_order_manager::entities::{credit_note, order, order_delay};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

mod common;
use common::{
    BASE, OrderSeed, TOKEN, ajax_request, insert_credit_note, insert_delay, insert_orders, send,
    send_json, setup_test_app, setup_test_db,
};

#[tokio::test]
async fn test_delete_skips_cancelled_orders() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    insert_orders(&db, vec![OrderSeed::new(10, 5), OrderSeed::new(11, 2)])
        .await
        .unwrap();
    let app = setup_test_app(db.clone());

    let (status, response) = send_json(
        &app,
        ajax_request(
            "POST",
            &format!("{BASE}/delete-selected"),
            Some(json!({"order_ids": [10, 11]})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["deleted_orders"], json!([11]));
    assert_eq!(response["not_deleted_orders"], json!([10]));
    assert_eq!(response["message"], "Some orders could not be deleted");
    assert_eq!(order::Entity::find().count(&db).await.unwrap(), 1);
    assert!(order::Entity::find_by_id(10).one(&db).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_cascades_dependents_by_status() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    insert_orders(&db, vec![OrderSeed::new(1, 1), OrderSeed::new(4, 4)])
        .await
        .unwrap();
    insert_delay(&db, 1).await.unwrap();
    insert_credit_note(&db, 4).await.unwrap();
    let app = setup_test_app(db.clone());

    let (_, response) = send_json(
        &app,
        ajax_request(
            "POST",
            &format!("{BASE}/delete-selected"),
            Some(json!({"order_ids": ["1", "4"]})),
        ),
    )
    .await;

    assert_eq!(response["deleted_orders"], json!([1, 4]));
    assert_eq!(response["not_deleted_orders"], json!([]));
    assert!(response.get("message").is_none());
    assert_eq!(order_delay::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(credit_note::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(order::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_referenced_order_is_reported_and_batch_continues() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    insert_orders(&db, vec![OrderSeed::new(2, 2), OrderSeed::new(3, 3)])
        .await
        .unwrap();
    // Paid orders keep their credit notes, so the key blocks the delete.
    insert_credit_note(&db, 2).await.unwrap();
    let app = setup_test_app(db.clone());

    let (status, response) = send_json(
        &app,
        ajax_request(
            "POST",
            &format!("{BASE}/delete-selected?locale=fr_FR"),
            Some(json!({"order_ids": [2, 3]})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["deleted_orders"], json!([3]));
    assert_eq!(response["not_deleted_orders"], json!([2]));
    assert_eq!(response["errors"][0]["order_id"], 2);
    assert_eq!(
        response["message"],
        "Certaines commandes n'ont pas pu être supprimées"
    );
    assert!(order::Entity::find_by_id(2).one(&db).await.unwrap().is_some());
    assert_eq!(credit_note::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_change_status_then_read_it_back() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    insert_orders(&db, vec![OrderSeed::new(10, 1), OrderSeed::new(11, 2)])
        .await
        .unwrap();
    let app = setup_test_app(db);

    let (status, response) = send_json(
        &app,
        ajax_request(
            "POST",
            &format!("{BASE}/change-status-selected"),
            Some(json!({"order_ids": [10, 11, 404], "status_id": "3"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["updated_orders"], json!([10, 11]));

    let (_, response) = send_json(
        &app,
        ajax_request(
            "POST",
            &format!("{BASE}/get-status-selected"),
            Some(json!({"order_ids": [10, 11]})),
        ),
    )
    .await;
    let orders = response["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|order| order["label"] == "Processing"));
    assert!(orders.iter().all(|order| order["color"] == "#f0ad4e"));
}

#[tokio::test]
async fn test_get_status_is_localized_with_fallback() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    insert_orders(&db, vec![OrderSeed::new(1, 2), OrderSeed::new(2, 99)])
        .await
        .unwrap();
    let app = setup_test_app(db);

    let (_, response) = send_json(
        &app,
        ajax_request(
            "POST",
            &format!("{BASE}/get-status-selected?locale=fr_FR"),
            Some(json!({"order_ids": [1, 2]})),
        ),
    )
    .await;

    assert_eq!(response["orders"][0]["order_id"], 1);
    assert_eq!(response["orders"][0]["label"], "Payée");
    assert_eq!(response["orders"][1]["label"], "unknown");
    assert_eq!(response["orders"][1]["color"], "#000000");
}

#[tokio::test]
async fn test_bulk_bodies_are_validated() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    for path in ["delete-selected", "change-status-selected", "get-status-selected"] {
        let request = Request::builder()
            .method("POST")
            .uri(format!("{BASE}/{path}"))
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"order_ids\": [1,"))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
    }

    // status_id is required
    let (status, _) = send_json(
        &app,
        ajax_request(
            "POST",
            &format!("{BASE}/change-status-selected"),
            Some(json!({"order_ids": [1]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
