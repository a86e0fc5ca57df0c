use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};

use models::{driver, manufacturer};

mod support;
use support::{empty_request, get, json_request, send, spawn_app};

fn usernames(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|i| i["username"].as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_manufacturer_list_is_paginated_by_five() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let tok = Some(t.token.as_str());
    let resp = send(&t.app, json_request("POST", "/manufacturers", tok, json!({"name": "Existing", "country": "France"}))).await?;
    assert_eq!(resp.status, StatusCode::CREATED);
    for i in 0..10 {
        let body = json!({"name": format!("Maker {i:02}"), "country": "Japan"});
        send(&t.app, json_request("POST", "/manufacturers", tok, body)).await?;
    }

    let resp = send(&t.app, get("/manufacturers", tok)).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["items"].as_array().map(Vec::len), Some(5));
    assert_eq!(resp.body["is_paginated"], true);
    assert_eq!(resp.body["total_pages"], 3);
    assert_eq!(resp.body["next_page_query"], "page=2");

    let resp = send(&t.app, get("/manufacturers?page=last", tok)).await?;
    assert_eq!(resp.body["page"]["number"], 3);
    assert_eq!(resp.body["items"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_driver_search_matches_exactly_the_substring_hits() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let tok = Some(t.token.as_str());
    driver::create(&t.db, driver::NewDriver { username: "testuser".into(), ..Default::default() }).await?;
    for i in 10..20 {
        driver::create(&t.db, driver::NewDriver { username: format!("usertest{i}"), ..Default::default() }).await?;
    }

    let first = send(&t.app, get("/drivers?search=usertest", tok)).await?;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["page"]["total_items"], 10);
    assert_eq!(first.body["search"], "usertest");
    let second = send(&t.app, get("/drivers?search=usertest&page=2", tok)).await?;

    let mut found = usernames(&first.body);
    found.extend(usernames(&second.body));
    let expected: Vec<String> = (10..20).map(|i| format!("usertest{i}")).collect();
    assert_eq!(found, expected);

    // case-insensitive, and a blank search lists everyone
    let upper = send(&t.app, get("/drivers?search=USERTEST1", tok)).await?;
    assert_eq!(upper.body["page"]["total_items"], 10);
    let blank = send(&t.app, get("/drivers?search=%20%20", tok)).await?;
    assert_eq!(blank.body["page"]["total_items"], 12);
    Ok(())
}

#[tokio::test]
async fn test_car_create_and_detail() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let tok = Some(t.token.as_str());
    let m = manufacturer::create(&t.db, "Toyota", "Japan").await?;

    let body = json!({"model": "model123", "manufacturer_id": m.id, "drivers": [t.driver_id]});
    let resp = send(&t.app, json_request("POST", "/cars", tok, body)).await?;
    assert_eq!(resp.status, StatusCode::CREATED);
    let id = resp.body["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(resp.location(), Some(format!("/cars/{id}").as_str()));

    let detail = send(&t.app, get(&format!("/cars/{id}"), tok)).await?;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body["model"], "model123");
    assert_eq!(detail.body["manufacturer"]["name"], "Toyota");
    assert_eq!(detail.body["drivers"][0]["username"], "admin");

    let bad = send(&t.app, json_request("POST", "/cars", tok, json!({"model": ""}))).await?;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert!(bad.body["fields"]["manufacturer"].is_array());
    assert!(bad.body["fields"]["model"].is_array());
    Ok(())
}

#[tokio::test]
async fn test_unparseable_bodies_are_field_errors() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let tok = Some(t.token.as_str());

    let resp = send(&t.app, json_request("POST", "/cars", tok, json!({"model": "x", "manufacturer_id": "abc"}))).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "validation failed");
    assert!(resp.body["fields"]["__all__"][0].is_string());

    let resp = send(&t.app, json_request("POST", "/cars", tok, json!({"model": "x", "drivers": ["not-a-uuid"]}))).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body["fields"]["__all__"].is_array());

    let raw = Request::builder()
        .method("POST")
        .uri("/manufacturers")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", t.token))
        .body(Body::from("{not json"))?;
    let resp = send(&t.app, raw).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "validation failed");

    let untyped = Request::builder()
        .method("POST")
        .uri("/manufacturers")
        .header(header::AUTHORIZATION, format!("Bearer {}", t.token))
        .body(Body::from(r#"{"name": "Audi", "country": "Germany"}"#))?;
    let resp = send(&t.app, untyped).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_toggle_assign_twice_restores_membership() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let tok = Some(t.token.as_str());
    let m = manufacturer::create(&t.db, "Toyota", "Japan").await?;
    let car = models::car::create(&t.db, "Camry", m.id, &[]).await?;
    let uri = format!("/cars/{}/toggle-assign", car.id);

    let resp = send(&t.app, get(&uri, tok)).await?;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some(format!("/cars/{}", car.id).as_str()));
    assert_eq!(resp.body["state"], "assigned");
    let detail = send(&t.app, get(&format!("/cars/{}", car.id), tok)).await?;
    assert_eq!(detail.body["drivers"].as_array().map(Vec::len), Some(1));

    let resp = send(&t.app, get(&uri, tok)).await?;
    assert_eq!(resp.body["state"], "unassigned");
    let detail = send(&t.app, get(&format!("/cars/{}", car.id), tok)).await?;
    assert_eq!(detail.body["drivers"].as_array().map(Vec::len), Some(0));

    let missing = send(&t.app, get(&format!("/cars/{}/toggle-assign", uuid::Uuid::new_v4()), tok)).await?;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_dashboard_counts_and_visits() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let tok = Some(t.token.as_str());
    let m = manufacturer::create(&t.db, "Toyota", "Japan").await?;
    models::car::create(&t.db, "Camry", m.id, &[]).await?;

    let resp = send(&t.app, get("/", tok)).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({"num_drivers": 1, "num_cars": 1, "num_manufacturers": 1, "num_visits": 1}));

    let resp = send(&t.app, get("/", tok)).await?;
    assert_eq!(resp.body["num_visits"], 2);
    Ok(())
}

#[tokio::test]
async fn test_driver_create_validates_license() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let tok = Some(t.token.as_str());
    let body = json!({
        "username": "john",
        "password1": "Sup3rSecret",
        "password2": "Sup3rSecret",
        "license_number": "abc12345",
    });
    let resp = send(&t.app, json_request("POST", "/drivers", tok, body)).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["fields"]["license_number"][0], "First 3 characters should be uppercase letters");

    let body = json!({
        "username": "john",
        "password1": "Sup3rSecret",
        "password2": "Sup3rSecret",
        "license_number": "JON12345",
        "first_name": "John",
        "last_name": "Smith",
    });
    let resp = send(&t.app, json_request("POST", "/drivers", tok, body)).await?;
    assert_eq!(resp.status, StatusCode::CREATED);
    let url = resp.body["url"].as_str().unwrap_or_default().to_string();
    assert_eq!(resp.location(), Some(url.as_str()));
    assert_eq!(resp.body["display"], "john (John Smith)");

    let resp = send(&t.app, json_request("PUT", &url, tok, json!({"license_number": "JON1234"}))).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["fields"]["license_number"][0], "License number should consist of 8 characters");

    let resp = send(&t.app, json_request("PUT", &url, tok, json!({"license_number": "JON54321"}))).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["license_number"], "JON54321");
    Ok(())
}

#[tokio::test]
async fn test_manufacturer_delete_cascades_to_cars() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let tok = Some(t.token.as_str());
    let m = manufacturer::create(&t.db, "Toyota", "Japan").await?;
    let car = models::car::create(&t.db, "Camry", m.id, &[t.driver_id]).await?;

    let resp = send(&t.app, empty_request("DELETE", &format!("/manufacturers/{}", m.id), tok)).await?;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(send(&t.app, get(&format!("/cars/{}", car.id), tok)).await?.status, StatusCode::NOT_FOUND);
    assert_eq!(send(&t.app, get(&format!("/drivers/{}", t.driver_id), tok)).await?.status, StatusCode::OK);

    let again = send(&t.app, empty_request("DELETE", &format!("/manufacturers/{}", m.id), tok)).await?;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_list_echoes_search_and_hidden_params() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let tok = Some(t.token.as_str());
    let m = manufacturer::create(&t.db, "Toyota", "Japan").await?;
    for model in ["Camry", "Corolla"] {
        models::car::create(&t.db, model, m.id, &[]).await?;
    }

    let resp = send(&t.app, get("/cars?search=%20cam%20&color=blue&page=1", tok)).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["search"], "cam");
    assert_eq!(resp.body["hidden_params"], json!([["color", "blue"]]));
    assert_eq!(resp.body["items"][0]["model"], "Camry");
    assert_eq!(resp.body["items"][0]["manufacturer"]["name"], "Toyota");
    assert!(resp.body["next_page_query"].is_null());
    Ok(())
}
