use std::net::SocketAddr;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::store::memory::MemoryDatabase;
use tokio::net::TcpListener;

use server::startup::build_app;

struct TestApp {
    base_url: String,
    client: reqwest::Client,
    db: Arc<MemoryDatabase>,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    let db = Arc::new(MemoryDatabase::new());
    let app = build_app(Arc::clone(&db));
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, client: reqwest::Client::new(), db })
}

fn address(street: &str) -> Value {
    json!({ "country": "Germany", "city": "Berlin", "street": street })
}

async fn create_supplier(app: &TestApp) -> anyhow::Result<String> {
    let res = app
        .client
        .post(app.url("/supplier/create"))
        .json(&json!({ "name": "Acme", "address": address("Main 1"), "phone_number": "+49 30 1234" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body: Value = res.json().await?;
    Ok(body["id"].as_str().unwrap_or_default().to_string())
}

async fn create_product(app: &TestApp, supplier_id: &str, stock: i32) -> anyhow::Result<String> {
    let res = app
        .client
        .post(app.url("/product/create"))
        .json(&json!({
            "name": "Widget",
            "category": "tools",
            "price": "19.99",
            "available_stock": stock,
            "supplierID": supplier_id,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body: Value = res.json().await?;
    Ok(body["id"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn user_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = app
        .client
        .post(app.url("/user/create"))
        .json(&json!({
            "name": "Ann",
            "surname": "Lee",
            "birthday": "1990-04-12",
            "gender": "female",
            "address": address("Linden 5"),
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Value = res.json().await?;
    let id = created["id"].as_str().unwrap().to_string();

    let res = app.client.get(app.url("/user/users?name=Ann&surname=Lee")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let found: Value = res.json().await?;
    assert_eq!(found["users"].as_array().unwrap().len(), 1);
    assert_eq!(found["users"][0]["birthday"], "1990-04-12");

    let res = app.client.get(app.url("/user/usersList?limit=1&offset=0")).send().await?;
    let page: Value = res.json().await?;
    assert_eq!(page["users"].as_array().unwrap().len(), 1);
    assert_eq!(page["has_more"], true);

    let res = app
        .client
        .put(app.url(&format!("/user/updateAddress/{id}")))
        .json(&address("Ring 9"))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let addr: Value = app.client.get(app.url(&format!("/user/address/{id}"))).send().await?.json().await?;
    assert_eq!(addr["street"], "Ring 9");

    let res = app.client.delete(app.url(&format!("/user/delete/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let counts = app.db.row_counts();
    assert_eq!((counts.users, counts.addresses), (0, 0));

    let res = app.client.delete(app.url(&format!("/user/delete/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn submitted_fields_round_trip_unchanged() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app
        .client
        .post(app.url("/user/create"))
        .json(&json!({
            "name": " Ann ",
            "surname": "Lee",
            "birthday": "1990-04-12",
            "gender": "female",
            "address": address("  Ring 9  "),
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Value = res.json().await?;
    let id = created["id"].as_str().unwrap().to_string();

    let addr: Value = app.client.get(app.url(&format!("/user/address/{id}"))).send().await?.json().await?;
    assert_eq!(addr["street"], "  Ring 9  ");

    let found: Value = app
        .client
        .get(app.url("/user/users"))
        .query(&[("name", " Ann "), ("surname", "Lee")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found["users"].as_array().unwrap().len(), 1);
    assert_eq!(found["users"][0]["name"], " Ann ");
    Ok(())
}

#[tokio::test]
async fn invalid_user_payload_is_bad_request() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app
        .client
        .post(app.url("/user/create"))
        .json(&json!({ "name": "Ann", "surname": "Lee", "birthday": "yesterday", "gender": "f", "address": address("x") }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Validation Error");

    let res = app.client.get(app.url("/user/users?name=Ann")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(app.db.row_counts().addresses, 0);
    Ok(())
}

#[tokio::test]
async fn failed_create_returns_500_and_leaves_no_rows() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.db.fail_on("create_supplier");
    let res = app
        .client
        .post(app.url("/supplier/create"))
        .json(&json!({ "name": "Acme", "address": address("Main 1"), "phone_number": "1" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let counts = app.db.row_counts();
    assert_eq!((counts.suppliers, counts.addresses), (0, 0));
    Ok(())
}

#[tokio::test]
async fn supplier_and_product_flow() -> anyhow::Result<()> {
    let app = start_server().await?;
    let supplier_id = create_supplier(&app).await?;

    let list: Value = app.client.get(app.url("/supplier/supplierList")).send().await?.json().await?;
    assert_eq!(list["suppliers"].as_array().unwrap().len(), 1);
    let one: Value = app.client.get(app.url(&format!("/supplier/{supplier_id}"))).send().await?.json().await?;
    assert_eq!(one["supplier"]["phone_number"], "+49 30 1234");

    let product_id = create_product(&app, &supplier_id, 5).await?;
    let got: Value = app.client.get(app.url(&format!("/product/{product_id}"))).send().await?.json().await?;
    assert_eq!(got["product"]["ID"], product_id.as_str());
    assert!((got["product"]["price"].as_f64().unwrap() - 19.99).abs() < 1e-9);
    assert_eq!(got["product"]["supplierID"], supplier_id.as_str());
    assert!(got["product"]["imageID"].is_null());

    let reduce = |q: u32| app.url(&format!("/product/updateQuantity?id={product_id}&quantity={q}"));
    assert_eq!(app.client.patch(reduce(3)).send().await?.status(), HttpStatusCode::OK);
    assert_eq!(app.client.patch(reduce(3)).send().await?.status(), HttpStatusCode::NOT_FOUND);
    let got: Value = app.client.get(app.url(&format!("/product/{product_id}"))).send().await?.json().await?;
    assert_eq!(got["product"]["available_stock"], 2);

    // a supplier with products cannot be removed
    let res = app.client.delete(app.url(&format!("/supplier/delete/{supplier_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(app.db.row_counts().suppliers, 1);

    let res = app.client.delete(app.url(&format!("/product/delete/{product_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = app.client.delete(app.url(&format!("/supplier/delete/{supplier_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let list: Value = app.client.get(app.url("/product/productList")).send().await?.json().await?;
    assert!(list["products"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn image_attach_download_replace_delete() -> anyhow::Result<()> {
    let app = start_server().await?;
    let supplier_id = create_supplier(&app).await?;
    let product_id = create_product(&app, &supplier_id, 1).await?;

    let res = app
        .client
        .post(app.url("/image/create"))
        .json(&json!({ "product_id": product_id, "image": BASE64.encode([1u8, 2, 3]) }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Value = res.json().await?;
    let image_id = created["id"].as_str().unwrap().to_string();

    let res = app.client.get(app.url(&format!("/image/product/{product_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let disposition = res.headers()["content-disposition"].to_str()?.to_string();
    assert_eq!(disposition, format!("attachment; filename=\"{image_id}.png\""));
    assert_eq!(res.bytes().await?.as_ref(), &[1u8, 2, 3]);

    let res = app
        .client
        .put(app.url("/image/updateImage"))
        .json(&json!({ "image_id": image_id, "image": BASE64.encode([9u8]) }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let bytes = app.client.get(app.url(&format!("/image/{image_id}"))).send().await?.bytes().await?;
    assert_eq!(bytes.as_ref(), &[9u8]);

    let res = app.client.delete(app.url(&format!("/image/delete/{image_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let got: Value = app.client.get(app.url(&format!("/product/{product_id}"))).send().await?.json().await?;
    assert!(got["product"]["imageID"].is_null());
    let res = app.client.get(app.url(&format!("/image/product/{product_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn empty_image_is_stored() -> anyhow::Result<()> {
    let app = start_server().await?;
    let supplier_id = create_supplier(&app).await?;
    let product_id = create_product(&app, &supplier_id, 1).await?;

    let res = app
        .client
        .post(app.url("/image/create"))
        .json(&json!({ "product_id": product_id, "image": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let res = app.client.get(app.url(&format!("/image/product/{product_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.bytes().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn bad_base64_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app
        .client
        .post(app.url("/image/create"))
        .json(&json!({ "product_id": uuid::Uuid::new_v4(), "image": "***" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(app.db.row_counts().images, 0);
    Ok(())
}
