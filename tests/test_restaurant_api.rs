//! End-to-end API test: submit restaurants, reject duplicates, filter the
//! listing, append comments and post to the guestbook over HTTP.

use serde_json::{json, Value};
use restaurant_board::transport;

async fn spawn_app(state: transport::http::AppState) -> Result<String, Box<dyn std::error::Error>> {
    let router = transport::http::create_router(state);
    // Bind to an ephemeral port so tests can run in parallel.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

async fn submit(
    client: &reqwest::Client,
    base_url: &str,
    body: Value,
) -> Result<(u16, Value), Box<dyn std::error::Error>> {
    let resp = client
        .post(&format!("{}/api/restaurants", base_url))
        .json(&body)
        .send()
        .await?;
    let status = resp.status().as_u16();
    Ok((status, resp.json::<Value>().await?))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_submission_and_listing() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(transport::http::AppState::in_memory()).await?;
    let client = reqwest::Client::new();

    // --- CREATE ---
    let (status, created) = submit(
        &client,
        &base_url,
        json!({ "name": "Joe's Café", "address": " 台北市 ", "city": "台北市", "district": "信義區", "dish": "鬆餅" }),
    )
    .await?;
    assert_eq!(status, 200, "{created}");
    assert_eq!(created["success"], json!(true));
    assert_eq!(created["message"], json!("投稿成功！"));
    assert_eq!(created["data"]["dish"], json!("鬆餅"));
    assert_eq!(created["data"]["comments"], json!([]));
    let joe_id = created["data"]["id"].as_str().unwrap().to_string();

    // Case, whitespace and 臺/台 differences are still the same place.
    let (status, dup) = submit(
        &client,
        &base_url,
        json!({ "name": "joe's   café", "address": "臺北市" }),
    )
    .await?;
    assert_eq!(status, 400);
    assert_eq!(dup["success"], json!(false));
    assert_eq!(dup["message"], json!("這家餐廳（同地址）已經投稿過了！"));

    // Same name elsewhere is a branch.
    let (status, _) = submit(
        &client,
        &base_url,
        json!({ "name": "Joe's Café", "address": "高雄市前金區中正四路1號", "city": "高雄市" }),
    )
    .await?;
    assert_eq!(status, 200);

    // Missing required fields.
    let no_address = json!({ "name": "無地址", "city": "台南市" });
    let (status, invalid) = submit(&client, &base_url, no_address).await?;
    assert_eq!(status, 400);
    assert_eq!(invalid["message"], json!("請至少填寫「餐廳名稱」與「地址」"));

    // Not a JSON object.
    let resp = client
        .post(&format!("{}/api/restaurants", base_url))
        .header("content-type", "application/json")
        .body("[1, 2")
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 422);

    // --- LISTING ---
    let all = client
        .get(&format!("{}/api/restaurants", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(all["data"]["total"], json!(2));
    assert_eq!(all["data"]["cities"], json!(["台北市", "高雄市"]));

    let north = client
        .get(&format!("{}/api/restaurants", base_url))
        .query(&[("region", "北"), ("city", "臺北市")])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(north["data"]["total"], json!(1));
    assert_eq!(north["data"]["restaurants"][0]["id"], json!(joe_id));
    // City options always come from the whole store.
    assert_eq!(north["data"]["cities"], json!(["台北市", "高雄市"]));

    let unknown_region = client
        .get(&format!("{}/api/restaurants?region=atlantis", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(unknown_region["data"]["total"], json!(2));

    let by_district = client
        .get(&format!("{}/api/restaurants", base_url))
        .query(&[("q", "信義")])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(by_district["data"]["total"], json!(1));

    // --- DETAIL ---
    let detail = client
        .get(&format!("{}/api/restaurants/{}", base_url, joe_id))
        .send()
        .await?;
    assert_eq!(detail.status().as_u16(), 200);
    let missing = client
        .get(&format!("{}/api/restaurants/does-not-exist", base_url))
        .send()
        .await?;
    assert_eq!(missing.status().as_u16(), 404);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_comments() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(transport::http::AppState::in_memory()).await?;
    let client = reqwest::Client::new();

    let a = json!({ "name": "度小月", "address": "台南市中西區中正路16號" });
    let b = json!({ "name": "阿霞飯店", "address": "台南市中西區忠義路二段84巷7號" });
    let (_, a) = submit(&client, &base_url, a).await?;
    let (_, b) = submit(&client, &base_url, b).await?;
    let a_id = a["data"]["id"].as_str().unwrap().to_string();
    let b_id = b["data"]["id"].as_str().unwrap().to_string();

    let added = client
        .post(&format!("{}/api/restaurants/{}/comments", base_url, a_id))
        .json(&json!({ "text": "擔仔麵很香" }))
        .send()
        .await?;
    assert_eq!(added.status().as_u16(), 200);
    let added = added.json::<Value>().await?;
    assert_eq!(added["data"]["text"], json!("擔仔麵很香"));
    assert!(added["data"]["date"].as_str().is_some());

    // Body-addressed variant.
    let added = client
        .post(&format!("{}/api/comments", base_url))
        .json(&json!({ "id": a_id, "text": "再訪" }))
        .send()
        .await?;
    assert_eq!(added.status().as_u16(), 200);

    let unknown = client
        .post(&format!("{}/api/restaurants/nope/comments", base_url))
        .json(&json!({ "text": "hello" }))
        .send()
        .await?;
    assert_eq!(unknown.status().as_u16(), 404);
    assert_eq!(unknown.json::<Value>().await?["success"], json!(false));

    let blank = client
        .post(&format!("{}/api/restaurants/{}/comments", base_url, a_id))
        .json(&json!({ "text": "   " }))
        .send()
        .await?;
    assert_eq!(blank.status().as_u16(), 400);

    let a = client
        .get(&format!("{}/api/restaurants/{}", base_url, a_id))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let b = client
        .get(&format!("{}/api/restaurants/{}", base_url, b_id))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(a["data"]["comments"].as_array().map(Vec::len), Some(2));
    assert_eq!(b["data"]["comments"].as_array().map(Vec::len), Some(0));

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_pages_and_guestbook() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(transport::http::AppState::in_memory()).await?;
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let markup = json!({ "name": "<鼎泰豐>", "address": "台北市信義路二段194號", "city": "台北市" });
    let (_, created) = submit(&client, &base_url, markup).await?;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let index = client.get(&format!("{}/?keyword=鼎泰", base_url)).send().await?;
    assert_eq!(index.status().as_u16(), 200);
    let html = index.text().await?;
    assert!(html.contains("&lt;鼎泰豐&gt;"));
    assert!(html.contains(&format!("/detail/{}", id)));

    let detail = client.get(&format!("{}/detail/{}", base_url, id)).send().await?;
    assert_eq!(detail.status().as_u16(), 200);

    let gone = client.get(&format!("{}/detail/unknown", base_url)).send().await?;
    assert_eq!(gone.status().as_u16(), 303);
    assert_eq!(gone.headers()["location"], "/");

    let form = client.get(&format!("{}/post", base_url)).send().await?;
    assert_eq!(form.status().as_u16(), 200);

    // --- GUESTBOOK ---
    let posted = client
        .post(&format!("{}/api/guestbook", base_url))
        .json(&json!({ "author": "小明", "text": "網站很好用", "time": "forged" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(posted["success"], json!(true));
    assert_ne!(posted["data"]["time"], json!("forged"));
    assert!(posted["data"]["id"].as_i64().is_some());

    let listed = client
        .get(&format!("{}/api/guestbook", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(listed["data"][0]["author"], json!("小明"));

    let health = client.get(&format!("{}/health", base_url)).send().await?;
    assert_eq!(health.status().as_u16(), 200);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_form_posts() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(transport::http::AppState::in_memory()).await?;
    let client = reqwest::Client::new();

    // The /post page without JavaScript sends a plain form.
    let created = client
        .post(&format!("{}/api/restaurants", base_url))
        .form(&[
            ("name", "阿宗麵線"),
            ("address", "臺北市萬華區峨眉街8之1號"),
            ("city", "台北市"),
            ("region", "北"),
            ("dish", "大腸麵線"),
        ])
        .send()
        .await?;
    assert_eq!(created.status().as_u16(), 200);
    let created = created.json::<Value>().await?;
    assert_eq!(created["message"], json!("投稿成功！"));
    assert_eq!(created["data"]["region"], json!("北"));
    assert_eq!(created["data"]["dish"], json!("大腸麵線"));
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Duplicate detection is the same for forms.
    let dup = client
        .post(&format!("{}/api/restaurants", base_url))
        .form(&[("name", " 阿宗麵線"), ("address", "台北市萬華區峨眉街8之1號")])
        .send()
        .await?;
    assert_eq!(dup.status().as_u16(), 400);

    let missing = client
        .post(&format!("{}/api/restaurants", base_url))
        .form(&[("name", "只有名字")])
        .send()
        .await?;
    assert_eq!(missing.status().as_u16(), 400);

    let commented = client
        .post(&format!("{}/api/restaurants/{}/comments", base_url, id))
        .form(&[("text", "香菜要加")])
        .send()
        .await?;
    assert_eq!(commented.status().as_u16(), 200);

    let by_body = client
        .post(&format!("{}/api/comments", base_url))
        .form(&[("id", id.as_str()), ("text", "再來一碗")])
        .send()
        .await?;
    assert_eq!(by_body.status().as_u16(), 200);

    let no_text = client
        .post(&format!("{}/api/restaurants/{}/comments", base_url, id))
        .form(&[("other", "x")])
        .send()
        .await?;
    assert_eq!(no_text.status().as_u16(), 422);

    let guestbook = client
        .post(&format!("{}/api/guestbook", base_url))
        .form(&[("author", "小華"), ("text", "表單留言")])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(guestbook["data"]["author"], json!("小華"));

    let detail = client
        .get(&format!("{}/api/restaurants/{}", base_url, id))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(detail["data"]["comments"].as_array().map(Vec::len), Some(2));
    assert_eq!(detail["data"]["comments"][0]["text"], json!("香菜要加"));

    Ok(())
}
