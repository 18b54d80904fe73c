use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use bus_pass_backend::config::EnvironmentConfig;
use bus_pass_backend::models::{NewPass, Pass};
use bus_pass_backend::repositories::{InMemoryStore, Repositories};
use bus_pass_backend::routes::create_app;
use bus_pass_backend::services::{MockPaymentGateway, RecordingEmailSender, StaticUserDirectory};
use bus_pass_backend::state::AppState;

struct TestApp {
    router: Router,
    store: InMemoryStore,
    gateway: Arc<MockPaymentGateway>,
    mailer: Arc<RecordingEmailSender>,
}

fn create_test_app() -> TestApp {
    create_test_app_with_users(StaticUserDirectory::new())
}

fn create_test_app_with_users(users: StaticUserDirectory) -> TestApp {
    let store = InMemoryStore::new();
    let gateway = Arc::new(MockPaymentGateway::new());
    let mailer = Arc::new(RecordingEmailSender::new());

    let state = AppState::new(
        EnvironmentConfig::default(),
        Repositories::in_memory(store.clone()),
        gateway.clone(),
        mailer.clone(),
        Arc::new(users),
    );

    TestApp {
        router: create_app(state),
        store,
        gateway,
        mailer,
    }
}

impl TestApp {
    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body.map(|body| body.to_string())).await
    }

    /// Envía el cuerpo tal cual; una respuesta que no es JSON llega como `Value::String`
    async fn send(&self, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    async fn create_route(&self, start: &str, end: &str, fare: &str) -> String {
        let (status, body) = self
            .post("/api/routes", json!({ "start": start, "end": end, "fare": fare }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_bus(&self, route_id: &str, name: &str) -> String {
        let (status, body) = self
            .post("/api/buses", json!({ "name": name, "route": route_id, "capacity": 40 }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_station(&self, route_id: &str, bus_id: Option<&str>, fare: &str) -> String {
        let (status, body) = self
            .post(
                "/api/stations",
                json!({
                    "route": route_id,
                    "bus": bus_id,
                    "name": "Central",
                    "latitude": 12.97,
                    "longitude": 77.59,
                    "fare": fare
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn confirmed_pass(&self, user_id: &str, route_id: &str) -> Value {
        let (_, session) = self
            .post(
                "/api/payment-session",
                json!({ "type": "pass", "userId": user_id, "routeId": route_id }),
            )
            .await;
        let session_id = session["sessionId"].as_str().unwrap();
        assert!(self.gateway.mark_paid(session_id).await);

        let (status, body) = self
            .post(
                "/api/pass",
                json!({ "userId": user_id, "routeId": route_id, "sessionId": session_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"].clone()
    }
}

fn date(value: &Value) -> DateTime<Utc> {
    serde_json::from_value(value.clone()).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_pass_purchase_end_to_end() {
    let app = create_test_app();
    let route_id = app.create_route("A", "B", "50").await;

    // Iniciar la compra
    let (status, session) = app
        .post(
            "/api/payment-session",
            json!({ "type": "pass", "userId": "u1", "routeId": route_id, "fare": 50 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", session);
    let session_id = session["sessionId"].as_str().unwrap().to_string();
    assert!(session["redirectUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://checkout.mock/pay/"));

    let gateway_session = app.gateway.session(&session_id).await.unwrap();
    assert_eq!(gateway_session.unit_amount, 5000);
    assert_eq!(gateway_session.description, "Monthly Travel Pass for Route A → B");
    assert!(gateway_session
        .success_url
        .ends_with("/user/pass?status=success&session_id={CHECKOUT_SESSION_ID}"));

    // El pago se completa en la página alojada
    assert!(app.gateway.mark_paid(&session_id).await);

    let (status, body) = app
        .post(
            "/api/pass",
            json!({ "userId": "u1", "routeId": route_id, "fare": 50, "sessionId": session_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let pass = &body["data"];
    assert_eq!(pass["userId"], "u1");
    assert_eq!(pass["routeId"], route_id.as_str());
    assert_eq!(
        Pass::expiry_for(date(&pass["purchaseDate"])),
        Some(date(&pass["expiryDate"]))
    );

    let (status, active) = app.get("/api/pass?userId=u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["id"], pass["id"]);
    assert_eq!(active["route"]["start"], "A");
    assert_eq!(active["route"]["end"], "B");

    // Segunda compra pagada mientras el primer pase sigue vigente
    app.gateway.insert_paid_session("cs_test_second", 5000).await;
    let (status, body) = app
        .post(
            "/api/pass",
            json!({ "userId": "u1", "routeId": route_id, "fare": 50, "sessionId": "cs_test_second" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ALREADY_ACTIVE");

    // La primera sesión ya se consumió
    let (status, body) = app
        .post(
            "/api/pass",
            json!({ "userId": "u1", "routeId": route_id, "sessionId": session_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_unpaid_session_never_creates_pass() {
    let app = create_test_app();
    let route_id = app.create_route("A", "B", "50").await;

    let (_, session) = app
        .post(
            "/api/payment-session",
            json!({ "type": "pass", "userId": "u1", "routeId": route_id }),
        )
        .await;
    let session_id = session["sessionId"].as_str().unwrap();

    let (status, body) = app
        .post(
            "/api/pass",
            json!({ "userId": "u1", "routeId": route_id, "fare": 50, "sessionId": session_id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PAYMENT_NOT_CONFIRMED");

    let (status, body) = app
        .post(
            "/api/pass",
            json!({ "userId": "u1", "routeId": route_id, "fare": 50, "sessionId": "cs_unknown" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PAYMENT_NOT_CONFIRMED");

    let (status, body) = app.get("/api/pass?userId=u1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["expired"], true);
}

#[tokio::test]
async fn test_confirm_rejects_fare_different_from_payment_record() {
    let app = create_test_app();
    let route_id = app.create_route("A", "B", "50").await;

    let (_, session) = app
        .post(
            "/api/payment-session",
            json!({ "type": "pass", "userId": "u1", "routeId": route_id }),
        )
        .await;
    let session_id = session["sessionId"].as_str().unwrap();
    app.gateway.mark_paid(session_id).await;

    let (status, body) = app
        .post(
            "/api/pass",
            json!({ "userId": "u1", "routeId": route_id, "fare": 1, "sessionId": session_id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app.get("/api/pass?userId=u1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_payment_session_validation() {
    let app = create_test_app();
    let route_id = app.create_route("A", "B", "50").await;

    let (status, body) = app
        .post(
            "/api/payment-session",
            json!({ "type": "pass", "userId": "u1", "routeId": route_id, "fare": 45 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .post(
            "/api/payment-session",
            json!({ "type": "pass", "userId": "u1", "routeId": Uuid::new_v4() }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = app
        .post("/api/payment-session", json!({ "type": "pass", "routeId": route_id }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ticket_with_unknown_station_is_not_persisted() {
    let app = create_test_app();
    app.gateway.insert_paid_session("cs_test_ticket", 2000).await;

    let (status, body) = app
        .post(
            "/api/tickets",
            json!({
                "sessionId": "cs_test_ticket",
                "userId": "u1",
                "stationId": Uuid::new_v4(),
                "busId": Uuid::new_v4()
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, tickets) = app.get("/api/tickets?userId=u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tickets, json!([]));
}

#[tokio::test]
async fn test_ticket_purchase_end_to_end() {
    let app = create_test_app();
    let route_id = app.create_route("Majestic", "Airport", "250").await;
    let bus_id = app.create_bus(&route_id, "KIA-9").await;
    let station_id = app.create_station(&route_id, Some(&bus_id), "19.99").await;

    let (status, session) = app
        .post(
            "/api/payment-session",
            json!({ "type": "ticket", "userId": "u1", "stationId": station_id, "busId": bus_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", session);
    let session_id = session["sessionId"].as_str().unwrap().to_string();

    let gateway_session = app.gateway.session(&session_id).await.unwrap();
    assert_eq!(gateway_session.unit_amount, 1999);
    assert_eq!(gateway_session.description, "Central Ticket");

    app.gateway.mark_paid(&session_id).await;
    let (status, body) = app
        .post(
            "/api/tickets",
            json!({ "sessionId": session_id, "userId": "u1", "stationId": station_id, "busId": bus_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let ticket = &body["data"];
    assert_eq!(ticket["startStation"], "Majestic");
    assert_eq!(ticket["endStation"], "Airport");
    assert_eq!(ticket["price"].as_str().unwrap().parse::<Decimal>().unwrap(), Decimal::new(1999, 2));
    assert!(ticket["paymentIntentId"].as_str().unwrap().starts_with("pi_mock_"));
    assert_eq!(
        date(&ticket["expiryDate"]) - date(&ticket["createdAt"]),
        Duration::hours(24)
    );

    let (status, tickets) = app.get("/api/tickets?userId=u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tickets.as_array().unwrap().len(), 1);
    assert_eq!(tickets[0]["route"]["start"], "Majestic");
    assert_eq!(tickets[0]["bus"]["name"], "KIA-9");

    let (status, _) = app.get("/api/tickets").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ticket_rejects_bus_not_serving_station() {
    let app = create_test_app();
    let route_id = app.create_route("A", "B", "50").await;
    let bus_id = app.create_bus(&route_id, "Bus 1").await;
    let other_bus = app.create_bus(&route_id, "Bus 2").await;
    let station_id = app.create_station(&route_id, Some(&bus_id), "10").await;
    app.gateway.insert_paid_session("cs_test_legacy", 1000).await;

    let (status, body) = app
        .post(
            "/api/tickets",
            json!({ "sessionId": "cs_test_legacy", "userId": "u1", "stationId": station_id, "busId": other_bus }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_scan_of_expired_pass_is_rejected() {
    let app = create_test_app();
    let route_id = app.create_route("A", "B", "50").await;

    let purchased = Utc::now() - Duration::days(40);
    let expired = Pass::from_new(
        Uuid::new_v4(),
        NewPass::purchased_at("u1".into(), route_id.parse().unwrap(), Decimal::new(50, 0), purchased)
            .unwrap(),
    );
    app.store.insert_pass(expired.clone()).await;

    let (status, body) = app
        .post(
            "/api/pass-usage",
            json!({ "userId": "u1", "passId": expired.id, "location": "Gate 3" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PASS_EXPIRED_OR_INVALID");

    let (status, body) = app
        .post("/api/pass-usage", json!({ "userId": "u1", "passId": Uuid::new_v4() }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PASS_EXPIRED_OR_INVALID");

    let (_, history) = app.get("/api/pass-usage?userId=u1").await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_scan_history_newest_first() {
    let app = create_test_app();
    let route_id = app.create_route("A", "B", "50").await;
    let pass = app.confirmed_pass("u1", &route_id).await;

    for location in ["Gate 1", "Gate 2"] {
        let (status, body) = app
            .post(
                "/api/pass-usage",
                json!({ "userId": "u1", "passId": pass["id"], "location": location }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["message"], "Pass verified successfully");
    }

    // Otro usuario no puede usar el pase
    let (status, _) = app
        .post("/api/pass-usage", json!({ "userId": "u2", "passId": pass["id"] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, history) = app.get("/api/pass-usage?userId=u1").await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["location"], "Gate 2");
    assert_eq!(history[1]["location"], "Gate 1");
    assert_eq!(history[0]["pass"]["id"], pass["id"]);
    assert_eq!(history[0]["pass"]["route"]["start"], "A");
}

#[tokio::test]
async fn test_fleet_crud_rules() {
    let app = create_test_app();
    let route_id = app.create_route("A", "B", "50").await;
    let other_route = app.create_route("C", "D", "20").await;
    let bus_id = app.create_bus(&route_id, "Bus 1").await;

    // Bus de otra ruta
    let (status, _) = app
        .post(
            "/api/stations",
            json!({
                "route": other_route,
                "bus": bus_id,
                "name": "X",
                "latitude": 10.0,
                "longitude": 10.0,
                "fare": 5
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/routes", json!({ "start": "A", "end": "", "fare": 10 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/buses", json!({ "name": "Bus 0", "route": route_id, "capacity": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, buses) = app.get(&format!("/api/buses?routeId={}", route_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(buses.as_array().unwrap().len(), 1);
    assert_eq!(buses[0]["route"]["end"], "B");

    // Una ruta sin pases se puede editar y borrar; arrastra sus buses
    let (status, body) = app
        .request(
            Method::PUT,
            "/api/routes",
            Some(json!({ "id": route_id, "start": "A", "end": "B2", "fare": 55 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["end"], "B2");

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/routes?id={}", route_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, buses) = app.get("/api/buses").await;
    assert_eq!(buses, json!([]));

    // Una ruta con un pase emitido queda bloqueada
    app.confirmed_pass("u1", &other_route).await;
    let (status, body) = app
        .request(Method::DELETE, &format!("/api/routes?id={}", other_route), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, _) = app.request(Method::DELETE, "/api/routes", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/stations?id={}", Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expiry_check_sends_reminders() {
    let users = StaticUserDirectory::new().with_user("u1", "rider@example.com", Some("Meera"));
    let app = create_test_app_with_users(users);
    let route_id = app.create_route("A", "B", "50").await;

    let expiring = Pass::from_new(
        Uuid::new_v4(),
        NewPass {
            user_id: "u1".into(),
            route_id: route_id.parse().unwrap(),
            fare: Decimal::new(50, 0),
            purchase_date: Utc::now() - Duration::days(29),
            expiry_date: Utc::now() + Duration::days(2),
        },
    );
    app.store.insert_pass(expiring).await;

    let (status, body) = app.get("/api/expiry-check").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["checked"], 1);
    assert_eq!(body["sent"], 1);
    assert_eq!(body["failed"], 0);

    let sent = app.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "rider@example.com");
    assert_eq!(sent[0].subject, "Your Travel Pass is Expiring Soon");
    assert!(sent[0].text.starts_with("Hello Meera,"));
}

#[tokio::test]
async fn test_malformed_bodies_get_structured_errors() {
    let app = create_test_app();
    let route_id = app.create_route("A", "B", "50").await;

    // Tipo de compra desconocido
    let (status, body) = app
        .post(
            "/api/payment-session",
            json!({ "type": "subscription", "userId": "u1", "routeId": route_id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["body"].is_array(), "{}", body);

    // Campo con tipo incorrecto
    let (status, body) = app
        .post("/api/buses", json!({ "name": "Bus 1", "route": route_id, "capacity": "many" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Cuerpo truncado
    let (status, body) = app
        .send(
            Method::POST,
            "/api/tickets",
            Some(r#"{"sessionId":"cs_1","userId":"#.to_string()),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["error"], "Bad Request");

    // Query que no se puede deserializar
    let (status, body) = app.get("/api/tickets?userId=u1&userId=u2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, tickets) = app.get("/api/tickets?userId=u1").await;
    assert_eq!(tickets, json!([]));
}

#[tokio::test]
async fn test_paid_session_issues_a_single_ticket() {
    let app = create_test_app();
    let route_id = app.create_route("A", "B", "50").await;
    let bus_id = app.create_bus(&route_id, "Bus 1").await;
    let station_id = app.create_station(&route_id, Some(&bus_id), "10").await;
    app.gateway.insert_paid_session("cs_once", 1000).await;

    let ticket = json!({ "sessionId": "cs_once", "userId": "u1", "stationId": station_id, "busId": bus_id });
    let (status, body) = app.post("/api/tickets", ticket.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    for _ in 0..2 {
        let (status, body) = app.post("/api/tickets", ticket.clone()).await;
        assert_eq!(status, StatusCode::CONFLICT, "{}", body);
        assert_eq!(body["code"], "CONFLICT");
    }

    let (_, tickets) = app.get("/api/tickets?userId=u1").await;
    assert_eq!(tickets.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ticket_rejects_bus_from_another_route() {
    let app = create_test_app();
    let route_id = app.create_route("A", "B", "50").await;
    let other_route = app.create_route("Y", "Z", "20").await;
    let foreign_bus = app.create_bus(&other_route, "Bus Z").await;
    // Estación sin bus asignado
    let station_id = app.create_station(&route_id, None, "10").await;

    let (status, body) = app
        .post(
            "/api/payment-session",
            json!({ "type": "ticket", "userId": "u1", "stationId": station_id, "busId": foreign_bus }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    app.gateway.insert_paid_session("cs_foreign", 1000).await;
    let (status, body) = app
        .post(
            "/api/tickets",
            json!({ "sessionId": "cs_foreign", "userId": "u1", "stationId": station_id, "busId": foreign_bus }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, tickets) = app.get("/api/tickets?userId=u1").await;
    assert_eq!(tickets, json!([]));
}

#[tokio::test]
async fn test_route_whose_bus_carries_tickets_cannot_be_deleted() {
    let app = create_test_app();
    let route_id = app.create_route("A", "B", "50").await;
    let bus_id = app.create_bus(&route_id, "Bus 1").await;
    let station_id = app.create_station(&route_id, None, "10").await;
    app.gateway.insert_paid_session("cs_ride", 1000).await;

    let (status, body) = app
        .post(
            "/api/tickets",
            json!({ "sessionId": "cs_ride", "userId": "u1", "stationId": station_id, "busId": bus_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    // El bus pasa a otra ruta; los tickets siguen colgando de él
    let other_route = app.create_route("C", "D", "20").await;
    let (status, body) = app
        .request(
            Method::PUT,
            "/api/buses",
            Some(json!({ "id": bus_id, "name": "Bus 1", "route": other_route, "capacity": 40 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/routes?id={}", other_route), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (_, tickets) = app.get("/api/tickets?userId=u1").await;
    assert_eq!(tickets[0]["bus"]["name"], "Bus 1");
}
