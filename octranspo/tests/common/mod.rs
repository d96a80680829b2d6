//! A local stand-in for the API, served with axum on an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use tokio::net::TcpListener;

use octranspo::{Connection, ConnectionConfig};

pub const APP_ID: &str = "test-app";
pub const API_KEY: &str = "test-key";

pub const ROUTE_SUMMARY: &str = include_str!("../fixtures/route_summary.xml");
pub const NEXT_TRIPS: &str = include_str!("../fixtures/next_trips.xml");
pub const NEXT_TRIPS_ALL_ROUTES: &str = include_str!("../fixtures/next_trips_all_routes.xml");

/// Parameters of every request a handler has seen, in arrival order.
pub type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Serve `router` on localhost and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn config(base_url: &str) -> ConnectionConfig {
    ConnectionConfig::new(APP_ID, API_KEY).with_base_url(base_url)
}

pub fn connection(base_url: &str) -> Connection {
    Connection::new(config(base_url)).unwrap()
}

pub fn xml(body: impl Into<Vec<u8>>) -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/xml; charset=utf-8")], body.into())
}

pub fn json(body: &'static str) -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], body)
}

pub fn record(seen: &Seen, params: HashMap<String, String>) {
    seen.lock().unwrap().push(params);
}

pub fn seen(seen: &Seen) -> Vec<HashMap<String, String>> {
    seen.lock().unwrap().clone()
}
