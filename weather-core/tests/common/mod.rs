#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use serde_json::json;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use weather_core::{CityTarget, FetchError, RawReading, WeatherProvider};

pub fn now_body(temp: &str, humidity: &str) -> String {
    json!({
        "code": "200",
        "updateTime": "2025-01-01T20:00+08:00",
        "now": {
            "temp": temp,
            "feelsLike": temp,
            "text": "Sunny",
            "windScale": "2",
            "humidity": humidity,
            "pressure": "1013",
            "vis": "10",
            "cloud": "0",
        }
    })
    .to_string()
}

pub fn cities(pairs: &[(&str, &str)]) -> Vec<CityTarget> {
    pairs.iter().map(|(id, name)| CityTarget::new(*id, *name)).collect()
}

/// Provider answering from a fixed table; unknown locations fail with HTTP 503.
#[derive(Debug, Default)]
pub struct FakeProvider {
    bodies: HashMap<String, String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location_id: &str, body: String) -> Self {
        self.bodies.insert(location_id.to_string(), body);
        self
    }

    /// Shared log of requested location ids, in call order.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn fetch_now(&self, city: &CityTarget) -> Result<RawReading, FetchError> {
        self.calls.lock().unwrap().push(city.location_id.clone());

        match self.bodies.get(&city.location_id) {
            Some(body) => Ok(RawReading {
                city: city.clone(),
                body: body.clone(),
            }),
            None => Err(FetchError::Status {
                status: 503,
                body: "unavailable".into(),
            }),
        }
    }
}

/// How the local provider server answers one location.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(String),
    Status(u16),
    /// Accept the request and never answer.
    Hang,
}

/// Serve `/v7/weather/now` on a random local port, replying per `location` query value.
pub async fn spawn_provider_server(replies: HashMap<String, Reply>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let replies = Arc::new(replies);

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let replies = Arc::clone(&replies);
            tokio::spawn(async move { serve(stream, &replies).await });
        }
    });

    addr
}

async fn serve(mut stream: TcpStream, replies: &HashMap<String, Reply>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let location = head
        .split_whitespace()
        .nth(1)
        .and_then(|path| path.split_once('?'))
        .and_then(|(_, query)| {
            query
                .split('&')
                .find_map(|kv| kv.strip_prefix("location="))
        })
        .unwrap_or_default()
        .to_string();

    let (status, body) = match replies.get(&location) {
        Some(Reply::Json(body)) => (200, body.clone()),
        Some(Reply::Status(code)) => (*code, "error".to_string()),
        Some(Reply::Hang) => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            return;
        }
        None => (404, "unknown location".to_string()),
    };

    let response = format!(
        "HTTP/1.1 {status} X\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
