use std::time::Duration;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};
use widget_core::{
    EndpointConfig, News, Pipeline, RefreshSettings, Stage, Weather, WidgetError, icon,
    model::WEATHER_UNAVAILABLE,
};

/// Serve `response` to a single connection and hand back the request line.
async fn serve_once(response: String) -> (u16, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind local listener");
    let port = listener.local_addr().expect("listener has an address").port();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("client connects");
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.expect("request readable");
        socket.write_all(response.as_bytes()).await.expect("response writable");
        let _ = socket.shutdown().await;

        let request = String::from_utf8_lossy(&buf[..n]).to_string();
        request.lines().next().unwrap_or_default().to_string()
    });

    (port, handle)
}

fn json_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn settings(base: RefreshSettings) -> RefreshSettings {
    RefreshSettings {
        connect_timeout: Duration::from_secs(5),
        read_timeout: Duration::from_secs(5),
        ..base
    }
}

#[tokio::test]
async fn weather_http_500_yields_placeholder_snapshot() {
    let (port, server) = serve_once(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
    )
    .await;

    let pipeline = Pipeline::<Weather, _>::new(
        settings(RefreshSettings::weather()),
        widget_core::HttpFetcher::new(&settings(RefreshSettings::weather())).expect("client builds"),
    );
    let refreshed = pipeline.refresh(&EndpointConfig::new("127.0.0.1", port.to_string())).await;

    assert_eq!(server.await.expect("server task"), "GET /api/weather HTTP/1.1");
    assert_eq!(refreshed.stage, Stage::Failed);
    assert_eq!(refreshed.error, Some(WidgetError::HttpStatus(500)));

    let snap = refreshed.snapshot;
    assert_eq!(snap.location, None);
    assert_eq!(snap.current_weather_text(), WEATHER_UNAVAILABLE);
    assert!(!snap.show_forecast());
    assert!(!snap.show_radar_link());
}

#[tokio::test]
async fn weather_success_end_to_end() {
    let body = r#"{
        "location": "Berlin",
        "report": "Cloudy morning, clearing by afternoon.",
        "latitude": 52.52,
        "longitude": 13.41,
        "forecast": {
            "current_weather": {"temperature": 18.0, "weathercode": 3},
            "daily": {
                "time": ["2024-06-01", "2024-06-02", "2024-06-03"],
                "temperature_2m_max": [21.4, 23.0, 19.9, 20.0, 22.0],
                "temperature_2m_min": [11.0, 12.2, 10.1, 9.0, 8.5],
                "weathercode": [3, 61, 95, 0, 0]
            }
        }
    }"#;
    let (port, server) = serve_once(json_response(body)).await;

    let pipeline = Pipeline::<Weather, _>::new(
        settings(RefreshSettings::weather()),
        widget_core::HttpFetcher::new(&settings(RefreshSettings::weather())).expect("client builds"),
    );
    // Embedded port must win over the configured one.
    let refreshed =
        pipeline.refresh(&EndpointConfig::new(format!("127.0.0.1:{port}/ignored/path"), "1")).await;
    server.await.expect("server task");

    assert_eq!(refreshed.error, None);
    let snap = refreshed.snapshot;
    assert_eq!(snap.location.as_deref(), Some("Berlin"));
    assert_eq!(snap.current_temp.as_deref(), Some("18"));
    assert_eq!(snap.current_weather_text(), format!("{} 18° · Cloudy morning", icon::OVERCAST));
    assert_eq!(snap.daily_forecast.len(), 3);
    assert_eq!(snap.daily_forecast[1].icon, icon::RAIN);
    assert_eq!(snap.daily_forecast[2].high_label(), "H:19.9°");
    assert!(snap.show_radar_link());
}

#[tokio::test]
async fn news_success_end_to_end() {
    let body = r#"{"items": [
        {"id": 11, "title": "Council approves budget", "source": "City Herald", "published_at": "2024-06-01T07:45:00"},
        {"id": 12, "source_title": "Storm warning issued", "source": "null", "fetched_at": "2024-06-01T09:00:00"}
    ], "page": 1, "limit": 10, "total": 2, "pages": 1}"#;
    let (port, server) = serve_once(json_response(body)).await;

    let pipeline = Pipeline::<News, _>::new(
        settings(RefreshSettings::news()),
        widget_core::HttpFetcher::new(&settings(RefreshSettings::news())).expect("client builds"),
    );
    let refreshed = pipeline.refresh(&EndpointConfig::new("127.0.0.1", port.to_string())).await;

    assert_eq!(server.await.expect("server task"), "GET /api/articles?page=1&limit=10 HTTP/1.1");

    let items = refreshed.snapshot.items;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].display_source(), Some("City Herald"));
    assert_eq!(items[0].display_date(), Some("2024-06-01"));
    assert_eq!(items[1].title, "Storm warning issued");
    assert_eq!(items[1].source, "Storm warning issued");
    assert_eq!(items[1].deep_link(), "news://article/12");
}

#[tokio::test]
async fn concurrent_cycles_are_independent() {
    let (news_port, news_server) = serve_once(json_response(r#"{"items": []}"#)).await;
    let (weather_port, weather_server) = serve_once(
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
    )
    .await;

    let news = Pipeline::<News, _>::new(
        settings(RefreshSettings::news()),
        widget_core::HttpFetcher::new(&settings(RefreshSettings::news())).expect("client builds"),
    );
    let weather = Pipeline::<Weather, _>::new(
        settings(RefreshSettings::weather()),
        widget_core::HttpFetcher::new(&settings(RefreshSettings::weather())).expect("client builds"),
    );

    let news_cfg = EndpointConfig::new("127.0.0.1", news_port.to_string());
    let weather_cfg = EndpointConfig::new("127.0.0.1", weather_port.to_string());
    let (n, w) = tokio::join!(news.refresh(&news_cfg), weather.refresh(&weather_cfg));
    let _ = tokio::join!(news_server, weather_server);

    assert!(!n.is_degraded());
    assert_eq!(w.error, Some(WidgetError::HttpStatus(404)));
}
