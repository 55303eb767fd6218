//! Integration tests for the weather façade against a mock server.

use pawlog_core::{Error, WeatherClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetch_current_builds_the_documented_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "KEY"))
        .and(query_param("lat", "37.5"))
        .and(query_param("lon", "127"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "weather": [{"id": 800, "description": "clear sky"}],
            "main": {"temp": 3.4, "feels_like": -0.2},
            "name": "Seoul"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WeatherClient::with_base_url("KEY", mock_server.uri()).unwrap();
    let current = client.fetch_current(37.5, 127.0).await.unwrap();

    assert_eq!(current.condition_id, 800);
    assert_eq!(current.temperature_c, 3.4);
}

#[tokio::test]
async fn fetch_current_surfaces_auth_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
        )
        .mount(&mock_server)
        .await;

    let client = WeatherClient::with_base_url("BAD", mock_server.uri()).unwrap();
    let err = client.fetch_current(37.5, 127.0).await.unwrap_err();

    assert!(matches!(err, Error::Api { .. }));
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn fetch_forecast_excludes_sub_daily_data_and_maps_days() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/onecall"))
        .and(query_param("units", "metric"))
        .and(query_param("exclude", "hourly,minutely,current"))
        .and(query_param("appid", "KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "timezone": "Asia/Seoul",
            "timezone_offset": 32400,
            "daily": [
                {"dt": 1613606400, "temp": {"min": -2.0, "max": 5.5}, "weather": [{"id": 600}]},
                {"dt": 1613703600, "temp": {"min": 0.0, "max": 7.1}, "weather": [{"id": 801}]}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WeatherClient::with_base_url("KEY", mock_server.uri()).unwrap();
    let days = client.fetch_forecast(37.5, 127.0).await.unwrap();

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].condition_id, 600);
    // 1613606400 is Thursday 00:00 UTC, still Thursday at UTC+9.
    assert_eq!(days[0].weekday, "Thursday");
    assert_eq!(days[1].weekday, "Friday");
}

#[tokio::test]
async fn malformed_forecast_body_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/onecall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": "not a list"
        })))
        .mount(&mock_server)
        .await;

    let client = WeatherClient::with_base_url("KEY", mock_server.uri()).unwrap();
    let err = client.fetch_forecast(37.5, 127.0).await.unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}
