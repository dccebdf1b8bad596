use std::time::Duration;

use dashboard_core::{
    AlertThresholds, Dashboard, FetchError, OpenWeatherProvider, TemperatureUnit, WeatherProvider,
    model::{ConditionCategory, Pollutant},
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_body(temp: f64) -> Value {
    json!({
        "coord": { "lon": 72.88, "lat": 19.07 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": temp, "feels_like": temp + 2.0, "pressure": 1008, "humidity": 40 },
        "wind": { "speed": 4.1, "deg": 80 },
        "clouds": { "all": 0 },
        "dt": 1717236000,
        "name": "Mumbai",
        "cod": 200
    })
}

fn forecast_body(temps: &[f64]) -> Value {
    let list: Vec<Value> = temps
        .iter()
        .enumerate()
        .map(|(i, t)| {
            json!({
                "dt": 1717236000 + (i as i64) * 10800,
                "main": { "temp": t, "feels_like": t, "pressure": 1009, "humidity": 60 },
                "weather": [{ "main": "Clouds", "description": "scattered clouds" }],
                "clouds": { "all": 40 },
                "wind": { "speed": 3.5, "deg": 200 }
            })
        })
        .collect();

    json!({
        "cod": "200",
        "message": 0,
        "cnt": list.len(),
        "list": list,
        "city": { "name": "Mumbai" }
    })
}

fn pollution_body(aqi: i64) -> Value {
    json!({
        "coord": { "lon": 72.88, "lat": 19.07 },
        "list": [{
            "main": { "aqi": aqi },
            "components": {
                "co": 201.94, "no": 0.01, "no2": 0.78, "o3": 68.66,
                "so2": 0.64, "pm2_5": 31.5, "pm10": 54.2, "nh3": 0.12
            },
            "dt": 1717236000
        }]
    })
}

async fn mount(server: &MockServer, endpoint: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

fn provider(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_options("TEST_KEY".into(), server.uri(), Duration::from_secs(5))
        .expect("client should build")
}

#[tokio::test]
async fn fetch_bundle_assembles_all_three_endpoints() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Mumbai"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body(31.0)))
        .expect(1)
        .mount(&server)
        .await;
    mount(&server, "/data/2.5/forecast", 200, forecast_body(&[29.0, 33.5, 27.0])).await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .and(query_param("lat", "19.07"))
        .and(query_param("lon", "72.88"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pollution_body(3)))
        .expect(1)
        .mount(&server)
        .await;

    let bundle = provider(&server).fetch_bundle("Mumbai").await.expect("bundle");

    assert_eq!(bundle.city, "Mumbai");
    assert_eq!(bundle.current.temperature_c, 31.0);
    assert_eq!(bundle.current.humidity_pct, 40);
    assert_eq!(bundle.current.pressure_hpa, 1008.0);
    assert_eq!(bundle.current.wind_direction_deg, Some(80.0));
    assert_eq!(bundle.current.condition, ConditionCategory::Clear);

    let temps: Vec<f64> = bundle.forecast.points().iter().map(|p| p.temperature_c).collect();
    assert_eq!(temps, [29.0, 33.5, 27.0]);
    assert_eq!(bundle.forecast.points()[0].cloud_cover_pct, 40);

    let poll = bundle.pollution.expect("pollution present");
    assert_eq!(poll.aqi, 3);
    assert_eq!(poll.concentration(Pollutant::Pm2_5), 31.5);
    assert_eq!(poll.components.len(), 6);
}

#[tokio::test]
async fn unknown_city_is_a_negative_result_without_further_calls() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/data/2.5/weather",
        404,
        json!({ "cod": "404", "message": "city not found" }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(&[20.0])))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider(&server).fetch_bundle("Atlantis").await.unwrap_err();

    match err {
        FetchError::CityNotFound { city, message } => {
            assert_eq!(city, "Atlantis");
            assert_eq!(message, "city not found");
        }
        other => panic!("expected CityNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_pollution_is_not_an_error() {
    let server = MockServer::start().await;

    mount(&server, "/data/2.5/weather", 200, current_body(20.0)).await;
    mount(&server, "/data/2.5/forecast", 200, forecast_body(&[20.0, 21.0])).await;
    mount(&server, "/data/2.5/air_pollution", 200, json!({ "coord": {}, "list": [] })).await;

    let bundle = provider(&server).fetch_bundle("Mumbai").await.expect("bundle");
    assert!(bundle.pollution.is_none());
}

#[tokio::test]
async fn rejected_pollution_request_fails_the_bundle() {
    let server = MockServer::start().await;

    mount(&server, "/data/2.5/weather", 200, current_body(20.0)).await;
    mount(&server, "/data/2.5/forecast", 200, forecast_body(&[20.0, 21.0])).await;
    mount(
        &server,
        "/data/2.5/air_pollution",
        401,
        json!({ "cod": 401, "message": "Invalid API key" }),
    )
    .await;

    let err = provider(&server).fetch_bundle("Mumbai").await.unwrap_err();
    match err {
        FetchError::Transport(message) => {
            assert!(message.contains("401"), "got {message}");
            assert!(message.contains("Invalid API key"), "got {message}");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn out_of_range_aqi_keeps_the_bundle() {
    let server = MockServer::start().await;

    mount(&server, "/data/2.5/weather", 200, current_body(20.0)).await;
    mount(&server, "/data/2.5/forecast", 200, forecast_body(&[20.0, 21.0])).await;
    mount(&server, "/data/2.5/air_pollution", 200, pollution_body(-1)).await;

    let dash = Dashboard::new(provider(&server), AlertThresholds::default());
    let view = dash.load("Mumbai", TemperatureUnit::Celsius).await.expect("view");

    assert_eq!(view.pollution.as_ref().map(|p| p.aqi), Some(-1));
    assert_eq!(view.aqi_label, "Unknown");
    assert!(view.alerts.is_empty());
    assert_eq!(view.forecast.len(), 2);
}

#[tokio::test]
async fn empty_forecast_is_a_malformed_bundle() {
    let server = MockServer::start().await;

    mount(&server, "/data/2.5/weather", 200, current_body(20.0)).await;
    mount(&server, "/data/2.5/forecast", 200, forecast_body(&[])).await;
    mount(&server, "/data/2.5/air_pollution", 200, pollution_body(1)).await;

    let err = provider(&server).fetch_bundle("Mumbai").await.unwrap_err();
    assert!(matches!(err, FetchError::MalformedBundle(_)), "got {err:?}");
}

#[tokio::test]
async fn non_json_body_is_a_parse_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).fetch_bundle("Mumbai").await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_upstream_is_a_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body(20.0))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::with_options(
        "TEST_KEY".into(),
        server.uri(),
        Duration::from_millis(200),
    )
    .expect("client should build");

    let err = provider.fetch_bundle("Mumbai").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn dashboard_load_derives_alerts_from_fetched_bundle() {
    let server = MockServer::start().await;

    mount(&server, "/data/2.5/weather", 200, current_body(36.0)).await;
    mount(&server, "/data/2.5/forecast", 200, forecast_body(&[30.0, 36.5, 28.0])).await;
    mount(&server, "/data/2.5/air_pollution", 200, pollution_body(4)).await;

    let dash = Dashboard::new(provider(&server), AlertThresholds::default());
    let view = dash.load("Mumbai", TemperatureUnit::Celsius).await.expect("view");

    let titles: Vec<&str> = view.alerts.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["Extreme Heat", "Poor Air Quality"]);
    assert_eq!(view.aqi_label, "Poor");
    assert_eq!(view.forecast.len(), 3);
    assert!(view.air_quality.is_some());
    assert_eq!(view.summary.peak, 36.5);
}
