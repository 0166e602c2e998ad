mod common;

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::Duration as Window;
use common::{Reply, cities, now_body, spawn_provider_server};
use weather_core::{
    Pipeline, QualityError, QualityGate, provider::qweather::QWeatherProvider, store::MemoryStore,
};

#[tokio::test]
async fn one_city_times_out_and_the_quality_gate_names_it() {
    let addr = spawn_provider_server(HashMap::from([
        ("101010100".to_string(), Reply::Json(now_body("20", "55"))),
        ("101020100".to_string(), Reply::Hang),
    ]))
    .await;
    let provider = QWeatherProvider::with_base_url(
        format!("http://{addr}"),
        "KEY".into(),
        Duration::from_millis(300),
    )
    .unwrap();
    let targets = cities(&[("101010100", "Beijing"), ("101020100", "Shanghai")]);
    let store = Arc::new(MemoryStore::new());

    let outcome = Pipeline::new(provider, Arc::clone(&store), targets.clone())
        .run()
        .await
        .expect("a timed out city must not fail the run");

    assert_eq!(outcome.attempted, 2);
    assert_eq!(outcome.fetched, 1);
    assert_eq!(outcome.persisted, 1);

    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].city_name, "Beijing");
    assert_eq!(rows[0].temp, 20.0);
    assert_eq!(rows[0].humidity, 55);

    let expected = targets.iter().map(|c| c.location_name.clone()).collect();
    let gate = QualityGate::new(Arc::clone(&store), expected, Window::minutes(60));
    let err = gate.check().await.unwrap_err();

    match err {
        QualityError::MissingCities(missing) => assert_eq!(missing, vec!["Shanghai".to_string()]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn quality_gate_only_counts_rows_inside_the_window() {
    let addr = spawn_provider_server(HashMap::from([(
        "1".to_string(),
        Reply::Json(now_body("5", "30")),
    )]))
    .await;
    let base_url = format!("http://{addr}");
    let provider =
        QWeatherProvider::with_base_url(base_url, "KEY".into(), Duration::from_secs(5)).unwrap();

    let earlier = Arc::new(MemoryStore::new());
    Pipeline::new(provider.clone(), Arc::clone(&earlier), cities(&[("1", "Old")]))
        .run()
        .await
        .unwrap();
    let mut stale = earlier.rows();
    stale[0].insert_ts -= Window::hours(3);

    let store = Arc::new(MemoryStore::with_rows(stale));
    Pipeline::new(provider, Arc::clone(&store), cities(&[("1", "Fresh")]))
        .run()
        .await
        .unwrap();

    let gate = QualityGate::new(
        Arc::clone(&store),
        vec!["Fresh".to_string()],
        Window::minutes(60),
    );
    let report = gate.check().await.unwrap();
    assert_eq!(report.total_rows(), 1);
    assert_eq!(report.counts[0].city_name, "Fresh");

    let strict = QualityGate::new(store, vec!["Old".to_string()], Window::minutes(60));
    assert!(matches!(
        strict.check().await,
        Err(QualityError::MissingCities(m)) if m == vec!["Old".to_string()]
    ));
}
