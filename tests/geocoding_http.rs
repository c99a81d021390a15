use immo_search::geocoding::{
    GeocodeError, GeocodeSource, Geocoder, MapboxProvider, NominatimProvider,
};
use immo_search::models::GeoPoint;
use immo_search::notify::NotificationLevel;
use immo_search::search::{InMemorySearchBackend, SearchSession};
use mockito::{Matcher, Server};
use reqwest::Client;

fn nominatim(server: &mockito::ServerGuard) -> Geocoder {
    Geocoder::new(NominatimProvider::new(Client::new(), &server.url()).unwrap())
}

#[tokio::test]
async fn nominatim_first_candidate_is_latitude_first() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "Kara, Togo".into()),
            Matcher::UrlEncoded("format".into(), "json".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"[
                {"lat": "9.5511", "lon": "1.1861", "display_name": "Kara, Togo"},
                {"lat": "9.6000", "lon": "1.2000", "display_name": "Kara Nord"}
            ]"#,
        )
        .expect(1)
        .create_async()
        .await;

    let result = nominatim(&server).resolve("Kara, Togo").await.unwrap();

    assert_eq!(result.point, GeoPoint::new(9.5511, 1.1861));
    assert_eq!(result.source, GeocodeSource::Provider);
    assert_eq!(result.label.as_deref(), Some("Kara, Togo"));
    mock.assert_async().await;
}

#[tokio::test]
async fn mapbox_center_is_longitude_first() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock(
            "GET",
            Matcher::Regex(r"^/geocoding/v5/mapbox\.places/.+\.json$".to_string()),
        )
        .match_query(Matcher::UrlEncoded("access_token".into(), "pk.test".into()))
        .with_status(200)
        .with_body(
            r#"{"features": [{"center": [1.2228, 6.1319], "place_name": "Lomé, Togo"}]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let provider = MapboxProvider::new(Client::new(), &server.url(), "pk.test").unwrap();
    let result = Geocoder::new(provider).resolve("Lomé").await.unwrap();

    assert_eq!(result.point, GeoPoint::new(6.1319, 1.2228));
    mock.assert_async().await;
}

#[tokio::test]
async fn parseable_inputs_never_reach_the_provider() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let geocoder = nominatim(&server);
    let direct = geocoder.resolve("6.1319, 1.2228").await.unwrap();
    let link = geocoder
        .resolve("https://www.google.com/maps/place/Lom%C3%A9/@6.1319,1.2228,17z")
        .await
        .unwrap();

    assert_eq!(direct.point, GeoPoint::new(6.1319, 1.2228));
    assert_eq!(link.point, direct.point);
    assert_eq!(link.source, GeocodeSource::MapLink);
    mock.assert_async().await;
}

#[tokio::test]
async fn empty_candidate_list_reports_error_and_keeps_location() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let geocoder = nominatim(&server);
    let mut session = SearchSession::new(InMemorySearchBackend::demo());
    session.apply_geocode(&geocoder, "9.5511, 1.1861").await.unwrap();

    let err = session
        .apply_geocode(&geocoder, "Quartier introuvable")
        .await
        .unwrap_err();

    assert!(matches!(err, GeocodeError::NotFound(_)));
    assert_eq!(session.filters().location(), Some(GeoPoint::new(9.5511, 1.1861)));

    let notifications = session.drain_notifications();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[1].level, NotificationLevel::Error);
    mock.assert_async().await;
}

#[tokio::test]
async fn unusable_provider_coordinates_keep_location() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"lat": "NaN", "lon": "412.5", "display_name": "Lomé"}]"#)
        .expect(1)
        .create_async()
        .await;

    let geocoder = nominatim(&server);
    let mut session = SearchSession::new(InMemorySearchBackend::demo());
    session.apply_geocode(&geocoder, "6.1319, 1.2228").await.unwrap();

    let err = session.apply_geocode(&geocoder, "Lomé").await.unwrap_err();

    assert!(matches!(err, GeocodeError::OutOfRange { .. }));
    assert_eq!(session.filters().location(), Some(GeoPoint::new(6.1319, 1.2228)));

    let levels: Vec<_> = session
        .drain_notifications()
        .into_iter()
        .map(|n| n.level)
        .collect();
    assert_eq!(levels, vec![NotificationLevel::Success, NotificationLevel::Error]);
    mock.assert_async().await;
}

#[tokio::test]
async fn provider_error_status_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(429)
        .create_async()
        .await;

    let err = nominatim(&server).resolve("Lomé").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Provider(_)));
}
