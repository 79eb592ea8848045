//! Public IP detection against stub echo services

use dreamdns_core::{Error, IpSource};
use dreamdns_ip_http::HttpIpSource;
use httpmock::prelude::*;
use std::net::Ipv4Addr;

#[tokio::test]
async fn first_service_answer_is_used() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(GET).path("/ip");
            then.status(200).body("203.0.113.7\n");
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET).path("/backup");
            then.status(200).body("198.51.100.1");
        })
        .await;

    let source = HttpIpSource::new(vec![server.url("/ip"), server.url("/backup")]).unwrap();
    let ip = source.current().await.unwrap();

    assert_eq!(ip, Ipv4Addr::new(203, 0, 113, 7));
    first.assert_async().await;
    second.assert_hits_async(0).await;
}

#[tokio::test]
async fn failing_service_falls_over_to_next() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/down");
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v6");
            then.status(200).body("2001:db8::1");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ok");
            then.status(200).body("198.51.100.1");
        })
        .await;

    let source = HttpIpSource::new(vec![
        server.url("/down"),
        server.url("/v6"),
        server.url("/ok"),
    ])
    .unwrap();

    assert_eq!(source.current().await.unwrap(), Ipv4Addr::new(198, 51, 100, 1));
}

#[tokio::test]
async fn all_services_failing_is_ip_source_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).body("not an ip");
        })
        .await;

    let source = HttpIpSource::new(vec![server.url("/a"), server.url("/b")]).unwrap();
    let err = source.current().await.unwrap_err();

    assert!(matches!(err, Error::IpSource(_)));
    assert!(err.is_transient());
}
