//! End-to-end retention runs against a mock GraphQL endpoint

mod helper;

use chrono::Utc;
use serde_json::json;

use helper::{
    GraphQlServer, days_ago, mock_delete, mock_fetch, packages_body, test_settings, version_node,
};
use package_prune::graphql::error::RegistryError;
use package_prune::package::report::{DeletionOutcome, PackageReport, PackageStatus};
use package_prune::runner::run;

#[tokio::test]
async fn deletes_old_docker_version_and_keeps_recent_one() {
    let now = Utc::now();
    let mut server = GraphQlServer::start().await;

    let fetch = mock_fetch(
        &mut server,
        200,
        &packages_body(vec![(
            "app-image",
            vec![
                version_node("PV_A", "DOCKER", 2, days_ago(now, 40)),
                version_node("PV_B", "DOCKER", 2, days_ago(now, 5)),
            ],
        )]),
    )
    .await;
    let delete = mock_delete(
        &mut server,
        json!({ "v0": "PV_A" }),
        200,
        json!({ "data": { "v0": { "success": true } } }),
        1,
    )
    .await;

    let report = run(&server.client(), &test_settings("docker", 5, 30), now)
        .await
        .unwrap();

    fetch.assert_async().await;
    delete.assert_async().await;
    assert_eq!(
        report.packages,
        vec![PackageReport::processed(
            "app-image",
            vec![DeletionOutcome::succeeded("PV_A")]
        )]
    );
}

#[tokio::test]
async fn skips_packages_without_eligible_versions() {
    let now = Utc::now();
    let mut server = GraphQlServer::start().await;

    let fetch = mock_fetch(
        &mut server,
        200,
        &packages_body(vec![
            (
                "npm-lib",
                vec![version_node("PV_npm", "NPM", 0, days_ago(now, 365))],
            ),
            (
                "no-files",
                vec![version_node("PV_nofiles", "DOCKER", 0, None)],
            ),
        ]),
    )
    .await;
    let delete = mock_delete(&mut server, json!({}), 200, json!({ "data": {} }), 0).await;

    let report = run(&server.client(), &test_settings("DOCKER", 0, 30), now)
        .await
        .unwrap();

    fetch.assert_async().await;
    delete.assert_async().await;
    assert_eq!(
        report.packages,
        vec![
            PackageReport::nothing_matched("npm-lib"),
            PackageReport::nothing_matched("no-files"),
        ]
    );
}

#[tokio::test]
async fn records_partial_failure_and_processes_next_package() {
    let now = Utc::now();
    let mut server = GraphQlServer::start().await;

    let fetch = mock_fetch(
        &mut server,
        200,
        &packages_body(vec![
            (
                "first",
                vec![
                    version_node("PV_1", "MAVEN", 0, days_ago(now, 90)),
                    version_node("PV_2", "MAVEN", 1, days_ago(now, 80)),
                    version_node("PV_3", "MAVEN", 0, days_ago(now, 70)),
                ],
            ),
            (
                "second",
                vec![version_node("PV_4", "MAVEN", 0, days_ago(now, 60))],
            ),
        ]),
    )
    .await;
    let first = mock_delete(
        &mut server,
        json!({ "v0": "PV_1", "v1": "PV_2", "v2": "PV_3" }),
        200,
        json!({
            "data": {
                "v0": { "success": true },
                "v1": { "success": false },
                "v2": null
            },
            "errors": [{
                "type": "FORBIDDEN",
                "path": ["v1"],
                "locations": [{ "line": 3, "column": 3 }],
                "message": "quota exceeded"
            }]
        }),
        1,
    )
    .await;
    let second = mock_delete(
        &mut server,
        json!({ "v0": "PV_4" }),
        200,
        json!({ "data": { "v0": { "success": true } } }),
        1,
    )
    .await;

    let report = run(&server.client(), &test_settings("maven", 1, 30), now)
        .await
        .unwrap();

    fetch.assert_async().await;
    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(
        report.packages[0].status,
        PackageStatus::Processed(vec![
            DeletionOutcome::succeeded("PV_1"),
            DeletionOutcome::failed("PV_2", "quota exceeded"),
            DeletionOutcome::failed("PV_3", "Failed"),
        ])
    );
    assert_eq!(
        report.packages[1].outcomes(),
        &[DeletionOutcome::succeeded("PV_4")]
    );
    assert_eq!(report.deleted_count(), 2);
    assert_eq!(report.failed_count(), 2);
}

#[tokio::test]
async fn aborts_run_when_mutation_request_fails() {
    let now = Utc::now();
    let mut server = GraphQlServer::start().await;

    let fetch = mock_fetch(
        &mut server,
        200,
        &packages_body(vec![
            (
                "first",
                vec![version_node("PV_1", "DOCKER", 0, days_ago(now, 90))],
            ),
            (
                "second",
                vec![version_node("PV_2", "DOCKER", 0, days_ago(now, 90))],
            ),
        ]),
    )
    .await;
    let first = mock_delete(
        &mut server,
        json!({ "v0": "PV_1" }),
        502,
        json!({ "message": "Bad Gateway" }),
        1,
    )
    .await;
    let second = mock_delete(
        &mut server,
        json!({ "v0": "PV_2" }),
        200,
        json!({ "data": { "v0": { "success": true } } }),
        0,
    )
    .await;

    let result = run(&server.client(), &test_settings("docker", 0, 30), now).await;

    fetch.assert_async().await;
    first.assert_async().await;
    second.assert_async().await;
    assert!(matches!(
        result,
        Err(RegistryError::Status { status: 502, .. })
    ));
}

#[tokio::test]
async fn fails_when_token_is_rejected() {
    let mut server = GraphQlServer::start().await;

    let fetch = mock_fetch(&mut server, 401, r#"{"message": "Bad credentials"}"#).await;

    let result = run(&server.client(), &test_settings("docker", 0, 30), Utc::now()).await;

    fetch.assert_async().await;
    assert!(matches!(
        result,
        Err(RegistryError::Status { status: 401, .. })
    ));
}
