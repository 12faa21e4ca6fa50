#![allow(clippy::unwrap_used, missing_docs)]

mod common;

use http::StatusCode;

use common::{Script, dir_record, file_record, zone_fs};
use zone_fs::Error;

#[tokio::test]
async fn resolve_finds_an_exact_file_match_in_the_parent() {
    let (fs, mock) = zone_fs(vec![Script::listing(&[
        file_record("docs", 3, "AA", "2024-01-01T00:00:00.000"),
        file_record("docs.bak", 3, "BB", "2024-01-01T00:00:00.000"),
    ])]);

    let object = fs.resolve("x/docs").await;
    // Parent listing was fetched for `x`, not for the object path itself.
    let request = mock.recorded().remove(0);
    assert_eq!(request.url, format!("{}/my-zone/x/", common::ENDPOINT));

    let object = object.unwrap();
    assert_eq!(object.remote(), "x/docs");
    assert_eq!(object.checksum(), Some("aa"));
}

#[tokio::test]
async fn resolve_prefers_a_file_over_a_directory_of_the_same_name() {
    let (fs, _) = zone_fs(vec![Script::listing(&[
        dir_record("docs", "2024-01-01T00:00:00.000"),
        file_record("docs", 3, "AA", "2024-01-01T00:00:00.000"),
    ])]);

    let object = fs.resolve("x/docs").await.unwrap();
    assert_eq!(object.remote(), "x/docs");
}

#[tokio::test]
async fn resolving_a_directory_is_is_directory_not_not_found() {
    let (fs, _) = zone_fs(vec![Script::listing(&[dir_record(
        "docs",
        "2024-01-01T00:00:00.000",
    )])]);

    match fs.resolve("x/docs").await {
        Err(Error::IsDirectory) => {}
        other => panic!("expected IsDirectory, got {other:?}"),
    }
}

#[tokio::test]
async fn resolving_an_absent_name_is_object_not_found() {
    let (fs, _) = zone_fs(vec![Script::listing(&[file_record(
        "other.txt",
        1,
        "CC",
        "2024-01-01T00:00:00.000",
    )])]);

    match fs.resolve("x/docs").await {
        Err(Error::ObjectNotFound) => {}
        other => panic!("expected ObjectNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn resolving_in_a_missing_directory_propagates_directory_not_found() {
    let (fs, _) = zone_fs(vec![Script::status(StatusCode::NOT_FOUND)]);

    match fs.resolve("gone/file.txt").await {
        Err(Error::DirectoryNotFound) => {}
        other => panic!("expected DirectoryNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn resolve_reuses_a_listing_cached_by_list() {
    let (fs, mock) = zone_fs(vec![Script::listing(&[file_record(
        "report.csv",
        120,
        "AB",
        "2024-01-01T00:00:00.000",
    )])]);

    fs.list("").await.unwrap();
    let object = fs.resolve("report.csv").await.unwrap();
    assert_eq!(object.remote(), "report.csv");
    assert_eq!(mock.request_count(), 1, "resolve must hit the cache");
}
