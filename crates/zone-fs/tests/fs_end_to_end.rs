#![allow(clippy::unwrap_used, missing_docs)]

mod common;

use chrono::{Datelike as _, Timelike as _};
use secrecy::SecretString;

use common::{Script, dir_record, file_record, zone_fs_at};
use zone_fs::{ChecksumAlgorithm, ConfigError, Entry, Error, Options, ZoneFs};

const FILE_CHECKSUM_UPPER: &str =
    "DEADAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABEEF";
const FILE_CHECKSUM_LOWER: &str =
    "deadaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaabeef";

#[tokio::test]
async fn listing_and_resolving_the_zone_root() {
    let (fs, mock) = zone_fs_at(
        "/",
        vec![Script::listing(&[
            file_record("report.csv", 120, FILE_CHECKSUM_UPPER, "2024-01-01T00:00:00.000"),
            dir_record("archive", "2024-01-01T00:00:00.000"),
        ])],
    );

    // One file and one directory, in the zone's order.
    let entries = fs.list("").await.unwrap();
    assert_eq!(entries.len(), 2);

    let report = match &entries[0] {
        Entry::File(object) => object.clone(),
        other => panic!("expected report.csv first, got {other:?}"),
    };
    assert_eq!(report.remote(), "report.csv");
    assert_eq!(report.size(), Some(120));
    assert_eq!(report.checksum(), Some(FILE_CHECKSUM_LOWER));
    let at = report.mod_time();
    assert_eq!(
        (at.year(), at.month(), at.day(), at.hour()),
        (2024, 1, 1, 0)
    );

    match &entries[1] {
        Entry::Directory(dir) => assert_eq!(dir.remote(), "archive"),
        other => panic!("expected the archive directory second, got {other:?}"),
    }

    // Resolving the file yields the same object, from the cached listing.
    let resolved = fs.resolve("report.csv").await.unwrap();
    assert_eq!(resolved, report);

    // Resolving the directory name is IsDirectory, not ObjectNotFound.
    match fs.resolve("archive").await {
        Err(Error::IsDirectory) => {}
        other => panic!("expected IsDirectory, got {other:?}"),
    }

    assert_eq!(mock.request_count(), 1, "everything above shares one fetch");
}

#[test]
fn adapter_accessors_reflect_the_configuration() {
    let (fs, _) = zone_fs_at("/projects/", Vec::new());

    assert_eq!(fs.name(), "unit");
    assert_eq!(fs.root(), "projects");
    assert_eq!(fs.checksum_algorithms(), &[ChecksumAlgorithm::Sha256]);
    assert_eq!(fs.to_string(), "storage zone my-zone path /projects");
}

#[test]
fn construction_validates_the_configuration() {
    let missing_zone = Options {
        storage_zone: String::new(),
        access_key: SecretString::from("key".to_owned()),
    };
    match ZoneFs::new("remote", "", &missing_zone) {
        Err(ConfigError::MissingStorageZone) => {}
        other => panic!("expected MissingStorageZone, got {other:?}"),
    }

    let missing_key = Options {
        storage_zone: "my-zone".to_owned(),
        access_key: SecretString::from(String::new()),
    };
    match ZoneFs::new("remote", "", &missing_key) {
        Err(ConfigError::MissingAccessKey) => {}
        other => panic!("expected MissingAccessKey, got {other:?}"),
    }
}

#[test]
fn options_deserialize_from_configuration_input() {
    let options: Options =
        serde_json::from_str(r#"{"storage-zone": "my-zone", "access-key": "k3y"}"#).unwrap();
    assert_eq!(options.storage_zone, "my-zone");

    let fs = ZoneFs::new("remote", "/", &options).unwrap();
    assert_eq!(fs.root(), "");
}
