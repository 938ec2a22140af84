use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use mockall::predicate as testing;

use s3_listing_mgr::config::EndpointConfig;
use s3_listing_mgr::errors::StorageError;
use s3_listing_mgr::infra::interrupt_adapter::Cancellation;
use s3_listing_mgr::interfaces::MockObjectStore;
use s3_listing_mgr::manifest::{ManifestRecord, fetch, load_listings};
use s3_listing_mgr::storage::{ListPage, ManifestObjectRef};
use s3_listing_mgr::utils::log_utils::Logger;

const FIRST: &str = "2024-01-02_03-04-05-006Z.lst";
const SECOND: &str = "2024-01-03_00-00-00-000Z.lst";

fn listing() -> EndpointConfig {
    EndpointConfig {
        bucket: "lst-bucket".into(),
        ..Default::default()
    }
}

fn listed(key: &str, etag: &str) -> ManifestObjectRef {
    ManifestObjectRef::new(key)
        .with_etag(etag)
        .with_last_modified(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 1).unwrap())
}

fn body(text: &str) -> Box<dyn Read + Send> {
    Box::new(Cursor::new(text.as_bytes().to_vec()))
}

fn single_page(objects: Vec<ManifestObjectRef>) -> MockObjectStore {
    let mut store = MockObjectStore::new();
    store
        .expect_list_page()
        .with(
            testing::eq("lst-bucket"),
            testing::eq(""),
            testing::eq(None::<String>),
        )
        .times(1)
        .returning(move |_, _, _| {
            Ok(ListPage {
                objects: objects.clone(),
                next_continuation_token: None,
            })
        });
    store
}

fn strings(records: Vec<ManifestRecord>) -> Vec<String> {
    records.into_iter().map(ManifestRecord::into_inner).collect()
}

#[test]
fn only_matching_keys_are_fetched_in_listing_order() {
    let mut store = single_page(vec![
        listed(FIRST, "\"e1\""),
        listed("notes.txt", "\"e2\""),
        listed(SECOND, "\"e3\""),
    ]);

    let fetched = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&fetched);
    store
        .expect_get_object()
        .times(2)
        .returning(move |bucket, object| {
            assert_eq!(bucket, "lst-bucket");
            seen.lock().unwrap().push(object.key.clone());
            Ok(if object.key == FIRST {
                body("a\nb\n")
            } else {
                body("c")
            })
        });

    let records = load_listings(&store, &listing(), &Cancellation::new(), Logger::new(0)).unwrap();

    assert_eq!(strings(records), vec!["a", "b", "c"]);
    assert_eq!(*fetched.lock().unwrap(), vec![FIRST.to_string(), SECOND.to_string()]);
}

#[test]
fn fetch_passes_listed_etag_and_timestamp() {
    let object = listed(FIRST, "\"abc\"");
    let expected = object.clone();
    let mut store = MockObjectStore::new();
    store
        .expect_get_object()
        .withf(move |bucket, o| bucket == "lst-bucket" && *o == expected)
        .times(1)
        .returning(|_, _| Ok(body("x")));

    let mut reader = fetch(&store, "lst-bucket", &object).unwrap();
    let mut text = String::new();
    reader.read_to_string(&mut text).unwrap();
    assert_eq!(text, "x");
}

#[test]
fn precondition_failure_discards_earlier_records() {
    let mut store = single_page(vec![listed(FIRST, "\"e1\""), listed(SECOND, "\"e2\"")]);
    store
        .expect_get_object()
        .times(2)
        .returning(|_, object| {
            if object.key == FIRST {
                Ok(body("already\ndecoded\n"))
            } else {
                Err(StorageError::PreconditionFailed {
                    key: object.key.clone(),
                })
            }
        });

    let result = load_listings(&store, &listing(), &Cancellation::new(), Logger::new(0));
    match result {
        Err(StorageError::PreconditionFailed { key }) => assert_eq!(key, SECOND),
        other => panic!("expected precondition failure, got {other:?}"),
    }
}

#[test]
fn other_fetch_failures_name_the_key() {
    let mut store = single_page(vec![listed(FIRST, "\"e1\"")]);
    store
        .expect_get_object()
        .times(1)
        .returning(|_, _| Err(StorageError::Backend("connection reset".into())));

    let err = load_listings(&store, &listing(), &Cancellation::new(), Logger::new(0)).unwrap_err();
    assert!(matches!(err, StorageError::ObjectFetch { ref key, .. } if key == FIRST));
    assert!(err.to_string().contains(FIRST));
    assert!(err.to_string().contains("connection reset"));
}

#[test]
fn page_failure_after_first_page_returns_no_records() {
    let mut store = MockObjectStore::new();
    let mut seq = mockall::Sequence::new();
    store
        .expect_list_page()
        .with(
            testing::always(),
            testing::always(),
            testing::eq(None::<String>),
        )
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| {
            Ok(ListPage {
                objects: vec![listed(FIRST, "\"e1\"")],
                next_continuation_token: Some("next".into()),
            })
        });
    store
        .expect_list_page()
        .with(
            testing::always(),
            testing::always(),
            testing::eq(Some("next".to_string())),
        )
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Err(StorageError::Backend("SlowDown".into())));
    store
        .expect_get_object()
        .times(1)
        .returning(|_, _| Ok(body("a")));

    let err = load_listings(&store, &listing(), &Cancellation::new(), Logger::new(0)).unwrap_err();
    assert!(matches!(err, StorageError::ListingPage(_)));
    assert_eq!(err.to_string(), "cannot get next page: SlowDown");
}

#[test]
fn empty_manifest_yields_no_records() {
    let mut store = single_page(vec![listed(FIRST, "\"e1\"")]);
    store
        .expect_get_object()
        .times(1)
        .returning(|_, _| Ok(body("")));

    let records = load_listings(&store, &listing(), &Cancellation::new(), Logger::new(0)).unwrap();
    assert!(records.is_empty());
}

#[test]
fn prefixed_keys_are_matched_on_their_file_name() {
    let config = EndpointConfig {
        bucket: "lst-bucket".into(),
        prefix: "lists/".into(),
        ..Default::default()
    };
    let mut store = MockObjectStore::new();
    store.expect_list_page().times(1).returning(|_, _, _| {
        Ok(ListPage {
            objects: vec![
                ManifestObjectRef::new(format!("lists/{FIRST}")),
                ManifestObjectRef::new(format!("lists/old/{SECOND}")),
            ],
            next_continuation_token: None,
        })
    });
    store
        .expect_get_object()
        .with(testing::eq("lst-bucket"), testing::always())
        .times(1)
        .returning(|_, object| {
            assert_eq!(object.key, format!("lists/{FIRST}"));
            Ok(body("r1"))
        });

    let records = load_listings(&store, &config, &Cancellation::new(), Logger::new(0)).unwrap();
    assert_eq!(strings(records), vec!["r1"]);
}

#[test]
fn aborted_run_stops_before_listing() {
    let store = MockObjectStore::new();
    let cancel = Cancellation::new();
    cancel.abort();
    let err = load_listings(&store, &listing(), &cancel, Logger::new(0)).unwrap_err();
    assert!(matches!(err, StorageError::Cancelled(_)));
}

#[test]
fn interrupted_fetch_surfaces_as_cancelled() {
    let mut store = single_page(vec![listed(FIRST, "\"e1\"")]);
    store
        .expect_get_object()
        .times(1)
        .returning(|_, _| Err(StorageError::Cancelled("interrupted".into())));

    let err = load_listings(&store, &listing(), &Cancellation::new(), Logger::new(0)).unwrap_err();
    assert!(matches!(err, StorageError::Cancelled(_)));
}
