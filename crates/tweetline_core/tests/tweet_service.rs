use rusqlite::Connection;
use std::rc::Rc;
use tweetline_core::db::open_db_in_memory;
use tweetline_core::{
    ErrorKind, Identity, InMemoryRecordStore, ManualClock, SequentialIds, SqliteRecordStore,
    TweetService, TweetServiceError,
};

fn bob() -> Identity {
    Identity::new("principal-bob")
}

fn alice() -> Identity {
    Identity::new("principal-alice")
}

fn sqlite_service(conn: &Connection) -> TweetService<SqliteRecordStore<'_>> {
    TweetService::with_collaborators(
        SqliteRecordStore::try_new(conn).unwrap(),
        Box::new(ManualClock::new(1_000)),
        Box::new(SequentialIds::new("id")),
    )
}

#[test]
fn post_then_get_returns_pristine_tweet() {
    let conn = open_db_in_memory().unwrap();
    let mut service = sqlite_service(&conn);

    let posted = service.post_tweet(&bob(), "hello", "bob").unwrap();
    let loaded = service.get_tweet(&posted.id).unwrap();

    assert_eq!(loaded, posted);
    assert_eq!(loaded.id, "id-000001");
    assert_eq!(loaded.owner, bob());
    assert_eq!(loaded.content, "hello");
    assert_eq!(loaded.username, "bob");
    assert_eq!(loaded.likes, 0);
    assert!(loaded.liked_by.is_empty());
    assert!(loaded.comments.is_empty());
    assert_eq!(loaded.created_at, 1_000);
    assert_eq!(loaded.updated_at, None);
}

#[test]
fn post_rejects_empty_fields_without_writing() {
    let mut service = TweetService::new(InMemoryRecordStore::new());

    let err = service.post_tweet(&bob(), "", "bob").unwrap_err();
    assert!(matches!(err, TweetServiceError::Validation { field: "content" }));
    let err = service.post_tweet(&bob(), "hello", " \t").unwrap_err();
    assert!(matches!(err, TweetServiceError::Validation { field: "username" }));
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(service.store().is_empty());
}

#[test]
fn get_unknown_tweet_is_not_found() {
    let service = TweetService::new(InMemoryRecordStore::new());
    let err = service.get_tweet("nope").unwrap_err();
    assert!(matches!(err, TweetServiceError::TweetNotFound(ref id) if id == "nope"));
    assert!(err.to_string().contains("nope"));
}

#[test]
fn list_tweets_is_empty_then_key_ordered() {
    let conn = open_db_in_memory().unwrap();
    let mut service = sqlite_service(&conn);
    assert!(service.list_tweets().unwrap().is_empty());

    let first = service.post_tweet(&bob(), "one", "bob").unwrap();
    let second = service.post_tweet(&alice(), "two", "alice").unwrap();
    let third = service.post_tweet(&bob(), "three", "bob").unwrap();

    let ids: Vec<String> = service
        .list_tweets()
        .unwrap()
        .into_iter()
        .map(|tweet| tweet.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);
}

#[test]
fn list_order_follows_ids_not_insertion() {
    let mut service = TweetService::new(InMemoryRecordStore::new());
    let posted: Vec<String> = (0..5)
        .map(|n| service.post_tweet(&bob(), format!("post {n}"), "bob").unwrap().id)
        .collect();

    let mut expected = posted.clone();
    expected.sort();
    let listed: Vec<String> = service
        .list_tweets()
        .unwrap()
        .into_iter()
        .map(|tweet| tweet.id)
        .collect();
    assert_eq!(listed, expected);
}

#[test]
fn owner_can_edit_and_edit_stamps_updated_at() {
    let clock = Rc::new(ManualClock::new(1_000));
    let mut service = TweetService::with_collaborators(
        InMemoryRecordStore::new(),
        Box::new(Rc::clone(&clock)),
        Box::new(SequentialIds::new("t")),
    );
    let posted = service.post_tweet(&bob(), "draft", "bob").unwrap();

    clock.advance(500);
    let edited = service.edit_tweet(&bob(), &posted.id, "final").unwrap();

    assert_eq!(edited.content, "final");
    assert_eq!(edited.updated_at, Some(1_500));
    assert_eq!(edited.created_at, 1_000);
    assert_eq!(edited.owner, posted.owner);
    assert_eq!(service.get_tweet(&posted.id).unwrap(), edited);
}

#[test]
fn non_owner_edit_is_unauthorized_and_leaves_tweet_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let mut service = sqlite_service(&conn);
    let posted = service.post_tweet(&bob(), "mine", "bob").unwrap();

    let err = service.edit_tweet(&alice(), &posted.id, "hijacked").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(err.to_string().contains(&posted.id));
    assert_eq!(service.get_tweet(&posted.id).unwrap(), posted);
}

#[test]
fn edit_checks_payload_then_existence_then_ownership() {
    let mut service = TweetService::new(InMemoryRecordStore::new());

    let err = service.edit_tweet(&bob(), "missing", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let err = service.edit_tweet(&bob(), "missing", "text").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn edit_never_stamps_before_creation_under_clock_skew() {
    let clock = Rc::new(ManualClock::new(10_000));
    let mut service = TweetService::with_collaborators(
        InMemoryRecordStore::new(),
        Box::new(Rc::clone(&clock)),
        Box::new(SequentialIds::new("t")),
    );
    let posted = service.post_tweet(&bob(), "draft", "bob").unwrap();

    clock.set(9_000);
    let edited = service.edit_tweet(&bob(), &posted.id, "final").unwrap();
    assert_eq!(edited.updated_at, Some(10_000));
}

#[test]
fn delete_returns_snapshot_and_removes_record() {
    let conn = open_db_in_memory().unwrap();
    let mut service = sqlite_service(&conn);
    let posted = service.post_tweet(&bob(), "bye", "bob").unwrap();
    let liked = service.add_like(&alice(), &posted.id).unwrap();

    let deleted = service.delete_tweet(&bob(), &posted.id).unwrap();
    assert_eq!(deleted, liked);

    let err = service.get_tweet(&posted.id).unwrap_err();
    assert!(matches!(err, TweetServiceError::TweetNotFound(_)));
    assert!(service.list_tweets().unwrap().is_empty());
}

#[test]
fn delete_unknown_or_foreign_tweet_fails() {
    let mut service = TweetService::new(InMemoryRecordStore::new());
    let err = service.delete_tweet(&bob(), "ghost").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let posted = service.post_tweet(&bob(), "keep", "bob").unwrap();
    let err = service.delete_tweet(&alice(), &posted.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(service.get_tweet(&posted.id).unwrap(), posted);
}

#[test]
fn retweet_creates_independent_tweet_citing_original() {
    let conn = open_db_in_memory().unwrap();
    let mut service = sqlite_service(&conn);
    let original = service.post_tweet(&bob(), "hi", "bob").unwrap();
    let liked_original = service.add_like(&bob(), &original.id).unwrap();

    let retweet = service.retweet_tweet(&alice(), &original.id, "alice").unwrap();

    assert_ne!(retweet.id, original.id);
    assert_eq!(retweet.owner, alice());
    assert_eq!(retweet.username, "alice");
    assert!(retweet.content.contains("bob"));
    assert!(retweet.content.contains("hi"));
    assert_eq!(retweet.likes, 0);
    assert!(retweet.liked_by.is_empty());
    assert!(retweet.comments.is_empty());
    assert_eq!(retweet.updated_at, None);

    assert_eq!(service.get_tweet(&original.id).unwrap(), liked_original);
    assert_eq!(service.get_tweet(&retweet.id).unwrap(), retweet);
    assert_eq!(service.list_tweets().unwrap().len(), 2);
}

#[test]
fn retweet_of_unknown_tweet_is_not_found() {
    let mut service = TweetService::new(InMemoryRecordStore::new());
    let err = service.retweet_tweet(&alice(), "ghost", "alice").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(service.store().is_empty());
}

#[test]
fn retweet_is_owned_by_retweeter_not_original_author() {
    let mut service = TweetService::new(InMemoryRecordStore::new());
    let original = service.post_tweet(&bob(), "hi", "bob").unwrap();
    let retweet = service.retweet_tweet(&alice(), &original.id, "alice").unwrap();

    let err = service.edit_tweet(&bob(), &retweet.id, "mine now").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    service.delete_tweet(&alice(), &retweet.id).unwrap();
    assert!(service.get_tweet(&original.id).is_ok());
}
