mod common;

use common::{OtherModel, TestModel, harness, register_user, sample_record};
use pretty_assertions::assert_eq;
use radiks_engine::{FetchOptions, PayloadForm, Record, RecordError, UserContext};
use radiks_crypto::SymmetricKey;
use radiks_model::Filter;
use serde_json::json;

async fn saved(h: &common::Harness, name: &str) -> Record<TestModel> {
    let mut record = Record::<TestModel>::from_json(json!({
        "name": name,
        "description": format!("about {name}"),
    }))
    .unwrap();
    h.store.save(&h.ctx, &mut record).await.unwrap();
    record
}

#[tokio::test]
async fn equality_filter() {
    let h = harness().await;
    let mut record = sample_record();
    h.store.save(&h.ctx, &mut record).await.unwrap();

    let hits = h
        .store
        .fetch_list::<TestModel>(&h.ctx, &Filter::new().where_eq("name", "tester"), FetchOptions::default())
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id(), record.id());
    assert_eq!(hits[0].get("description"), Some(&json!("a secret description")));

    let misses = h
        .store
        .fetch_list::<TestModel>(&h.ctx, &Filter::new().where_eq("name", "tester2"), FetchOptions::default())
        .await
        .unwrap();
    assert!(misses.is_empty());
}

#[tokio::test]
async fn or_filter_refines() {
    let h = harness().await;
    let mut record = sample_record();
    h.store.save(&h.ctx, &mut record).await.unwrap();

    let hit = Filter::new()
        .with_limit(1)
        .or(Filter::new().where_eq("name", "tester"));
    let found = h
        .store
        .fetch_list::<TestModel>(&h.ctx, &hit, FetchOptions::default())
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let miss = Filter::new()
        .with_limit(1)
        .or(Filter::new().where_eq("name", "tester2"));
    let found = h
        .store
        .fetch_list::<TestModel>(&h.ctx, &miss, FetchOptions::default())
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn lists_are_scoped_to_model() {
    let h = harness().await;
    saved(&h, "tester").await;
    let mut other = Record::<OtherModel>::from_json(json!({"name": "tester"})).unwrap();
    h.store.save(&h.ctx, &mut other).await.unwrap();

    let filter = Filter::new().where_eq("name", "tester");
    let tests = h
        .store
        .fetch_list::<TestModel>(&h.ctx, &filter, FetchOptions::default())
        .await
        .unwrap();
    let others = h
        .store
        .fetch_list::<OtherModel>(&h.ctx, &filter, FetchOptions::default())
        .await
        .unwrap();
    assert_eq!(tests.len(), 1);
    assert_eq!(others.len(), 1);
    assert_eq!(others[0].id(), other.id());
}

#[tokio::test]
async fn native_order_and_limit() {
    let h = harness().await;
    let a = saved(&h, "a").await;
    let b = saved(&h, "b").await;
    let c = saved(&h, "c").await;

    let all = h
        .store
        .fetch_list::<TestModel>(&h.ctx, &Filter::new(), FetchOptions::default())
        .await
        .unwrap();
    let ids: Vec<_> = all.iter().map(|r| r.id().clone()).collect();
    assert_eq!(ids, vec![a.id().clone(), b.id().clone(), c.id().clone()]);

    let page = h
        .store
        .fetch_list::<TestModel>(
            &h.ctx,
            &Filter::new().with_offset(1).with_limit(1),
            FetchOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id(), b.id());
}

#[tokio::test]
async fn find_one_returns_first_or_none() {
    let h = harness().await;
    let first = saved(&h, "dup").await;
    saved(&h, "dup").await;

    let found = h
        .store
        .find_one::<TestModel>(&h.ctx, &Filter::new().where_eq("name", "dup"), FetchOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id(), first.id());

    let absent = h
        .store
        .find_one::<TestModel>(
            &h.ctx,
            &Filter::new().where_eq("_id", "nonexistent-id"),
            FetchOptions::default(),
        )
        .await
        .unwrap();
    assert!(absent.is_none());
}

#[tokio::test]
async fn count_ignores_pagination() {
    let h = harness().await;
    for name in ["x", "x", "y"] {
        saved(&h, name).await;
    }
    let filter = Filter::new().where_eq("name", "x").with_limit(1);
    assert_eq!(h.store.count::<TestModel>(&filter).await.unwrap(), 2);
    assert_eq!(h.store.count::<OtherModel>(&Filter::new()).await.unwrap(), 0);
}

#[tokio::test]
async fn fetch_own_list_filters_by_signing_key() {
    let h = harness().await;
    let mine = saved(&h, "shared").await;

    let other_user = UserContext::generate("someone-else");
    register_user(&h.keys, &other_user).await;
    let mut theirs = Record::<TestModel>::from_json(json!({"name": "shared"})).unwrap();
    h.store.save(&other_user, &mut theirs).await.unwrap();

    let filter = Filter::new().where_eq("name", "shared");
    let all = h
        .store
        .fetch_list::<TestModel>(&h.ctx, &filter, FetchOptions::raw())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let own = h
        .store
        .fetch_own_list::<TestModel>(&h.ctx, &filter, FetchOptions::default())
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].id(), mine.id());

    let keyless = UserContext::new("keyless", SymmetricKey::generate());
    assert!(matches!(
        h.store
            .fetch_own_list::<TestModel>(&keyless, &filter, FetchOptions::default())
            .await,
        Err(RecordError::NoSigningKey { .. })
    ));
}

#[tokio::test]
async fn raw_list_keeps_ciphertext() {
    let h = harness().await;
    saved(&h, "raw").await;

    let records = h
        .store
        .fetch_list::<TestModel>(&h.ctx, &Filter::new(), FetchOptions::raw())
        .await
        .unwrap();
    assert_eq!(records[0].form(), PayloadForm::Sealed);
    assert_ne!(records[0].get("description"), Some(&json!("about raw")));
}

#[tokio::test]
async fn filtering_on_encrypted_field_matches_nothing() {
    let h = harness().await;
    saved(&h, "secretive").await;

    let found = h
        .store
        .fetch_list::<TestModel>(
            &h.ctx,
            &Filter::new().where_eq("description", "about secretive"),
            FetchOptions::default(),
        )
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn unavailable_index_fails_list() {
    let h = harness().await;
    h.index.set_available(false);
    let err = h
        .store
        .fetch_list::<TestModel>(&h.ctx, &Filter::new(), FetchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RecordError::Persistence(_)));
}
