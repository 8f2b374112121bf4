use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future;
use masthead::{BoxError, GroupSource, GroupedLoader, LoadError};

#[derive(Debug, PartialEq, Eq, Clone)]
struct GroupRecord {
    id: &'static str,
    fk: &'static str,
    value: i32,
    seq: u64,
}

fn rec(id: &'static str, fk: &'static str, value: i32, seq: u64) -> GroupRecord {
    GroupRecord { id, fk, value, seq }
}

struct GroupContext {
    records: Vec<GroupRecord>,
    batches: Mutex<Vec<Vec<&'static str>>>,
}

impl GroupContext {
    fn with(records: Vec<GroupRecord>) -> Arc<Self> {
        Arc::new(Self { records, batches: Mutex::new(Vec::new()) })
    }

    fn batches(&self) -> Vec<Vec<&'static str>> {
        self.batches.lock().unwrap().clone()
    }
}

struct GroupedDummySource;

#[async_trait]
impl GroupSource<&'static str, GroupRecord> for GroupedDummySource {
    type Context = Arc<GroupContext>;
    type SortKey = u64;

    async fn fetch(
        keys: &[&'static str],
        context: &Arc<GroupContext>,
    ) -> Result<Vec<GroupRecord>, BoxError> {
        context.batches.lock().unwrap().push(keys.to_vec());
        Ok(context.records.iter().filter(|r| keys.contains(&r.fk)).cloned().collect())
    }

    fn group_key(record: &GroupRecord) -> &'static str {
        record.fk
    }

    fn sort_key(record: &GroupRecord) -> u64 {
        record.seq
    }
}

struct FailingGroupSource;

#[async_trait]
impl GroupSource<&'static str, GroupRecord> for FailingGroupSource {
    type Context = Arc<GroupContext>;
    type SortKey = u64;

    async fn fetch(
        _keys: &[&'static str],
        _context: &Arc<GroupContext>,
    ) -> Result<Vec<GroupRecord>, BoxError> {
        Err("storage offline".into())
    }

    fn group_key(record: &GroupRecord) -> &'static str {
        record.fk
    }

    fn sort_key(record: &GroupRecord) -> u64 {
        record.seq
    }
}

#[tokio::test]
async fn groups_records_under_their_foreign_key() {
    let context =
        GroupContext::with(vec![rec("x1", "a", 1, 10), rec("x2", "b", 2, 20), rec("x3", "a", 3, 30)]);
    let loader = GroupedLoader::new(GroupedDummySource, Arc::clone(&context));

    let groups = loader.load_many(vec!["a", "b", "c"]).await.unwrap();

    assert_eq!(groups["a"], vec![rec("x1", "a", 1, 10), rec("x3", "a", 3, 30)]);
    assert_eq!(groups["b"], vec![rec("x2", "b", 2, 20)]);
    assert_eq!(groups["c"], Vec::new());
}

#[tokio::test]
async fn single_key_load_flattens_the_group() {
    let context =
        GroupContext::with(vec![rec("x1", "a", 1, 10), rec("x2", "b", 2, 20), rec("x3", "a", 3, 30)]);
    let loader = GroupedLoader::new(GroupedDummySource, Arc::clone(&context));

    assert_eq!(loader.load("a").await.unwrap(), vec![rec("x1", "a", 1, 10), rec("x3", "a", 3, 30)]);
}

#[tokio::test]
async fn unreferenced_key_resolves_to_an_empty_group() {
    let context = GroupContext::with(vec![rec("x1", "a", 1, 10)]);
    let loader = GroupedLoader::new(GroupedDummySource, Arc::clone(&context));

    assert_eq!(loader.load("nobody").await.unwrap(), Vec::new());
    // The empty outcome is cached like any other.
    assert_eq!(loader.load("nobody").await.unwrap(), Vec::new());
    assert_eq!(context.batches().len(), 1);
}

#[tokio::test]
async fn groups_are_sorted_by_the_declared_sort_key() {
    // The store hands records back out of order; group order must not depend
    // on that.
    let context =
        GroupContext::with(vec![rec("x3", "a", 3, 30), rec("x1", "a", 1, 10), rec("x2", "a", 2, 20)]);
    let loader = GroupedLoader::new(GroupedDummySource, Arc::clone(&context));

    assert_eq!(
        loader.load("a").await.unwrap(),
        vec![rec("x1", "a", 1, 10), rec("x2", "a", 2, 20), rec("x3", "a", 3, 30)]
    );
}

#[tokio::test]
async fn concurrent_group_loads_share_one_fetch() {
    let context = GroupContext::with(vec![rec("x1", "a", 1, 10), rec("x2", "b", 2, 20)]);
    let loader = GroupedLoader::new(GroupedDummySource, Arc::clone(&context));

    let (a, b, a_again) = future::join3(loader.load("a"), loader.load("b"), loader.load("a")).await;

    assert_eq!(a.unwrap(), vec![rec("x1", "a", 1, 10)]);
    assert_eq!(b.unwrap(), vec![rec("x2", "b", 2, 20)]);
    assert_eq!(a_again.unwrap(), vec![rec("x1", "a", 1, 10)]);
    assert_eq!(context.batches(), vec![vec!["a", "b"]]);
}

/// Returns every record it knows regardless of the requested keys.
struct SloppyGroupSource;

#[async_trait]
impl GroupSource<&'static str, GroupRecord> for SloppyGroupSource {
    type Context = Arc<GroupContext>;
    type SortKey = u64;

    async fn fetch(
        keys: &[&'static str],
        context: &Arc<GroupContext>,
    ) -> Result<Vec<GroupRecord>, BoxError> {
        context.batches.lock().unwrap().push(keys.to_vec());
        Ok(context.records.clone())
    }

    fn group_key(record: &GroupRecord) -> &'static str {
        record.fk
    }

    fn sort_key(record: &GroupRecord) -> u64 {
        record.seq
    }
}

#[tokio::test]
async fn records_for_unrequested_keys_are_dropped() {
    let context = GroupContext::with(vec![rec("x1", "a", 1, 10), rec("x2", "c1", 2, 20)]);
    let loader = GroupedLoader::new(SloppyGroupSource, Arc::clone(&context));

    // The fetch hands back a "c1" record nobody staged; it must not leak into
    // the requested group.
    assert_eq!(loader.load("a").await.unwrap(), vec![rec("x1", "a", 1, 10)]);
    assert_eq!(context.batches(), vec![vec!["a"]]);
}

#[tokio::test]
async fn failure_fans_out_and_poisons_the_instance() {
    let context = GroupContext::with(Vec::new());
    let loader = GroupedLoader::new(FailingGroupSource, Arc::clone(&context));

    let (a, b) = future::join(loader.load("a"), loader.load("b")).await;
    for outcome in [a.unwrap_err(), b.unwrap_err()] {
        assert!(matches!(outcome, LoadError::Fetch(_)));
        assert!(outcome.to_string().contains("storage offline"));
    }

    assert!(matches!(loader.load("c").await.unwrap_err(), LoadError::Poisoned));
}

#[tokio::test]
async fn primed_groups_skip_the_fetch() {
    let context = GroupContext::with(Vec::new());
    let loader = GroupedLoader::new(GroupedDummySource, Arc::clone(&context));

    loader.prime("a", vec![rec("x9", "a", 9, 90)]);
    assert_eq!(loader.load("a").await.unwrap(), vec![rec("x9", "a", 9, 90)]);
    assert!(context.batches().is_empty());
}
