//! Cache interceptor tests against the Moka backend

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use meete_domain::error::{Error, Result};
use meete_domain::ports::providers::{CacheEntryConfig, CacheProvider};
use meete_infrastructure::cache::{CACHE, CacheInterceptor, cached, cached_with, default_key_generator};
use meete_infrastructure::di::{
    DispatchTable, Interceptor, Invocation, MethodId, Operation, OperationInfo, Operations, Tag,
};
use meete_providers::cache::MokaCacheProvider;
use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Debug, Serialize)]
struct Widget {
    id: i64,
    serial: usize,
}

#[derive(Default)]
struct Widgets {
    calls: AtomicUsize,
}

impl Widgets {
    async fn find(&self, id: i64) -> Result<Widget> {
        let serial = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Widget { id, serial })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn by_name(method: &MethodId, _args: &[Value], _kwargs: &Map<String, Value>) -> String {
    method.qualified_name()
}

impl Operations for Widgets {
    fn operations(self: Arc<Self>) -> Vec<Operation> {
        let find = |this: Arc<Self>, invocation: Invocation| async move {
            this.find(invocation.arg(0)?).await
        };
        vec![
            Operation::bind(
                &self,
                OperationInfo::new::<Self>("find").with_tag(cached(None)),
                find,
            ),
            Operation::bind(
                &self,
                OperationInfo::new::<Self>("find_brief")
                    .with_tag(cached(Some(Duration::from_millis(100)))),
                find,
            ),
            Operation::bind(
                &self,
                OperationInfo::new::<Self>("find_default").with_tag(Tag::new(&CACHE)),
                find,
            ),
            Operation::bind(
                &self,
                OperationInfo::new::<Self>("find_any").with_tag(cached_with(None, by_name)),
                find,
            ),
            Operation::bind(&self, OperationInfo::new::<Self>("find_live"), find),
        ]
    }
}

struct Fixture {
    widgets: Arc<Widgets>,
    provider: Arc<MokaCacheProvider>,
    table: DispatchTable,
}

fn fixture(default_ttl: Option<Duration>) -> Fixture {
    let widgets = Arc::new(Widgets::default());
    let provider = Arc::new(MokaCacheProvider::with_capacity(100));
    let mut interceptor = CacheInterceptor::new(Arc::clone(&provider) as Arc<dyn CacheProvider>, "test");
    if let Some(ttl) = default_ttl {
        interceptor = interceptor.with_default_ttl(ttl);
    }
    let mut table = DispatchTable::of(Arc::clone(&widgets));
    table.weave(&[Arc::new(interceptor) as Arc<dyn Interceptor>]);
    Fixture {
        widgets,
        provider,
        table,
    }
}

async fn call(fixture: &Fixture, operation: &str, invocation: Invocation) -> Value {
    fixture
        .table
        .invoke(operation, invocation)
        .await
        .expect("invoke")
}

#[tokio::test]
async fn test_repeated_call_is_served_from_cache() {
    let fixture = fixture(None);

    let first = call(&fixture, "find", Invocation::new().with_arg(5)).await;
    let second = call(&fixture, "find", Invocation::new().with_arg(5)).await;

    assert_eq!(first, json!({"id": 5, "serial": 0}));
    assert_eq!(first, second);
    assert_eq!(fixture.widgets.calls(), 1);
}

#[tokio::test]
async fn test_distinct_arguments_are_cached_separately() {
    let fixture = fixture(None);

    call(&fixture, "find", Invocation::new().with_arg(5)).await;
    call(&fixture, "find", Invocation::new().with_arg(6)).await;
    call(&fixture, "find", Invocation::new().with_arg(5)).await;

    assert_eq!(fixture.widgets.calls(), 2);
}

#[tokio::test]
async fn test_caller_identity_is_part_of_the_key() {
    let fixture = fixture(None);

    call(
        &fixture,
        "find",
        Invocation::new().with_arg(5).with_kwarg("principal", "ada"),
    )
    .await;
    call(
        &fixture,
        "find",
        Invocation::new().with_arg(5).with_kwarg("principal", "grace"),
    )
    .await;

    assert_eq!(fixture.widgets.calls(), 2);
}

#[tokio::test]
async fn test_entries_are_namespaced() {
    let fixture = fixture(None);

    call(&fixture, "find", Invocation::new().with_arg(5)).await;

    let key = default_key_generator(
        &MethodId::of::<Widgets>("find"),
        &[json!(5)],
        &Map::new(),
    );
    assert!(fixture.provider.exists(&format!("test:{key}")).await.expect("exists"));
    assert!(!fixture.provider.exists(&key).await.expect("exists"));
}

#[tokio::test]
async fn test_corrupt_entry_is_an_internal_error() {
    let fixture = fixture(None);
    let key = default_key_generator(
        &MethodId::of::<Widgets>("find"),
        &[json!(5)],
        &Map::new(),
    );
    fixture
        .provider
        .set_json(&format!("test:{key}"), "{not json", CacheEntryConfig::default())
        .await
        .expect("seed");

    let err = fixture
        .table
        .invoke("find", Invocation::new().with_arg(5))
        .await
        .expect_err("corrupt entry");

    assert!(matches!(err, Error::Internal { .. }));
    assert_eq!(err.status_code(), 500);
    assert_eq!(fixture.widgets.calls(), 0);
}

#[tokio::test]
async fn test_tag_ttl_expires_entries() {
    let fixture = fixture(None);

    call(&fixture, "find_brief", Invocation::new().with_arg(5)).await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    call(&fixture, "find_brief", Invocation::new().with_arg(5)).await;

    assert_eq!(fixture.widgets.calls(), 2);
}

#[tokio::test]
async fn test_bare_tag_uses_interceptor_default_ttl() {
    let fixture = fixture(Some(Duration::from_millis(100)));

    call(&fixture, "find_default", Invocation::new().with_arg(5)).await;
    call(&fixture, "find_default", Invocation::new().with_arg(5)).await;
    assert_eq!(fixture.widgets.calls(), 1);

    tokio::time::sleep(Duration::from_millis(400)).await;
    call(&fixture, "find_default", Invocation::new().with_arg(5)).await;
    assert_eq!(fixture.widgets.calls(), 2);
}

#[tokio::test]
async fn test_custom_key_generator_controls_sharing() {
    let fixture = fixture(None);

    let first = call(&fixture, "find_any", Invocation::new().with_arg(1)).await;
    let second = call(&fixture, "find_any", Invocation::new().with_arg(2)).await;

    assert_eq!(first, second);
    assert_eq!(fixture.widgets.calls(), 1);
}

#[tokio::test]
async fn test_untagged_operation_bypasses_cache() {
    let fixture = fixture(None);

    call(&fixture, "find_live", Invocation::new().with_arg(5)).await;
    call(&fixture, "find_live", Invocation::new().with_arg(5)).await;

    assert_eq!(fixture.widgets.calls(), 2);
    let stats = fixture.provider.stats().await.expect("stats");
    assert_eq!(stats.entries, 0);
}
