//! Interception and dispatch table tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use meete_domain::error::{Error, Result};
use meete_infrastructure::di::{
    Container, DispatchTable, Interceptor, Invocation, Next, Operation, OperationInfo, Operations,
    Pointcut, PointcutMarker, Registry, Tag,
};
use serde_json::{Value, json};

static AUDIT: PointcutMarker = PointcutMarker::new("audit");
static SHADOW_AUDIT: PointcutMarker = PointcutMarker::new("audit");

type Journal = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
struct Catalog {
    calls: AtomicUsize,
}

impl Catalog {
    async fn double(&self, value: i64) -> Result<i64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(value * 2)
    }
}

impl Operations for Catalog {
    fn operations(self: Arc<Self>) -> Vec<Operation> {
        vec![
            Operation::bind(
                &self,
                OperationInfo::new::<Self>("audited").with_tag(Tag::new(&AUDIT)),
                |this, invocation| async move { this.double(invocation.arg(0)?).await },
            ),
            Operation::bind(
                &self,
                OperationInfo::new::<Self>("plain"),
                |this, invocation| async move { this.double(invocation.arg(0)?).await },
            ),
        ]
    }
}

struct Recorder {
    name: &'static str,
    order: i32,
    marker: &'static PointcutMarker,
    journal: Journal,
}

impl Recorder {
    fn new(name: &'static str, order: i32, marker: &'static PointcutMarker, journal: &Journal) -> Self {
        Self {
            name,
            order,
            marker,
            journal: Arc::clone(journal),
        }
    }

    fn note(&self, event: &str) {
        self.journal
            .lock()
            .expect("journal")
            .push(format!("{}:{event}", self.name));
    }
}

#[async_trait]
impl Interceptor for Recorder {
    fn pointcut(&self) -> Pointcut {
        Pointcut::of(self.marker)
    }

    fn order(&self) -> i32 {
        self.order
    }

    async fn handle(&self, next: Next, invocation: Invocation) -> Result<Value> {
        self.note("before");
        let result = next.run(invocation).await;
        self.note("after");
        result
    }
}

struct ShortCircuit;

#[async_trait]
impl Interceptor for ShortCircuit {
    fn pointcut(&self) -> Pointcut {
        Pointcut::of(&AUDIT)
    }

    async fn handle(&self, _next: Next, _invocation: Invocation) -> Result<Value> {
        Ok(json!(-1))
    }
}

fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().expect("journal").clone()
}

fn container_with(registry: Registry) -> (Container, Arc<Catalog>) {
    let catalog = Arc::new(Catalog::default());
    let handler = Arc::clone(&catalog);
    registry.handler::<Catalog, _>(&[], move |_| Ok(Arc::clone(&handler)));
    (Container::new(Arc::new(registry)), catalog)
}

#[tokio::test]
async fn test_tagged_operation_is_wrapped_and_untagged_is_not() {
    let journal = journal();
    let registry = Registry::new();
    let recorder_journal = Arc::clone(&journal);
    registry.interceptor::<Recorder, _>("recorder", &[], move |_| {
        Ok(Arc::new(Recorder::new("recorder", 0, &AUDIT, &recorder_journal)))
    });
    let (container, catalog) = container_with(registry);
    let table = container.dispatch::<Catalog>().expect("dispatch");

    let audited = table
        .invoke("audited", Invocation::new().with_arg(21))
        .await
        .expect("audited");
    assert_eq!(audited, json!(42));
    assert_eq!(entries(&journal), vec!["recorder:before", "recorder:after"]);

    let plain = table
        .invoke("plain", Invocation::new().with_arg(4))
        .await
        .expect("plain");
    assert_eq!(plain, json!(8));
    assert_eq!(entries(&journal).len(), 2);
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_pointcuts_with_equal_names_stay_distinct() {
    let journal = journal();
    let registry = Registry::new();
    let shadow_journal = Arc::clone(&journal);
    registry.interceptor::<Recorder, _>("shadow", &[], move |_| {
        Ok(Arc::new(Recorder::new("shadow", 0, &SHADOW_AUDIT, &shadow_journal)))
    });
    let (container, _) = container_with(registry);

    let table = container.dispatch::<Catalog>().expect("dispatch");
    table
        .invoke("audited", Invocation::new().with_arg(1))
        .await
        .expect("audited");

    assert!(entries(&journal).is_empty());
}

#[tokio::test]
async fn test_chain_order_follows_order_then_registration() {
    let journal = journal();
    let registry = Registry::new();
    for (name, order) in [("outer", 10), ("first", 0), ("second", 0)] {
        let journal = Arc::clone(&journal);
        registry.interceptor::<Recorder, _>(name, &[], move |_| {
            Ok(Arc::new(Recorder::new(name, order, &AUDIT, &journal)))
        });
    }
    let (container, _) = container_with(registry);

    let table = container.dispatch::<Catalog>().expect("dispatch");
    table
        .invoke("audited", Invocation::new().with_arg(1))
        .await
        .expect("audited");

    assert_eq!(
        entries(&journal),
        vec![
            "outer:before",
            "second:before",
            "first:before",
            "first:after",
            "second:after",
            "outer:after",
        ]
    );
}

#[tokio::test]
async fn test_weaving_twice_does_not_double_wrap() {
    let journal = journal();
    let catalog = Arc::new(Catalog::default());
    let interceptors: Vec<Arc<dyn Interceptor>> =
        vec![Arc::new(Recorder::new("recorder", 0, &AUDIT, &journal))];

    let mut table = DispatchTable::of(Arc::clone(&catalog));
    assert!(table.weave(&interceptors));
    assert!(!table.weave(&interceptors));
    assert!(table.is_woven());

    table
        .invoke("audited", Invocation::new().with_arg(3))
        .await
        .expect("audited");

    assert_eq!(entries(&journal).len(), 2);
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_dispatch_table_is_shared_and_woven_once() {
    let journal = journal();
    let registry = Registry::new();
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let recorder_journal = Arc::clone(&journal);
    registry.interceptor::<Recorder, _>("recorder", &[], move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(Recorder::new("recorder", 0, &AUDIT, &recorder_journal)))
    });
    let (container, _) = container_with(registry);

    let first = container.dispatch::<Catalog>().expect("first");
    let second = container.dispatch::<Catalog>().expect("second");
    assert!(Arc::ptr_eq(&first, &second));

    second
        .invoke("audited", Invocation::new().with_arg(3))
        .await
        .expect("audited");
    assert_eq!(entries(&journal).len(), 2);
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_interceptor_can_short_circuit() {
    let registry = Registry::new();
    registry.interceptor::<ShortCircuit, _>("short", &[], |_| Ok(Arc::new(ShortCircuit)));
    let (container, catalog) = container_with(registry);

    let table = container.dispatch::<Catalog>().expect("dispatch");
    let value = table
        .invoke("audited", Invocation::new().with_arg(5))
        .await
        .expect("audited");

    assert_eq!(value, json!(-1));
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_operation_and_bad_arguments() {
    let (container, _) = container_with(Registry::new());
    let table = container.dispatch::<Catalog>().expect("dispatch");

    assert_eq!(table.names(), vec!["audited", "plain"]);
    assert!(matches!(
        table.invoke("missing", Invocation::new()).await,
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        table.invoke("plain", Invocation::new()).await,
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        table
            .invoke("plain", Invocation::new().with_arg("not a number"))
            .await,
        Err(Error::InvalidArgument { .. })
    ));
}
