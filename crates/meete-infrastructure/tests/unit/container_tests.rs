//! Container resolution tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use meete_domain::error::Error;
use meete_infrastructure::di::{CapabilityKey, Container, Registry};

#[derive(Debug)]
struct Clock {
    id: usize,
}

#[derive(Debug)]
struct Ledger {
    clock: Arc<Clock>,
}

#[derive(Debug)]
struct Left;

#[derive(Debug)]
struct Right;

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

fn counting_clock(registry: &Registry, built: &Arc<AtomicUsize>) -> CapabilityKey {
    let built = Arc::clone(built);
    registry.singleton::<Clock, _>(&[], move |_| {
        let id = built.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(Clock { id }))
    })
}

fn container(registry: Registry) -> Container {
    Container::new(Arc::new(registry))
}

#[test]
fn test_singleton_resolves_to_one_instance() {
    let registry = Registry::new();
    let built = Arc::new(AtomicUsize::new(0));
    counting_clock(&registry, &built);
    let container = container(registry);

    let first = container.resolve::<Clock>().expect("first");
    let second = container.resolve::<Clock>().expect("second");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_first_resolution_constructs_once() {
    let registry = Registry::new();
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    registry.singleton::<Clock, _>(&[], move |_| {
        let id = counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        Ok(Arc::new(Clock { id }))
    });
    let container = container(registry);

    let resolved: Vec<Arc<Clock>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| container.resolve::<Clock>().expect("resolve")))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("join"))
            .collect()
    });

    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert!(resolved.iter().all(|clock| Arc::ptr_eq(clock, &resolved[0])));
}

#[test]
fn test_transient_resolves_fresh_instances() {
    let registry = Registry::new();
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    registry.transient::<Clock, _>(&[], move |_| {
        Ok(Arc::new(Clock {
            id: counter.fetch_add(1, Ordering::SeqCst),
        }))
    });
    let container = container(registry);

    let first = container.resolve::<Clock>().expect("first");
    let second = container.resolve::<Clock>().expect("second");

    assert!(!Arc::ptr_eq(&first, &second));
    assert_ne!(first.id, second.id);
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[test]
fn test_declared_dependencies_share_singletons() {
    let registry = Registry::new();
    let built = Arc::new(AtomicUsize::new(0));
    let clock = counting_clock(&registry, &built);
    registry.singleton::<Ledger, _>(&[clock], |deps| {
        Ok(Arc::new(Ledger {
            clock: deps.get::<Clock>()?,
        }))
    });
    let container = container(registry);

    let ledger = container.resolve::<Ledger>().expect("ledger");
    let clock = container.resolve::<Clock>().expect("clock");

    assert!(Arc::ptr_eq(&ledger.clock, &clock));
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn test_trait_object_and_named_contracts() {
    let registry = Registry::new();
    registry.singleton::<dyn Greeter, _>(&[], |_| Ok(Arc::new(English) as Arc<dyn Greeter>));
    registry.singleton_named::<Clock, _>("utc", &[], |_| Ok(Arc::new(Clock { id: 7 })));
    let container = container(registry);

    assert_eq!(container.resolve::<dyn Greeter>().expect("greeter").greet(), "hello");
    assert_eq!(container.resolve_named::<Clock>("utc").expect("utc").id, 7);
    assert!(matches!(
        container.resolve::<Clock>(),
        Err(Error::UnresolvedDependency { requested_by: None, .. })
    ));
}

#[test]
fn test_cycle_is_rejected_before_any_factory_runs() {
    let registry = Registry::new();
    let built = Arc::new(AtomicUsize::new(0));
    let left_count = Arc::clone(&built);
    let right_count = Arc::clone(&built);
    registry.singleton::<Left, _>(&[CapabilityKey::of::<Right>()], move |deps| {
        left_count.fetch_add(1, Ordering::SeqCst);
        deps.get::<Right>()?;
        Ok(Arc::new(Left))
    });
    registry.singleton::<Right, _>(&[CapabilityKey::of::<Left>()], move |deps| {
        right_count.fetch_add(1, Ordering::SeqCst);
        deps.get::<Left>()?;
        Ok(Arc::new(Right))
    });
    let container = container(registry);

    match container.resolve::<Left>() {
        Err(Error::CyclicDependency { chain }) => {
            assert_eq!(chain.len(), 3);
            assert_eq!(chain.first(), chain.last());
            assert!(chain[0].ends_with("Left"));
            assert!(chain[1].ends_with("Right"));
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
    assert_eq!(built.load(Ordering::SeqCst), 0);
    assert!(matches!(
        container.validate(),
        Err(Error::CyclicDependency { .. })
    ));
}

#[test]
fn test_self_dependency_is_a_cycle() {
    let registry = Registry::new();
    registry.singleton::<Left, _>(&[CapabilityKey::of::<Left>()], |_| Ok(Arc::new(Left)));
    let container = container(registry);

    match container.resolve::<Left>() {
        Err(Error::CyclicDependency { chain }) => assert_eq!(chain.len(), 2),
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn test_missing_dependency_names_the_requester() {
    let registry = Registry::new();
    registry.singleton::<Ledger, _>(&[CapabilityKey::of::<Clock>()], |deps| {
        Ok(Arc::new(Ledger {
            clock: deps.get::<Clock>()?,
        }))
    });
    let container = container(registry);

    match container.resolve::<Ledger>() {
        Err(Error::UnresolvedDependency { key, requested_by }) => {
            assert!(key.ends_with("Clock"));
            assert!(requested_by.expect("requester").ends_with("Ledger"));
        }
        other => panic!("expected unresolved, got {other:?}"),
    }
    assert!(matches!(
        container.validate(),
        Err(Error::UnresolvedDependency { .. })
    ));
}

#[test]
fn test_undeclared_request_is_refused_even_when_registered() {
    let registry = Registry::new();
    let built = Arc::new(AtomicUsize::new(0));
    counting_clock(&registry, &built);
    registry.singleton::<Ledger, _>(&[], |deps| {
        Ok(Arc::new(Ledger {
            clock: deps.get::<Clock>()?,
        }))
    });
    let container = container(registry);

    assert!(matches!(
        container.resolve::<Ledger>(),
        Err(Error::UnresolvedDependency { requested_by: Some(_), .. })
    ));
    assert_eq!(built.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failed_singleton_is_retried() {
    let registry = Registry::new();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    registry.singleton::<Clock, _>(&[], move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(Error::internal("clock not ready"));
        }
        Ok(Arc::new(Clock { id: 1 }))
    });
    let container = container(registry);

    assert!(container.resolve::<Clock>().is_err());
    assert_eq!(container.resolve::<Clock>().expect("second attempt").id, 1);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_last_registration_wins() {
    let registry = Registry::new();
    registry.singleton::<Clock, _>(&[], |_| Ok(Arc::new(Clock { id: 1 })));
    registry.singleton::<Clock, _>(&[], |_| Ok(Arc::new(Clock { id: 2 })));
    let container = container(registry);

    assert_eq!(container.resolve::<Clock>().expect("clock").id, 2);
}

#[test]
fn test_bindings_registered_during_resolution_are_visible() {
    let registry = Registry::new();
    registry.singleton::<Ledger, _>(&[], |deps| {
        deps.registry()
            .singleton::<Clock, _>(&[], |_| Ok(Arc::new(Clock { id: 9 })));
        Ok(Arc::new(Ledger {
            clock: Arc::new(Clock { id: 0 }),
        }))
    });
    let container = container(registry);

    assert!(container.resolve::<Clock>().is_err());
    container.resolve::<Ledger>().expect("ledger");
    assert_eq!(container.resolve::<Clock>().expect("late clock").id, 9);
}

#[test]
fn test_instance_binding_and_validate() {
    let registry = Registry::new();
    let clock = Arc::new(Clock { id: 3 });
    let key = registry.instance(Arc::clone(&clock));
    let container = container(registry);

    container.validate().expect("valid wiring");
    assert!(key.is::<Clock>());
    assert!(Arc::ptr_eq(&container.resolve::<Clock>().expect("clock"), &clock));
}
