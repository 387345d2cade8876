use ferrous_ioc::{contract, CircularPanic, Container, ContainerOptions, DiError, Resolver};
use std::panic::{catch_unwind, AssertUnwindSafe};

pub struct A;
pub struct B;
pub struct C;

contract! {
    pub Graph {
        ServiceA => "Service/A": A,
        ServiceB => "Service/B": B,
        ServiceC => "Service/C": C,
    }
}

#[test]
fn test_self_circular_dependency() {
    let ioc = Container::<Graph>::new();
    ioc.register(ServiceA, |c| {
        let _ = c.get(ServiceA);
        A
    });

    // A fallible lookup inside the factory swallows the error, so resolution succeeds
    assert!(ioc.get(ServiceA).is_ok());

    ioc.try_register(ServiceA, |c| {
        c.get(ServiceA)?;
        Ok(A)
    });

    match ioc.get(ServiceA) {
        Err(DiError::Circular(path)) => assert_eq!(path, vec!["Service/A", "Service/A"]),
        _ => panic!("Expected Circular error"),
    }
}

#[test]
fn test_two_level_circular_with_required_lookups() {
    let ioc = Container::<Graph>::new();
    ioc.register(ServiceA, |c| {
        let _b = c.get_required(ServiceB);
        A
    })
    .register(ServiceB, |c| {
        let _a = c.get_required(ServiceA);
        B
    });

    match ioc.get(ServiceA) {
        Err(DiError::Circular(path)) => {
            assert_eq!(path, vec!["Service/A", "Service/B", "Service/A"]);
        }
        _ => panic!("Expected Circular error"),
    }

    // The resolution stack unwound cleanly: unrelated lookups still work
    ioc.register(ServiceC, |_| C);
    assert!(ioc.get(ServiceC).is_ok());
}

#[test]
fn test_three_level_circular_fallible() {
    let ioc = Container::<Graph>::new();
    ioc.try_register(ServiceA, |c| c.get(ServiceB).map(|_| A))
        .try_register(ServiceB, |c| c.get(ServiceC).map(|_| B))
        .try_register(ServiceC, |c| c.get(ServiceA).map(|_| C));

    let err = ioc.get(ServiceB).err().unwrap();
    assert_eq!(
        err,
        DiError::Circular(vec!["Service/B", "Service/C", "Service/A", "Service/B"])
    );
    assert_eq!(
        err.to_string(),
        "Circular dependency: Service/B -> Service/C -> Service/A -> Service/B"
    );
}

#[test]
fn test_get_required_panics_with_circular_payload() {
    let ioc = Container::<Graph>::new();
    ioc.try_register(ServiceA, |c| c.get(ServiceA).map(|_| A));

    let res = catch_unwind(AssertUnwindSafe(|| {
        let _ = ioc.get_required(ServiceA);
    }));
    let payload = res.err().expect("Expected panic due to circular dependency");
    let circular = payload
        .downcast_ref::<CircularPanic>()
        .expect("panic payload should be CircularPanic");
    assert_eq!(&*circular.path, &["Service/A", "Service/A"]);
}

#[test]
fn test_diamond_is_not_circular() {
    let ioc = Container::<Graph>::new();
    ioc.register(ServiceC, |_| C)
        .register(ServiceB, |c| {
            let _ = c.get_required(ServiceC);
            B
        })
        .register(ServiceA, |c| {
            let _ = c.get_required(ServiceB);
            let _ = c.get_required(ServiceC);
            A
        });

    assert!(ioc.get(ServiceA).is_ok());
}

#[test]
fn test_depth_limit() {
    let ioc = Container::<Graph>::with_options(ContainerOptions::new().with_max_depth(2));
    ioc.register(ServiceC, |_| C)
        .try_register(ServiceB, |c| c.get(ServiceC).map(|_| B))
        .try_register(ServiceA, |c| c.get(ServiceB).map(|_| A));

    assert!(ioc.get(ServiceB).is_ok());
    assert_eq!(ioc.get(ServiceA).err(), Some(DiError::DepthExceeded(2)));
}

pub struct P;

contract! {
    pub Inner {
        ServiceP => "Inner/P": P,
    }
}

#[test]
fn test_depth_limit_counts_only_own_frames() {
    let inner = std::sync::Arc::new(Container::<Inner>::with_options(
        ContainerOptions::new().with_max_depth(2),
    ));
    inner.register(ServiceP, |_| P);
    assert!(inner.get(ServiceP).is_ok());

    let outer = Container::<Graph>::new();
    let nested = inner.clone();
    outer
        .try_register(ServiceA, |c| c.get(ServiceB).map(|_| A))
        .try_register(ServiceB, move |_| nested.get(ServiceP).map(|_| B));

    // Two outer frames are on the stack when the inner container resolves once
    assert!(outer.get(ServiceA).is_ok());
}

#[test]
fn test_cycles_are_per_container() {
    let first = std::sync::Arc::new(Container::<Graph>::new());
    first.register(ServiceC, |_| C);

    let second = Container::<Graph>::new();
    let other = first.clone();
    second.try_register(ServiceC, move |_| other.get(ServiceC));

    // The same namespace resolved by another container is not a cycle
    assert!(second.get(ServiceC).is_ok());
}
