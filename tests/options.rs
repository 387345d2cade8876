/// Container options from code, environment and JSON

use ferrous_ioc::{contract, Container, ContainerOptions, Resolver};
use serial_test::serial;
use std::env;

contract! {
    pub Dependencies {
        Greeting => "Core/Greeting": String,
    }
}

fn clear_vars(prefix: &str) {
    env::remove_var(format!("{}_ENABLE_MOCKS", prefix));
    env::remove_var(format!("{}_MAX_DEPTH", prefix));
}

#[test]
fn test_defaults() {
    let options = ContainerOptions::default();
    assert!(!options.mocks_enabled);
    assert_eq!(options.max_depth, 1024);
    assert!(!Container::<Dependencies>::with_options(options).mocks_enabled());
}

#[test]
#[serial]
fn test_from_env_reads_default_prefix() {
    clear_vars("IOC");
    env::set_var("IOC_ENABLE_MOCKS", "true");
    env::set_var("IOC_MAX_DEPTH", "32");

    let options = ContainerOptions::from_env();
    clear_vars("IOC");

    assert!(options.mocks_enabled);
    assert_eq!(options.max_depth, 32);
}

#[test]
#[serial]
fn test_from_env_with_custom_prefix() {
    clear_vars("MYAPP");
    env::set_var("MYAPP_ENABLE_MOCKS", "yes");

    let options = ContainerOptions::from_env_with_prefix("myapp");
    clear_vars("MYAPP");

    assert!(options.mocks_enabled);
    assert_eq!(options.max_depth, 1024);
}

#[test]
#[serial]
fn test_from_env_ignores_invalid_values() {
    clear_vars("IOC");
    env::set_var("IOC_ENABLE_MOCKS", "perhaps");
    env::set_var("IOC_MAX_DEPTH", "deep");

    let options = ContainerOptions::from_env();
    clear_vars("IOC");

    assert_eq!(options, ContainerOptions::default());
}

#[test]
#[serial]
fn test_container_built_from_env_starts_in_mock_mode() {
    clear_vars("IOC");
    env::set_var("IOC_ENABLE_MOCKS", "1");
    let ioc = Container::<Dependencies>::with_options(ContainerOptions::from_env());
    clear_vars("IOC");

    ioc.register(Greeting, |_| "real".to_string())
        .mock(Greeting, |_, _| "mock".to_string());
    assert!(ioc.mocks_enabled());
    assert_eq!(*ioc.get_required(Greeting), "mock");
}

#[test]
#[serial]
fn test_zero_depth_is_raised_everywhere() {
    assert_eq!(ContainerOptions::new().with_max_depth(0).max_depth, 1);

    clear_vars("IOC");
    env::set_var("IOC_MAX_DEPTH", "0");
    let options = ContainerOptions::from_env();
    clear_vars("IOC");
    assert_eq!(options.max_depth, 1);

    // Fields are public, so the container applies the same floor
    let options = ContainerOptions { mocks_enabled: false, max_depth: 0 };
    let ioc = Container::<Dependencies>::with_options(options);
    ioc.register(Greeting, |_| "hello".to_string());
    assert_eq!(*ioc.get_required(Greeting), "hello");
}

#[cfg(feature = "config")]
#[test]
fn test_from_json() {
    let options = ContainerOptions::from_json(r#"{ "mocks_enabled": true, "max_depth": 8 }"#).unwrap();
    assert_eq!(options, ContainerOptions::new().with_mocks_enabled(true).with_max_depth(8));

    let defaults = ContainerOptions::from_json("{}").unwrap();
    assert_eq!(defaults, ContainerOptions::default());

    assert!(ContainerOptions::from_json(r#"{ "max_depth": "deep" }"#).is_err());
    assert_eq!(ContainerOptions::from_json(r#"{ "max_depth": 0 }"#).unwrap().max_depth, 1);
}
