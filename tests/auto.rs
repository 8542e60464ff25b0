use lazuli::{auto::MODULES, auto_module, Arguments, Container, Definition, InstantiateErrorKind, ModuleDescriptor, RegisterErrorKind};
use tracing_test::traced_test;

struct Config {
    prefix: &'static str,
}

struct Logger {
    prefix: &'static str,
}

auto_module!(CONFIG, || {
    ModuleDescriptor::new("config", Definition::from_fn(|_| Ok::<_, InstantiateErrorKind>(Config { prefix: "app:" })))
});

auto_module!(LOGGER, || {
    ModuleDescriptor::new(
        "logger",
        Definition::new(["config"], |args: Arguments| {
            let config = args.get::<Config>(0)?;
            Ok::<_, InstantiateErrorKind>(Logger { prefix: config.prefix })
        }),
    )
});

#[test]
fn test_modules_count() {
    assert_eq!(MODULES.len(), 2);
}

#[tokio::test]
#[traced_test]
async fn test_provide_auto_modules() {
    let container = Container::new();

    assert_eq!(container.provide_auto_modules().unwrap(), 2);
    assert_eq!(container.names().iter().map(|name| &**name).collect::<Vec<_>>(), ["config", "logger"]);

    let logger = container.resolve_as::<Logger>("logger").await.unwrap();
    assert_eq!(logger.prefix, "app:");
}

#[test]
#[traced_test]
fn test_provide_auto_modules_twice() {
    let container = Container::new();
    container.provide_auto_modules().unwrap();

    let Err(RegisterErrorKind::AlreadyRegistered { .. }) = container.provide_auto_modules() else {
        panic!("modules should be registered once");
    };
    assert_eq!(container.len(), 2);
}
