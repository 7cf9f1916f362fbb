use relay_plugin::Input;

use super::*;

#[test]
fn test_collect_accumulates_records() {
    let mut input = CounterInput::new("c");

    input.collect().unwrap();
    input.collect().unwrap();
    input.collect().unwrap();

    let chunk = input.flush().expect("chunk");
    assert_eq!(chunk.count(), 3);
    assert_eq!(chunk.record(0), Some(&b"counter=0"[..]));
    assert_eq!(chunk.record(2), Some(&b"counter=2"[..]));
    assert_eq!(input.emitted(), 3);
}

#[test]
fn test_flush_without_collect_is_empty() {
    let mut input = CounterInput::new("c");
    assert!(input.flush().is_none());
}

#[test]
fn test_limit_closes_collector() {
    let mut input = CounterInput::with_config(CounterInputConfig {
        name: "c".into(),
        interval: Duration::from_millis(10),
        limit: Some(2),
    });

    input.collect().unwrap();
    input.collect().unwrap();
    assert!(matches!(input.collect(), Err(CollectError::Closed)));
    assert_eq!(input.emitted(), 2);
}

#[test]
fn test_collector_spec_is_interval() {
    let input = CounterInput::with_config(CounterInputConfig {
        interval: Duration::from_millis(250),
        ..Default::default()
    });
    assert_eq!(
        input.collector(),
        CollectorSpec::Interval(Duration::from_millis(250))
    );
}
