use std::str::FromStr;
use std::time::Duration;

use relay_config::{MatchCondition, RoutingRule};
use relay_protocol::FlushOutcome;

use super::*;
use crate::engine::ExitStatus;

#[test]
fn test_service_settings_carry_over() {
    let config = Config::from_str(
        r#"
[service]
flush_interval = "2s"
grace_period = "10s"
retry_limit = 3
retry_base = "500ms"
retry_cap = "30s"
"#,
    )
    .unwrap();

    let engine_config = EngineConfig::from(&config.service);
    assert_eq!(engine_config.flush_interval, Duration::from_secs(2));
    assert_eq!(engine_config.grace_period, Duration::from_secs(10));
    assert_eq!(engine_config.retry_limit, 3);
    assert_eq!(engine_config.retry_base, Duration::from_millis(500));
    assert_eq!(engine_config.retry_cap, Duration::from_secs(30));
}

#[test]
fn test_default_outputs_subscribe_to_unruled_tags() {
    let routing = RoutingConfig {
        default: vec!["console".into()],
        rules: vec![RoutingRule {
            match_condition: MatchCondition {
                tag: Some("app.*".into()),
            },
            outputs: vec!["archive".into()],
        }],
    };
    let tags = vec!["app.log".to_string(), "audit.log".to_string()];

    let fallback = fallback_tags(&routing, &tags);
    assert_eq!(fallback, vec!["audit.log"]);

    assert_eq!(
        subscription_patterns(&routing, "archive", &fallback),
        vec!["app.*".to_string()]
    );
    // the default output gets exact tags, never a wildcard
    assert_eq!(
        subscription_patterns(&routing, "console", &fallback),
        vec!["audit.log".to_string()]
    );
    assert!(subscription_patterns(&routing, "unreferenced", &fallback).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_wired_engine_routes_rules_and_defaults() {
    let config = Config::from_str(
        r#"
[service]
flush_interval = "1s"
grace_period = "1s"
buffering = true

[[inputs.memory]]
name = "app"
tag = "app.log"

[[inputs.memory]]
name = "audit"
tag = "audit.log"

[outputs.archive]
type = "null"

[outputs.console]
type = "null"

[routing]
default = ["console"]

[[routing.rules]]
match = { tag = "app.*" }
outputs = ["archive"]
"#,
    )
    .unwrap();

    let setup = build_engine(&config).unwrap();
    let observed = setup.buffer.clone().unwrap();
    let handle = setup.engine.handle();
    let app = setup.memory.get("app").unwrap().clone();
    let audit = setup.memory.get("audit").unwrap().clone();

    let running = tokio::spawn(setup.engine.run());
    app.push(b"rule-matched");
    audit.push(b"fell through");

    tokio::time::sleep(Duration::from_secs(2)).await;
    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();

    // each chunk reaches exactly one destination: app.log only the rule's
    // output, audit.log only the default
    assert_eq!(report.status, ExitStatus::Stopped);
    assert_eq!(report.stats.tasks_created, 2);
    assert_eq!(report.stats.attempts_spawned, 2);
    assert_eq!(report.stats.attempts_ok, 2);
    assert_eq!(observed.outcomes(), vec![FlushOutcome::Ok, FlushOutcome::Ok]);
    assert!(observed.stopped());
}

#[tokio::test(start_paused = true)]
async fn test_counter_input_wired_from_config() {
    let config = Config::from_str(
        r#"
[service]
flush_interval = "1s"
grace_period = "1s"

[[inputs.counter]]
name = "hb"
tag = "counter.hb"
interval = "250ms"
limit = 3

[outputs.sink]
type = "null"

[routing]
default = ["sink"]
"#,
    )
    .unwrap();

    let setup = build_engine(&config).unwrap();
    assert!(setup.memory.is_empty());
    assert!(setup.buffer.is_none());
    let handle = setup.engine.handle();

    let running = tokio::spawn(setup.engine.run());
    tokio::time::sleep(Duration::from_secs(2)).await;
    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();

    assert_eq!(report.stats.tasks_created, 1);
    assert_eq!(report.stats.attempts_ok, 1);
    assert_eq!(report.stats.collect_errors, 0);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_instances_are_skipped() {
    let config = Config::from_str(
        r#"
[service]
flush_interval = "1s"
grace_period = "1s"

[[inputs.memory]]
name = "live"
tag = "live.log"

[[inputs.memory]]
name = "dark"
tag = "dark.log"
enabled = false

[outputs.sink]
type = "null"

[outputs.off]
type = "null"
enabled = false

[routing]
default = ["sink"]
"#,
    )
    .unwrap();

    let setup = build_engine(&config).unwrap();
    assert!(setup.memory.contains_key("live"));
    assert!(!setup.memory.contains_key("dark"));
    let handle = setup.engine.handle();
    let live = setup.memory.get("live").unwrap().clone();

    let running = tokio::spawn(setup.engine.run());
    live.push(b"record");

    tokio::time::sleep(Duration::from_secs(2)).await;
    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();

    // only the enabled input produced a task, only the enabled output got it
    assert_eq!(report.stats.tasks_created, 1);
    assert_eq!(report.stats.attempts_spawned, 1);
    assert_eq!(report.stats.attempts_ok, 1);
}
