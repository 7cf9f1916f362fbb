//! End-to-end engine scenarios on a paused clock
//!
//! Each test wires real plugins into a full engine, runs it on tokio's
//! virtual clock, and asserts on the final report plus what the scripted
//! destination and buffering adapter observed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use relay_engine::{
    Chunk, Engine, EngineConfig, ExitStatus, FlushOutcome, MemoryBuffer, Output, Signal, Tag,
};
use relay_inputs::{CounterInput, CounterInputConfig, MemoryInput};
use relay_outputs::ScriptedOutput;

/// Destination whose flush outlives any reasonable grace period
struct StuckOutput;

#[async_trait]
impl Output for StuckOutput {
    fn name(&self) -> &str {
        "stuck"
    }

    async fn flush(&self, _chunk: Arc<Chunk>, _tag: &Tag) -> FlushOutcome {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        FlushOutcome::Ok
    }
}

fn test_config() -> EngineConfig {
    EngineConfig {
        flush_interval: Duration::from_secs(5),
        grace_period: Duration::from_secs(5),
        retry_limit: 5,
        retry_base: Duration::from_secs(1),
        retry_cap: Duration::from_secs(60),
    }
}

#[tokio::test(start_paused = true)]
async fn test_delivers_chunk_on_flush_tick() {
    let mut engine = Engine::new(test_config());
    let (input, records) = MemoryInput::new("mem");
    let (output, recorder) = ScriptedOutput::always_ok("dest");
    let (buffer, observed) = MemoryBuffer::new();

    engine.add_input(Tag::new("app.log"), Box::new(input)).unwrap();
    engine.add_output("app.*", Box::new(output)).unwrap();
    engine.set_buffer(Box::new(buffer));
    let handle = engine.handle();

    let running = tokio::spawn(engine.run());
    records.push(b"line one");
    records.push(b"line two");

    tokio::time::sleep(Duration::from_secs(6)).await;
    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();

    assert_eq!(recorder.call_count(), 1);
    assert_eq!(recorder.record_counts(), vec![2]);
    assert_eq!(recorder.tags(), vec!["app.log".to_string()]);

    assert_eq!(report.status, ExitStatus::Stopped);
    assert_eq!(report.tasks_abandoned, 0);
    assert_eq!(report.stats.tasks_created, 1);
    assert_eq!(report.stats.tasks_destroyed, 1);
    assert_eq!(report.stats.attempts_ok, 1);
    assert_eq!(report.stats.attempts_failed, 0);

    assert_eq!(observed.outcomes(), vec![FlushOutcome::Ok]);
    assert!(observed.stopped());
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_retry_until_delivered() {
    let mut engine = Engine::new(test_config());
    let (input, records) = MemoryInput::new("mem");
    let (output, recorder) = ScriptedOutput::new(
        "flaky",
        vec![
            FlushOutcome::Retry,
            FlushOutcome::Retry,
            FlushOutcome::Retry,
            FlushOutcome::Ok,
        ],
    );
    let (buffer, observed) = MemoryBuffer::new();

    engine.add_input(Tag::new("app.log"), Box::new(input)).unwrap();
    engine.add_output("app.*", Box::new(output)).unwrap();
    engine.set_buffer(Box::new(buffer));
    let handle = engine.handle();

    let running = tokio::spawn(engine.run());
    records.push(b"payload");

    // flush at 5s, retries after 1s, 2s, 4s of backoff
    tokio::time::sleep(Duration::from_secs(15)).await;
    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();

    assert_eq!(recorder.call_count(), 4);
    assert_eq!(report.stats.retries_scheduled, 3);
    assert_eq!(report.stats.retries_fired, 3);
    assert_eq!(report.stats.retries_exhausted, 0);
    assert_eq!(report.stats.attempts_ok, 1);
    assert_eq!(report.stats.tasks_created, 1);
    assert_eq!(report.stats.tasks_destroyed, 1);

    assert_eq!(
        observed.outcomes(),
        vec![
            FlushOutcome::Retry,
            FlushOutcome::Retry,
            FlushOutcome::Retry,
            FlushOutcome::Ok,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retry_budget_becomes_permanent_error() {
    let mut engine = Engine::new(EngineConfig {
        retry_limit: 2,
        ..test_config()
    });
    let (input, records) = MemoryInput::new("mem");
    let (output, recorder) = ScriptedOutput::new("down", vec![FlushOutcome::Retry]);
    let (buffer, observed) = MemoryBuffer::new();

    engine.add_input(Tag::new("app.log"), Box::new(input)).unwrap();
    engine.add_output("app.*", Box::new(output)).unwrap();
    engine.set_buffer(Box::new(buffer));
    let handle = engine.handle();

    let running = tokio::spawn(engine.run());
    records.push(b"payload");

    tokio::time::sleep(Duration::from_secs(15)).await;
    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();

    // initial attempt plus two scheduled retries; the third request is over
    // budget and converts to a permanent error
    assert_eq!(recorder.call_count(), 3);
    assert_eq!(report.stats.retries_scheduled, 2);
    assert_eq!(report.stats.retries_exhausted, 1);
    assert_eq!(report.stats.attempts_failed, 1);
    assert_eq!(report.stats.tasks_destroyed, 1);

    assert_eq!(
        observed.outcomes(),
        vec![FlushOutcome::Retry, FlushOutcome::Retry, FlushOutcome::Error]
    );
}

#[tokio::test(start_paused = true)]
async fn test_task_lives_until_every_destination_resolves() {
    let mut engine = Engine::new(test_config());
    let (input, records) = MemoryInput::new("mem");
    let (ok_out, ok_recorder) = ScriptedOutput::always_ok("good");
    let (err_out, err_recorder) = ScriptedOutput::always_error("bad");
    let (buffer, observed) = MemoryBuffer::new();

    engine.add_input(Tag::new("app.log"), Box::new(input)).unwrap();
    engine.add_output("app.*", Box::new(ok_out)).unwrap();
    engine.add_output("app.*", Box::new(err_out)).unwrap();
    engine.set_buffer(Box::new(buffer));
    let handle = engine.handle();

    let running = tokio::spawn(engine.run());
    records.push(b"payload");

    tokio::time::sleep(Duration::from_secs(6)).await;
    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();

    assert_eq!(ok_recorder.call_count(), 1);
    assert_eq!(err_recorder.call_count(), 1);

    // one task, two attempts, destroyed exactly once
    assert_eq!(report.stats.tasks_created, 1);
    assert_eq!(report.stats.tasks_destroyed, 1);
    assert_eq!(report.stats.attempts_spawned, 2);
    assert_eq!(report.stats.attempts_ok, 1);
    assert_eq!(report.stats.attempts_failed, 1);
    assert_eq!(observed.results().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stop_flushes_pending_data_before_exit() {
    let mut engine = Engine::new(test_config());
    let (input, records) = MemoryInput::new("mem");
    let (output, recorder) = ScriptedOutput::always_ok("dest");

    engine.add_input(Tag::new("app.log"), Box::new(input)).unwrap();
    engine.add_output("app.*", Box::new(output)).unwrap();
    let handle = engine.handle();

    let running = tokio::spawn(engine.run());
    records.push(b"unflushed");

    // stop well before the first flush tick; the stop path runs one final
    // flush so the pending record still goes out
    tokio::time::sleep(Duration::from_secs(1)).await;
    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();

    assert_eq!(recorder.call_count(), 1);
    assert_eq!(recorder.record_counts(), vec![1]);
    assert_eq!(report.status, ExitStatus::Stopped);
    assert_eq!(report.stats.attempts_ok, 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_waits_out_full_grace_period() {
    let mut engine = Engine::new(test_config());
    let (input, records) = MemoryInput::new("mem");
    let (output, recorder) = ScriptedOutput::always_ok("dest");

    engine.add_input(Tag::new("app.log"), Box::new(input)).unwrap();
    engine.add_output("app.*", Box::new(output)).unwrap();
    let handle = engine.handle();

    let running = tokio::spawn(engine.run());
    records.push(b"payload");

    tokio::time::sleep(Duration::from_secs(1)).await;
    let stopped_at = tokio::time::Instant::now();
    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();

    // the attempt resolves immediately, yet the loop serves the full window
    assert!(stopped_at.elapsed() >= Duration::from_secs(5));
    assert_eq!(report.status, ExitStatus::Stopped);
    assert_eq!(report.tasks_abandoned, 0);
    assert_eq!(recorder.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_grace_expiry_abandons_stuck_tasks() {
    let mut engine = Engine::new(test_config());
    let (input, records) = MemoryInput::new("mem");

    engine.add_input(Tag::new("app.log"), Box::new(input)).unwrap();
    engine.add_output("app.*", Box::new(StuckOutput)).unwrap();
    let handle = engine.handle();

    let running = tokio::spawn(engine.run());
    records.push(b"payload");

    // flush at 5s spawns an attempt that never reports back
    tokio::time::sleep(Duration::from_secs(6)).await;
    let stopped_at = tokio::time::Instant::now();
    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();

    assert!(stopped_at.elapsed() >= Duration::from_secs(5));
    assert_eq!(report.status, ExitStatus::GraceExpired);
    assert_eq!(report.tasks_abandoned, 1);
    assert_eq!(report.stats.tasks_created, 1);
    assert_eq!(report.stats.tasks_destroyed, 0);
    assert_eq!(report.stats.attempts_spawned, 1);
    assert_eq!(report.stats.attempts_ok, 0);
}

#[tokio::test(start_paused = true)]
async fn test_input_worker_released_once() {
    let mut engine = Engine::new(test_config());
    let (input, _records) = MemoryInput::new("mem");
    let (output, _recorder) = ScriptedOutput::always_ok("dest");

    engine.add_input(Tag::new("app.log"), Box::new(input)).unwrap();
    engine.add_output("app.*", Box::new(output)).unwrap();
    engine.register_worker(7, "tail-reader");
    let handle = engine.handle();
    let sender = engine.sender();

    let running = tokio::spawn(engine.run());

    tokio::time::sleep(Duration::from_secs(1)).await;
    sender.send(Signal::InputThread(7)).unwrap();
    // a second release for the same id finds nothing left to free
    sender.send(Signal::InputThread(7)).unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(handle.stats().workers_released, 1);

    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();
    assert_eq!(report.stats.workers_released, 1);
}

#[tokio::test(start_paused = true)]
async fn test_interval_collector_feeds_flush_cycle() {
    let mut engine = Engine::new(test_config());
    let input = CounterInput::with_config(CounterInputConfig {
        name: "ticker".into(),
        interval: Duration::from_secs(1),
        limit: Some(3),
    });
    let (output, recorder) = ScriptedOutput::always_ok("dest");

    engine.add_input(Tag::new("counter.t"), Box::new(input)).unwrap();
    engine.add_output("counter.*", Box::new(output)).unwrap();
    let handle = engine.handle();

    let running = tokio::spawn(engine.run());

    // collects at 1s, 2s, 3s, then the collector closes; flush at 5s
    tokio::time::sleep(Duration::from_secs(6)).await;
    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();

    assert_eq!(recorder.call_count(), 1);
    assert_eq!(recorder.record_counts(), vec![3]);
    assert_eq!(report.stats.tasks_created, 1);
    assert_eq!(report.stats.collect_errors, 0);
}

#[tokio::test(start_paused = true)]
async fn test_unrouted_chunk_is_dropped() {
    let mut engine = Engine::new(test_config());
    let (input, records) = MemoryInput::new("mem");
    let (output, recorder) = ScriptedOutput::always_ok("dest");

    engine.add_input(Tag::new("app.log"), Box::new(input)).unwrap();
    engine.add_output("metrics.*", Box::new(output)).unwrap();
    let handle = engine.handle();

    let running = tokio::spawn(engine.run());
    records.push(b"nowhere to go");

    tokio::time::sleep(Duration::from_secs(6)).await;
    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();

    assert_eq!(recorder.call_count(), 0);
    assert_eq!(report.stats.tasks_created, 0);
    assert_eq!(report.stats.chunks_dropped, 1);
    assert_eq!(report.status, ExitStatus::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_flush_now_bypasses_timer() {
    let mut engine = Engine::new(test_config());
    let (input, records) = MemoryInput::new("mem");
    let (output, recorder) = ScriptedOutput::always_ok("dest");

    engine.add_input(Tag::new("app.log"), Box::new(input)).unwrap();
    engine.add_output("app.*", Box::new(output)).unwrap();
    let handle = engine.handle();

    let running = tokio::spawn(engine.run());
    records.push(b"eager");

    tokio::time::sleep(Duration::from_secs(1)).await;
    handle.flush_now().unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(recorder.call_count(), 1);
    assert_eq!(handle.stats().attempts_ok, 1);

    handle.stop().unwrap();
    let report = running.await.unwrap().unwrap();
    assert_eq!(report.status, ExitStatus::Stopped);
    // the later timer tick found nothing new to send
    assert_eq!(recorder.call_count(), 1);
}
