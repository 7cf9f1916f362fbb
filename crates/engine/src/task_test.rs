use relay_protocol::{AttemptId, ChunkBuilder, FlushOutcome, InputId, OutputId, Tag, TaskId};

use super::*;

fn chunk() -> Chunk {
    let mut builder = ChunkBuilder::new();
    builder.push(b"hello");
    builder.finish()
}

#[test]
fn test_create_and_lookup() {
    let mut table = TaskTable::new();
    let id = table
        .create(InputId::new(0), Tag::new("app.log"), chunk())
        .unwrap();

    let task = table.get(id).unwrap();
    assert_eq!(task.id(), id);
    assert_eq!(task.input(), InputId::new(0));
    assert_eq!(task.tag().as_str(), "app.log");
    assert_eq!(task.users(), 0);
    assert!(task.is_done());
}

#[test]
fn test_ids_are_unique_while_in_flight() {
    let mut table = TaskTable::new();
    let a = table
        .create(InputId::new(0), Tag::new("a"), chunk())
        .unwrap();
    let b = table
        .create(InputId::new(0), Tag::new("b"), chunk())
        .unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_id_reuse_after_removal() {
    let mut table = TaskTable::new();
    let a = table
        .create(InputId::new(0), Tag::new("a"), chunk())
        .unwrap();
    table.remove(a).unwrap();

    // Allocation wraps through the 14-bit space before reusing `a`, but the
    // table must stay allocatable the whole way round.
    for _ in 0..=TaskId::MAX {
        let id = table
            .create(InputId::new(0), Tag::new("x"), chunk())
            .unwrap();
        table.remove(id).unwrap();
    }
    assert!(table.is_empty());
}

#[test]
fn test_refcount_tracks_attempts() {
    let mut table = TaskTable::new();
    let id = table
        .create(InputId::new(0), Tag::new("a"), chunk())
        .unwrap();
    let task = table.get_mut(id).unwrap();

    let a0 = task.add_attempt(OutputId::new(0)).unwrap();
    let a1 = task.add_attempt(OutputId::new(1)).unwrap();
    assert_ne!(a0, a1);
    assert_eq!(task.users(), 2);
    assert!(!task.is_done());

    assert_eq!(task.finish_attempt(a0), Some(OutputId::new(0)));
    assert_eq!(task.users(), 1);
    assert!(!task.is_done());

    assert_eq!(task.finish_attempt(a1), Some(OutputId::new(1)));
    assert_eq!(task.users(), 0);
    assert!(task.is_done());
}

#[test]
fn test_finish_unknown_attempt_is_noop() {
    let mut table = TaskTable::new();
    let id = table
        .create(InputId::new(0), Tag::new("a"), chunk())
        .unwrap();
    let task = table.get_mut(id).unwrap();

    let a0 = task.add_attempt(OutputId::new(0)).unwrap();
    assert_eq!(task.finish_attempt(a0), Some(OutputId::new(0)));
    // Duplicate completion must not drive the count negative.
    assert_eq!(task.finish_attempt(a0), None);
    assert_eq!(task.users(), 0);
}

#[test]
fn test_pending_retry_keeps_task_alive() {
    let mut table = TaskTable::new();
    let id = table
        .create(InputId::new(0), Tag::new("a"), chunk())
        .unwrap();
    let task = table.get_mut(id).unwrap();

    let a0 = task.add_attempt(OutputId::new(0)).unwrap();
    task.mark_retry_pending(OutputId::new(0));
    task.finish_attempt(a0);

    // users == 0 but a retry record still points here
    assert_eq!(task.users(), 0);
    assert!(!task.is_done());

    assert!(task.take_retry_pending(OutputId::new(0)));
    assert!(task.is_done());
    assert!(!task.take_retry_pending(OutputId::new(0)));
}

#[test]
fn test_retry_counts_per_destination() {
    let mut table = TaskTable::new();
    let id = table
        .create(InputId::new(0), Tag::new("a"), chunk())
        .unwrap();
    let task = table.get_mut(id).unwrap();

    assert_eq!(task.retry_count(OutputId::new(0)), 0);
    assert_eq!(task.bump_retry(OutputId::new(0)), 1);
    assert_eq!(task.bump_retry(OutputId::new(0)), 2);
    assert_eq!(task.bump_retry(OutputId::new(1)), 1);
    assert_eq!(task.retry_count(OutputId::new(0)), 2);

    task.clear_retry(OutputId::new(0));
    assert_eq!(task.retry_count(OutputId::new(0)), 0);
    assert_eq!(task.retry_count(OutputId::new(1)), 1);
}

#[test]
fn test_attempt_ids_stay_within_wire_width() {
    let mut table = TaskTable::new();
    let id = table
        .create(InputId::new(0), Tag::new("a"), chunk())
        .unwrap();
    let task = table.get_mut(id).unwrap();

    let mut ids = Vec::new();
    for _ in 0..100 {
        let a = task.add_attempt(OutputId::new(0)).unwrap();
        assert!(a.value() <= AttemptId::MAX);
        ids.push(a);
    }
    for a in ids {
        task.finish_attempt(a).unwrap();
    }
    assert!(task.is_done());
}

#[test]
fn test_chunk_is_shared() {
    let mut table = TaskTable::new();
    let id = table
        .create(InputId::new(0), Tag::new("a"), chunk())
        .unwrap();
    let task = table.get(id).unwrap();

    let c1 = task.chunk();
    let c2 = task.chunk();
    assert_eq!(c1.record(0), c2.record(0));
    assert_eq!(c1.record(0), Some(&b"hello"[..]));
}

#[test]
fn test_outcome_wire_values_unchanged() {
    // Registry consumers encode outcomes into task words; pin the mapping.
    assert_eq!(FlushOutcome::Error.to_bits(), 0);
    assert_eq!(FlushOutcome::Ok.to_bits(), 1);
    assert_eq!(FlushOutcome::Retry.to_bits(), 2);
}
