use super::*;

#[test]
fn test_builder_push_and_finish() {
    let mut builder = ChunkBuilder::new();
    builder.push(b"hello");
    builder.push(b"world!");

    assert_eq!(builder.count(), 2);
    assert_eq!(builder.buffer_size(), 11);

    let chunk = builder.finish();
    assert_eq!(chunk.count(), 2);
    assert_eq!(chunk.total_bytes(), 11);
    assert_eq!(chunk.record(0), Some(&b"hello"[..]));
    assert_eq!(chunk.record(1), Some(&b"world!"[..]));
    assert_eq!(chunk.record(2), None);
}

#[test]
fn test_empty_chunk() {
    let chunk = ChunkBuilder::new().finish();
    assert!(chunk.is_empty());
    assert_eq!(chunk.count(), 0);
    assert_eq!(chunk.total_bytes(), 0);
    assert_eq!(chunk.records().count(), 0);
}

#[test]
fn test_records_iterator() {
    let mut builder = ChunkBuilder::new();
    builder.push(b"a");
    builder.push(b"bb");
    builder.push(b"ccc");

    let chunk = builder.finish();
    let records: Vec<&[u8]> = chunk.records().collect();
    assert_eq!(records, vec![&b"a"[..], &b"bb"[..], &b"ccc"[..]]);
}

#[test]
fn test_clone_shares_buffer() {
    let mut builder = ChunkBuilder::new();
    builder.push(b"shared payload");
    let chunk = builder.finish();

    let clone = chunk.clone();
    // Bytes clones share the same backing storage
    assert_eq!(chunk.buffer().as_ptr(), clone.buffer().as_ptr());
    assert_eq!(clone.record(0), Some(&b"shared payload"[..]));
}

#[test]
fn test_take_leaves_builder_reusable() {
    let mut builder = ChunkBuilder::new();
    assert!(builder.take().is_none());

    builder.push(b"one");
    let chunk = builder.take().expect("chunk");
    assert_eq!(chunk.count(), 1);
    assert!(builder.is_empty());

    builder.push(b"two");
    let chunk = builder.take().expect("chunk");
    assert_eq!(chunk.record(0), Some(&b"two"[..]));
}

#[test]
fn test_reset_clears_records() {
    let mut builder = ChunkBuilder::new();
    builder.push(b"data");
    builder.reset();

    assert!(builder.is_empty());
    assert_eq!(builder.buffer_size(), 0);
}
