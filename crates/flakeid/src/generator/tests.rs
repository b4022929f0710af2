use crate::{Error, Field, Generator, IdGenStatus, SnowflakeId, SystemClock, TimeSource, decompose};
use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread::scope;

#[derive(Debug)]
struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

/// Replays queued readings, then repeats the last one forever.
#[derive(Clone, Debug)]
struct ScriptedTime {
    inner: Rc<ScriptedTimeInner>,
}

#[derive(Debug)]
struct ScriptedTimeInner {
    readings: RefCell<VecDeque<u64>>,
    last: Cell<u64>,
    reads: Cell<usize>,
}

impl ScriptedTime {
    fn new(readings: impl IntoIterator<Item = u64>) -> Self {
        Self {
            inner: Rc::new(ScriptedTimeInner {
                readings: RefCell::new(readings.into_iter().collect()),
                last: Cell::new(0),
                reads: Cell::new(0),
            }),
        }
    }

    fn push(&self, readings: impl IntoIterator<Item = u64>) {
        self.inner.readings.borrow_mut().extend(readings);
    }

    fn reads(&self) -> usize {
        self.inner.reads.get()
    }
}

impl TimeSource for ScriptedTime {
    fn current_millis(&self) -> u64 {
        self.inner.reads.set(self.inner.reads.get() + 1);
        if let Some(next) = self.inner.readings.borrow_mut().pop_front() {
            self.inner.last.set(next);
        }
        self.inner.last.get()
    }
}

trait IdGenStatusExt {
    fn unwrap_ready(self) -> SnowflakeId;
    fn unwrap_pending(self) -> u64;
}

impl IdGenStatusExt for IdGenStatus {
    fn unwrap_ready(self) -> SnowflakeId {
        match self {
            Self::Ready { id } => id,
            Self::Pending { yield_until } => {
                panic!("unexpected pending (yield until: {yield_until})")
            }
        }
    }

    fn unwrap_pending(self) -> u64 {
        match self {
            Self::Ready { id } => panic!("unexpected ready ({id})"),
            Self::Pending { yield_until } => yield_until,
        }
    }
}

fn exhaust<T: TimeSource>(generator: &Generator<T>, timestamp: u64) {
    for i in 0..=SnowflakeId::max_sequence() {
        let id = generator.generate().unwrap();
        assert_eq!(id.timestamp(), timestamp);
        assert_eq!(id.sequence(), i);
    }
}

#[test]
fn constructs_at_boundaries() {
    for (node, partition) in [(0, 0), (31, 31), (0, 31), (31, 0)] {
        let generator = Generator::new(node, partition).unwrap();
        assert_eq!(generator.node_id(), node as u64);
        assert_eq!(generator.partition_id(), partition as u64);
    }
}

#[test]
fn rejects_out_of_range_configuration() {
    let cases = [
        (32, 0, Field::Node, 32),
        (-1, 0, Field::Node, -1),
        (i64::MIN, 0, Field::Node, i64::MIN),
        (0, 32, Field::Partition, 32),
        (0, -1, Field::Partition, -1),
        (0, i64::MAX, Field::Partition, i64::MAX),
        // node is checked first
        (99, -1, Field::Node, 99),
    ];

    for (node, partition, field, value) in cases {
        let err = Generator::with_clock(node, partition, MockTime { millis: 1 }).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidConfiguration {
                field,
                value,
                max: 31
            }
        );
    }
}

#[test]
fn sequence_increments_within_same_tick() {
    let generator = Generator::with_clock(0, 0, MockTime { millis: 42 }).unwrap();

    let id1 = generator.generate().unwrap();
    let id2 = generator.generate().unwrap();
    let id3 = generator.generate().unwrap();

    assert_eq!(id1.timestamp(), 42);
    assert_eq!(id2.timestamp(), 42);
    assert_eq!(id3.timestamp(), 42);
    assert_eq!(id1.sequence(), 0);
    assert_eq!(id2.sequence(), 1);
    assert_eq!(id3.sequence(), 2);
    assert!(id1 < id2 && id2 < id3);
}

#[test]
fn sequence_resets_on_new_tick() {
    let clock = ScriptedTime::new([10, 10, 11, 15]);
    let generator = Generator::with_clock(1, 2, clock).unwrap();

    let ids: Vec<_> = (0..4).map(|_| generator.generate().unwrap()).collect();
    let parts: Vec<_> = ids.iter().map(|id| (id.timestamp(), id.sequence())).collect();
    assert_eq!(parts, [(10, 0), (10, 1), (11, 0), (15, 0)]);
}

#[test]
fn packs_node_and_partition() {
    let generator = Generator::with_clock(30, 3, MockTime { millis: 1000 }).unwrap();
    let id = generator.generate().unwrap();
    assert_eq!(id.to_u64(), (1000 << 22) | (3 << 17) | (30 << 12));
}

#[test]
fn decompose_round_trips_generated_ids() {
    let clock = ScriptedTime::new([7, 7, 7, 9]);
    let generator = Generator::with_clock(17, 5, clock).unwrap();

    for (time, sequence) in [(7, 0), (7, 1), (7, 2), (9, 0)] {
        let parts = decompose(generator.generate().unwrap());
        assert_eq!(parts.time, time);
        assert_eq!(parts.sequence, sequence);
        assert_eq!(parts.node_id, 17);
        assert_eq!(parts.partition_id, 5);
        assert_eq!(parts.machine_id, (5 << 5) | 17);
    }
}

#[test]
fn generate_waits_for_next_tick_when_sequence_exhausted() {
    let clock = ScriptedTime::new([42]);
    let generator = Generator::with_clock(1, 1, clock.clone()).unwrap();

    exhaust(&generator, 42);

    // still 42 for a few spins, then the clock moves on
    clock.push([42, 42, 42, 43]);
    let reads_before = clock.reads();
    let id = generator.generate().unwrap();

    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 0);
    assert_eq!(clock.reads() - reads_before, 4);

    let next = generator.generate().unwrap();
    assert_eq!((next.timestamp(), next.sequence()), (43, 1));
}

#[test]
fn wait_ignores_backward_readings() {
    let clock = ScriptedTime::new([42]);
    let generator = Generator::with_clock(1, 1, clock.clone()).unwrap();

    exhaust(&generator, 42);

    clock.push([42, 40, 41, 42, 44]);
    let id = generator.generate().unwrap();
    assert_eq!((id.timestamp(), id.sequence()), (44, 0));
}

#[test]
fn poll_returns_pending_when_sequence_exhausted() {
    let generator = Generator::with_clock(1, 1, MockTime { millis: 42 }).unwrap();

    exhaust(&generator, 42);

    let before = *generator.state.lock();
    let yield_until = generator.poll().unwrap().unwrap_pending();
    assert_eq!(yield_until, 43);
    assert_eq!(*generator.state.lock(), before);
}

#[test]
fn poll_issues_ids_like_generate() {
    let clock = ScriptedTime::new([5, 5, 6]);
    let generator = Generator::with_clock(2, 3, clock).unwrap();

    let a = generator.poll().unwrap().unwrap_ready();
    let b = generator.generate().unwrap();
    let c = generator.poll().unwrap().ready().unwrap();

    assert_eq!((a.timestamp(), a.sequence()), (5, 0));
    assert_eq!((b.timestamp(), b.sequence()), (5, 1));
    assert_eq!((c.timestamp(), c.sequence()), (6, 0));
}

#[test]
fn rejects_backward_clock_without_mutating_state() {
    let clock = ScriptedTime::new([100, 100, 97, 100, 101]);
    let generator = Generator::with_clock(4, 4, clock).unwrap();

    generator.generate().unwrap();
    generator.generate().unwrap();
    let before = *generator.state.lock();

    let err = generator.generate().unwrap_err();
    assert_eq!(err, Error::ClockMovedBackward { last: 100, now: 97 });
    assert_eq!(err.behind_by(), Some(3));
    assert_eq!(*generator.state.lock(), before);

    // sequence continues where it left off
    let id = generator.generate().unwrap();
    assert_eq!((id.timestamp(), id.sequence()), (100, 2));
    let id = generator.generate().unwrap();
    assert_eq!((id.timestamp(), id.sequence()), (101, 0));
}

#[test]
fn poll_rejects_backward_clock() {
    let clock = ScriptedTime::new([50, 49]);
    let generator = Generator::with_clock(0, 0, clock).unwrap();

    generator.poll().unwrap().unwrap_ready();
    assert_eq!(
        generator.poll().unwrap_err(),
        Error::ClockMovedBackward { last: 50, now: 49 }
    );
}

#[test]
fn first_reading_at_epoch_starts_at_sequence_one() {
    // lastTimestamp starts at 0, so a clock reading of exactly 0 counts as
    // the same millisecond
    let generator = Generator::with_clock(0, 0, MockTime { millis: 0 }).unwrap();
    let id = generator.generate().unwrap();
    assert_eq!((id.timestamp(), id.sequence()), (0, 1));
}

#[test]
fn system_clock_timestamps_are_monotonic() {
    const TOTAL_IDS: usize = 4096 * 64;

    let generator = Generator::new(1, 1).unwrap();
    let mut last_timestamp = 0;
    let mut sequence = 0;

    for _ in 0..TOTAL_IDS {
        let id = generator.generate().unwrap();
        let ts = id.timestamp();
        if ts > last_timestamp {
            sequence = 0;
        }

        assert!(ts >= last_timestamp);
        assert_eq!(id.node_id(), 1);
        assert_eq!(id.partition_id(), 1);
        assert_eq!(id.sequence(), sequence);

        last_timestamp = ts;
        sequence += 1;
    }
}

#[test]
fn one_million_sequential_ids_are_unique() {
    const TOTAL_IDS: usize = 1_000_000;

    let generator = Generator::new(1, 1).unwrap();
    let mut seen = HashSet::with_capacity(TOTAL_IDS);
    let mut previous = SnowflakeId::default();

    for _ in 0..TOTAL_IDS {
        let id = generator.generate().unwrap();
        assert!(id > previous, "{id:?} not after {previous:?}");
        assert!(seen.insert(id), "duplicate id {id}");
        previous = id;
    }

    assert_eq!(seen.len(), TOTAL_IDS);
}

#[test]
fn threaded_ids_are_unique() {
    const TOTAL_IDS: usize = 4096 * 64;

    let threads = num_cpus::get().clamp(2, 8);
    let ids_per_thread = TOTAL_IDS / threads;

    let generator = Arc::new(Generator::new(31, 31).unwrap());
    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for _ in 0..threads {
            let generator = Arc::clone(&generator);
            let seen_ids = Arc::clone(&seen_ids);

            s.spawn(move || {
                let mut local = Vec::with_capacity(ids_per_thread);
                for _ in 0..ids_per_thread {
                    local.push(generator.generate().unwrap());
                }
                // each thread observes its own IDs in increasing order
                assert!(local.windows(2).all(|w| w[0] < w[1]));

                let mut seen = seen_ids.lock().unwrap();
                for id in local {
                    assert!(seen.insert(id), "duplicate id {id}");
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    assert_eq!(final_count, ids_per_thread * threads);
}

#[test]
fn independent_generators_do_not_collide() {
    let clock = Arc::new(MockTime { millis: 77 });
    let a = Generator::with_clock(1, 0, Arc::clone(&clock)).unwrap();
    let b = Generator::with_clock(0, 1, Arc::clone(&clock)).unwrap();

    let mut seen = HashSet::new();
    for _ in 0..1000 {
        assert!(seen.insert(a.generate().unwrap()));
        assert!(seen.insert(b.generate().unwrap()));
    }
}

#[test]
fn generator_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Generator>();
    assert_send_sync::<Generator<SystemClock>>();
}

#[test]
fn debug_output_names_configured_ids() {
    let generator = Generator::with_clock(30, 3, MockTime { millis: 1 }).unwrap();
    let debug = format!("{generator:?}");
    assert!(debug.contains("node_id: 30"), "{debug}");
    assert!(debug.contains("partition_id: 3"), "{debug}");
    assert!(debug.contains("MockTime"), "{debug}");
}
