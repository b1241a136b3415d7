//! Criterion micro-benchmarks for stack push/pop and sequence append/walk.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use opstore::{RawSequence, RawStack};

/// A 16-aligned operand, the widest alignment the round-trip tests mix in.
#[derive(Clone, Copy)]
#[repr(C, align(16))]
struct Wide16 {
    v: u64,
}

fn bench_stack_push_pop_u64(c: &mut Criterion) {
    c.bench_function("stack_push_pop_u64_1024", |b| {
        b.iter(|| {
            let mut stack = RawStack::new();
            for i in 0..1024u64 {
                stack.push(black_box(i));
            }
            for _ in 0..1024 {
                // SAFETY: every live slot is a u64.
                black_box(unsafe { stack.pop::<u64>() });
            }
            stack
        })
    });
}

fn bench_stack_mixed_alignments(c: &mut Criterion) {
    c.bench_function("stack_push_pop_mixed_256", |b| {
        b.iter(|| {
            let mut stack = RawStack::new();
            for i in 0..256u64 {
                stack.push(black_box(i as u8));
                stack.push(black_box(i));
                stack.push(black_box(Wide16 { v: i }));
            }
            for _ in 0..256 {
                // SAFETY: pops mirror the push order exactly.
                unsafe {
                    black_box(stack.pop::<Wide16>().v);
                    black_box(stack.pop::<u64>());
                    black_box(stack.pop::<u8>());
                }
            }
            stack
        })
    });
}

fn bench_sequence_append_walk(c: &mut Criterion) {
    c.bench_function("sequence_append_walk_u64_1024", |b| {
        b.iter(|| {
            let mut seq = RawSequence::new();
            for i in 0..1024u64 {
                seq.push(black_box(i));
            }
            let mut position = 0;
            // SAFETY: a homogeneous u64 walk from 0 stays on slot starts.
            while let Some((value, next)) = unsafe { seq.read::<u64>(position) } {
                black_box(value);
                position = next;
            }
            seq
        })
    });
}

criterion_group!(
    benches,
    bench_stack_push_pop_u64,
    bench_stack_mixed_alignments,
    bench_sequence_append_walk
);
criterion_main!(benches);
