//! Property-based tests checking `Deque` against `VecDeque`.

use std::cell::RefCell;
use std::collections::VecDeque;

use proptest::prelude::*;

use crate::{ChunkPool, Deque, PoolConfig, PoolRef, Queue};

#[derive(Clone, Debug)]
enum Op {
    PushFront(i32),
    PushBack(i32),
    PopFront,
    PopBack,
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::PushFront),
        4 => any::<i32>().prop_map(Op::PushBack),
        3 => Just(Op::PopFront),
        3 => Just(Op::PopBack),
        1 => Just(Op::Clear),
    ]
}

fn apply<P: PoolRef<i32>>(deque: &mut Deque<i32, P>, model: &mut VecDeque<i32>, op: Op) {
    match op {
        Op::PushFront(v) => {
            deque.push_front(v);
            model.push_front(v);
        }
        Op::PushBack(v) => {
            deque.push_back(v);
            model.push_back(v);
        }
        Op::PopFront => assert_eq!(deque.pop_front(), model.pop_front()),
        Op::PopBack => assert_eq!(deque.pop_back(), model.pop_back()),
        Op::Clear => {
            deque.clear();
            model.clear();
        }
    }
}

/// Every owned chunk holds at least one element, so a deque never owns more
/// chunks than it can fill, plus the two partially filled ends.
fn assert_chunk_bound<T, P: PoolRef<T>>(deque: &Deque<T, P>) {
    let cap = deque.chunk_capacity();
    let bound = if deque.is_empty() {
        0
    } else {
        deque.len().div_ceil(cap) + 1
    };
    assert!(
        deque.chunk_count() <= bound,
        "{} chunks for {} elements of capacity {}",
        deque.chunk_count(),
        deque.len(),
        cap
    );
    assert!(deque.chunk_count() <= deque.len());
}

proptest! {
    #[test]
    fn matches_vec_deque(
        cap in 1usize..8,
        ops in prop::collection::vec(op(), 0..300)
    ) {
        let mut deque = Deque::with_chunk_capacity(cap);
        let mut model = VecDeque::new();

        for op in ops {
            apply(&mut deque, &mut model, op);

            prop_assert_eq!(deque.len(), model.len());
            prop_assert_eq!(deque.front(), model.front());
            prop_assert_eq!(deque.back(), model.back());
            assert_chunk_bound(&deque);
        }

        prop_assert!(deque.iter().eq(model.iter()));
        prop_assert!(deque.iter().rev().eq(model.iter().rev()));
        prop_assert_eq!(deque.into_iter().collect::<Vec<_>>(), Vec::from(model));
    }

    #[test]
    fn shared_pool_matches_vec_deque(
        cap in 1usize..8,
        max_cached in 0usize..4,
        ops in prop::collection::vec((any::<bool>(), op()), 0..300)
    ) {
        let pool = RefCell::new(ChunkPool::with_config(PoolConfig::new().with_max_cached(max_cached)));
        let mut deques = [
            Deque::with_pool_and_chunk_capacity(&pool, cap),
            Deque::with_pool_and_chunk_capacity(&pool, cap),
        ];
        let mut models = [VecDeque::new(), VecDeque::new()];

        for (second, op) in ops {
            let i = usize::from(second);
            apply(&mut deques[i], &mut models[i], op);

            prop_assert!(pool.borrow().cached(cap) <= max_cached);
        }

        for (deque, model) in deques.iter().zip(&models) {
            prop_assert!(deque.iter().eq(model.iter()));
        }

        let stats = pool.borrow().stats();
        let owned: usize = deques.iter().map(Deque::chunk_count).sum();
        prop_assert_eq!(stats.allocated, owned + pool.borrow().cached_total() + stats.freed);
    }

    #[test]
    fn clone_and_take_preserve_content(
        values in prop::collection::vec(any::<i32>(), 0..100),
        cap in 1usize..8
    ) {
        let mut deque = Deque::with_chunk_capacity(cap);
        deque.extend(values.iter().copied());

        let clone = deque.clone();
        let taken = deque.take();

        prop_assert!(deque.is_empty());
        prop_assert_eq!(deque.chunk_count(), 0);
        prop_assert_eq!(&clone, &taken);
        prop_assert_eq!(&taken, &values);
    }

    #[test]
    fn queue_is_fifo(values in prop::collection::vec(any::<i32>(), 0..200)) {
        let mut queue: Queue<i32> = Queue::with_chunk_capacity(4);
        let mut popped = Vec::new();

        for (i, &value) in values.iter().enumerate() {
            queue.push(value);
            if i % 2 == 1 {
                popped.extend(queue.pop());
            }
        }
        while let Some(value) = queue.pop() {
            popped.push(value);
        }

        prop_assert_eq!(popped, values);
    }
}
