use std::collections::BTreeSet;
use std::collections::HashMap as StdHashMap;
use std::collections::VecDeque;
use std::hint::black_box;

use basic_containers::AvlTree;
use basic_containers::HashKind;
use basic_containers::HashMap;
use basic_containers::HashTable;
use basic_containers::Queue;
use basic_containers::hash_table::Entry;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::hash_table::Entry as HashbrownEntry;
use hashbrown::hash_table::HashTable as HashbrownHashTable;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use siphasher::sip::SipHasher;

const SIZES: &[usize] = &[(1 << 8), (1 << 10), (1 << 12), (1 << 14), (1 << 16)];

fn sip_hash(key: u64) -> u64 {
    use std::hash::Hash;
    use std::hash::Hasher;

    let mut hasher = SipHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

fn shuffled_keys(size: usize, seed: u64) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut keys = (0..size as u64).map(|k| k * 7 + 1).collect::<Vec<_>>();
    keys.shuffle(&mut rng);
    keys
}

fn bench_table_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let hash_and_key = shuffled_keys(size, 1)
            .into_iter()
            .map(|k| (sip_hash(k), k))
            .collect::<Vec<_>>();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("basic_containers/{size}"), |b| {
            b.iter_batched(
                || hash_and_key.clone(),
                |hash_and_key| {
                    let mut table = HashTable::<u64>::new();
                    for (hash, key) in hash_and_key {
                        match table.entry(hash, |&v| v == key) {
                            Entry::Vacant(entry) => {
                                black_box(entry.insert(key));
                            }
                            Entry::Occupied(_) => unreachable!(),
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || hash_and_key.clone(),
                |hash_and_key| {
                    let mut table = HashbrownHashTable::new();
                    for (hash, key) in hash_and_key {
                        match table.entry(hash, |&v: &u64| v == key, |&v| sip_hash(v)) {
                            HashbrownEntry::Vacant(entry) => {
                                black_box(entry.insert(key));
                            }
                            HashbrownEntry::Occupied(_) => unreachable!(),
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_map_insert_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert_get");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = shuffled_keys(size, 2);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("basic_containers_int/{size}"), |b| {
            b.iter(|| {
                let mut map = HashMap::with_hash_kind(HashKind::Integer);
                for &key in &keys {
                    map.insert(key, key);
                }
                for key in &keys {
                    black_box(map.get(key));
                }
                black_box(map)
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                let mut map = hashbrown::HashMap::new();
                for &key in &keys {
                    map.insert(key, key);
                }
                for key in &keys {
                    black_box(map.get(key));
                }
                black_box(map)
            })
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter(|| {
                let mut map = StdHashMap::new();
                for &key in &keys {
                    map.insert(key, key);
                }
                for key in &keys {
                    black_box(map.get(key));
                }
                black_box(map)
            })
        });
    }

    group.finish();
}

fn bench_map_string_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_string_keys");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = shuffled_keys(size, 3)
            .into_iter()
            .map(|k| format!("key_{k:016X}"))
            .collect::<Vec<_>>();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("basic_containers_string/{size}"), |b| {
            b.iter(|| {
                let mut map = HashMap::with_hash_kind(HashKind::String);
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.as_str(), i);
                }
                for key in &keys {
                    black_box(map.get(&key.as_str()));
                }
                black_box(map)
            })
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter(|| {
                let mut map = StdHashMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.as_str(), i);
                }
                for key in &keys {
                    black_box(map.get(&key.as_str()));
                }
                black_box(map)
            })
        });
    }

    group.finish();
}

fn bench_map_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_churn");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = shuffled_keys(size, 4);
        let ops = {
            let mut rng = SmallRng::seed_from_u64(5);
            (0..size * 4)
                .map(|_| (rng.random_bool(0.5), rng.random_range(0..size)))
                .collect::<Vec<_>>()
        };

        group.throughput(Throughput::Elements(ops.len() as u64));
        group.bench_function(format!("basic_containers/{size}"), |b| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<HashMap<u64, u64>>(),
                |mut map| {
                    for &(insert, index) in &ops {
                        let key = keys[index];
                        if insert {
                            black_box(map.insert(key, key));
                        } else {
                            black_box(map.remove(&key));
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    keys.iter()
                        .map(|&k| (k, k))
                        .collect::<hashbrown::HashMap<u64, u64>>()
                },
                |mut map| {
                    for &(insert, index) in &ops {
                        let key = keys[index];
                        if insert {
                            black_box(map.insert(key, key));
                        } else {
                            black_box(map.remove(&key));
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_tree_insert_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_insert_contains");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = shuffled_keys(size, 6);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("avl_tree/{size}"), |b| {
            b.iter(|| {
                let mut tree = AvlTree::new();
                for &key in &keys {
                    tree.insert(key);
                }
                for key in &keys {
                    black_box(tree.contains(key));
                }
                black_box(tree)
            })
        });

        group.bench_function(format!("btree_set/{size}"), |b| {
            b.iter(|| {
                let mut tree = BTreeSet::new();
                for &key in &keys {
                    tree.insert(key);
                }
                for key in &keys {
                    black_box(tree.contains(key));
                }
                black_box(tree)
            })
        });
    }

    group.finish();
}

fn bench_tree_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_remove");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = shuffled_keys(size, 7);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("avl_tree/{size}"), |b| {
            b.iter_batched(
                || keys.iter().copied().collect::<AvlTree<u64>>(),
                |mut tree| {
                    for key in &keys {
                        black_box(tree.remove(key));
                    }
                    black_box(tree)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("btree_set/{size}"), |b| {
            b.iter_batched(
                || keys.iter().copied().collect::<BTreeSet<u64>>(),
                |mut tree| {
                    for key in &keys {
                        black_box(tree.remove(key));
                    }
                    black_box(tree)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_push_pop");

    for &size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("queue/{size}"), |b| {
            b.iter(|| {
                let mut queue = Queue::new();
                for i in 0..size {
                    queue.push(i);
                    if i % 3 == 0 {
                        black_box(queue.pop());
                    }
                }
                black_box(queue)
            })
        });

        group.bench_function(format!("vec_deque/{size}"), |b| {
            b.iter(|| {
                let mut queue = VecDeque::new();
                for i in 0..size {
                    queue.push_back(i);
                    if i % 3 == 0 {
                        black_box(queue.pop_front());
                    }
                }
                black_box(queue)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_table_insert,
    bench_map_insert_get,
    bench_map_string_keys,
    bench_map_churn,
    bench_tree_insert_contains,
    bench_tree_remove,
    bench_queue,
);
criterion_main!(benches);
