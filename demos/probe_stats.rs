use basic_containers::HashKind;
use basic_containers::HashMap;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// Number of keys to insert.
    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: usize,

    /// Hash discipline: `int` or `string`.
    #[arg(short = 'k', long = "kind", default_value_t = HashKind::Integer)]
    kind: HashKind,

    /// Remove every n-th key after filling, leaving tombstones behind.
    #[arg(short = 'r', long = "remove_every")]
    remove_every: Option<usize>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args = Args::parse();

    println!("Filling map with {} keys using {} hashing", args.count, args.kind);

    let mut map = HashMap::with_hash_kind(args.kind);
    let keys = (0..args.count)
        .map(|i| match args.kind {
            HashKind::Integer => i.to_le_bytes().to_vec(),
            HashKind::String => format!("key_{i}").into_bytes(),
        })
        .collect::<Vec<_>>();

    for (i, key) in keys.iter().enumerate() {
        map.insert(key.as_slice(), i);
    }

    if let Some(step) = args.remove_every.filter(|&step| step > 0) {
        for key in keys.iter().step_by(step) {
            map.remove(&key.as_slice());
        }
        println!("Removed every {step}th key");
    }

    println!("Map holds {} keys in {} slots", map.len(), map.capacity());

    map.print_probe_histogram();
    map.debug_stats().print();
}
