use clap::Parser;
use compact_hash::CompactHashMap;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Percentage of the inserted keys to remove afterwards.
    #[arg(short = 'r', long = "remove_percent", default_value_t = 25)]
    remove_percent: u64,
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating CompactHashMap with target capacity: {}",
        args.target_capacity
    );

    let mut map: CompactHashMap<u64, u64> = CompactHashMap::with_capacity(args.target_capacity);

    println!(
        "Actual capacity: {} entries over {} index slots",
        map.capacity(),
        map.index_capacity()
    );
    println!("Filling map with u64 values...");

    let num_values = map.capacity() as u64;
    for value in 0..num_values {
        if map.insert(value, value).is_some() {
            panic!("Value already exists in map: {}", value);
        }
    }

    println!("Inserted {} values into map", map.len());
    map.probe_histogram().print();
    map.debug_stats().print();

    let removed = (0..num_values)
        .filter(|value| value % 100 < args.remove_percent)
        .filter(|value| map.remove(value).is_some())
        .count();

    println!();
    println!(
        "Removed {} values ({:.02}%), leaving {} tombstones behind",
        removed,
        removed as f64 / num_values.max(1) as f64 * 100.0,
        map.debug_stats().tombstones
    );
    map.probe_histogram().print();
    map.debug_stats().print();
}
