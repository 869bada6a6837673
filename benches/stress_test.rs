use gapminer::gap::{mine_emerging_patterns, Item, MineError, MinerConfig};
use rand::Rng;
use std::time::Instant;

fn generate_sequences(num_transactions: usize, num_items: usize, avg_len: usize) -> Vec<Vec<Item>> {
    let mut rng = rand::thread_rng();
    (0..num_transactions)
        .map(|_| {
            let random_factor: f64 = rng.r#gen();
            let len = (avg_len as f64 * (0.5 + random_factor)).round() as usize;
            (0..len).map(|_| rng.gen_range(0..num_items as Item)).collect()
        })
        .collect()
}

fn report(result: Result<Vec<Vec<Item>>, MineError>, start: Instant) {
    match result {
        Ok(patterns) => {
            let longest = patterns.iter().map(Vec::len).max().unwrap_or(0);
            println!("  ✓ Completed in {:?}", start.elapsed());
            println!("  Patterns: {}", patterns.len());
            println!("  Longest pattern: {}", longest);
        }
        Err(err) => println!("  ✗ Failed: {}", err),
    }
}

fn stress_test_large_collections() {
    println!("\n=== Large Collection Test ===");

    let configs = vec![
        ("5K x 50", 5_000, 50, 20),
        ("20K x 80", 20_000, 80, 25),
        ("50K x 100", 50_000, 100, 30),
    ];

    for (name, num_tx, num_items, avg_len) in configs {
        println!("\nTesting: {}", name);
        let start_gen = Instant::now();
        let positive = generate_sequences(num_tx, num_items, avg_len);
        let negative = generate_sequences(num_tx, num_items, avg_len);
        println!("  Generated in {:?}", start_gen.elapsed());

        let config = MinerConfig::new(1, num_tx / 20, num_tx / 100);
        let start = Instant::now();
        report(mine_emerging_patterns(positive, negative, &config), start);
    }
}

fn stress_test_wide_gaps() {
    println!("\n=== Wide Gap Test ===");

    let positive = generate_sequences(2_000, 30, 40);
    let negative = generate_sequences(2_000, 30, 40);

    for gap in [2, 5, 10, 20] {
        println!("\nTesting gap = {}", gap);
        let config = MinerConfig::new(gap, 400, 40);
        let start = Instant::now();
        report(mine_emerging_patterns(positive.clone(), negative.clone(), &config), start);
    }
}

fn stress_test_long_transactions() {
    println!("\n=== Long Transaction Test ===");

    let positive = generate_sequences(200, 10, 5_000);
    let negative = generate_sequences(200, 10, 5_000);

    println!("\nWith a length cap of 4096 (expected to be rejected)");
    let config = MinerConfig::new(0, 100, 10).with_max_transaction_len(4096);
    let start = Instant::now();
    report(mine_emerging_patterns(positive.clone(), negative.clone(), &config), start);

    println!("\nWithout a length cap");
    let config = MinerConfig::new(0, 150, 5);
    let start = Instant::now();
    report(mine_emerging_patterns(positive, negative, &config), start);
}

fn main() {
    println!("=== Emerging Pattern Stress Testing Suite ===");

    stress_test_large_collections();
    stress_test_wide_gaps();
    stress_test_long_transactions();

    println!("\n=== Stress Testing Complete ===");
}
