use micro_ptrack::ptrack::PitchTracker;

fn main() {
    let loop_count = 5000;
    let hop_size = 1024;
    let peak_count = 20;
    let sample_rate = 44100.0;
    let mut tracker = PitchTracker::new(sample_rate, hop_size, peak_count).unwrap();
    let hop: Vec<f32> = (0..hop_size)
        .map(|i| (2.0 * std::f32::consts::PI * 330.0 * (i as f32) / sample_rate).sin())
        .collect();
    println!("Processing {} hops.", loop_count);
    println!(
        "Hop size {}, peak count {}, sample rate {} Hz.",
        hop_size, peak_count, sample_rate
    );

    let start = std::time::Instant::now();
    for _ in 0..loop_count {
        tracker.process_hop(&hop);
    }
    let time_us = start.elapsed().as_micros();
    println!(
        "Completed in {} μs ({} μs/hop).",
        time_us,
        time_us / (loop_count as u128)
    );
    println!("");
    println!("NOTE: This example is meant for profiling.");
    println!("For performance benchmarks, run 'cargo bench'.");
}
