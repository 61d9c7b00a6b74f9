use std::env;
use std::process;

use micro_ptrack::note::closest_note;
use micro_ptrack::ptrack::{PitchResult, PitchTracker};

fn read_wav(path: &str) -> Result<(u32, Vec<f32>), hound::Error> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channel_count = spec.channels as usize;
    let scale = 1. / (i16::MAX as f32);
    let samples: Vec<f32> = reader
        .samples::<i16>()
        .collect::<Result<Vec<i16>, _>>()?
        .chunks(channel_count)
        .map(|frame| (frame[0] as f32) * scale)
        .collect();
    Ok((spec.sample_rate, samples))
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: analyze_wav <path to 16 bit wav file> [hop size]");
        process::exit(1);
    }
    let hop_size = match args.get(2) {
        Some(value) => value.parse().unwrap_or(1024),
        None => 1024,
    };

    let (sample_rate, samples) = match read_wav(&args[1]) {
        Ok(result) => result,
        Err(error) => {
            println!("Failed to read {}: {}", args[1], error);
            process::exit(1);
        }
    };

    let mut tracker = match PitchTracker::new(sample_rate as f32, hop_size, 20) {
        Ok(tracker) => tracker,
        Err(error) => {
            println!("Invalid settings: {}", error);
            process::exit(1);
        }
    };

    // Only the first channel is analyzed
    for (hop_index, hop) in samples.chunks_exact(hop_size).enumerate() {
        let time = (hop_index * hop_size) as f32 / sample_rate as f32;
        match tracker.process_hop(hop) {
            PitchResult::Pitch {
                frequency,
                loudness,
            } => {
                let note = match closest_note(frequency) {
                    Some(note_match) => note_match.to_string(),
                    None => String::from("-"),
                };
                println!(
                    "{:8.3} s | {:8.2} Hz | {:6.1} dB | {}",
                    time, frequency, loudness, note
                )
            }
            PitchResult::NoPitch => println!(
                "{:8.3} s | no pitch    | {:6.1} dB |",
                time,
                tracker.level_db()
            ),
        }
    }
}
