// Copyright (c) 2024 Mike Tsao

//! Extends a pair of MML melodies from the command line and prints the
//! result as MML.
//!
//! `cargo run --example generate -- "l8 o5 ceg>c<bgec" "l4 o3 c g f g"`

use clap::Parser;
use duetto::{
    mml::{decode, encode},
    oracles::RandomWalkOracle,
    orchestration::GenerationRequestBuilder,
    util::{MidiUtils, RepeatChoice, Rng, TemperatureChoice},
    ContinuationDriver,
};
use duetto_services::prelude::*;
use std::path::PathBuf;

/// The program's command-line arguments.
#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// MML for the primary (melody) voice
    primary: String,

    /// MML for the secondary (bass) voice
    secondary: String,

    /// 0 = calm, 1 = balanced, 2 = wild
    #[clap(short, long, default_value_t = 1)]
    temperature: usize,

    /// 0 = once, 1 = twice, 2 = three times
    #[clap(short, long, default_value_t = 1)]
    repeat: usize,

    /// Leave the secondary voice uncorrected
    #[clap(long)]
    no_correction: bool,

    /// Seed for reproducible output
    #[clap(short, long)]
    seed: Option<u128>,

    /// Also write the result as a Standard MIDI File
    #[clap(short, long)]
    midi: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let temperature = TemperatureChoice::from_index(args.temperature)
        .ok_or_else(|| anyhow::anyhow!("temperature must be 0, 1, or 2"))?;
    let repeat = RepeatChoice::from_index(args.repeat)
        .ok_or_else(|| anyhow::anyhow!("repeat must be 0, 1, or 2"))?;

    let primary = decode(&args.primary);
    let secondary = decode(&args.secondary);
    if primary.is_empty() && secondary.is_empty() {
        return Err(anyhow::anyhow!("neither voice has any notes"));
    }

    let seed = match args.seed {
        Some(seed) => seed,
        None => Rng::generate_seed()?,
    };
    let driver = ContinuationDriver::new_with_rng(
        RandomWalkOracle::new_with_seed(seed),
        Rng::new_with_seed(seed),
    );
    let request = GenerationRequestBuilder::default()
        .temperature(temperature.temperature())
        .repeat_count(repeat.repeat_count())
        .correct_discordance(!args.no_correction)
        .build()?;

    // Keep the service in scope until we're done with it. Dropping it closes
    // the channels.
    let service = GenerationService::new_with(driver);
    let job = service.submit(primary, secondary, request);

    while let Ok(event) = service.receiver().recv() {
        match event {
            GenerationServiceEvent::Started(id) => eprintln!("{id} started (seed {seed})"),
            GenerationServiceEvent::Progress(_, p) => eprintln!("{:3.0}%", p * 100.0),
            GenerationServiceEvent::Generated(id, voices) if id == job => {
                println!("transposed by {}", voices.transposition);
                println!("primary:   {}", encode(&voices.primary));
                println!("secondary: {}", encode(&voices.secondary));
                if let Some(path) = args.midi.as_ref() {
                    let bytes = MidiUtils::voices_to_smf_bytes(&voices.primary, &voices.secondary)?;
                    std::fs::write(path, bytes)?;
                    eprintln!("wrote {path:?}");
                }
                service.send_input(GenerationServiceInput::Quit);
            }
            GenerationServiceEvent::Failed(id, e) => {
                eprintln!("{id} failed: {e:?}");
                service.send_input(GenerationServiceInput::Quit);
            }
            GenerationServiceEvent::Quit => break,
            other => eprintln!("{other:?}"),
        }
    }

    Ok(())
}
