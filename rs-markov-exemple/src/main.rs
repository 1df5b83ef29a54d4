use rs_markov_core::cache::FileCache;
use rs_markov_core::model::chain_store::ChainStore;
use rs_markov_core::model::generation_input::{GenerationInput, WalkMode};
use rs_markov_core::model::generator::SentenceGenerator;
use rs_markov_core::source::FilePhraseSource;
use rs_markov_core::{generate, Chain, MarkovError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows cache hits, chain size and truncated walks
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

    // One phrase per line; the built chain is cached as "data/markov_chain.bin"
    // and reused by the next run until the cache is cleared
    let source = FilePhraseSource::new(format!("{data_dir}/titles.txt"));
    let mut store = ChainStore::new(FileCache::new(data_dir));
    if std::env::args().any(|arg| arg == "--clear-cache") {
        // Drop the cached chain, it is rebuilt from the corpus below
        store.clear()?;
    }
    let chain = store.load_or_build(&source)?;
    println!("Chain ready: {} pairs, {} successors", chain.len(), chain.successor_count());

    let mut rng = rand::rng();

    // 'Positional' walks the entries stored after the seed entry
    // (the way the titles have always been generated)
    // 'Graph' follows the chain from the last two words and may stop early
    for walk in [WalkMode::Positional, WalkMode::Graph] {
        println!("-- {walk} walk");
        for i in 0..5 {
            // Title front-ends ask for 10 to 12 walked words
            let min_length = GenerationInput::random_min_length(&mut rng);
            let input = GenerationInput::new(min_length)?.with_walk(walk);
            let generator = SentenceGenerator::new(&chain, input)?;
            let sentence = generator.compose(&mut rng)?;
            let note = if sentence.walk_truncated() { " (short walk)" } else { "" };
            println!("Generated title {}: {}{}", i + 1, sentence, note);
        }
    }

    // Noise words can be tuned: never end a title on "of" either
    let mut input = GenerationInput::new(10)?;
    input.noise.end_words.push("of".to_owned());
    println!("Tuned title: {}", SentenceGenerator::new(&chain, input)?.generate(&mut rng)?);

    // A walk length of 0 is rejected
    match GenerationInput::new(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Rejected: {e}"),
    }

    // Generating from an empty chain is an explicit error, never a partial title
    match generate(&Chain::new(), 10) {
        Err(MarkovError::EmptyChain) => println!("Empty chain refused"),
        other => println!("Should not happen: {other:?}"),
    }

    Ok(())
}
