//! CLI tool for learning and running smizip dictionaries.

use std::collections::BTreeSet;
use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Context, Result};
use smizip::codec::{Codec, ZipFormat, ZipOutput};
use smizip::config::{LearnerConfig, SpeedPreset, DEFAULT_SINGLECHARS};
use smizip::corpus::TrainingCorpus;
use smizip::dictionary::Dictionary;
use smizip::learner::{self, LearnerInput, ProgressLog};

fn print_usage() {
    eprintln!("Usage: smizip <SUBCOMMAND> [OPTIONS]");
    eprintln!();
    eprintln!("Subcommands:");
    eprintln!("  learn <CORPUS_FILE> <OUTPUT_DICT>   Learn a new dictionary from a corpus");
    eprintln!("  run zip <DICT_FILE> [INPUT_FILE]    Compress SMILES records");
    eprintln!("  run unzip <DICT_FILE> [INPUT_FILE]  Decompress SMILES records");
    eprintln!();
    eprintln!("learn options:");
    eprintln!("  --speed <slow|medium|fast>  Sampling/search-depth preset (default: medium)");
    eprintln!("  --chars <CHARS>             Initial single-char alphabet (default: built-in)");
    eprintln!("  --multigrams <CSV>          Seed multichar tokens, comma-separated");
    eprintln!("  --log <FILE>                Also write progress to this file");
    eprintln!("  --tab                       Add TAB as a single-char ngram");
    eprintln!("  --cr                        Add newline as a single-char ngram");
    eprintln!("  --space                     Add SPACE as a single-char ngram");
    eprintln!("  --zero                      Add \\0 as a single-char ngram");
    eprintln!();
    eprintln!("run options:");
    eprintln!("  -o, --output <FILE>         Output file (default: stdout)");
    eprintln!("  -f, --format <FORMAT>       zip output shape: packed, tokens, indices (default: packed)");
    eprintln!();
    eprintln!("Records are line-delimited: <smiles><TAB><title>\\n. `run zip` packs the");
    eprintln!("smiles field and reuses the title verbatim; `run unzip` reverses this.");
}

fn load_dictionary(path: &str) -> Result<Dictionary> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

fn read_input(input_file: &Option<PathBuf>) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    match input_file {
        Some(path) => {
            File::open(path)?.read_to_end(&mut buffer)?;
        }
        None => {
            io::stdin().read_to_end(&mut buffer)?;
        }
    }
    Ok(buffer)
}

fn open_output(output_file: &Option<PathBuf>) -> io::Result<Box<dyn Write>> {
    match output_file {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

struct RunArgs {
    dictionary: String,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    format: ZipFormat,
}

fn parse_run_args(args: &[String]) -> Result<RunArgs> {
    let mut output_file = None;
    let mut format = ZipFormat::Packed;
    let mut positionals = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| anyhow!("missing value for --output"))?;
                output_file = Some(PathBuf::from(value));
            }
            "-f" | "--format" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| anyhow!("missing value for --format"))?;
                format = match value.as_str() {
                    "packed" => ZipFormat::Packed,
                    "tokens" => ZipFormat::Tokens,
                    "indices" => ZipFormat::Indices,
                    other => return Err(anyhow!("unknown format: {other}")),
                };
            }
            arg if arg.starts_with('-') => return Err(anyhow!("unknown option: {arg}")),
            arg => positionals.push(arg.to_string()),
        }
        i += 1;
    }

    if positionals.is_empty() {
        return Err(anyhow!("missing dictionary file"));
    }
    let dictionary = positionals.remove(0);
    let input_file = positionals.first().map(PathBuf::from);

    Ok(RunArgs {
        dictionary,
        input_file,
        output_file,
        format,
    })
}

/// Split a record line (`smiles<TAB>title`) into its two fields, erroring on
/// a missing TAB (spec §6: a reference CLI exits nonzero on a missing TAB).
fn split_record(line: &str) -> Result<(&str, &str)> {
    line.split_once('\t')
        .ok_or_else(|| anyhow!("record missing TAB separator: {line:?}"))
}

fn run_zip(args: &RunArgs) -> Result<()> {
    let dictionary = load_dictionary(&args.dictionary)?;
    let codec = Codec::new(dictionary);
    codec
        .require_control_chars()
        .context("dictionary is not line-framing-safe")?;

    let input = read_input(&args.input_file).context("reading input")?;
    let text = String::from_utf8(input).context("input is not valid UTF-8")?;

    let mut out = open_output(&args.output_file).context("opening output")?;

    for line in text.lines() {
        let (smiles, title) = split_record(line)?;
        let zipped = codec
            .zip(smiles, args.format)
            .with_context(|| format!("zipping {smiles:?}"))?;
        match zipped {
            ZipOutput::Packed(bytes) | ZipOutput::Indices(bytes) => {
                out.write_all(&bytes)?;
            }
            ZipOutput::Tokens(tokens) => {
                out.write_all(tokens.join(" ").as_bytes())?;
            }
        }
        out.write_all(b"\t")?;
        out.write_all(title.as_bytes())?;
        out.write_all(b"\n")?;
    }

    out.flush().context("flushing output")
}

fn run_unzip(args: &RunArgs) -> Result<()> {
    let dictionary = load_dictionary(&args.dictionary)?;
    let codec = Codec::new(dictionary);

    let input = read_input(&args.input_file).context("reading input")?;
    let mut out = open_output(&args.output_file).context("opening output")?;

    let mut start = 0usize;
    while start < input.len() {
        let tab_offset = input[start..]
            .iter()
            .position(|&b| b == b'\t')
            .ok_or_else(|| anyhow!("record missing TAB separator"))?;
        let tab = start + tab_offset;

        let newline_offset = input[tab..]
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| anyhow!("record missing newline terminator"))?;
        let newline = tab + newline_offset;

        let packed = &input[start..tab];
        let title = &input[tab + 1..newline];

        let smiles = codec.unzip(packed);
        out.write_all(smiles.as_bytes())?;
        out.write_all(b"\t")?;
        out.write_all(title)?;
        out.write_all(b"\n")?;

        start = newline + 1;
    }

    out.flush().context("flushing output")
}

struct LearnArgs {
    corpus_file: String,
    output_file: String,
    speed: SpeedPreset,
    chars: String,
    multigrams_csv: Option<String>,
    log_file: Option<PathBuf>,
    include_tab: bool,
    include_cr: bool,
    include_space: bool,
    include_zero: bool,
}

fn parse_learn_args(args: &[String]) -> Result<LearnArgs> {
    let mut speed = SpeedPreset::MEDIUM;
    let mut chars = DEFAULT_SINGLECHARS.to_string();
    let mut multigrams_csv = None;
    let mut log_file = None;
    let mut include_tab = false;
    let mut include_cr = false;
    let mut include_space = false;
    let mut include_zero = false;
    let mut positionals = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--speed" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| anyhow!("missing value for --speed"))?;
                speed = match value.as_str() {
                    "slow" => SpeedPreset::SLOW,
                    "medium" => SpeedPreset::MEDIUM,
                    "fast" => SpeedPreset::FAST,
                    other => return Err(anyhow!("unknown speed preset: {other}")),
                };
            }
            "--chars" => {
                i += 1;
                chars = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --chars"))?
                    .clone();
            }
            "--multigrams" => {
                i += 1;
                multigrams_csv = Some(
                    args.get(i)
                        .ok_or_else(|| anyhow!("missing value for --multigrams"))?
                        .clone(),
                );
            }
            "--log" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| anyhow!("missing value for --log"))?;
                log_file = Some(PathBuf::from(value));
            }
            "--tab" => include_tab = true,
            "--cr" => include_cr = true,
            "--space" => include_space = true,
            "--zero" => include_zero = true,
            arg if arg.starts_with('-') => return Err(anyhow!("unknown option: {arg}")),
            arg => positionals.push(arg.to_string()),
        }
        i += 1;
    }

    if positionals.len() < 2 {
        return Err(anyhow!("expected <CORPUS_FILE> <OUTPUT_DICT>"));
    }

    Ok(LearnArgs {
        corpus_file: positionals[0].clone(),
        output_file: positionals[1].clone(),
        speed,
        chars,
        multigrams_csv,
        log_file,
        include_tab,
        include_cr,
        include_space,
        include_zero,
    })
}

fn run_learn(args: &LearnArgs) -> Result<()> {
    let corpus_text = fs::read_to_string(&args.corpus_file).context("reading corpus")?;
    let lines: Vec<String> = corpus_text.lines().map(|l| l.to_string()).collect();
    let mut corpus = TrainingCorpus::new(lines.into_iter());

    let mut singlechars: BTreeSet<char> = args.chars.chars().collect();
    // Fold in control/whitespace characters the CLI can't pass through
    // `--chars` as literal bytes (spec §6: TAB/newline coverage is mandatory
    // for line-framed I/O, mirroring the original's `--tab`/`--cr`/`--space`/
    // `--zero` flags).
    if args.include_cr {
        singlechars.insert('\n');
    }
    if args.include_tab {
        singlechars.insert('\t');
    }
    if args.include_space {
        singlechars.insert(' ');
    }
    if args.include_zero {
        singlechars.insert('\0');
    }

    let initial_multichars: Vec<String> = args
        .multigrams_csv
        .as_deref()
        .map(|csv| csv.split(',').map(|s| s.to_string()).collect())
        .unwrap_or_default();

    let input = LearnerInput {
        singlechars,
        initial_multichars,
        initial_multigrams_csv: args.multigrams_csv.clone(),
        preset: args.speed,
        config: LearnerConfig::default(),
        corpus_filename: args.corpus_file.clone(),
    };

    let mut log = ProgressLog::discard();
    log.add_sink(Box::new(io::stdout()));
    if let Some(path) = &args.log_file {
        let file = File::create(path).context("opening log file")?;
        log.add_sink(Box::new(file));
    }

    let dictionary = learner::learn(&mut corpus, input, &mut log).context("learning failed")?;

    let json = serde_json::to_string_pretty(&dictionary)?;
    fs::write(&args.output_file, json).context("writing dictionary")
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "-h" | "--help" => {
            print_usage();
            process::exit(0);
        }
        "learn" => parse_learn_args(&args[2..]).and_then(|a| run_learn(&a)),
        "run" => {
            if args.len() < 3 {
                Err(anyhow!("expected `run zip` or `run unzip`"))
            } else {
                match args[2].as_str() {
                    "zip" => parse_run_args(&args[3..]).and_then(|a| run_zip(&a)),
                    "unzip" => parse_run_args(&args[3..]).and_then(|a| run_unzip(&a)),
                    other => Err(anyhow!("unknown run mode: {other}")),
                }
            }
        }
        other => Err(anyhow!("unknown subcommand: {other}")),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        print_usage();
        process::exit(1);
    }
}
