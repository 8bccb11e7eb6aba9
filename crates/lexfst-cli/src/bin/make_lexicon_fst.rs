// make-lexicon-fst: Compile a pronunciation lexicon into lexicon transducers.
//
// Reads a tab-separated lexicon (word, weight, phones) plus the silence and
// non-silence phone lists, and writes the symbol tables and both text
// transducers into the output directory.
//
// Usage:
//   make-lexicon-fst -l lexicon.txt -s silence_phones.txt -n nonsilence_phones.txt -o lang/
//
// Command-line options override the values from --config.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lexfst_lexicon::LexiconCompiler;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "make-lexicon-fst",
    about = "Compiles a pronunciation lexicon into lexicon transducers"
)]
struct Args {
    /// Lexicon file, one `word<TAB>weight<TAB>phones` entry per line (`-` for stdin).
    #[arg(short = 'l', long)]
    lexicon: PathBuf,

    /// Silence phone list.
    #[arg(short = 's', long)]
    silence_phones: PathBuf,

    /// Non-silence phone list.
    #[arg(short = 'n', long)]
    nonsilence_phones: PathBuf,

    /// Directory receiving the symbol tables and transducers.
    #[arg(short = 'o', long)]
    out_dir: PathBuf,

    /// JSON options file.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Probability of optional silence between words.
    #[arg(long)]
    silence_prob: Option<f64>,

    /// Phone used for optional silence.
    #[arg(long)]
    silence_phone: Option<String>,

    /// Follow optional silence with its own disambiguation symbol.
    #[arg(long)]
    silence_disambig: bool,

    /// Grammar nonterminal, e.g. `#nonterm:contact_list`. Repeatable.
    #[arg(long = "nonterminal")]
    nonterminals: Vec<String>,

    /// Phone symbol allowed as left context of a nonterminal. Repeatable.
    #[arg(long = "left-context-phone")]
    left_context_phones: Vec<String>,

    /// Out-of-vocabulary word expected in the lexicon.
    #[arg(long)]
    oov: Option<String>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    lexfst_cli::init_tracing(&args.log_level);

    let mut options = lexfst_cli::load_options(args.config.as_deref())?;
    if let Some(prob) = args.silence_prob {
        options.silence_prob = prob;
    }
    if let Some(phone) = args.silence_phone {
        options.silence_phone = phone;
    }
    if args.silence_disambig {
        options.silence_disambig = true;
    }
    if !args.nonterminals.is_empty() {
        options.nonterminals = args.nonterminals;
    }
    if !args.left_context_phones.is_empty() {
        options.left_context_phones = args.left_context_phones;
    }
    if args.oov.is_some() {
        options.oov = args.oov;
    }
    debug!(?options, "effective options");

    let phones = lexfst_cli::load_phone_set(&args.silence_phones, &args.nonsilence_phones)?;
    let lexicon = lexfst_cli::load_lexicon(&args.lexicon)?;
    let compiled = LexiconCompiler::new(phones, options)?.compile(&lexicon)?;
    lexfst_cli::write_outputs(&compiled, &args.out_dir)?;
    Ok(())
}
