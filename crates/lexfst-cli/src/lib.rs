// lexfst-cli: input loading and output writing shared by the CLI tools.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lexfst_core::{LexiconEntry, PhoneSet};
use lexfst_lexicon::reader::{parse_phone_list, read_lexicon};
use lexfst_lexicon::{CompileOptions, CompiledLexicon};
use tracing::info;

/// Phone symbol table file name.
pub const PHONES_TXT: &str = "phones.txt";

/// Word symbol table file name.
pub const WORDS_TXT: &str = "words.txt";

/// Phone ids of the disambiguation symbols.
pub const DISAMBIG_INT: &str = "disambig.int";

/// Word-boundary category of each phone id.
pub const WORD_BOUNDARY_INT: &str = "word_boundary.int";

/// Text transducer without disambiguation symbols.
pub const LEXICON_FST_TXT: &str = "L.fst.txt";

/// Text transducer with disambiguation symbols.
pub const LEXICON_DISAMBIG_FST_TXT: &str = "L_disambig.fst.txt";

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Calling this twice is harmless.
pub fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

/// Load options from an optional JSON file, falling back to defaults.
pub fn load_options(path: Option<&Path>) -> Result<CompileOptions> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            CompileOptions::from_json(&text)
                .with_context(|| format!("failed to parse options in {}", path.display()))
        }
        None => Ok(CompileOptions::default()),
    }
}

/// Read the silence and non-silence phone lists.
pub fn load_phone_set(silence: &Path, nonsilence: &Path) -> Result<PhoneSet> {
    let read = |path: &Path| {
        fs::read_to_string(path)
            .map(|text| parse_phone_list(&text))
            .with_context(|| format!("failed to read {}", path.display()))
    };
    PhoneSet::new(read(silence)?, read(nonsilence)?).context("invalid phone lists")
}

/// Read a lexicon file, or stdin when `path` is `-`.
pub fn load_lexicon(path: &Path) -> Result<Vec<LexiconEntry>> {
    let entries = if path == Path::new("-") {
        read_lexicon(io::stdin().lock()).context("failed to read lexicon from stdin")?
    } else {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        read_lexicon(BufReader::new(file))
            .with_context(|| format!("failed to read lexicon {}", path.display()))?
    };
    info!(entries = entries.len(), "loaded lexicon");
    Ok(entries)
}

/// Write every output file into `dir`, creating it if needed.
///
/// Returns the paths written, in writing order.
pub fn write_outputs(compiled: &CompiledLexicon, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let written = vec![
        write_file(dir, PHONES_TXT, |out| compiled.write_phones(out))?,
        write_file(dir, WORDS_TXT, |out| compiled.write_words(out))?,
        write_file(dir, DISAMBIG_INT, |out| compiled.write_disambig(out))?,
        write_file(dir, WORD_BOUNDARY_INT, |out| compiled.write_word_boundary(out))?,
        write_file(dir, LEXICON_FST_TXT, |out| {
            compiled.write_fst_text(&compiled.lexicon_fst, out)
        })?,
        write_file(dir, LEXICON_DISAMBIG_FST_TXT, |out| {
            compiled.write_fst_text(&compiled.disambig_fst, out)
        })?,
    ];

    info!(dir = %dir.display(), files = written.len(), "wrote lexicon outputs");
    Ok(written)
}

fn write_file<F>(dir: &Path, name: &str, write: F) -> Result<PathBuf>
where
    F: FnOnce(&mut BufWriter<File>) -> lexfst_lexicon::Result<()>,
{
    let path = dir.join(name);
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write(&mut out).with_context(|| format!("failed to write {}", path.display()))?;
    out.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(path)
}
