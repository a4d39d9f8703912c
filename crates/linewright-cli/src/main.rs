use anyhow::{Context, Result, bail};
use linewright_config::Config;
use linewright_engine::{
    CommandReport, EditorHost, HostError, PrimitiveEdit, RopeDocument, Selection, execute, io,
};
use std::{env, path::PathBuf, process};

const USAGE: &str = "Usage: linewright <rule-set> <file> [--lines START:END]... [--every-line] [--check] [--config PATH]";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    rule_set: String,
    file: PathBuf,
    /// One-based, inclusive line ranges.
    lines: Vec<(usize, usize)>,
    every_line: bool,
    check: bool,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut positional = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--lines" => {
                let spec = iter.next().context("--lines needs a value")?;
                parsed.lines.push(parse_line_range(spec)?);
            }
            "--every-line" => parsed.every_line = true,
            "--check" => parsed.check = true,
            "--config" => {
                let path = iter.next().context("--config needs a value")?;
                parsed.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("Unknown option '{flag}'"),
            _ => positional.push(arg.clone()),
        }
    }

    let [rule_set, file] = <[String; 2]>::try_from(positional)
        .map_err(|_| anyhow::anyhow!("Expected a rule set and a file"))?;
    parsed.rule_set = rule_set;
    parsed.file = PathBuf::from(file);
    Ok(parsed)
}

/// `N` or `START:END`, both one-based.
fn parse_line_range(spec: &str) -> Result<(usize, usize)> {
    let (start, end) = spec.split_once(':').unwrap_or((spec, spec));
    let start: usize = start
        .parse()
        .with_context(|| format!("Invalid line range '{spec}'"))?;
    let end: usize = end
        .parse()
        .with_context(|| format!("Invalid line range '{spec}'"))?;
    if start == 0 || end < start {
        bail!("Invalid line range '{spec}': lines start at 1 and END must not precede START");
    }
    Ok((start, end))
}

/// A file on disk standing in for an editor tab.
struct FileHost {
    path: PathBuf,
    document: RopeDocument,
    selections: Vec<Selection>,
}

impl EditorHost for FileHost {
    type Document = RopeDocument;

    fn document(&self) -> Option<&RopeDocument> {
        Some(&self.document)
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn apply_edit_transaction(&mut self, edits: &[PrimitiveEdit]) -> Result<bool, HostError> {
        Ok(self.document.apply(edits))
    }

    fn save(&mut self) -> Result<bool, HostError> {
        io::write_document(&self.path, &self.document).map_err(|e| HostError(e.to_string()))?;
        Ok(true)
    }
}

struct Run {
    report: CommandReport,
    text: String,
}

fn run(args: &Args, config: &Config) -> Result<Run> {
    let rule_options = config.rule_options();
    let rule_set = config.rule_set(&args.rule_set, &rule_options)?;
    let document = io::read_document(&args.file)?;

    let selections = args
        .lines
        .iter()
        .map(|&(start, end)| Selection::lines(start - 1, end - 1))
        .collect();
    let mut host = FileHost {
        path: args.file.clone(),
        document,
        selections,
    };

    let mut command = config.command_options();
    command.include_every_line |= args.every_line || args.lines.is_empty();
    // the file is written below, where a failure can be reported
    command.auto_save_after_edit = false;

    let report = execute(&mut host, &rule_set, &rule_options, command)
        .with_context(|| format!("'{}' failed on {}", rule_set.name, args.file.display()))?;

    if report.applied() > 0 && !args.check {
        host.save()?;
        log::info!(
            "Wrote {} edits to {}",
            report.applied(),
            args.file.display()
        );
    }

    Ok(Run {
        report,
        text: host.document.text(),
    })
}

fn load_config(args: &Args) -> Result<Config> {
    let loaded = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(loaded.unwrap_or_else(|| {
        log::debug!("No config file, using defaults");
        Config::default()
    }))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    let config = load_config(&args)?;
    let outcome = run(&args, &config)?;

    if args.check {
        print!("{}", outcome.text);
        if outcome.report.applied() > 0 {
            process::exit(1);
        }
    }
    Ok(())
}
