use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, info_span, warn};

use canon_cli::input::{label_for, read_rows};
use canon_core::{NormalizeOptions, Normalizer};
use canon_map::{ColumnMatcher, MatchOptions};
use canon_model::NormalizedData;
use canon_standards::{DomainDetector, Lexicon, SchemaRegistry};

use crate::cli::{CatalogArgs, DetectArgs, MatchArgs, MatchingArgs, NormalizeArgs};
use crate::summary::{BatchSummary, MatchRow, print_match_table, print_schemas};

/// Schema catalog and lexicon for one invocation.
pub struct Catalogs {
    pub registry: SchemaRegistry,
    pub lexicon: Lexicon,
}

impl Catalogs {
    /// Load the built-in catalogs, or the files named on the command line.
    pub fn load(args: &CatalogArgs) -> Result<Self> {
        let registry = match &args.schemas {
            Some(path) => SchemaRegistry::from_json_str(&read_text(path)?)
                .with_context(|| format!("load schemas: {}", path.display()))?,
            None => SchemaRegistry::load_embedded().context("load built-in schemas")?,
        };
        let lexicon = match &args.lexicon {
            Some(path) => Lexicon::from_json_str(&read_text(path)?)
                .with_context(|| format!("load lexicon: {}", path.display()))?,
            None => Lexicon::load_embedded().context("load built-in lexicon")?,
        };
        debug!(schemas = registry.len(), "catalogs loaded");
        Ok(Self { registry, lexicon })
    }
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<Vec<BatchSummary>> {
    let catalogs = Catalogs::load(&args.catalog)?;
    let mut options = NormalizeOptions::default().with_matching(match_options(&args.matching)?);
    if let Some(max) = args.max_errors {
        options = options.with_max_reported_errors(max);
    }
    let normalizer = Normalizer::new(&catalogs.registry, &catalogs.lexicon).with_options(options);

    if let Some(dir) = &args.output {
        fs::create_dir_all(dir)
            .with_context(|| format!("create output directory: {}", dir.display()))?;
    }

    let progress = progress_bar(args.files.len())?;
    let mut summaries = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let label = args.label.clone().unwrap_or_else(|| label_for(path));
        progress.set_message(label.clone());
        let span = info_span!("batch", file = %path.display(), label = %label);
        let _guard = span.enter();
        let start = Instant::now();

        let rows = read_rows(path)?;
        let result = normalizer.normalize(&rows, &label);
        if result.metadata.validation_error_count > 0 {
            warn!(
                errors = result.metadata.validation_error_count,
                "batch has validation errors"
            );
        }
        let output = match &args.output {
            Some(dir) => Some(write_output(dir, path, &result)?),
            None => None,
        };
        info!(
            schema = %result.schema_type,
            records = result.metadata.total_records,
            quality = result.quality_score(),
            duration_ms = start.elapsed().as_millis(),
            "batch normalized"
        );
        summaries.push(BatchSummary {
            file: path.clone(),
            label,
            output,
            result,
        });
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(summaries)
}

pub fn run_detect(args: &DetectArgs) -> Result<()> {
    let catalogs = Catalogs::load(&args.catalog)?;
    let domain = DomainDetector::new(&catalogs.lexicon)
        .with_registry(&catalogs.registry)
        .detect(&args.label);
    let mut stdout = io::stdout().lock();
    if catalogs.registry.contains(&domain) {
        writeln!(stdout, "{domain}")?;
    } else {
        writeln!(stdout, "{domain} (no registered schema, rows pass through)")?;
    }
    Ok(())
}

pub fn run_schemas(args: &CatalogArgs) -> Result<()> {
    let catalogs = Catalogs::load(args)?;
    print_schemas(&catalogs.registry);
    Ok(())
}

pub fn run_match(args: &MatchArgs) -> Result<()> {
    let catalogs = Catalogs::load(&args.catalog)?;
    let Some(schema) = catalogs.registry.lookup(&args.schema) else {
        bail!(
            "unknown schema type '{}' (known: {})",
            args.schema,
            catalogs.registry.schema_types().join(", ")
        );
    };
    let matcher = ColumnMatcher::new(&catalogs.lexicon, match_options(&args.matching)?);
    let mapping = matcher.match_columns(&args.columns, schema);

    let rows: Vec<MatchRow> = schema
        .columns
        .iter()
        .map(|column| {
            let raw = mapping.raw_for(&column.name).map(str::to_string);
            let explanation = raw
                .as_deref()
                .map(|raw| matcher.explain(raw, column));
            MatchRow {
                schema_column: column.name.clone(),
                required: column.is_required_or_key(),
                score: mapping.score_for(&column.name),
                raw_column: raw,
                explanation,
            }
        })
        .collect();
    print_match_table(
        schema,
        matcher.threshold_for(schema),
        &rows,
        &mapping.unmapped_columns,
        args.explain,
    );
    Ok(())
}

fn match_options(args: &MatchingArgs) -> Result<MatchOptions> {
    let options = MatchOptions::default().with_strategy(args.strategy.into());
    match args.threshold {
        Some(threshold) => options.with_min_score(threshold).context("invalid --threshold"),
        None => Ok(options),
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Write `<stem>.normalized.json` under `dir`.
fn write_output(dir: &Path, input: &Path, result: &NormalizedData) -> Result<PathBuf> {
    let target = dir.join(format!("{}.normalized.json", label_for(input)));
    let file =
        File::create(&target).with_context(|| format!("create {}", target.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, result)
        .with_context(|| format!("write {}", target.display()))?;
    writer.flush()?;
    debug!(path = %target.display(), "output written");
    Ok(target)
}

/// Progress over the input files; hidden for a single file or a non-terminal stderr.
fn progress_bar(len: usize) -> Result<ProgressBar> {
    if len < 2 || !io::stderr().is_terminal() {
        return Ok(ProgressBar::hidden());
    }
    let style = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
        .context("progress template")?;
    Ok(ProgressBar::new(len as u64).with_style(style))
}
