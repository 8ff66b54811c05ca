use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use cert_analytics::{
    apply, sample_store, AggregationEngine, FilterSnapshot, FilterState, RecordStore,
    DEFAULT_TOP_N,
};

/// Conventional input file picked up when no path argument is given.
const DEFAULT_DATA_FILE: &str = "certifications.csv";

struct CliOptions {
    data_path: Option<PathBuf>,
    search: Option<String>,
    years: Vec<i32>,
    genders: Vec<String>,
    regions: Vec<String>,
    certificates: Vec<String>,
    top: usize,
    save_filters: Option<PathBuf>,
    load_filters: Option<PathBuf>,
    show_help: bool,
}

impl CliOptions {
    fn new() -> Self {
        CliOptions {
            data_path: None,
            search: None,
            years: Vec::new(),
            genders: Vec::new(),
            regions: Vec::new(),
            certificates: Vec::new(),
            top: DEFAULT_TOP_N,
            save_filters: None,
            load_filters: None,
            show_help: false,
        }
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(&args)?;

    if options.show_help {
        print_usage();
        return Ok(());
    }

    println!("📊 cert-analytics v{}", cert_analytics::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = load_store(options.data_path.as_deref())?;
    let state = build_filter_state(&options)?;

    if let Some(path) = &options.save_filters {
        let snapshot = state.snapshot();
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write filters to {}", path.display()))?;
        println!("✓ Saved filters to {}", path.display());
    }

    print_report(&store, &state, options.top)?;

    Ok(())
}

fn parse_args(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--search" => options.search = Some(required_value(&mut iter, "--search")?),
            "--year" => {
                let raw = required_value(&mut iter, "--year")?;
                let year = raw
                    .parse::<i32>()
                    .with_context(|| format!("--year expects an integer, got '{}'", raw))?;
                options.years.push(year);
            }
            "--gender" => options.genders.push(required_value(&mut iter, "--gender")?),
            "--region" => options.regions.push(required_value(&mut iter, "--region")?),
            "--certificate" => options
                .certificates
                .push(required_value(&mut iter, "--certificate")?),
            "--top" => {
                let raw = required_value(&mut iter, "--top")?;
                options.top = raw
                    .parse::<usize>()
                    .with_context(|| format!("--top expects a number, got '{}'", raw))?;
            }
            "--save-filters" => {
                options.save_filters =
                    Some(PathBuf::from(required_value(&mut iter, "--save-filters")?))
            }
            "--load-filters" => {
                options.load_filters =
                    Some(PathBuf::from(required_value(&mut iter, "--load-filters")?))
            }
            "--help" | "-h" => options.show_help = true,
            other if other.starts_with("--") => bail!("unknown flag '{}'", other),
            other => {
                if options.data_path.is_some() {
                    bail!("unexpected extra argument '{}'", other);
                }
                options.data_path = Some(PathBuf::from(other));
            }
        }
    }

    Ok(options)
}

fn required_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<String> {
    iter.next()
        .cloned()
        .with_context(|| format!("{} expects a value", flag))
}

/// Explicit path, else ./certifications.csv, else the generated sample.
fn load_store(path: Option<&Path>) -> Result<RecordStore> {
    if let Some(path) = path {
        let store = RecordStore::from_csv_path(path)
            .with_context(|| format!("failed to load records from {}", path.display()))?;
        println!("✓ Loaded {} records from {}", store.len(), path.display());
        return Ok(store);
    }

    let fallback = Path::new(DEFAULT_DATA_FILE);
    if fallback.exists() {
        let store = RecordStore::from_csv_path(fallback)
            .with_context(|| format!("failed to load records from {}", fallback.display()))?;
        println!("✓ Loaded {} records from {}", store.len(), fallback.display());
        return Ok(store);
    }

    let store = sample_store();
    println!("✓ Generated {} sample records (no input file found)", store.len());
    Ok(store)
}

/// Saved filters load first; selections passed on the command line then
/// override their dimension.
fn build_filter_state(options: &CliOptions) -> Result<FilterState> {
    let mut state = FilterState::new();

    if let Some(path) = &options.load_filters {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read filters from {}", path.display()))?;
        let snapshot: FilterSnapshot = serde_json::from_str(&json)
            .with_context(|| format!("{} is not a saved filter file", path.display()))?;
        state.restore(&snapshot);
        println!("✓ Restored filters saved at {}", snapshot.saved_at);
    }

    if !options.years.is_empty() {
        state.years = options.years.clone();
    }
    if !options.genders.is_empty() {
        state.genders = options.genders.clone();
    }
    if !options.regions.is_empty() {
        state.regions = options.regions.clone();
    }
    if !options.certificates.is_empty() {
        state.certificate_types = options.certificates.clone();
    }
    if let Some(search) = &options.search {
        state.search = search.clone();
    }

    Ok(state)
}

fn print_report(store: &RecordStore, state: &FilterState, top_n: usize) -> Result<()> {
    let predicate = state.resolve(store.vocabulary());
    let filtered = apply(store, &predicate);
    let engine = AggregationEngine::new();

    println!("\n📊 자격증 취득 현황");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", engine.overview(&filtered).summary());

    println!("\n📅 연도별 자격증 취득자 수");
    let trend = engine.count_by_year(&filtered);
    for row in &trend.rows {
        println!("  {}년  {:>4}건", row.year, row.count);
    }
    println!("  {}", trend.summary());

    println!("\n🚻 성별 비율");
    let genders = engine.count_by_gender(&filtered);
    for row in &genders.rows {
        println!("  {}  {:>4}건", row.gender, row.count);
    }
    println!("  {}", genders.summary());

    println!("\n📍 지역별 분포");
    let regions = engine.count_by_region(&filtered)?;
    for row in &regions.rows {
        println!(
            "  {}  {:>4}건  ({:.4}, {:.4})",
            row.region, row.count, row.latitude, row.longitude
        );
    }
    println!("  {}", regions.summary());

    println!("\n👥 연령대별 분포");
    let ages = engine.count_by_age_bracket(&filtered);
    for row in &ages.rows {
        println!("  {}  {:>4}건", row.bracket.label(), row.count);
    }
    println!("  {}", ages.summary());

    println!("\n🏆 자격증 인기 순위");
    // The ranking narrows to a single year only when the filters pin
    // exactly one.
    let year_focus = match predicate.years.as_slice() {
        [only] => Some(*only),
        _ => None,
    };
    let ranking = engine.top_certificates(&filtered, top_n, year_focus);
    for (index, row) in ranking.rows.iter().enumerate() {
        println!(
            "  {}. {}  {}건  {}",
            index + 1,
            row.certificate_type,
            row.count,
            row.description
        );
    }
    println!("  {}", ranking.summary());

    Ok(())
}

fn print_usage() {
    println!("cert-analytics - 자격증 취득 현황 분석 CLI");
    println!();
    println!("USAGE:");
    println!("  cert-analytics [DATA.csv] [OPTIONS]");
    println!();
    println!("Without a data file, ./{} is used if present,", DEFAULT_DATA_FILE);
    println!("otherwise a deterministic sample dataset is generated.");
    println!();
    println!("OPTIONS:");
    println!("  --search <text>        free-text filter, e.g. \"서울 2020 여성\"");
    println!("  --year <year>          restrict to a year (repeatable)");
    println!("  --gender <gender>      restrict to a gender (repeatable)");
    println!("  --region <region>      restrict to a region (repeatable)");
    println!("  --certificate <name>   restrict to a certificate type (repeatable)");
    println!("  --top <n>              ranking length (default {})", DEFAULT_TOP_N);
    println!("  --save-filters <file>  save the active filters as JSON");
    println!("  --load-filters <file>  restore filters saved earlier");
    println!("  -h, --help             show this help");
}
