use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::warn;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::compare::ToggleOutcome;
use crate::config::{self, ConfigFile};
use crate::filter::FilterState;
use crate::interviews::DEFAULT_INTERVIEW_LIMIT;
use crate::offer::{OfferId, ValidationPolicy, YoePolicy};
use crate::output::{self, DashboardReport, OutputFormat};
use crate::runner::{self, DataSource, Dashboard, Options};
use crate::suggest::SuggestField;

fn print_banner() {
    const BANNER: &str = r#"
                                 __                         __
  _________  ____ ___  ____     / /_  ____  ____ __________/ /
 / ___/ __ \/ __ `__ \/ __ \   / __ \/ __ \/ __ `/ ___/ __  /
/ /__/ /_/ / / / / / / /_/ /  / /_/ / /_/ / /_/ / /  / /_/ /
\___/\____/_/ /_/ /_/ .___/  /_.___/\____/\__,_/_/   \__,_/
                   /_/
       compensation offer dashboard
    "#;
    print!("{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = String::new();

    out.push_str(cmd.get_name());
    if let Some(version) = cmd.get_version() {
        out.push(' ');
        out.push_str(version);
    }
    out.push('\n');
    if let Some(about) = cmd.get_about() {
        out.push_str(&about.to_string());
        out.push('\n');
    }
    if let Some(long_about) = cmd.get_long_about() {
        out.push('\n');
        out.push_str(&long_about.to_string());
        out.push('\n');
    }
    out.push_str(&format!("\nUsage: {} [OPTIONS]\n\n", cmd.get_name()));

    let mut sections: Vec<(String, Vec<&clap::Arg>)> = Vec::new();
    let mut section_idx: HashMap<String, usize> = HashMap::new();
    for arg in cmd.get_arguments().filter(|a| !a.is_hide_set()) {
        let heading = arg.get_help_heading().unwrap_or("Options").to_string();
        let idx = *section_idx.entry(heading.clone()).or_insert_with(|| {
            sections.push((heading, Vec::new()));
            sections.len() - 1
        });
        sections[idx].1.push(arg);
    }

    for (heading, args) in sections {
        out.push_str(&heading);
        out.push_str(":\n");
        for arg in args {
            let mut flags: Vec<String> = Vec::new();
            if let Some(short) = arg.get_short() {
                flags.push(format!("-{short}"));
            }
            if let Some(long) = arg.get_long() {
                flags.push(format!("--{long}"));
            }
            for alias in arg.get_visible_aliases().unwrap_or_default() {
                let rendered = format!("--{alias}");
                if !flags.contains(&rendered) {
                    flags.push(rendered);
                }
            }
            let mut line = flags.join(", ");
            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                line.push_str(&format!(" <{value_name}>"));
            }
            out.push_str(&format!("  {line}\n"));
            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str(&format!("          {}\n", help.trim()));
                }
            }
            out.push('\n');
        }
    }
    out
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

struct RunConfig {
    options: Options,
    verbose: u8,
    no_color: bool,
    page: Option<usize>,
    compare: Vec<String>,
    export: Option<String>,
    output: Option<String>,
    output_format: Option<String>,
    suggest: Option<(SuggestField, String)>,
    interviews: bool,
    last_updated: bool,
    last_updated_url: String,
}

fn range_or(
    flag: &str,
    arg: Option<String>,
    cfg: Option<String>,
    default: (f64, f64),
) -> Result<(f64, f64), String> {
    match arg.or(cfg) {
        Some(raw) => {
            let range = crate::utils::parse_numeric_range(&raw)
                .map_err(|e| format!("invalid --{flag} '{raw}': {e}"))?;
            Ok((range.start, range.end))
        }
        None => Ok(default),
    }
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let source = match args.data.or(cfg.data) {
        Some(raw) => match DataSource::parse(&raw) {
            DataSource::FilePath(path) => DataSource::FilePath(config::expand_tilde_string(&path)),
            other => other,
        },
        None => Options::default().source,
    };

    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(10);
    if timeout_seconds == 0 {
        return Err("invalid timeout, expected positive number of seconds".to_string());
    }
    let page_size = args
        .page_size
        .or(cfg.page_size)
        .unwrap_or(crate::pager::DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err("invalid page_size, expected positive integer".to_string());
    }

    let yoe_policy = match args.yoe_policy.or(cfg.yoe_policy) {
        Some(raw) => YoePolicy::parse(&raw)
            .ok_or_else(|| format!("invalid yoe_policy '{raw}', expected truthy or numeric"))?,
        None => YoePolicy::default(),
    };
    let require_mapped_role = if args.allow_missing_mapped_role {
        false
    } else {
        cfg.require_mapped_role.unwrap_or(true)
    };

    let defaults = FilterState::default();
    let (yoe_min, yoe_max) = range_or("yoe", args.yoe, cfg.yoe, (defaults.yoe_min, defaults.yoe_max))?;
    let (salary_min, salary_max) = range_or(
        "salary",
        args.salary,
        cfg.salary,
        (defaults.salary_min, defaults.salary_max),
    )?;
    let filters = FilterState {
        search: args.search.or(cfg.search).unwrap_or_default(),
        company: args.company.or(cfg.company).unwrap_or_default(),
        location: args.location.or(cfg.location).unwrap_or_default(),
        role: args.role.or(cfg.role).unwrap_or_default(),
        yoe_min,
        yoe_max,
        salary_min,
        salary_max,
        include_interview_exp: args.with_interview_exp || cfg.with_interview_exp.unwrap_or(false),
    };

    let compare = match args.compare.as_deref() {
        Some(raw) => crate::utils::parse_csv_list(raw)
            .map_err(|e| format!("invalid --compare '{raw}': {e}"))?,
        None => Vec::new(),
    };
    let suggest = match args.suggest.as_deref() {
        Some(raw) => Some(
            validation::parse_suggest_arg(raw)
                .map_err(|e| format!("invalid --suggest '{raw}': {e}"))?,
        ),
        None => None,
    };

    let output_format = args.output_format.or(cfg.output_format);
    if let Some(raw) = output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid output format '{raw}', expected text or json"));
        }
    }

    Ok(RunConfig {
        options: Options {
            source,
            timeout_seconds,
            validation: ValidationPolicy {
                yoe: yoe_policy,
                require_mapped_role,
            },
            page_size,
            overflow_bucket: args.overflow_bucket || cfg.overflow_bucket.unwrap_or(false),
            filters,
        },
        verbose: args.verbose,
        no_color,
        page: args.page,
        compare,
        export: args.export.or(cfg.export).map(|p| config::expand_tilde_string(&p)),
        output: args.output.or(cfg.output).map(|p| config::expand_tilde_string(&p)),
        output_format,
        suggest,
        interviews: args.interviews,
        last_updated: args.last_updated || cfg.last_updated.unwrap_or(false),
        last_updated_url: cfg
            .last_updated_url
            .unwrap_or_else(|| runner::DEFAULT_LAST_UPDATED_URL.to_string()),
    })
}

fn loading_spinner(source: &DataSource) -> Result<Option<ProgressBar>, String> {
    if !matches!(source, DataSource::Url(_)) {
        return Ok(None);
    }
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} :: Duration: [{elapsed_precise}]")
            .map_err(|e| format!("failed to build progress style: {e}"))?,
    );
    pb.set_message(format!("fetching {}", source.describe()));
    Ok(Some(pb))
}

async fn write_file(path: &str, contents: &[u8]) -> Result<(), String> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file '{path}': {e}"))?;
    file.write_all(contents)
        .await
        .map_err(|e| format!("failed to write output file '{path}': {e}"))
}

fn select_comparison(dashboard: &mut Dashboard, ids: &[String]) {
    for raw in ids {
        let id = OfferId::new(raw.as_str());
        match dashboard.toggle_comparison(&id) {
            None => warn!("offer id {raw} not found; skipped from comparison"),
            Some(ToggleOutcome::CapacityReached) => break,
            Some(_) => {}
        }
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner();

    let source = run.options.source.describe();
    format_kv_line("Data", &source);
    format_kv_line(
        "Filters",
        run.options
            .filters
            .summary()
            .as_deref()
            .unwrap_or("none"),
    );
    format_kv_line(
        "Validate",
        &format!(
            "yoe={} mapped_role={}",
            run.options.validation.yoe.as_str(),
            if run.options.validation.require_mapped_role {
                "required"
            } else {
                "optional"
            }
        ),
    );
    println!();

    let now = Instant::now();
    let spinner = loading_spinner(&run.options.source)?;
    let last_updated_fetch = async {
        if run.last_updated {
            Some(runner::fetch_last_updated(&run.last_updated_url, run.options.timeout_seconds).await)
        } else {
            None
        }
    };
    let (loaded, last_updated) = tokio::join!(Dashboard::load(&run.options), last_updated_fetch);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let mut dashboard = loaded.map_err(|e| e.to_string())?;

    if let Some(page) = run.page {
        dashboard.go_to_page(page);
    }
    select_comparison(&mut dashboard, &run.compare);

    let mut report = DashboardReport::build(&dashboard, &source);
    if let Some(label) = last_updated {
        report = report.with_last_updated(label);
    }
    if let Some((field, query)) = run.suggest.as_ref() {
        report = report.with_suggestions(&dashboard, *field, query);
    }
    if run.interviews {
        report = report.with_interviews(&dashboard, DEFAULT_INTERVIEW_LIMIT);
    }

    let stdout_format = match run.output {
        Some(_) => OutputFormat::Text,
        None => run
            .output_format
            .as_deref()
            .and_then(OutputFormat::parse)
            .unwrap_or(OutputFormat::Text),
    };
    let rendered = match stdout_format {
        OutputFormat::Text => output::render_text(&report),
        OutputFormat::Json => output::render_json(&report)?,
    };
    print!("{}", String::from_utf8_lossy(&rendered));

    if let Some(path) = run.export.as_deref() {
        match dashboard.comparison().export(Utc::now()) {
            Some(export) => {
                write_file(path, &export.to_json_pretty()?).await?;
                format_kv_line("Export", &format!("{} offers -> {path}", export.offers.len()));
            }
            None => println!(
                "{}",
                "No offers selected for comparison; nothing exported".yellow()
            ),
        }
    }

    if let Some(path) = run.output.as_deref() {
        let format = run
            .output_format
            .as_deref()
            .and_then(OutputFormat::parse)
            .or_else(|| output::infer_format_from_path(path))
            .unwrap_or(OutputFormat::Text);
        let rendered = match format {
            OutputFormat::Text => {
                colored::control::set_override(false);
                output::render_text(&report)
            }
            OutputFormat::Json => output::render_json(&report)?,
        };
        write_file(path, &rendered).await?;
    }

    println!();
    println!(
        ":: Completed :: {} offers in {}ms ::",
        dashboard.filtered().len(),
        now.elapsed().as_millis()
    );
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine a config path; pass --config".to_string())?;
        config::ensure_default_config_file(&path)?;
        println!("config: {}", path.display());
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    init_logging(run.verbose);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
