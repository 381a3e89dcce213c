// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod render;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use feeling_api::{Client, MemoryBackend, Router};
use feeling_app::{
    Backend, ColumnVisibility, FormDraft, ManagementPage, NoticeLevel, PageCommand, PageConfig,
    PageOptions, Record, RecordAction, Resource, SortDescriptor, SortDirection, TabKey,
    TableCommand, pages,
};
use runtime::PageRuntime;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const SEED: u64 = 7;
const SEED_ROWS: usize = 24;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    init_logging(options.verbose);

    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `{} --print-example-config` to generate a template",
            options.config_path.display(),
            config::APP_NAME
        )
    })?;

    let backend = build_backend(&config, &options)?;
    if options.check_only {
        return Ok(());
    }

    let Some(command) = options.command else {
        print_help();
        return Ok(());
    };

    let page_options = PageOptions {
        rows_per_page: config.rows_per_page(),
        debounce: config.debounce()?,
    };
    let limit = settle_limit(config.api_timeout()?, page_options.debounce)?;
    match command.resource {
        Resource::Events => run_command(pages::events(), page_options, backend, &command, limit),
        Resource::Users => run_command(pages::users(), page_options, backend, &command, limit),
        Resource::Complaints => {
            run_command(pages::complaints(), page_options, backend, &command, limit)
        }
        Resource::Plans => run_command(pages::plans(), page_options, backend, &command, limit),
    }
}

/// Worst case for one step: a request and its follow-up refresh, plus one
/// debounce window.
fn settle_limit(timeout: Duration, debounce: Duration) -> Result<Duration> {
    timeout
        .checked_mul(2)
        .and_then(|total| total.checked_add(debounce))
        .ok_or_else(|| anyhow!("api.timeout plus ui.debounce is too large"))
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp_secs().init();
}

fn build_backend(config: &Config, options: &CliOptions) -> Result<Arc<dyn Backend>> {
    if options.demo {
        log::info!("backend=memory demo dataset seed={SEED}");
        return Ok(Arc::new(MemoryBackend::demo(SEED, SEED_ROWS, &Resource::ALL)?));
    }

    let client = Client::new(&config.api_base_url(), config.api_timeout()?).with_context(|| {
        format!(
            "invalid [api] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;
    let local_resources = config.local_resources()?;
    log::debug!(
        "backend=rest base_url={} local={:?}",
        client.base_url(),
        local_resources
    );
    if options.check_only {
        for resource in Resource::ALL
            .into_iter()
            .filter(|resource| !local_resources.contains(resource))
        {
            client
                .ping(resource)
                .with_context(|| format!("check {} endpoint", resource.as_str()))?;
        }
        log::info!(
            "backend=rest base_url={} timeout={:?} reachable",
            client.base_url(),
            client.timeout()
        );
    }

    let local = MemoryBackend::demo(SEED, SEED_ROWS, &local_resources)?;
    let router = Router::new(Arc::new(client), Arc::new(local)).route_locally(local_resources);
    Ok(Arc::new(router))
}

fn run_command<T: TabKey>(
    page_config: PageConfig<T>,
    page_options: PageOptions,
    backend: Arc<dyn Backend>,
    command: &Command,
    limit: Duration,
) -> Result<()> {
    let mut runtime = PageRuntime::new(ManagementPage::new(page_config, page_options), backend);
    runtime.mount();
    runtime.run_until_settled(limit)?;

    let tab = match &command.view.tab {
        Some(label) => T::parse(label).ok_or_else(|| {
            let known: Vec<&str> = T::ALL.iter().map(|tab| tab.label()).collect();
            anyhow!(
                "unknown tab {label:?} for {}; expected one of {}",
                page_config.resource.as_str(),
                known.join(", ")
            )
        })?,
        None => T::ALL[0],
    };
    // Each step settles before the next so no parameter change lands while
    // the tab is still loading.
    for step in view_steps(&page_config, tab, &command.view)? {
        runtime.dispatch(step);
        runtime.run_until_settled(limit)?;
    }

    match &command.action {
        Action::List => {
            print!("{}", render::format_view(&runtime.page().view()));
            return Ok(());
        }
        Action::Stats => {
            let stats = runtime.page().stats().ok_or_else(|| {
                anyhow!(
                    "statistics for {} are unavailable; rerun with -v for details",
                    page_config.resource.as_str()
                )
            })?;
            print!("{}", render::format_stats(stats));
            return Ok(());
        }
        Action::Create => {
            let mut draft = FormDraft::new();
            for (field, value) in &command.assignments {
                draft.set(field, value.as_str());
            }
            runtime.dispatch(PageCommand::OpenCreate(Some(draft)));
            runtime.dispatch(PageCommand::Submit);
        }
        Action::Update => {
            let record = loaded_record(runtime.page(), tab, command.id.as_deref());
            runtime.dispatch(PageCommand::OpenEdit(record));
            for (field, value) in &command.assignments {
                runtime.dispatch(PageCommand::EditField {
                    field: field.clone(),
                    value: value.clone(),
                });
            }
            runtime.dispatch(PageCommand::Submit);
        }
        Action::Delete => {
            let record = loaded_record(runtime.page(), tab, command.id.as_deref());
            runtime.dispatch(PageCommand::OpenDelete(record));
            runtime.dispatch(PageCommand::Submit);
        }
        Action::Row(action) => {
            let record = loaded_record(runtime.page(), tab, command.id.as_deref());
            runtime.dispatch(PageCommand::RunAction(record, *action));
        }
    }
    runtime.run_until_settled(limit)?;

    let errors = runtime.page().crud().errors().clone();
    if !errors.is_empty() {
        for (field, message) in &errors {
            eprintln!("{field}: {message}");
        }
        bail!("{} field(s) failed validation", errors.len());
    }

    let notices = runtime.page_mut().take_notices();
    for notice in &notices {
        println!("{}", render::format_notice(notice));
    }
    if notices
        .iter()
        .any(|notice| notice.level == NoticeLevel::Error)
    {
        bail!("{} {} failed", command.action.name(), page_config.resource.as_str());
    }
    print!("{}", render::format_view(&runtime.page().view()));
    Ok(())
}

fn view_steps<T: TabKey>(
    page_config: &PageConfig<T>,
    tab: T,
    view: &ViewArgs,
) -> Result<Vec<PageCommand<T>>> {
    let declared = (page_config.columns)(tab);
    let lookup = |name: &str| {
        declared
            .iter()
            .find(|column| column.uid == name)
            .ok_or_else(|| {
                let known: Vec<&str> = declared.iter().map(|column| column.uid).collect();
                anyhow!(
                    "unknown column {name:?} on tab {}; expected one of {}",
                    tab.label(),
                    known.join(", ")
                )
            })
    };

    let mut steps = vec![PageCommand::SelectTab(tab)];
    if let Some(search) = &view.search {
        steps.push(PageCommand::Table(tab, TableCommand::SetFilter(search.clone())));
    }
    if let Some(rows) = view.rows {
        steps.push(PageCommand::Table(tab, TableCommand::SetRowsPerPage(rows)));
    }
    if let Some(page) = view.page {
        steps.push(PageCommand::Table(tab, TableCommand::SetPage(page)));
    }
    if let Some((name, direction)) = &view.sort {
        let column = lookup(name)?;
        if !column.sortable {
            bail!("column {name:?} cannot be sorted");
        }
        steps.push(PageCommand::Table(
            tab,
            TableCommand::SetSort(SortDescriptor {
                column: column.uid,
                direction: *direction,
            }),
        ));
    }
    if let Some(names) = &view.columns {
        let mut uids = Vec::with_capacity(names.len());
        for name in names {
            uids.push(lookup(name)?.uid);
        }
        steps.push(PageCommand::Table(
            tab,
            TableCommand::SetVisibleColumns(ColumnVisibility::only(uids)),
        ));
    }
    Ok(steps)
}

/// The row as currently loaded, or a bare id when it is not on screen.
fn loaded_record<T: TabKey>(page: &ManagementPage<T>, tab: T, id: Option<&str>) -> Record {
    let id = id.unwrap_or_default();
    match page.items(tab).iter().find(|record| record.id.as_str() == id) {
        Some(record) => record.clone(),
        None => {
            log::debug!("tab={} id={id}: record not loaded, using bare id", tab.label());
            Record::new(id)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    List,
    Stats,
    Create,
    Update,
    Delete,
    Row(RecordAction),
}

impl Action {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "list" => Some(Self::List),
            "stats" => Some(Self::Stats),
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            other => RecordAction::parse(other).map(Self::Row),
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Stats => "stats",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Row(action) => action.as_str(),
        }
    }

    const fn needs_id(&self) -> bool {
        matches!(self, Self::Update | Self::Delete | Self::Row(_))
    }

    const fn takes_fields(&self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewArgs {
    tab: Option<String>,
    search: Option<String>,
    page: Option<usize>,
    rows: Option<usize>,
    sort: Option<(String, SortDirection)>,
    columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Command {
    action: Action,
    resource: Resource,
    id: Option<String>,
    assignments: Vec<(String, String)>,
    view: ViewArgs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    demo: bool,
    check_only: bool,
    verbose: bool,
    show_help: bool,
    command: Option<Command>,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        demo: false,
        check_only: false,
        verbose: false,
        show_help: false,
        command: None,
    };
    let mut view = ViewArgs::default();
    let mut positional: Vec<String> = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str| {
            iter.next()
                .map(|value| value.as_ref().to_owned())
                .ok_or_else(|| anyhow!("{flag} requires a value"))
        };
        match arg.as_ref() {
            "--config" => {
                let value = value_for("--config")
                    .map_err(|_| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--verbose" | "-v" => {
                options.verbose = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            "--tab" => {
                view.tab = Some(value_for("--tab")?);
            }
            "--search" => {
                view.search = Some(value_for("--search")?);
            }
            "--page" => {
                view.page = Some(parse_positive("--page", &value_for("--page")?)?);
            }
            "--rows" => {
                view.rows = Some(parse_positive("--rows", &value_for("--rows")?)?);
            }
            "--sort" => {
                view.sort = Some(parse_sort(&value_for("--sort")?)?);
            }
            "--columns" => {
                let raw = value_for("--columns")?;
                let names: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_owned)
                    .collect();
                if names.is_empty() {
                    bail!("--columns needs at least one column name");
                }
                view.columns = Some(names);
            }
            unknown if unknown.starts_with('-') => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
            other => positional.push(other.to_owned()),
        }
    }

    if !positional.is_empty() {
        options.command = Some(parse_command(positional, view)?);
    } else if view != ViewArgs::default() {
        bail!("view options need a command, for example `list events --tab PUBLICADO`");
    }
    Ok(options)
}

fn parse_command(positional: Vec<String>, view: ViewArgs) -> Result<Command> {
    let mut rest = positional.into_iter();
    let action_name = rest.next().unwrap_or_default();
    let action = Action::parse(&action_name).ok_or_else(|| {
        anyhow!(
            "unknown command {action_name:?}; expected list, stats, create, update, delete, toggle, approve, or reject"
        )
    })?;
    let resource_name = rest
        .next()
        .ok_or_else(|| anyhow!("`{}` needs a page: events, users, complaints, or plans", action.name()))?;
    let resource = Resource::parse(&resource_name).ok_or_else(|| {
        anyhow!("unknown page {resource_name:?}; expected events, users, complaints, or plans")
    })?;

    let id = if action.needs_id() {
        let id = rest
            .next()
            .ok_or_else(|| anyhow!("`{}` needs a record id", action.name()))?;
        Some(id)
    } else {
        None
    };

    let mut assignments = Vec::new();
    for raw in rest {
        if !action.takes_fields() {
            bail!("unexpected argument {raw:?} for `{}`", action.name());
        }
        let (field, value) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("expected field=value, got {raw:?}"))?;
        if field.trim().is_empty() {
            bail!("expected field=value, got {raw:?}");
        }
        assignments.push((field.trim().to_owned(), value.to_owned()));
    }

    Ok(Command {
        action,
        resource,
        id,
        assignments,
        view,
    })
}

fn parse_positive(flag: &str, raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => bail!("{flag} expects a positive number, got {raw:?}"),
    }
}

fn parse_sort(raw: &str) -> Result<(String, SortDirection)> {
    let (column, direction) = match raw.split_once(':') {
        Some((column, direction)) => (
            column,
            SortDirection::parse(direction)
                .ok_or_else(|| anyhow!("--sort direction must be asc or desc, got {direction:?}"))?,
        ),
        None => (raw, SortDirection::Ascending),
    };
    if column.is_empty() {
        bail!("--sort needs a column name, for example --sort start_date:desc");
    }
    Ok((column.to_owned(), direction))
}

fn print_help() {
    println!("{} <command> <page> [id] [field=value ...]", config::APP_NAME);
    println!();
    println!("commands: list, stats, create, update, delete, toggle, approve, reject");
    println!("pages:    events, users, complaints, plans");
    println!();
    println!("  --tab <status>           Select a status tab (default: all)");
    println!("  --search <text>          Filter rows");
    println!("  --page <n>               Page number, starting at 1");
    println!("  --rows <n>               Rows per page");
    println!("  --sort <col>[:asc|desc]  Sort by a column");
    println!("  --columns <a,b,...>      Show only these columns");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Use seeded in-memory data instead of the API");
    println!("  --check                  Validate config and reach the API, then exit");
    println!("  --verbose, -v            Log at debug level");
    println!("  --help                   Show this help");
}
