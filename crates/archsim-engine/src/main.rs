use anyhow::{Context, Result};
use archsim_engine::prelude::*;
use archsim_engine::{CheckOutcome, MetricField};
use archsim_model::GraphDocument;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let graph = Arg::new("graph")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Graph document (JSON with `nodes` and `edges`)");
    let load = Arg::new("load")
        .long("load")
        .default_value("1000")
        .value_parser(value_parser!(f64))
        .help("Requests per second entering at the clients");
    let catalog = Arg::new("catalog")
        .long("catalog")
        .global(true)
        .value_parser(value_parser!(PathBuf))
        .help("TOML file of extra component profiles");
    let json = Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON");

    Command::new("archsim")
        .version(archsim_engine::VERSION)
        .about("Analyze, simulate and score component architectures")
        .subcommand_required(true)
        .arg(catalog)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("info")
                .help("Log filter when RUST_LOG is unset"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("analyze")
                .about("Critical path, single points of failure and bottleneck")
                .arg(graph.clone())
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("metrics")
                .about("Steady-state metrics at a traffic load")
                .arg(graph.clone())
                .arg(load.clone())
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("validate")
                .about("Tier-aware validation report")
                .arg(graph.clone())
                .arg(load)
                .arg(
                    Arg::new("pattern")
                        .long("pattern")
                        .default_value("steady")
                        .value_parser(value_parser!(TrafficPattern))
                        .help("steady, spike, sine-wave or flash-sale"),
                )
                .arg(
                    Arg::new("scenario")
                        .long("scenario")
                        .value_parser(value_parser!(PathBuf))
                        .help("Scenario document (JSON)"),
                )
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run ticks on a fixed one-second clock")
                .arg(graph)
                .arg(
                    Arg::new("ticks")
                        .long("ticks")
                        .default_value("60")
                        .value_parser(value_parser!(u64))
                        .help("Number of ticks to run"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Simulation configuration (TOML)"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Override the traffic seed"),
                )
                .arg(
                    Arg::new("fail")
                        .long("fail")
                        .help("Label of a node to fail at the first tick"),
                )
                .arg(json),
        )
        .subcommand(Command::new("catalog").about("List known component kinds"))
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    let level = matches.get_one::<String>("log-level").map_or("info", String::as_str);
    init_tracing(level, matches.get_flag("log-json"));

    match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let catalog = load_catalog(matches.get_one::<PathBuf>("catalog"))?;

    match matches.subcommand() {
        Some(("analyze", args)) => {
            let store = load_graph(catalog, graph_arg(args)?)?;
            let analysis = analyze_topology(store.catalog(), store.nodes(), store.edges());
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&store, &analysis);
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(("metrics", args)) => {
            let store = load_graph(catalog, graph_arg(args)?)?;
            let load = *args.get_one::<f64>("load").context("missing --load")?;
            let metrics = compute_metrics(store.catalog(), store.nodes(), store.edges(), load);
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                print_metrics(&metrics);
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(("validate", args)) => {
            let store = load_graph(catalog, graph_arg(args)?)?;
            let load = *args.get_one::<f64>("load").context("missing --load")?;
            let pattern = *args.get_one::<TrafficPattern>("pattern").context("missing --pattern")?;
            let scenario = args
                .get_one::<PathBuf>("scenario")
                .map(|p| read_json::<Scenario>(p))
                .transpose()?;

            let analysis = analyze_topology(store.catalog(), store.nodes(), store.edges());
            let metrics = compute_metrics(store.catalog(), store.nodes(), store.edges(), load);
            let report = validate(
                store.catalog(),
                store.nodes(),
                store.edges(),
                &analysis.single_points_of_failure,
                &metrics,
                load,
                pattern,
                scenario.as_ref(),
            );
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(if report.failed_critical == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        Some(("simulate", args)) => simulate(catalog, args),
        Some(("catalog", _)) => {
            for (kind, profile) in catalog.iter() {
                println!(
                    "{kind:<24} {:<14} {:>10.0} rps {:>7.1} ms  sla {:.4}  ${:.0}/mo",
                    format!("{:?}", profile.category),
                    profile.max_throughput,
                    profile.base_latency_ms,
                    profile.availability_sla,
                    profile.cost_per_instance_month,
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(ExitCode::FAILURE),
    }
}

fn simulate(catalog: Catalog, args: &ArgMatches) -> Result<ExitCode> {
    let store = load_graph(catalog, graph_arg(args)?)?;
    let ticks = *args.get_one::<u64>("ticks").context("missing --ticks")?;
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.get_one::<u64>("seed") {
        config = config.with_seed(*seed);
    }
    let interval_ms = (1000.0 / config.speed).ceil() as u64;

    let mut sim = Simulation::new(store, config)?;
    if let Some(label) = args.get_one::<String>("fail") {
        let id = sim
            .store()
            .nodes()
            .iter()
            .find(|n| n.label() == label)
            .map(|n| n.id)
            .with_context(|| format!("no node labelled {label}"))?;
        sim.inject_failure(id, 0)?;
    }

    let json = args.get_flag("json");
    for step in 0..ticks {
        let Some(outcome) = sim.advance(step * interval_ms) else {
            continue;
        };
        if json {
            println!("{}", serde_json::to_string(outcome)?);
            continue;
        }
        let m = &outcome.metrics;
        println!(
            "t={step:<4} rps {:>9.1}  p99 {:>7.1} ms  err {:>5.2}%  avail {:.5}",
            m.throughput,
            m.latency_p99_ms,
            m.error_rate * 100.0,
            m.availability,
        );
        for alert in &outcome.alerts {
            println!("       ! {}", alert.message);
        }
    }

    if !json {
        let throughput = sim.history().series(MetricField::Throughput);
        if !throughput.is_empty() {
            let mean = throughput.iter().sum::<f64>() / throughput.len() as f64;
            println!();
            println!("ticks: {}  mean throughput: {mean:.1} rps  alerts: {}", sim.tick_count(), sim.alerts().len());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn graph_arg(args: &ArgMatches) -> Result<&PathBuf> {
    args.get_one::<PathBuf>("graph").context("missing graph document")
}

fn load_catalog(extra: Option<&PathBuf>) -> Result<Catalog> {
    let mut catalog = Catalog::builtin().clone();
    if let Some(path) = extra {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let added = catalog
            .extend_from_toml(&source)
            .with_context(|| format!("invalid catalog {}", path.display()))?;
        tracing::info!(path = %path.display(), added, "catalog extended");
    }
    Ok(catalog)
}

fn load_graph(catalog: Catalog, path: &Path) -> Result<GraphStore> {
    let document: GraphDocument = read_json(path)?;
    let store = GraphStore::from_document(catalog, document);
    tracing::debug!(nodes = store.node_count(), edges = store.edge_count(), "graph loaded");
    Ok(store)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("invalid document {}", path.display()))
}

fn label(store: &GraphStore, id: NodeId) -> String {
    store
        .node(id)
        .map_or_else(|| id.to_string(), |n| n.label().to_string())
}

fn print_analysis(store: &GraphStore, analysis: &TopologyAnalysis) {
    let path: Vec<String> = analysis.critical_path.iter().map(|id| label(store, *id)).collect();
    println!("Critical path: {}", path.join(" -> "));
    println!("  latency: {:.1} ms over {} hops", analysis.critical_path_latency_ms, analysis.network_hops);
    match analysis.bottleneck {
        Some(id) => println!("Bottleneck: {}", label(store, id)),
        None => println!("Bottleneck: none"),
    }
    if analysis.single_points_of_failure.is_empty() {
        println!("Single points of failure: none");
    } else {
        println!("Single points of failure:");
        for id in &analysis.single_points_of_failure {
            println!("  - {}", label(store, *id));
        }
    }
}

fn print_metrics(m: &MetricSnapshot) {
    println!("Throughput:    {:.1} rps", m.throughput);
    println!("Latency:       p50 {:.1} / p95 {:.1} / p99 {:.1} ms", m.latency_p50_ms, m.latency_p95_ms, m.latency_p99_ms);
    println!("Availability:  {:.5}", m.availability);
    println!("Error rate:    {:.2}%", m.error_rate * 100.0);
    println!("Network hops:  {}", m.network_hops);
    println!("Scalability:   {:.0}/100", m.scalability_score);
    println!("Monthly cost:  ${:.0}", m.monthly_cost);
    if let Some(consistency) = m.consistency_model {
        println!("Consistency:   {consistency}");
    }
    if let Some(cap) = &m.cap_state {
        println!("CAP:           {cap}");
    }
    if let Some(hit) = m.cache_hit_rate {
        println!("Cache hits:    {:.0}%", hit * 100.0);
    }
    if let Some(depth) = m.queue_depth {
        println!("Queue depth:   {depth:.1}");
    }
    if let Some(ai) = &m.ai {
        println!("Tokens/s:      {:.0}", ai.token_throughput);
        println!("TTFT:          {:.0} ms", ai.time_to_first_token_ms);
        println!("Hallucination: {:.2}", ai.hallucination_risk);
    }
}

fn print_report(report: &ValidationReport) {
    println!("{}  {}/100 ({})", report.verdict.badge, report.overall_score, report.grade);
    println!("{}", report.verdict.headline);
    println!("Tier: {}", report.context.scale_tier);
    println!();
    for dimension in &report.dimensions {
        println!("{:<16} {:>5.0}", dimension.dimension.title(), dimension.score);
        for check in &dimension.checks {
            let mark = match check.outcome {
                CheckOutcome::Pass => "ok",
                CheckOutcome::Advisory => "~~",
                CheckOutcome::Fail => "!!",
            };
            println!("  [{mark}] {}: {}", check.name, check.message);
        }
    }
    if !report.top_issues.is_empty() {
        println!();
        println!("Top issues:");
        for issue in &report.top_issues {
            let fix = issue.recommendation.as_deref().unwrap_or("");
            println!("  - {} {fix}", issue.name);
        }
    }
}
