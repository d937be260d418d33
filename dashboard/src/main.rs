#![forbid(unsafe_code)]

use anyhow::{Context, Result, anyhow};
use dashboard::load::{DataSource, FsSource, HttpSource, fetch, load_geography};
use dashboard::plot::plot_svg;
use dashboard::{ChartKind, Config, Dashboard, Outcome, Request};
use log::{info, warn};
use std::fs;

struct Args {
    config: Option<String>,
    data: String,
    years: Vec<u32>,
    region: Option<String>,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Args {
            config: None,
            data: ".".into(),
            years: Vec::new(),
            region: None,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(flag) = iter.next() {
            let mut value = || {
                iter.next()
                    .ok_or_else(|| anyhow!("Missing value after {flag}"))
            };
            match flag.as_str() {
                "--config" => args.config = Some(value()?),
                "--data" => args.data = value()?,
                "--year" => {
                    let year = value()?;
                    args.years.push(
                        year.parse()
                            .with_context(|| format!("Invalid year index: {year}"))?,
                    );
                }
                "--region" => args.region = Some(value()?),
                x => return Err(anyhow!("Unknown argument: {x}")),
            }
        }
        Ok(args)
    }
}

enum Source {
    Fs(FsSource),
    Http(HttpSource),
}

impl DataSource for Source {
    async fn fetch(&self, path: &str) -> Result<String> {
        match self {
            Source::Fs(source) => source.fetch(path).await,
            Source::Http(source) => source.fetch(path).await,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse()?;
    let config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    let source = if args.data.starts_with("http://") || args.data.starts_with("https://") {
        Source::Http(HttpSource::new(&args.data)?)
    } else {
        Source::Fs(FsSource::new(&args.data))
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(args, config, source))
}

async fn run(args: Args, config: Config, source: Source) -> Result<()> {
    let years = if args.years.is_empty() {
        vec![config.initial_year_index]
    } else {
        args.years.clone()
    };

    let mut dashboard = Dashboard::new(config)?;
    let regions = load_geography(&source, dashboard.geography_path()).await?;
    dashboard.install_geography(&regions);

    fs::create_dir_all("plots")?;
    for index in years {
        let requests = dashboard.set_year(index);
        let label = dashboard.year_label();
        info!("Plotting year {label}...");
        complete_all(&mut dashboard, &source, requests).await;

        if let Some(region) = &args.region
            && let Some(request) = dashboard.select_region(region)
        {
            complete_all(&mut dashboard, &source, vec![request]).await;
        }

        for kind in [ChartKind::Map, ChartKind::Bar, ChartKind::Donut] {
            let svg = plot_svg(dashboard.scene().chart(kind))?;
            let path = format!("plots/{kind}-{label}.svg");
            fs::write(&path, svg).with_context(|| format!("Failed to write {path}"))?;
            info!("Wrote {path}");
        }
    }
    Ok(())
}

async fn complete_all(dashboard: &mut Dashboard, source: &Source, requests: Vec<Request>) {
    for request in requests {
        let fetched = fetch(source, &request.path).await;
        if let Outcome::Failed(e) = dashboard.complete(&request, fetched) {
            warn!("Keeping the previous {} chart: {e}", request.chart);
        }
    }
}
