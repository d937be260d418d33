//! Application state and the refresh pipeline.
//!
//! Loads are split in three steps so that no state is borrowed while a fetch
//! is in flight: the dashboard issues a [`Request`], the caller fetches its
//! path from a [`DataSource`](crate::load::DataSource), and hands the result
//! back to [`Dashboard::complete`].

use crate::config::Config;
use crate::encoding::Encodings;
use crate::geography::{Point, Region};
use crate::load::{LoadError, YearSelection, industry_filename, parse_loaded, resolve_filename};
use crate::render::{bar, donut, map};
use crate::scale::{BandScale, LinearScale};
use crate::scene::{Chart, ChartKind, Element, Hook, Scene};
use crate::schema::{HousingRecord, IndustryRecord, MigrationRecord};
use anyhow::Result;
use log::{debug, info, warn};

/// A load the caller should perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub chart: ChartKind,
    pub ticket: u64,
    pub path: String,
    /// Region the industry rows are filtered on.
    pub region: Option<String>,
}

/// What became of a completed load.
#[derive(Debug)]
pub enum Outcome {
    Applied,
    /// A newer load of the same chart was applied first.
    Stale,
    Failed(LoadError),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Orders the loads of one chart.
#[derive(Debug, Default, Clone, Copy)]
struct RequestTracker {
    issued: u64,
    applied: u64,
}

impl RequestTracker {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn is_stale(&self, ticket: u64) -> bool {
        ticket <= self.applied
    }

    fn is_latest(&self, ticket: u64) -> bool {
        ticket == self.issued
    }

    fn apply(&mut self, ticket: u64) {
        self.applied = ticket;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DonutState {
    /// No region selected yet.
    Idle,
    Loading {
        region: String,
        /// Region still on screen while loading.
        shown: Option<String>,
    },
    Rendered {
        region: String,
    },
}

impl DonutState {
    fn shown(&self) -> Option<&str> {
        match self {
            DonutState::Idle => None,
            DonutState::Loading { shown, .. } => shown.as_deref(),
            DonutState::Rendered { region } => Some(region),
        }
    }
}

/// Everything the dashboard knows, owned in one place.
pub struct Dashboard {
    config: Config,
    year: YearSelection,
    region: Option<String>,
    encodings: Encodings,
    scene: Scene,
    map_requests: RequestTracker,
    bar_requests: RequestTracker,
    donut_requests: RequestTracker,
    donut_state: DonutState,
    focused: Option<usize>,
    bar_scales: Option<(BandScale, LinearScale)>,
}

impl Dashboard {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let encodings = Encodings::new(&config)?;
        let scene = layout(&config);
        let year = YearSelection::new(&config, config.initial_year_index);
        Ok(Self {
            config,
            year,
            region: None,
            encodings,
            scene,
            map_requests: RequestTracker::default(),
            bar_requests: RequestTracker::default(),
            donut_requests: RequestTracker::default(),
            donut_state: DonutState::Idle,
            focused: None,
            bar_scales: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn year(&self) -> YearSelection {
        self.year
    }

    /// Text shown next to the slider.
    pub fn year_label(&self) -> String {
        self.year.year().to_string()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn donut_state(&self) -> &DonutState {
        &self.donut_state
    }

    /// Scales of the bar chart currently shown.
    pub fn bar_scales(&self) -> Option<&(BandScale, LinearScale)> {
        self.bar_scales.as_ref()
    }

    pub fn geography_path(&self) -> &str {
        &self.config.geography
    }

    /// Draws the region outlines and labels once.
    pub fn install_geography(&mut self, regions: &[Region]) {
        let size = self.config.map_inner();
        let elements = map::draw_regions(regions, &mut self.encodings, size);
        info!("Installed {} regions", regions.len());
        self.scene.map.set_base(elements);
    }

    /// Moves the slider and requests the migration and housing files of the
    /// new year.
    pub fn set_year(&mut self, index: u32) -> Vec<Request> {
        self.year = YearSelection::new(&self.config, index);
        debug!("Year set to {}", self.year_label());

        let mut requests = Vec::with_capacity(2);
        if let Some(path) = resolve_filename(&self.config.migration, self.year) {
            requests.push(self.issue(ChartKind::Map, path, None));
        }
        if let Some(path) = resolve_filename(&self.config.housing, self.year) {
            requests.push(self.issue(ChartKind::Bar, path, None));
        }
        requests
    }

    /// Highlights a region and requests its industry breakdown, even when it is
    /// already selected.
    pub fn select_region(&mut self, name: &str) -> Option<Request> {
        map::highlight(&mut self.scene.map, name);
        self.region = Some(name.to_owned());

        let path = industry_filename(&self.config.industry, self.year)?;
        let shown = self.donut_state.shown().map(str::to_owned);
        self.donut_state = DonutState::Loading {
            region: name.to_owned(),
            shown,
        };
        Some(self.issue(ChartKind::Donut, path, Some(name.to_owned())))
    }

    /// Dispatches a click in the pixel space of one chart.
    pub fn click(&mut self, kind: ChartKind, point: Point) -> Option<Request> {
        let hook = self.scene.chart(kind).hit(point)?.clone();
        match hook {
            Hook::SelectRegion(name) => self.select_region(&name),
            Hook::FocusSlice(_) => None,
        }
    }

    /// Tracks the pointer over the donut. Returns whether the chart changed.
    pub fn hover(&mut self, point: Point) -> bool {
        let focused = match self.scene.donut.hit(point) {
            Some(Hook::FocusSlice(index)) => Some(*index),
            _ => None,
        };
        self.set_focus(focused)
    }

    /// The pointer left the donut.
    pub fn leave(&mut self) -> bool {
        self.set_focus(None)
    }

    pub fn tooltip(&self, kind: ChartKind, point: Point) -> Option<&str> {
        self.scene.chart(kind).tooltip(point)
    }

    /// Applies the result of a request, unless a newer load of the same chart
    /// was applied meanwhile. Nothing is changed unless every row parses.
    pub fn complete(&mut self, request: &Request, fetched: Result<String, LoadError>) -> Outcome {
        let kind = request.chart;
        if self.tracker(kind).is_stale(request.ticket) {
            debug!("Discarding stale {kind} load #{}", request.ticket);
            self.settle_donut(request);
            return Outcome::Stale;
        }

        let drawn = fetched.and_then(|text| self.draw(request, &text));
        match drawn {
            Ok(elements) => {
                info!(
                    "Applied {kind} load #{} from {}: {} elements",
                    request.ticket,
                    request.path,
                    elements.len()
                );
                self.tracker_mut(kind).apply(request.ticket);
                self.scene.chart_mut(kind).replace_data(elements);
                if kind == ChartKind::Donut {
                    self.focused = None;
                    self.show_donut(request);
                }
                Outcome::Applied
            }
            Err(e) => {
                warn!("{kind} load #{} failed: {e}", request.ticket);
                self.settle_donut(request);
                Outcome::Failed(e)
            }
        }
    }

    fn draw(&mut self, request: &Request, text: &str) -> Result<Vec<Element>, LoadError> {
        let path = &request.path;
        Ok(match request.chart {
            ChartKind::Map => {
                let rows: Vec<MigrationRecord> = parse_loaded(path, text)?;
                map::draw_markers(&rows, &self.encodings)
            }
            ChartKind::Bar => {
                let rows: Vec<HousingRecord> = parse_loaded(path, text)?;
                let frame = bar::draw_bars(&rows, &mut self.encodings);
                self.bar_scales = Some((frame.x, frame.y));
                frame.elements
            }
            ChartKind::Donut => {
                let rows: Vec<IndustryRecord> = parse_loaded(path, text)?;
                let rows: Vec<IndustryRecord> = rows
                    .into_iter()
                    .filter(|row| Some(&row.state) == request.region.as_ref())
                    .collect();
                donut::draw_donut(&rows, &mut self.encodings)
            }
        })
    }

    fn show_donut(&mut self, request: &Request) {
        let Some(region) = request.region.clone() else {
            return;
        };
        if self.donut_requests.is_latest(request.ticket) {
            self.donut_state = DonutState::Rendered { region };
        } else if let DonutState::Loading { shown, .. } = &mut self.donut_state {
            *shown = Some(region);
        }
    }

    /// Leaves the loading state once the latest donut request ends without
    /// being applied.
    fn settle_donut(&mut self, request: &Request) {
        if request.chart != ChartKind::Donut || !self.donut_requests.is_latest(request.ticket) {
            return;
        }
        if let DonutState::Loading { shown, .. } = &self.donut_state {
            self.donut_state = match shown {
                Some(region) => DonutState::Rendered {
                    region: region.clone(),
                },
                None => DonutState::Idle,
            };
        }
    }

    fn set_focus(&mut self, focused: Option<usize>) -> bool {
        if self.focused == focused {
            return false;
        }
        self.focused = focused;
        donut::focus(&mut self.scene.donut, focused);
        true
    }

    fn issue(&mut self, chart: ChartKind, path: String, region: Option<String>) -> Request {
        let ticket = self.tracker_mut(chart).issue();
        debug!("Requesting {chart} load #{ticket}: {path}");
        Request {
            chart,
            ticket,
            path,
            region,
        }
    }

    fn tracker(&self, kind: ChartKind) -> &RequestTracker {
        match kind {
            ChartKind::Map => &self.map_requests,
            ChartKind::Bar => &self.bar_requests,
            ChartKind::Donut => &self.donut_requests,
        }
    }

    fn tracker_mut(&mut self, kind: ChartKind) -> &mut RequestTracker {
        match kind {
            ChartKind::Map => &mut self.map_requests,
            ChartKind::Bar => &mut self.bar_requests,
            ChartKind::Donut => &mut self.donut_requests,
        }
    }
}

/// Pixel placement of the three charts: the map fills its inner size, the bar
/// chart is inset by the margins and the donut is centred on its inner size.
fn layout(config: &Config) -> Scene {
    let margin = &config.margin;
    let donut = config.donut_inner();
    Scene {
        map: Chart::new(config.map_inner(), (0.0, 0.0)),
        bar: Chart::new(config.bar, (margin.left, margin.top)),
        donut: Chart::new(config.donut, (donut.width / 2.0, donut.height / 2.0)),
    }
}
