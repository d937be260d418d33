#![forbid(unsafe_code)]

mod plot;

use dashboard::load::{HttpSource, fetch, load_geography};
use dashboard::{ChartKind, Config, Dashboard, Outcome, Request};
use plot::draw_chart;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlCanvasElement, console};

struct Canvases {
    map: HtmlCanvasElement,
    bar: HtmlCanvasElement,
    donut: HtmlCanvasElement,
}

struct Inner {
    dashboard: RefCell<Dashboard>,
    source: HttpSource,
    canvases: Canvases,
}

#[wasm_bindgen(js_name = Dashboard)]
pub struct State {
    inner: Rc<Inner>,
}

#[wasm_bindgen(js_class = Dashboard)]
impl State {
    /// An empty `config_json` keeps the default configuration. Data paths are
    /// resolved against `base_url`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: &str,
        base_url: &str,
        map: HtmlCanvasElement,
        bar: HtmlCanvasElement,
        donut: HtmlCanvasElement,
    ) -> Result<State, JsValue> {
        let config = if config_json.trim().is_empty() {
            Config::default()
        } else {
            Config::from_json(config_json).map_err(|e| report(&format!("{e:#}")))?
        };
        let dashboard = Dashboard::new(config).map_err(|e| report(&format!("{e:#}")))?;
        let source = HttpSource::new(base_url).map_err(|e| report(&format!("{e:#}")))?;
        Ok(Self {
            inner: Rc::new(Inner {
                dashboard: RefCell::new(dashboard),
                source,
                canvases: Canvases { map, bar, donut },
            }),
        })
    }

    /// Loads the geography once and the initial year.
    pub fn init(&self) -> String {
        let inner = Rc::clone(&self.inner);
        spawn_local(async move {
            let path = inner.dashboard.borrow().geography_path().to_owned();
            match load_geography(&inner.source, &path).await {
                Ok(regions) => {
                    inner.dashboard.borrow_mut().install_geography(&regions);
                    inner.redraw(ChartKind::Map);
                }
                Err(e) => {
                    report(&format!("{e}"));
                }
            }
        });
        let index = self.inner.dashboard.borrow().config().initial_year_index;
        self.set_year(index)
    }

    /// Returns the label to show next to the slider.
    pub fn set_year(&self, index: u32) -> String {
        let (requests, label) = {
            let mut dashboard = self.inner.dashboard.borrow_mut();
            let requests = dashboard.set_year(index);
            (requests, dashboard.year_label())
        };
        spawn(&self.inner, requests);
        label
    }

    pub fn click(&self, chart: &str, x: f64, y: f64) -> Result<(), JsValue> {
        let kind = parse_chart(chart)?;
        let request = self.inner.dashboard.borrow_mut().click(kind, (x, y));
        if let Some(request) = request {
            self.inner.redraw(ChartKind::Map);
            spawn(&self.inner, vec![request]);
        }
        Ok(())
    }

    /// Pointer position over the donut canvas.
    pub fn hover(&self, x: f64, y: f64) {
        let changed = self.inner.dashboard.borrow_mut().hover((x, y));
        if changed {
            self.inner.redraw(ChartKind::Donut);
        }
    }

    pub fn leave(&self) {
        let changed = self.inner.dashboard.borrow_mut().leave();
        if changed {
            self.inner.redraw(ChartKind::Donut);
        }
    }

    pub fn tooltip(&self, chart: &str, x: f64, y: f64) -> Result<Option<String>, JsValue> {
        let kind = parse_chart(chart)?;
        Ok(self
            .inner
            .dashboard
            .borrow()
            .tooltip(kind, (x, y))
            .map(str::to_owned))
    }
}

impl Inner {
    fn redraw(&self, kind: ChartKind) {
        let canvas = match kind {
            ChartKind::Map => &self.canvases.map,
            ChartKind::Bar => &self.canvases.bar,
            ChartKind::Donut => &self.canvases.donut,
        };
        let dashboard = self.dashboard.borrow();
        if let Err(e) = draw_chart(canvas.clone(), dashboard.scene().chart(kind)) {
            console::error_1(&e);
        }
    }
}

/// Runs each request in the background and redraws its chart once applied.
fn spawn(inner: &Rc<Inner>, requests: Vec<Request>) {
    for request in requests {
        let inner = Rc::clone(inner);
        spawn_local(async move {
            let fetched = fetch(&inner.source, &request.path).await;
            let outcome = inner.dashboard.borrow_mut().complete(&request, fetched);
            match outcome {
                Outcome::Applied => inner.redraw(request.chart),
                Outcome::Stale => (),
                Outcome::Failed(e) => {
                    report(&format!("{e}"));
                }
            }
        });
    }
}

fn parse_chart(chart: &str) -> Result<ChartKind, JsValue> {
    match chart {
        "map" => Ok(ChartKind::Map),
        "bar" => Ok(ChartKind::Bar),
        "donut" => Ok(ChartKind::Donut),
        x => Err(format!("Unknown chart: {x}").into()),
    }
}

fn report(message: &str) -> JsValue {
    let value = JsValue::from_str(message);
    console::error_1(&value);
    value
}
