use dashboard::plot::plot_chart;
use dashboard::scene::Chart;
use plotters::prelude::*;
use plotters_canvas::CanvasBackend;
use wasm_bindgen::JsValue;
use web_sys::HtmlCanvasElement;

/// Clears the canvas and draws the chart on it.
pub fn draw_chart(canvas: HtmlCanvasElement, chart: &Chart) -> Result<(), JsValue> {
    let backend = CanvasBackend::with_canvas_object(canvas).ok_or("Failed to create backend")?;

    let root = backend.into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| format!("Failed to clear background: {e:?}"))?;
    plot_chart(&root, chart).map_err(|e| format!("Failed to draw chart: {e:#}"))?;
    root.present()
        .map_err(|e| format!("Failed to present chart: {e:?}"))?;
    Ok(())
}
