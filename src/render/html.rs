use crate::Result;
use crate::curve::Curve;
use crate::render::ChartSpec;
use serde::Serialize;

#[derive(Serialize)]
struct ChartData<'a> {
    x_label: &'a str,
    y_label: &'a str,
    legend: bool,
    curve: &'a Curve,
}

/// Render one curve as a self-contained HTML chart: the data embedded as
/// JSON, drawn client-side as inline SVG. No server, no external assets.
///
/// Important: we avoid `format!()` because the template contains JS
/// template literals (e.g. `${x}`), which would conflict with Rust
/// formatting.
pub fn render_chart_html(curve: &Curve, spec: &ChartSpec) -> Result<String> {
    let json = serde_json::to_string(&ChartData {
        x_label: &spec.x_label,
        y_label: &spec.y_label,
        legend: spec.legend,
        curve,
    })?;

    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Benchmark Curve</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .main { padding: 16px; }
  svg { background: white; }
  table { border-collapse: collapse; margin-top: 16px; }
  th, td { border-bottom: 1px solid #eee; padding: 6px 10px; text-align: right; font-size: 14px; }
  th { border-bottom: 1px solid #ddd; }
  th:first-child, td:first-child { text-align: left; }
  .num { font-variant-numeric: tabular-nums; }
</style>
</head>
<body>
<header>
  <b id="title"></b>
</header>

<div class="main">
  <svg id="chart" width="760" height="420" viewBox="0 0 760 420"></svg>
  <table id="values">
    <thead><tr id="valuesHead"></tr></thead>
    <tbody id="valuesBody"></tbody>
  </table>
</div>

<script>
// Embedded chart data (JSON object literal)
const DATA = __DATA__;

const SVG_NS = "http://www.w3.org/2000/svg";
const W = 760, H = 420;
const MARGIN = { left: 70, right: 20, top: 20, bottom: 55 };
const PALETTE = ["steelblue", "crimson", "seagreen", "darkorange", "rebeccapurple", "sienna"];

function el(name, attrs) {
  const node = document.createElementNS(SVG_NS, name);
  for (const [k, v] of Object.entries(attrs)) node.setAttribute(k, v);
  return node;
}

function fmt(v) {
  return (Math.round(v * 1000) / 1000).toString();
}

function drawChart() {
  const svg = document.getElementById("chart");
  const xs = DATA.curve.x_values;
  const series = DATA.curve.series;

  const innerW = W - MARGIN.left - MARGIN.right;
  const innerH = H - MARGIN.top - MARGIN.bottom;

  let yMax = 0;
  for (const s of series) for (const v of s.values) yMax = Math.max(yMax, v);
  if (yMax === 0) yMax = 1;

  // x positions are categorical: the sweep order, evenly spaced
  const xPos = (i) => MARGIN.left + (xs.length === 1 ? innerW / 2 : i * innerW / (xs.length - 1));
  const yPos = (v) => MARGIN.top + innerH - (v / yMax) * innerH;

  // gridlines + y ticks
  const steps = 5;
  for (let i = 0; i <= steps; i++) {
    const v = yMax * i / steps;
    const py = yPos(v);
    svg.appendChild(el("line", { x1: MARGIN.left, y1: py, x2: MARGIN.left + innerW, y2: py, stroke: "gainsboro" }));
    svg.appendChild(el("line", { x1: MARGIN.left - 5, y1: py, x2: MARGIN.left, y2: py, stroke: "black" }));
    const label = el("text", { x: MARGIN.left - 8, y: py + 4, "text-anchor": "end", "font-size": 12 });
    label.textContent = fmt(v);
    svg.appendChild(label);
  }

  // axes
  svg.appendChild(el("line", { x1: MARGIN.left, y1: MARGIN.top + innerH, x2: MARGIN.left + innerW, y2: MARGIN.top + innerH, stroke: "black" }));
  svg.appendChild(el("line", { x1: MARGIN.left, y1: MARGIN.top, x2: MARGIN.left, y2: MARGIN.top + innerH, stroke: "black" }));

  // x ticks: one per sweep value
  xs.forEach((x, i) => {
    const px = xPos(i);
    svg.appendChild(el("line", { x1: px, y1: MARGIN.top + innerH, x2: px, y2: MARGIN.top + innerH + 5, stroke: "black" }));
    const label = el("text", { x: px, y: MARGIN.top + innerH + 20, "text-anchor": "middle", "font-size": 12 });
    label.textContent = x;
    svg.appendChild(label);
  });

  // axis labels
  const xl = el("text", { x: MARGIN.left + innerW / 2, y: H - 10, "text-anchor": "middle", "font-size": 14 });
  xl.textContent = DATA.x_label;
  svg.appendChild(xl);
  const ylY = MARGIN.top + innerH / 2;
  const yl = el("text", { x: 16, y: ylY, "text-anchor": "middle", "font-size": 14, transform: `rotate(-90 16 ${ylY})` });
  yl.textContent = DATA.y_label;
  svg.appendChild(yl);

  // one polyline + markers per series
  series.forEach((s, si) => {
    const color = PALETTE[si % PALETTE.length];
    const pts = s.values.map((v, i) => `${xPos(i)},${yPos(v)}`).join(" ");
    svg.appendChild(el("polyline", { points: pts, fill: "none", stroke: color, "stroke-width": 2 }));
    s.values.forEach((v, i) => {
      svg.appendChild(el("circle", { cx: xPos(i), cy: yPos(v), r: 3.5, fill: color }));
    });
  });

  if (DATA.legend) {
    series.forEach((s, si) => {
      const color = PALETTE[si % PALETTE.length];
      const y = MARGIN.top + 10 + si * 18;
      svg.appendChild(el("line", { x1: MARGIN.left + 12, y1: y, x2: MARGIN.left + 36, y2: y, stroke: color, "stroke-width": 2 }));
      const label = el("text", { x: MARGIN.left + 42, y: y + 4, "font-size": 13 });
      label.textContent = s.name;
      svg.appendChild(label);
    });
  }
}

function fillTable() {
  const head = document.getElementById("valuesHead");
  const th = document.createElement("th");
  th.textContent = DATA.x_label;
  head.appendChild(th);
  for (const s of DATA.curve.series) {
    const cell = document.createElement("th");
    cell.textContent = s.name;
    head.appendChild(cell);
  }

  const body = document.getElementById("valuesBody");
  DATA.curve.x_values.forEach((x, i) => {
    const tr = document.createElement("tr");
    const key = document.createElement("td");
    key.textContent = x;
    tr.appendChild(key);
    for (const s of DATA.curve.series) {
      const cell = document.createElement("td");
      cell.className = "num";
      cell.textContent = fmt(s.values[i]);
      tr.appendChild(cell);
    }
    body.appendChild(tr);
  });
}

document.getElementById("title").textContent = DATA.y_label + " vs. " + DATA.x_label;
drawChart();
fillTable();
</script>
</body>
</html>
"#;

    Ok(TEMPLATE.replace("__DATA__", &json))
}
