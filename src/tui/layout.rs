//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, Paragraph};

use super::runtime::{App, HistoryPoint};
use super::style;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // energy chart
            Constraint::Length(8), // cost chart
            Constraint::Length(3), // SOC gauge
            Constraint::Length(5), // status panel
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_energy_chart(frame, app, chunks[1]);
    render_cost_chart(frame, app, chunks[2]);
    render_soc_gauge(frame, app, chunks[3]);
    render_status(frame, app, chunks[4]);
    render_footer(frame, chunks[5]);
}

/// Header bar: configuration name, timestep progress, speed, run state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (state_icon, state_label) = if app.is_finished() {
        ("■", "DONE")
    } else if app.error.is_some() {
        ("✗", "FAILED")
    } else if app.paused {
        ("‖", "PAUSED")
    } else {
        ("▶", "RUNNING")
    };

    let header = Line::from(vec![
        Span::styled(
            " MICROGRID ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(&app.name, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " │ t={}/{} │ {}ms │ {} {} ",
            app.t(),
            app.max_timestep(),
            app.tick_interval_ms(),
            state_icon,
            state_label,
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn points(app: &App, value: impl Fn(&HistoryPoint) -> f32) -> Vec<(f64, f64)> {
    app.history
        .iter()
        .map(|p| (f64::from(p.t as u32), f64::from(value(p))))
        .collect()
}

fn line<'a>(name: &'a str, color: Color, data: &'a [(f64, f64)]) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(color))
        .data(data)
}

/// Builds a chart scaled to fit every series in `all`.
fn chart<'a>(
    title: &'a str,
    unit: &'a str,
    datasets: Vec<Dataset<'a>>,
    all: &[&[(f64, f64)]],
) -> Chart<'a> {
    let y_bounds = style::auto_bounds_y(all);
    let x_lo = all.first().and_then(|s| s.first()).map_or(0.0, |p| p.0);
    let x_hi = all
        .first()
        .and_then(|s| s.last())
        .map_or(1.0, |p| p.0)
        .max(x_lo + 1.0);

    Chart::new(datasets)
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("step")
                .bounds([x_lo, x_hi])
                .labels(vec![format!("{}", x_lo as u32), format!("{}", x_hi as u32)]),
        )
        .y_axis(
            Axis::default()
                .title(unit)
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        )
}

/// Load, production and dispatch chart.
fn render_energy_chart(frame: &mut Frame, app: &App, area: Rect) {
    let load = points(app, |p| p.load);
    let pv = points(app, |p| p.pv);
    let grid = points(app, |p| p.grid);
    let battery = points(app, |p| p.battery);

    let datasets = vec![
        line("Load", style::LOAD_COLOR, &load),
        line("PV", style::PV_COLOR, &pv),
        line("Grid", style::GRID_COLOR, &grid),
        line("Battery", style::BATTERY_COLOR, &battery),
    ];
    let widget = chart(
        " Energy Flows ",
        "energy",
        datasets,
        &[
            load.as_slice(),
            pv.as_slice(),
            grid.as_slice(),
            battery.as_slice(),
        ],
    );
    frame.render_widget(widget, area);
}

/// Step cost chart.
fn render_cost_chart(frame: &mut Frame, app: &App, area: Rect) {
    let cost = points(app, |p| p.cost);
    let widget = chart(
        " Step Cost ",
        "cost",
        vec![line("Total", style::COST_COLOR, &cost)],
        &[cost.as_slice()],
    );
    frame.render_widget(widget, area);
}

/// Battery SOC gauge.
fn render_soc_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let soc = app.battery_soc();
    let (low, high) = app.soc_band();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!(" SOC (band {:.0}%–{:.0}%) ", low * 100.0, high * 100.0))
                .borders(Borders::ALL),
        )
        .gauge_style(Style::default().fg(style::soc_color(soc, (low, high))))
        .ratio(f64::from(soc).clamp(0.0, 1.0))
        .label(format!("{:.0}%", soc * 100.0));
    frame.render_widget(gauge, area);
}

/// Status panel showing the latest step and the cumulated cost.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = if let Some(p) = app.last_point() {
        vec![
            Line::from(format!(
                "  load={:>9.2}  pv={:>9.2}  grid={:>10.2}  bat={:>10.2}",
                p.load, p.pv, p.grid, p.battery,
            )),
            Line::from(format!(
                "  balance={:>10.2}  cost={:>10.2}  cumulated={:.2}",
                p.balance, p.cost, app.cumulative_cost,
            )),
        ]
    } else {
        vec![Line::from("  Waiting for first step...")]
    };
    if let Some(e) = &app.error {
        lines.push(Line::from(Span::styled(
            format!("  {e}"),
            Style::default().fg(style::ERROR_FG),
        )));
    }

    let block = Block::default().title(" Status ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Space:Pause  +/-:Speed  1/2:Preset  r:Restart",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
