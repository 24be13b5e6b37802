// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! Figures with interchangeable rendering backends.
//!
//! A [`Fig`] owns its series (scatter clouds and lines) and knows nothing about how it
//! is drawn; `plot()` hands it to the [`Viewer`] chosen at construction:
//! - `plotters` - PNG bitmap drawn with the plotters crate (default)
//! - `gnuplot`  - PNG produced by the gnuplot executable
//! - `csv`      - every series dumped as `series,kind,x,y` rows
//!
//! Series are addressed by the [`SeriesHandle`] returned when they are added, and
//! redrawn after `update(handle, x, y)` followed by `plot()`.
use enum_dispatch::enum_dispatch;
use log::{debug, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug)]
pub enum PlotError {
    UnknownSeries(usize),
    LengthMismatch { x: usize, y: usize },
    Render(String),
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlotError::UnknownSeries(id) => write!(f, "No series with handle {}", id),
            PlotError::LengthMismatch { x, y } => {
                write!(f, "x and y must have the same length, got {} and {}", x, y)
            }
            PlotError::Render(msg) => write!(f, "Rendering failed: {}", msg),
            PlotError::Io(err) => write!(f, "{}", err),
            PlotError::Csv(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PlotError {}

impl From<std::io::Error> for PlotError {
    fn from(err: std::io::Error) -> Self {
        PlotError::Io(err)
    }
}

impl From<csv::Error> for PlotError {
    fn from(err: csv::Error) -> Self {
        PlotError::Csv(err)
    }
}

fn render_error<E: fmt::Display>(err: E) -> PlotError {
    PlotError::Render(err.to_string())
}

////////////////////////////////////////////////////////////////////////////////
//                              STYLES
////////////////////////////////////////////////////////////////////////////////
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Marker {
    #[default]
    #[strum(serialize = "circle", serialize = "circle_x", serialize = "circle_cross", serialize = "o", serialize = "ox", serialize = "o+")]
    Circle,
    #[strum(serialize = "triangle", serialize = "inverted_triangle", serialize = "^", serialize = "v")]
    Triangle,
    #[strum(serialize = "cross", serialize = "asterisk", serialize = "x", serialize = "*", serialize = "p")]
    Cross,
}

impl Marker {
    /// marker from its name, circle if the name is not known
    pub fn from_name(name: &str) -> Marker {
        Marker::from_str(name).unwrap_or_else(|_| {
            debug!("marker '{}' is not supported, circle is used", name);
            Marker::Circle
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterStyle {
    pub color: String,
    pub marker: Marker,
    pub size: u32,
    pub alpha: f64,
}

impl Default for ScatterStyle {
    fn default() -> Self {
        ScatterStyle {
            color: "black".to_string(),
            marker: Marker::Circle,
            size: 10,
            alpha: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: u32,
    pub alpha: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle {
            color: "black".to_string(),
            width: 2,
            alpha: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleStyle {
    pub color: String,
    pub size: u32,
}

impl Default for TitleStyle {
    fn default() -> Self {
        TitleStyle {
            color: "black".to_string(),
            size: 20,
        }
    }
}

/// RGB triple of a color name or of a `#rrggbb` string; unknown names give black
pub fn rgb_triple(name: &str) -> (u8, u8, u8) {
    let name = name.trim().to_ascii_lowercase();
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() == 6 {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            if let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) {
                return (r, g, b);
            }
        }
    }
    match name.as_str() {
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "orange" => (255, 165, 0),
        "navy" => (0, 0, 128),
        "gray" | "grey" => (128, 128, 128),
        "cyan" => (0, 255, 255),
        "magenta" => (255, 0, 255),
        "yellow" => (255, 255, 0),
        "black" => (0, 0, 0),
        other => {
            debug!("unknown color '{}', black is used", other);
            (0, 0, 0)
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
//                              FIGURE
////////////////////////////////////////////////////////////////////////////////
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesKind {
    Scatter(ScatterStyle),
    Line(LineStyle),
}

impl SeriesKind {
    pub fn label(&self) -> &'static str {
        match self {
            SeriesKind::Scatter(_) => "scatter",
            SeriesKind::Line(_) => "line",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub kind: SeriesKind,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Series {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// index of a series inside its figure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesHandle(usize);

impl SeriesHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigOptions {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Default for FigOptions {
    fn default() -> Self {
        FigOptions {
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
            x_label: None,
            y_label: None,
            width: 450,
            height: 300,
        }
    }
}

pub struct Fig {
    options: FigOptions,
    title: Option<(String, TitleStyle)>,
    series: Vec<Series>,
    viewer: Viewer,
}

impl Fig {
    pub fn new(viewer: Viewer, options: FigOptions) -> Fig {
        Fig {
            options,
            title: None,
            series: Vec::new(),
            viewer,
        }
    }

    pub fn title(&mut self, text: &str, style: TitleStyle) {
        self.title = Some((text.to_string(), style));
    }

    pub fn scatter(&mut self, x: &[f64], y: &[f64], style: ScatterStyle) -> Result<SeriesHandle, PlotError> {
        self.push_series(SeriesKind::Scatter(style), x, y)
    }

    pub fn line(&mut self, x: &[f64], y: &[f64], style: LineStyle) -> Result<SeriesHandle, PlotError> {
        self.push_series(SeriesKind::Line(style), x, y)
    }

    /// Replaces the points of a series; the style is kept.
    pub fn update(&mut self, handle: SeriesHandle, x: &[f64], y: &[f64]) -> Result<(), PlotError> {
        check_lengths(x, y)?;
        let series = self
            .series
            .get_mut(handle.0)
            .ok_or(PlotError::UnknownSeries(handle.0))?;
        series.x = x.to_vec();
        series.y = y.to_vec();
        Ok(())
    }

    /// renders the figure with its viewer
    pub fn plot(&self) -> Result<(), PlotError> {
        debug!(
            "rendering {} series with the {} viewer",
            self.series.len(),
            self.viewer.kind()
        );
        self.viewer.render(self)
    }

    pub fn options(&self) -> &FigOptions {
        &self.options
    }
    pub fn title_spec(&self) -> Option<&(String, TitleStyle)> {
        self.title.as_ref()
    }
    pub fn series(&self, handle: SeriesHandle) -> Option<&Series> {
        self.series.get(handle.0)
    }
    pub fn all_series(&self) -> &[Series] {
        &self.series
    }
    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    fn push_series(&mut self, kind: SeriesKind, x: &[f64], y: &[f64]) -> Result<SeriesHandle, PlotError> {
        check_lengths(x, y)?;
        self.series.push(Series {
            kind,
            x: x.to_vec(),
            y: y.to_vec(),
        });
        Ok(SeriesHandle(self.series.len() - 1))
    }
}

fn check_lengths(x: &[f64], y: &[f64]) -> Result<(), PlotError> {
    if x.len() != y.len() {
        return Err(PlotError::LengthMismatch { x: x.len(), y: y.len() });
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
//                              VIEWERS
////////////////////////////////////////////////////////////////////////////////
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ViewerKind {
    #[default]
    Plotters,
    Gnuplot,
    Csv,
}

impl ViewerKind {
    /// Resolves a viewer name. An unknown name is not an error: the default viewer is
    /// used and the allowed names are reported.
    pub fn from_name_or_default(name: &str) -> ViewerKind {
        match ViewerKind::from_str(name.trim()) {
            Ok(kind) => kind,
            Err(_) => {
                let default = ViewerKind::default();
                let allowed = ViewerKind::iter()
                    .map(|kind| kind.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                warn!(
                    "Unknown viewer '{}' ({} by default). The allowed viewers are: {}",
                    name, default, allowed
                );
                println!("Unknown viewer ({} by default)", default);
                println!("The allowed viewers are:");
                for kind in ViewerKind::iter() {
                    println!("\t{}", kind);
                }
                default
            }
        }
    }
}

#[enum_dispatch]
pub trait FigureRenderer {
    fn render(&self, fig: &Fig) -> Result<(), PlotError>;
    fn kind(&self) -> ViewerKind;
    fn output(&self) -> &Path;
}

#[enum_dispatch(FigureRenderer)]
#[derive(Debug, Clone, PartialEq)]
pub enum Viewer {
    PlottersViewer,
    GnuplotViewer,
    CsvViewer,
}

impl Viewer {
    pub fn new(kind: ViewerKind, output: impl Into<PathBuf>) -> Viewer {
        let output = output.into();
        match kind {
            ViewerKind::Plotters => PlottersViewer { output }.into(),
            ViewerKind::Gnuplot => GnuplotViewer { output }.into(),
            ViewerKind::Csv => CsvViewer { output }.into(),
        }
    }

    /// viewer by name, falling back to the default one for unknown names
    pub fn from_name(name: &str, output: impl Into<PathBuf>) -> Viewer {
        Viewer::new(ViewerKind::from_name_or_default(name), output)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlottersViewer {
    pub output: PathBuf,
}

impl FigureRenderer for PlottersViewer {
    fn render(&self, fig: &Fig) -> Result<(), PlotError> {
        use plotters::prelude::*;
        let opts = fig.options();
        let root = BitMapBackend::new(&self.output, (opts.width, opts.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(10).x_label_area_size(30).y_label_area_size(40);
        if let Some((text, style)) = fig.title_spec() {
            let (r, g, b) = rgb_triple(&style.color);
            builder.caption(text, ("sans-serif", style.size).into_font().color(&RGBColor(r, g, b)));
        }
        let mut chart = builder
            .build_cartesian_2d(opts.x_range.0..opts.x_range.1, opts.y_range.0..opts.y_range.1)
            .map_err(render_error)?;
        {
            let mut mesh = chart.configure_mesh();
            mesh.disable_mesh();
            if let Some(label) = &opts.x_label {
                mesh.x_desc(label.as_str());
            }
            if let Some(label) = &opts.y_label {
                mesh.y_desc(label.as_str());
            }
            mesh.draw().map_err(render_error)?;
        }

        for series in fig.all_series() {
            match &series.kind {
                SeriesKind::Scatter(style) => {
                    let (r, g, b) = rgb_triple(&style.color);
                    let shape = RGBColor(r, g, b).mix(style.alpha).filled();
                    let size = style.size;
                    match style.marker {
                        Marker::Circle => {
                            chart
                                .draw_series(series.points().map(|p| Circle::new(p, size, shape)))
                                .map_err(render_error)?;
                        }
                        Marker::Triangle => {
                            chart
                                .draw_series(series.points().map(|p| TriangleMarker::new(p, size, shape)))
                                .map_err(render_error)?;
                        }
                        Marker::Cross => {
                            chart
                                .draw_series(series.points().map(|p| Cross::new(p, size, shape)))
                                .map_err(render_error)?;
                        }
                    }
                }
                SeriesKind::Line(style) => {
                    let (r, g, b) = rgb_triple(&style.color);
                    let stroke = RGBColor(r, g, b).mix(style.alpha).stroke_width(style.width);
                    chart
                        .draw_series(LineSeries::new(series.points(), stroke))
                        .map_err(render_error)?;
                }
            }
        }
        root.present().map_err(render_error)?;
        Ok(())
    }
    fn kind(&self) -> ViewerKind {
        ViewerKind::Plotters
    }
    fn output(&self) -> &Path {
        &self.output
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GnuplotViewer {
    pub output: PathBuf,
}

impl FigureRenderer for GnuplotViewer {
    fn render(&self, fig: &Fig) -> Result<(), PlotError> {
        use gnuplot::{AutoOption, AxesCommon, Color, Figure, LineWidth, PointSize, PointSymbol};
        let opts = fig.options();
        let mut fg = Figure::new();
        {
            let axes = fg.axes2d();
            axes.set_x_range(AutoOption::Fix(opts.x_range.0), AutoOption::Fix(opts.x_range.1));
            axes.set_y_range(AutoOption::Fix(opts.y_range.0), AutoOption::Fix(opts.y_range.1));
            if let Some((text, _style)) = fig.title_spec() {
                axes.set_title(text, &[]);
            }
            if let Some(label) = &opts.x_label {
                axes.set_x_label(label, &[]);
            }
            if let Some(label) = &opts.y_label {
                axes.set_y_label(label, &[]);
            }
            for series in fig.all_series() {
                match &series.kind {
                    SeriesKind::Scatter(style) => {
                        let symbol = match style.marker {
                            Marker::Circle => 'O',
                            Marker::Triangle => 'T',
                            Marker::Cross => 'x',
                        };
                        axes.points(
                            &series.x,
                            &series.y,
                            &[
                                PointSymbol(symbol),
                                PointSize(style.size as f64 / 5.0),
                                Color(style.color.as_str().into()),
                            ],
                        );
                    }
                    SeriesKind::Line(style) => {
                        axes.lines(
                            &series.x,
                            &series.y,
                            &[LineWidth(style.width as f64), Color(style.color.as_str().into())],
                        );
                    }
                }
            }
        }
        fg.save_to_png(&self.output, opts.width, opts.height)
            .map_err(render_error)?;
        Ok(())
    }
    fn kind(&self) -> ViewerKind {
        ViewerKind::Gnuplot
    }
    fn output(&self) -> &Path {
        &self.output
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsvViewer {
    pub output: PathBuf,
}

impl FigureRenderer for CsvViewer {
    fn render(&self, fig: &Fig) -> Result<(), PlotError> {
        let mut writer = csv::Writer::from_path(&self.output)?;
        writer.write_record(["series", "kind", "x", "y"])?;
        for (id, series) in fig.all_series().iter().enumerate() {
            for (x, y) in series.points() {
                writer.write_record(&[
                    id.to_string(),
                    series.kind.label().to_string(),
                    x.to_string(),
                    y.to_string(),
                ])?;
            }
        }
        writer.flush()?;
        Ok(())
    }
    fn kind(&self) -> ViewerKind {
        ViewerKind::Csv
    }
    fn output(&self) -> &Path {
        &self.output
    }
}
