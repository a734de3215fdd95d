//! HTTP server for the interactive dashboard
//!
//! `needledrop serve ./data` → loads the dataset, starts a local server,
//! opens the browser. The browser side is a thin drawing layer: all
//! aggregation, selection state and cross-view coordination run here, and
//! every user gesture round-trips through `/api/gesture`.

use crate::aggregate::{stack_max, BarSegment, ScatterPoint};
use crate::data;
use crate::selection::{Mode, Segment};
use crate::views::{AlbumRow, Dashboard, Gesture, LegendCell, SeriesPoint, SourceErrors};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tiny_http::{Header, Method, Request, Response, Server};

// Embed the UI directly in the binary
const UI_HTML: &str = include_str!("ui.html");

#[derive(Serialize)]
struct HistogramPayload {
    mode: Mode,
    legend: Vec<LegendCell>,
    bars: Vec<BarSegment>,
    max: f64,
    active_segment: Option<Segment>,
}

#[derive(Serialize)]
struct ScatterPayload {
    mode: Mode,
    legend: Vec<LegendCell>,
    points: Vec<ScatterPoint>,
}

#[derive(Serialize)]
struct LinePayload {
    title: String,
    series: Vec<SeriesPoint>,
}

#[derive(Serialize)]
struct ListPayload {
    title: String,
    rows: Vec<AlbumRow>,
}

/// Everything the page needs to redraw, derived fresh from dashboard state
/// on every request. Absent sections mean the backing source failed to
/// load; `errors` says why.
#[derive(Serialize)]
struct StatePayload {
    theme: crate::palette::Theme,
    end_date: Option<String>,
    review_count: usize,
    rejected_reviews: usize,
    errors: SourceErrors,
    histogram: Option<HistogramPayload>,
    scatter: Option<ScatterPayload>,
    line_chart: Option<LinePayload>,
    album_list: Option<ListPayload>,
}

impl StatePayload {
    fn capture(dash: &Dashboard) -> Self {
        let histogram = dash.histogram.as_ref().map(|h| {
            let bars = h.layout();
            HistogramPayload {
                mode: h.state().mode,
                legend: h.legend(),
                max: stack_max(&bars),
                active_segment: h.state().active_segment.clone(),
                bars,
            }
        });
        let scatter = dash.scatter.as_ref().map(|s| ScatterPayload {
            mode: s.state().mode,
            legend: s.legend(),
            points: s.points(),
        });
        let line_chart = dash.line_chart.as_ref().map(|l| {
            let l = l.borrow();
            LinePayload {
                title: l.title().to_string(),
                series: l.series().to_vec(),
            }
        });
        let album_list = dash.album_list.as_ref().map(|a| {
            let a = a.borrow();
            ListPayload {
                title: a.title().to_string(),
                rows: a.rows().to_vec(),
            }
        });
        Self {
            theme: dash.theme,
            end_date: dash.end_date.clone(),
            review_count: dash.review_count,
            rejected_reviews: dash.rejected_reviews,
            errors: dash.errors.clone(),
            histogram,
            scatter,
            line_chart,
            album_list,
        }
    }
}

/// One gesture as query parameters, e.g.
/// `/api/gesture?view=histogram&gesture=segment&genre=Rock&score=7.5`.
#[derive(Deserialize, Debug)]
struct GestureParams {
    view: String,
    gesture: String,
    genre: Option<String>,
    score: Option<f64>,
    label: Option<String>,
}

impl GestureParams {
    fn into_gesture(self) -> Result<Gesture, String> {
        let genre = || self.genre.clone().ok_or("missing genre".to_string());
        let label = || self.label.clone().ok_or("missing label".to_string());
        match (self.view.as_str(), self.gesture.as_str()) {
            ("histogram", "segment") => Ok(Gesture::SegmentClick {
                genre: genre()?,
                score: self.score.ok_or("missing score")?,
            }),
            ("histogram", "legend") => Ok(Gesture::HistogramLegendClick { genre: genre()? }),
            ("scatter", "legend") => Ok(Gesture::ScatterLegendClick { genre: genre()? }),
            ("scatter", "point") => Ok(Gesture::PointClick { label: label()? }),
            ("scatter", "hover") => Ok(Gesture::PointHover { label: label()? }),
            ("app", "theme") => Ok(Gesture::ThemeToggle),
            (view, gesture) => Err(format!("unknown gesture {view}/{gesture}")),
        }
    }
}

/// Load the dataset, start the server, open the browser.
pub fn start(port: u16, data_dir: PathBuf, count_cutoff: u32) -> std::io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let sources = data::load_dir(&data_dir);
    let mut dashboard = Dashboard::new(sources, count_cutoff);

    let url = format!("http://localhost:{}", port);
    eprintln!("\n\x1b[1;32m♪ Needledrop\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Data: {}\n", data_dir.display());
    if let Some(e) = &dashboard.errors.reviews {
        eprintln!("   \x1b[33mreviews unavailable:\x1b[0m {}", e);
    }
    if let Some(e) = &dashboard.errors.labels {
        eprintln!("   \x1b[33mlabels unavailable:\x1b[0m {}", e);
    }

    let _ = open::that(&url);

    // Gestures arrive at human timescale; one thread is plenty and keeps
    // the dashboard free of locks.
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(&mut dashboard, request) {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}

fn handle_request(dashboard: &mut Dashboard, request: Request) -> std::io::Result<()> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("/");
    let method = request.method().clone();

    match (&method, path) {
        (&Method::Get, "/") => {
            let response = Response::from_string(UI_HTML).with_header(
                Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]).unwrap(),
            );
            request.respond(response)
        }

        (&Method::Get, "/api/state") => respond_state(dashboard, request),

        (&Method::Get, "/api/gesture") | (&Method::Post, "/api/gesture") => {
            let applied = parse_gesture(&url)
                .and_then(|g| dashboard.apply_gesture(g));
            match applied {
                Ok(()) => respond_state(dashboard, request),
                Err(reason) => {
                    let body = serde_json::to_string(&serde_json::json!({ "error": reason }))?;
                    let response = Response::from_string(body)
                        .with_status_code(400)
                        .with_header(
                            Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                                .unwrap(),
                        );
                    request.respond(response)
                }
            }
        }

        _ => {
            let response = Response::from_string("Not found").with_status_code(404);
            request.respond(response)
        }
    }
}

fn parse_gesture(url: &str) -> Result<Gesture, String> {
    let query = url.split('?').nth(1).unwrap_or("");
    let params: GestureParams =
        serde_urlencoded::from_str(query).map_err(|e| format!("bad gesture query: {e}"))?;
    params.into_gesture()
}

fn respond_state(dashboard: &Dashboard, request: Request) -> std::io::Result<()> {
    let json = serde_json::to_string(&StatePayload::capture(dashboard))?;
    let response = Response::from_string(json).with_header(
        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
    );
    request.respond(response)
}
