//! Colored console output for solver events.
//!
//! Provides a `tracing` layer that renders the structured events emitted by
//! `slotplan-solver` as one line each.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve, phase and job start/end)
//! - **DEBUG**: New best solutions and periodic progress summaries
//! - **TRACE**: Individual steps

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVES: &str = "slotplan_solver=info";

/// Initializes the solver console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and installs a global subscriber unless one exists.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

// Marks the start of solving for elapsed time tracking.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
     _       _         _
 ___| | ___ | |_ _ __ | | __ _ _ __
/ __| |/ _ \| __| '_ \| |/ _` | '_ \
\__ \ | (_) | |_| |_) | | (_| | | | |
|___/_|\___/ \__| .__/|_|\__,_|_| |_|
                |_|
"#;

    let version_line = format!("        v{} - Rider-Day Slot Assignment\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !target.starts_with("slotplan_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let level = *metadata.level();
        let output = format_event(&visitor, level);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    job: Option<String>,
    status: Option<String>,
    error: Option<String>,
    score: Option<String>,
    best: Option<String>,
    improvement: Option<String>,
    assignment_rate: Option<String>,
    solutions_per_second: Option<String>,
    bucket: Option<String>,
    candidate: Option<String>,
    phase_index: Option<u64>,
    steps: Option<u64>,
    step: Option<u64>,
    order: Option<u64>,
    accepted: Option<u64>,
    duration_ms: Option<u64>,
    elapsed_ms: Option<u64>,
    order_count: Option<u64>,
    bucket_count: Option<u64>,
    rider_count: Option<u64>,
    phase_count: Option<u64>,
    moves_evaluated: Option<u64>,
    unassigned: Option<u64>,
    assigned: Option<u64>,
    total: Option<u64>,
    solutions: Option<u64>,
    terminated_early: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        self.record_text(field, s);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "phase_index" => &mut self.phase_index,
            "steps" => &mut self.steps,
            "step" => &mut self.step,
            "order" => &mut self.order,
            "accepted" => &mut self.accepted,
            "duration_ms" => &mut self.duration_ms,
            "elapsed_ms" => &mut self.elapsed_ms,
            "order_count" => &mut self.order_count,
            "bucket_count" => &mut self.bucket_count,
            "rider_count" => &mut self.rider_count,
            "phase_count" => &mut self.phase_count,
            "moves_evaluated" => &mut self.moves_evaluated,
            "unassigned" => &mut self.unassigned,
            "assigned" => &mut self.assigned,
            "total" => &mut self.total,
            "solutions" | "solution" => &mut self.solutions,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "terminated_early" {
            self.terminated_early = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }
}

impl EventVisitor {
    fn record_text(&mut self, field: &Field, value: String) {
        let slot = match field.name() {
            "event" => &mut self.event,
            "phase" => &mut self.phase,
            "job" => &mut self.job,
            "status" => &mut self.status,
            "error" => &mut self.error,
            "score" => &mut self.score,
            "best" => &mut self.best,
            "improvement" => &mut self.improvement,
            "assignment_rate" => &mut self.assignment_rate,
            "solutions_per_second" => &mut self.solutions_per_second,
            "bucket" => &mut self.bucket,
            "candidate" => &mut self.candidate,
            _ => return,
        };
        *slot = Some(value);
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "new_best" => format_new_best(v),
        "progress_summary" => format_progress_summary(v),
        "job_start" | "job_end" => format_job(v, event),
        "step" => format_step(v, level),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    let orders = v.order_count.unwrap_or(0);
    let buckets = v.bucket_count.unwrap_or(0);
    let scale = calculate_problem_scale(orders as usize, buckets as usize);

    format!(
        "{} {} Solving │ {} orders │ {} buckets │ {} riders │ {} phases │ scale {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.order_count).bright_yellow(),
        count(v.bucket_count).bright_yellow(),
        count(v.rider_count).bright_yellow(),
        count(v.phase_count).bright_yellow(),
        scale.bright_magenta()
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let score = v.score.as_deref().unwrap_or("N/A");
    let unassigned = v.unassigned.unwrap_or(0);
    let feasible = is_feasible(score);

    let status = if feasible {
        "FEASIBLE".bright_green().bold().to_string()
    } else {
        "INFEASIBLE".bright_red().bold().to_string()
    };

    let mut output = format!(
        "{} {} Solving complete │ {} │ {} │ {} steps │ {} moves",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_score(score),
        status,
        count(v.steps).white(),
        count(v.moves_evaluated).white(),
    );
    if unassigned > 0 {
        output.push_str(&format!(
            " │ {} unassigned",
            unassigned.to_formatted_string(&Locale::en).bright_red()
        ));
    }
    if v.terminated_early == Some(true) {
        output.push_str(&format!(" │ {}", "stopped early".yellow()));
    }
    output
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");

    format!(
        "{} {} {} #{} started",
        format_elapsed(),
        "▶".bright_blue(),
        phase.white().bold(),
        v.phase_index.unwrap_or(0)
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    let score = v.score.as_deref().unwrap_or("N/A");
    let duration = v.duration_ms.unwrap_or(0);
    let moves = v.moves_evaluated.unwrap_or(0);
    let moves_speed = if duration > 0 {
        moves * 1000 / duration
    } else {
        moves
    };

    format!(
        "{} {} {} ended │ {} │ {} steps │ {} moves/s │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        phase.white().bold(),
        format_duration_ms(duration).yellow(),
        count(v.steps).white(),
        moves_speed
            .to_formatted_string(&Locale::en)
            .bright_magenta()
            .bold(),
        format_score(score)
    )
}

fn format_new_best(v: &EventVisitor) -> String {
    let score = v.score.as_deref().unwrap_or("N/A");
    format!(
        "{} {} New best │ {}",
        format_elapsed(),
        "★".bright_yellow(),
        format_score(score)
    )
}

fn format_progress_summary(v: &EventVisitor) -> String {
    let best = v.best.as_deref().unwrap_or("N/A");
    format!(
        "{} {} {} solutions │ {}/{} assigned ({}) │ {}/s │ {}",
        format_elapsed(),
        "⚡".bright_cyan(),
        count(v.solutions).white(),
        count(v.assigned).bright_yellow(),
        count(v.total).bright_yellow(),
        v.assignment_rate.as_deref().unwrap_or("-"),
        v.solutions_per_second
            .as_deref()
            .unwrap_or("-")
            .bright_magenta(),
        format_score(best)
    )
}

fn format_job(v: &EventVisitor, event: &str) -> String {
    let job = v.job.as_deref().unwrap_or("job");
    if event == "job_start" {
        return format!("{} {} {} started", format_elapsed(), "●".bright_blue(), job.bold());
    }

    let status = v.status.as_deref().unwrap_or("Unknown");
    let tail = match (&v.error, &v.score) {
        (Some(error), _) => error.bright_red().to_string(),
        (None, Some(score)) => format_score(score),
        (None, None) => String::new(),
    };
    format!(
        "{} {} {} {} │ {}",
        format_elapsed(),
        "●".bright_blue(),
        job.bold(),
        status.white(),
        tail
    )
}

fn format_step(v: &EventVisitor, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }

    let score = v.score.as_deref().unwrap_or("N/A");
    let detail = match (v.order, &v.bucket, &v.candidate) {
        (Some(order), Some(bucket), _) => format!("Order {:>6} → {}", order, bucket),
        (_, _, Some(candidate)) => candidate.clone(),
        _ => String::new(),
    };

    format!(
        "{} {} Step {:>10} │ {} │ {}",
        format_elapsed(),
        "·".bright_black(),
        count(v.step).bright_black(),
        detail.bright_black(),
        format_score(score).bright_black()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

fn is_feasible(score: &str) -> bool {
    score
        .split('/')
        .find_map(|part| part.strip_suffix("hard"))
        .and_then(|hard| hard.parse::<i64>().ok())
        .is_some_and(|hard| hard >= 0)
}

fn format_score(score: &str) -> String {
    if !score.contains("hard") {
        return score.white().to_string();
    }

    score
        .split('/')
        .map(|part| {
            if let Some(init) = part.strip_suffix("init") {
                format!("{}init", init).bright_red().bold().to_string()
            } else if let Some(hard) = part.strip_suffix("hard") {
                let text = format!("{}hard", hard);
                if hard.starts_with('-') {
                    text.bright_red().to_string()
                } else {
                    text.bright_green().to_string()
                }
            } else if let Some(soft) = part.strip_suffix("soft") {
                let text = format!("{}soft", soft);
                match soft.parse::<i64>() {
                    Ok(n) if n < 0 => text.yellow().to_string(),
                    Ok(n) if n > 0 => text.bright_green().to_string(),
                    _ => text.white().to_string(),
                }
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

// Each order picks one of the buckets or none.
fn calculate_problem_scale(order_count: usize, bucket_count: usize) -> String {
    if order_count == 0 {
        return "0".to_string();
    }

    let log_scale = (order_count as f64) * ((bucket_count + 1) as f64).log10();
    let exponent = log_scale.floor() as i32;
    let mantissa = 10f64.powf(log_scale - exponent as f64);

    format!("{:.3} x 10^{}", mantissa, exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_feasibility_from_score_text() {
        assert!(is_feasible("0hard/-40soft"));
        assert!(is_feasible("-1init/0hard/0soft"));
        assert!(!is_feasible("-2hard/-40soft"));
        assert!(!is_feasible("N/A"));
    }

    #[test]
    fn test_format_score_keeps_levels() {
        let formatted = format_score("-1init/-2hard/5soft");
        for level in ["-1init", "-2hard", "5soft"] {
            assert!(formatted.contains(level));
        }
        assert!(format_score("N/A").contains("N/A"));
    }

    #[test]
    fn test_problem_scale() {
        assert_eq!(calculate_problem_scale(0, 4), "0");
        // Three orders over one bucket: 2^3 states.
        assert_eq!(calculate_problem_scale(3, 1), "8.000 x 10^0");
    }
}
