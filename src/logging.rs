//! Logging utilities for twodview.
//!
//! Structured `tracing` events around the load, render and write stages of a
//! plot, so that slow grids or odd data ranges show up in the logs.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Initialize the tracing subscriber with the given log level.
///
/// `RUST_LOG` wins over the configured level when it is set.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    // A second call (tests, embedding) must not panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation failed"
        );
    }
}

/// Run `f`, logging its duration under a fresh render id.
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let render_id = Uuid::new_v4();

    debug!(
        operation = operation,
        render_id = %render_id,
        "Starting operation"
    );

    let result = f();

    info!(
        operation = operation,
        render_id = %render_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Summary of the field being plotted.
pub fn log_plot_stats(
    variable: &str,
    position: &str,
    shape: (usize, usize),
    data_range: Option<(f64, f64)>,
    color_limits: (f64, f64),
    clev: u32,
) {
    let (data_min, data_max) = data_range.unwrap_or((f64::NAN, f64::NAN));
    info!(
        operation = "plot",
        variable = variable,
        position = position,
        rows = shape.0,
        cols = shape.1,
        data_min = data_min,
        data_max = data_max,
        cmin = color_limits.0,
        cmax = color_limits.1,
        clev = clev,
        "Field prepared"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::TwodviewError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}

/// Generate a unique id for one rendering
pub fn generate_render_id() -> String {
    Uuid::new_v4().to_string()
}
