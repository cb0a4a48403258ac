use crate::runtime::config::RuntimeConfig;
use crate::runtime::logging::init_tracing;
use crate::runtime::view::TracingView;
use carphys_core::{
    BrakingError, BrakingModel, FrameClock, FrameQueue, PanelController, SpeedSlider,
    SurfaceCondition,
};
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Braking(#[from] BrakingError),
    #[error("failed to write output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("runtime error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct SweepRow {
    speed_kmh: f64,
    surface: SurfaceCondition,
    reaction_m: f64,
    braking_m: f64,
    total_m: f64,
}

pub fn run_from_args() -> ExitCode {
    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            RuntimeConfig::print_help();
            return ExitCode::from(2);
        }
    };
    if config.show_help {
        RuntimeConfig::print_help();
        return ExitCode::SUCCESS;
    }
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub fn run(config: RuntimeConfig) -> Result<(), AppError> {
    init_tracing(config.json_logs);

    if config.sweep {
        return print_sweep(config.json_logs);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive_panel(&config));
    Ok(())
}

fn print_sweep(json: bool) -> Result<(), AppError> {
    if !json {
        println!(
            "{:>6}  {:<7}  {:>10}  {:>10}  {:>10}",
            "km/h", "surface", "thinking", "braking", "total"
        );
    }
    for surface in SurfaceCondition::ALL {
        for speed_kmh in SpeedSlider::stops() {
            let readout = BrakingModel::compute(speed_kmh, surface)?.readout();
            if json {
                let row = SweepRow {
                    speed_kmh,
                    surface,
                    reaction_m: readout.reaction_m,
                    braking_m: readout.braking_m,
                    total_m: readout.total_m,
                };
                println!("{}", serde_json::to_string(&row)?);
            } else {
                println!(
                    "{:>6}  {:<7}  {:>8} m  {:>8} m  {:>8} m",
                    speed_kmh,
                    surface,
                    readout.reaction(),
                    readout.braking(),
                    readout.total()
                );
            }
        }
    }
    Ok(())
}

async fn drive_panel(config: &RuntimeConfig) {
    let clock = FrameClock::new();
    let mut panel = PanelController::new(FrameQueue::new(), TracingView::new());
    panel.set_condition(config.surface);
    panel.set_speed(config.speed_kmh);
    if panel.state().speed_kmh != config.speed_kmh {
        warn!(
            requested_kmh = config.speed_kmh,
            speed_kmh = panel.state().speed_kmh,
            "Speed snapped to slider range"
        );
    }

    if config.animate {
        panel.start_animation();
    }

    let frame_period = Duration::from_secs_f64(1.0 / f64::from(config.fps));
    let mut ticker = tokio::time::interval(frame_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let deadline = config
        .run_seconds
        .map(|secs| Instant::now() + Duration::from_secs(secs));
    let run_limit = async move {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    };
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };
    tokio::pin!(run_limit);
    tokio::pin!(interrupt);

    info!(
        fps = config.fps,
        run_seconds = ?config.run_seconds,
        "Panel running. Press Ctrl-C to exit."
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                panel.render_frame(clock.now_ms());
            }
            _ = &mut run_limit => {
                info!("Run duration elapsed");
                break;
            }
            _ = &mut interrupt => {
                info!("Interrupted");
                break;
            }
        }
    }

    panel.stop_animation();
    let piston = panel.piston();
    info!(
        frames_rendered = panel.oscillator().frames_rendered(),
        strokes = panel.view().strokes(),
        last_position = piston.position,
        "Run complete"
    );
}
