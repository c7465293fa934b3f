//! Headless demo session: loads a layout, drives the controls through a
//! short script on a 60 fps frame clock and logs what the animations do.
//!
//! Usage: `fadec-vis [layout.toml] [options.toml]`

use std::path::Path;
use std::time::Duration;

use fadec_vis::controls::SolenoidSide;
use fadec_vis::options::Options;
use fadec_vis::scene::ComponentLayout;
use fadec_vis::{ControlCommand, FadecSimulation, FlowError};
use web_time::Instant;

const FRAME: Duration = Duration::from_micros(16_667);
const SESSION_FRAMES: u32 = 60 * 20;

/// Scripted inputs keyed by frame number.
fn script() -> Vec<(u32, ControlCommand)> {
    vec![
        (0, ControlCommand::SetFuelQuantity(50)),
        (30, ControlCommand::SetThrottle(40)),
        (
            180,
            ControlCommand::SetSolenoidCurrent {
                side: SolenoidSide::Right,
                current: 60,
            },
        ),
        (180, ControlCommand::ToggleSolenoid(SolenoidSide::Right)),
        (
            360,
            ControlCommand::SetSolenoidCurrent {
                side: SolenoidSide::Left,
                current: 80,
            },
        ),
        (360, ControlCommand::ToggleSolenoid(SolenoidSide::Left)),
        (480, ControlCommand::SetResponseSpeed(0.15)),
        (540, ControlCommand::ToggleSolenoid(SolenoidSide::Left)),
        (600, ControlCommand::SetThrottle(85)),
        (900, ControlCommand::SetThrottle(0)),
    ]
}

fn load(args: &[String]) -> Result<(ComponentLayout, Options), FlowError> {
    let layout = match args.get(1) {
        Some(path) => ComponentLayout::load(Path::new(path))?,
        None => ComponentLayout::fadec_default()?,
    };
    let options = match args.get(2) {
        Some(path) => Options::load(Path::new(path))?,
        None => Options::default(),
    };
    Ok((layout, options))
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let (layout, options) = match load(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("Failed to load session inputs: {e}");
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    let mut sim = FadecSimulation::from_layout(layout, options, start, &mut rand::rng());
    let script = script();

    for frame in 0..SESSION_FRAMES {
        let now = start + FRAME * frame;
        for (_, command) in script.iter().filter(|(at, _)| *at == frame) {
            match sim.execute(*command, now) {
                Ok(outcome) => log::info!("[{frame:>4}] {command:?} -> {outcome:?}"),
                Err(e) => log::error!("[{frame:>4}] {command:?} failed: {e}"),
            }
        }
        sim.tick(now);

        if frame % 60 == 0 {
            let scene = sim.scene();
            let visible = scene.meshes().iter().filter(|m| m.visible).count();
            let particles: usize = scene
                .point_clouds()
                .iter()
                .filter(|c| c.visible)
                .map(|c| c.draw_count)
                .sum();
            log::info!(
                "t={:>2}s flowing={} liquids={visible}/{} particles={particles} \
                 rod={:+.3}deg land={:+.4}",
                frame / 60,
                sim.is_flowing(),
                scene.meshes().len(),
                sim.actuator().rotation().to_degrees(),
                sim.actuator().land_offset(),
            );
        }
    }
    log::info!("Session finished");
}
