//! Retro Platformer headless runner
//!
//! Plays a level with a scripted input in simulated real time and logs what
//! happens. Useful for soak runs, replays and feeding external renderers.
//!
//! ```text
//! retro-platformer [--level FILE | --seed N] [--settings FILE] [--tuning FILE]
//!                  [--dump FILE|-] [--seconds S]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::fs::File;
    use std::io::{self, BufWriter, Write};

    use retro_platformer::audio::LogAudio;
    use retro_platformer::game::{Game, SessionEvent};
    use retro_platformer::platform::ScriptedInput;
    use retro_platformer::renderer::{JsonLinesRenderer, Renderer};
    use retro_platformer::sim::TickInput;
    use retro_platformer::{LevelLayout, Settings, Tuning};

    /// Wall-clock frame lengths cycled through to mimic an uneven display
    const FRAME_PATTERN: [f32; 4] = [0.016, 0.017, 0.017, 0.034];
    /// Steps between scripted jumps
    const JUMP_EVERY: u64 = 50;
    /// Steps the jump button stays held
    const JUMP_HOLD: u64 = 18;
    /// Longest run `--seconds` accepts (one day)
    const MAX_SECONDS: f32 = 86_400.0;

    #[derive(Debug, Default)]
    struct Args {
        level: Option<String>,
        seed: Option<u64>,
        settings: Option<String>,
        tuning: Option<String>,
        dump: Option<String>,
        seconds: Option<f32>,
    }

    impl Args {
        fn parse() -> Result<Self, String> {
            let mut args = Self::default();
            let mut iter = std::env::args().skip(1);
            while let Some(flag) = iter.next() {
                let mut value = || {
                    iter.next()
                        .ok_or_else(|| format!("{flag} expects a value"))
                };
                match flag.as_str() {
                    "--level" => args.level = Some(value()?),
                    "--seed" => {
                        let raw = value()?;
                        args.seed = Some(raw.parse().map_err(|e| format!("--seed {raw}: {e}"))?);
                    }
                    "--settings" => args.settings = Some(value()?),
                    "--tuning" => args.tuning = Some(value()?),
                    "--dump" => args.dump = Some(value()?),
                    "--seconds" => args.seconds = Some(parse_seconds(&value()?)?),
                    other => return Err(format!("unknown argument {other}")),
                }
            }
            Ok(args)
        }
    }

    fn parse_seconds(raw: &str) -> Result<f32, String> {
        let seconds: f32 = raw.parse().map_err(|e| format!("--seconds {raw}: {e}"))?;
        if !(seconds.is_finite() && seconds > 0.0 && seconds <= MAX_SECONDS) {
            return Err(format!("--seconds {raw}: expected a value in (0, {MAX_SECONDS}]"));
        }
        Ok(seconds)
    }

    /// Run right the whole time, jumping on a fixed beat
    fn demo_script(total_steps: u64) -> ScriptedInput {
        let run = TickInput {
            right: true,
            ..Default::default()
        };
        let jump = TickInput {
            right: true,
            jump: true,
            ..Default::default()
        };
        let mut script = Vec::new();
        let mut step = 0;
        while step < total_steps {
            script.push((step, run));
            script.push((step + JUMP_EVERY - JUMP_HOLD, jump));
            step += JUMP_EVERY;
        }
        ScriptedInput::new(script)
    }

    /// Snapshot sink for `--dump`; `-` means stdout
    fn open_dump(path: &str) -> io::Result<Box<dyn Renderer>> {
        if path == "-" {
            return Ok(Box::new(JsonLinesRenderer::new(BufWriter::new(io::stdout()))));
        }
        let file = File::create(path)?;
        log::info!("Dumping snapshots to {path}");
        Ok(Box::new(JsonLinesRenderer::new(BufWriter::new(file))))
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let args = Args::parse()?;

        let settings = match &args.settings {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let layout = match (&args.level, args.seed) {
            (Some(path), _) => LevelLayout::load(path)?,
            (None, Some(seed)) => LevelLayout::generate(seed),
            (None, None) => LevelLayout::demo(),
        };
        layout.validate()?;

        let mut renderer = match args.dump.as_deref() {
            None => None,
            Some(path) => Some(open_dump(path)?),
        };

        let seconds = args.seconds.unwrap_or(60.0);
        let total_steps = (seconds * 60.0).ceil() as u64;
        let mut input = demo_script(total_steps);

        let mut game = Game::new(settings, tuning).with_audio(Box::new(LogAudio));
        game.start(&layout)?;

        let mut elapsed_total = 0.0f32;
        let mut frame = 0usize;
        let mut outcome = None;
        while elapsed_total < seconds {
            let dt = FRAME_PATTERN[frame % FRAME_PATTERN.len()];
            frame += 1;
            elapsed_total += dt;

            let report = game.advance(dt, &mut input)?;
            for event in &report.events {
                log::debug!("{event:?}");
            }
            if let (Some(renderer), Some(snapshot)) = (renderer.as_mut(), game.snapshot()) {
                renderer.present(&snapshot)?;
            }
            if let Some(event) = report.session {
                outcome = Some(event);
                break;
            }
        }

        match outcome {
            Some(SessionEvent::Won) => log::info!("Goal reached after {elapsed_total:.2}s"),
            Some(SessionEvent::Lost) => log::info!("Player lost after {elapsed_total:.2}s"),
            Some(SessionEvent::Started) | None => {
                let x = game.world().map(|w| w.player.body.pos.x).unwrap_or_default();
                log::info!("Time up after {frame} frames, player at x={x:.1}");
            }
        }
        // Flush buffered snapshots before reporting success
        drop(renderer);
        io::stdout().flush()?;
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Retro Platformer (headless) starting...");

    if let Err(err) = native::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
