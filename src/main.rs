use std::env;
use std::fs;

use anyhow::{bail, Context};

use wavstream::{BufferPhase, PlayerConfig, StdStorage, WavPlayer};

struct CliArgs {
    config: PlayerConfig,
    file: Option<String>,
    render: Option<String>,
    seconds: u32,
    show_help: bool,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut config_path: Option<String> = None;
    let mut dir_arg: Option<String> = None;
    let mut file = None;
    let mut render = None;
    let mut seconds = 30u32;
    let mut looping = false;
    let mut show_help = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => show_help = true,
            "--loop" => looping = true,
            "--file" => file = args.next(),
            "--render" => render = args.next(),
            "--seconds" => {
                let value = args.next().context("--seconds requires an argument")?;
                seconds = value.parse().context("--seconds expects a number")?;
            }
            "--config" => config_path = args.next(),
            _ if arg.starts_with('-') => {
                eprintln!("Unknown flag: {}", arg);
                show_help = true;
            }
            _ => dir_arg = Some(arg),
        }
    }

    let mut config = match config_path {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config '{}'", path))?;
            PlayerConfig::from_json(&json)?
        }
        None => PlayerConfig::default(),
    };
    if let Some(dir) = dir_arg {
        config.search_path = dir;
    }
    config.looping |= looping;

    Ok(CliArgs {
        config,
        file,
        render,
        seconds,
        show_help,
    })
}

fn print_usage() {
    eprintln!(
        "Usage:\n  wavstream [flags] <directory>\n\nFlags:\n  --file <name>      Open the first file whose name contains <name> (default: first file)\n  --loop             Loop the opened file\n  --render <out>     Render playback to a WAV file instead of the speakers\n  --seconds <n>      Cap playback/render length (default 30)\n  --config <json>    Load a PlayerConfig JSON file\n  -h, --help         Show this help\n\nExamples:\n  wavstream /media/sdcard\n  wavstream --file kick --render kick_loop.wav --loop --seconds 10 /media/sdcard\n"
    );
}

fn main() -> anyhow::Result<()> {
    println!("wavstream - Double-buffered WAV Playback");
    println!("========================================\n");

    let args = parse_args()?;
    if args.show_help {
        print_usage();
        return Ok(());
    }

    let mut player = WavPlayer::with_config(StdStorage::new(), &args.config)
        .with_context(|| format!("Failed to scan '{}'", args.config.search_path))?;

    println!("Files in {}:", args.config.search_path);
    for (index, entry) in player.catalog().entries().iter().enumerate() {
        println!("  [{index}] {}", entry.display_string(player.sample_rate()));
    }
    if player.catalog().truncated() {
        println!("  (catalog full - further files ignored)");
    }
    if player.catalog().skipped() > 0 {
        println!("  ({} unreadable files skipped)", player.catalog().skipped());
    }
    println!();

    if player.num_files() == 0 {
        bail!("No playable files found in '{}'", args.config.search_path);
    }

    match &args.file {
        Some(name) => player
            .open_by_name(name)
            .with_context(|| format!("No file matching '{}'", name))?,
        None => player.open(0)?,
    }
    player.set_looping(args.config.looping);

    let selected = player.current_file().unwrap_or(0);
    println!(
        "Playing [{selected}] {} ({} ms){}\n",
        player.name_of(selected).unwrap_or("?"),
        player.time_until_eof(),
        if player.looping() { ", looping" } else { "" }
    );

    match &args.render {
        Some(path) => render_to_wav(&mut player, path, args.seconds),
        None => play_live(player, args.seconds),
    }
}

/// Pull samples through the engine and write them to a WAV file.
fn render_to_wav(
    player: &mut WavPlayer<StdStorage>,
    path: &str,
    seconds: u32,
) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: player.channels() as u16,
        sample_rate: player.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create '{}'", path))?;

    let cap = seconds as u64 * player.sample_rate() as u64 * player.channels() as u64;
    let mut written = 0u64;
    while written < cap {
        if player.buffer_phase() != BufferPhase::Idle {
            player.prepare()?;
        }
        writer.write_sample(player.stream())?;
        written += 1;
        if !player.is_playing() && !player.looping() {
            break;
        }
    }
    writer.finalize()?;

    println!("Rendered {} samples to {}", written, path);
    Ok(())
}

#[cfg(feature = "streaming")]
fn play_live(player: WavPlayer<StdStorage>, seconds: u32) -> anyhow::Result<()> {
    use std::io::Write;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use parking_lot::Mutex;
    use wavstream::AudioDevice;

    let shared = Arc::new(Mutex::new(player));
    let device = AudioDevice::new(Arc::clone(&shared)).context("Failed to open audio device")?;
    let started = Instant::now();

    // Refill loop: the audio thread only consumes, all storage I/O runs here.
    let mut ticks = 0u32;
    loop {
        {
            let mut player = shared.lock();
            if player.buffer_phase() != BufferPhase::Idle {
                player.prepare()?;
            }
            if !player.is_playing() && !player.looping() {
                break;
            }
            if ticks % 250 == 0 {
                print!("\r{:>6} ms remaining ", player.time_until_eof());
                std::io::stdout().flush().ok();
            }
        }
        if started.elapsed().as_secs() >= seconds as u64 {
            break;
        }
        ticks += 1;
        std::thread::sleep(Duration::from_millis(1));
    }
    device.finish();

    println!("\nPlayback complete ({:.1}s)", started.elapsed().as_secs_f32());
    Ok(())
}

#[cfg(not(feature = "streaming"))]
fn play_live(_player: WavPlayer<StdStorage>, _seconds: u32) -> anyhow::Result<()> {
    bail!(
        "Live playback requires the \"streaming\" feature. Rebuild with `--features streaming`, or use --render <out.wav>."
    );
}
