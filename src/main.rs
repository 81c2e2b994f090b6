use rand::Rng;
use std::env;
use std::process;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{error, info};
use wheel3d::{Color, PercentagePolicy, Segment, Wheel, WheelCommand, WheelConfig, WheelError};

const PALETTE: [&str; 6] = [
    "#f44336", "#2196f3", "#4caf50", "#ff9800", "#9c27b0", "#00bcd4",
];
const CATEGORIES: [&str; 6] = [
    "Food",
    "Transport",
    "Entertainment",
    "Utilities",
    "Health",
    "Travel",
];

struct Args {
    random: bool,
    spin: bool,
    normalize: bool,
    font_path: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        random: false,
        spin: false,
        normalize: false,
        font_path: None,
    };
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--random" => args.random = true,
            "--spin" => args.spin = true,
            "--normalize" => args.normalize = true,
            "--font" => args.font_path = iter.next(),
            other => {
                eprintln!("unknown argument: {other}");
                eprintln!("usage: wheel3d [--random] [--spin] [--normalize] [--font <path>]");
                process::exit(2);
            }
        }
    }
    args
}

fn sample_segments() -> Result<Vec<Segment>, WheelError> {
    let amounts = [
        ("Food", 420.0, 40.0),
        ("Transport", 367.5, 35.0),
        ("Entertainment", 262.5, 25.0),
    ];
    amounts
        .iter()
        .zip(PALETTE)
        .map(|(&(name, value, pct), hex)| -> Result<Segment, WheelError> {
            Ok(Segment::new(name, value, Color::from_hex(hex)?, pct))
        })
        .collect()
}

fn random_segments(rng: &mut impl Rng) -> Result<Vec<Segment>, WheelError> {
    let count = rng.random_range(2..=CATEGORIES.len());
    let values: Vec<f64> = (0..count).map(|_| rng.random_range(20.0..500.0)).collect();
    let total: f64 = values.iter().sum();

    CATEGORIES
        .iter()
        .zip(PALETTE)
        .zip(values)
        .map(|((name, hex), value)| -> Result<Segment, WheelError> {
            let color = Color::from_hex(hex)?;
            Ok(Segment::new(*name, value, color, value / total * 100.0))
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wheel3d=info".into()),
        )
        .init();

    let args = parse_args();

    let font_data = match args.font_path.as_deref().map(std::fs::read).transpose() {
        Ok(data) => data,
        Err(e) => {
            error!(error = %e, "failed to read font");
            process::exit(1);
        }
    };

    let policy = if args.normalize {
        PercentagePolicy::Normalize
    } else {
        PercentagePolicy::AsIs
    };
    let config = WheelConfig::builder()
        .percentage_policy(policy)
        .maybe_font_data(font_data)
        .build();

    let mut rng = rand::rng();
    let segments = if args.random {
        random_segments(&mut rng)
    } else {
        sample_segments()
    };
    let segments = match segments {
        Ok(segments) => segments,
        Err(e) => {
            error!(error = %e, "invalid demo data");
            process::exit(1);
        }
    };

    let mut wheel = Wheel::new(config);
    wheel.set_segments(segments);
    info!(rotation = wheel.rotation_angle(), "drag to rotate, click to select");

    let result = if args.spin {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let mut rng = rand::rng();
            loop {
                let command = WheelCommand::RotateBy(rng.random_range(0.5..2.0));
                if sender.send(command).is_err() {
                    break;
                }
                thread::sleep(Duration::from_millis(16));
            }
        });
        wheel.show_with_commands(receiver)
    } else {
        wheel.show()
    };

    if let Err(e) = result {
        error!(error = %e, "wheel window failed");
        process::exit(1);
    }
}
