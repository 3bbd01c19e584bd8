use coolnet::duty;
use coolnet::ir::NetworkIR;
use coolnet::layout::{LayoutConfig, LayoutEngine};
use coolnet::network::NetworkDescription;
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <network.json> [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>   Output file (default: stdout)");
    eprintln!("  -c, --config <file>   Layout config JSON (canvas, margins, tower size)");
    eprintln!("  -W, --width <px>      Canvas width (default: 1200)");
    eprintln!("  -H, --height <px>     Canvas height (default: 800)");
    eprintln!("      --duty            Print the thermal duty report instead of the layout");
    process::exit(1);
}

fn parse_px(flag: &str, value: Option<&String>) -> f64 {
    match value.map(|v| v.parse::<f64>()) {
        Some(Ok(px)) if px.is_finite() => px,
        _ => {
            eprintln!("Invalid value for {}", flag);
            process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        usage(&args[0]);
    }

    let input_path = &args[1];
    let mut output_path: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut width: Option<f64> = None;
    let mut height: Option<f64> = None;
    let mut duty_report = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(args[i].clone());
                }
            }
            "-c" | "--config" => {
                i += 1;
                if i < args.len() {
                    config_path = Some(args[i].clone());
                }
            }
            "-W" | "--width" => {
                i += 1;
                width = Some(parse_px("--width", args.get(i)));
            }
            "-H" | "--height" => {
                i += 1;
                height = Some(parse_px("--height", args.get(i)));
            }
            "--duty" => duty_report = true,
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input_path, e);
            process::exit(1);
        }
    };

    let desc = match NetworkDescription::from_json(&input) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Invalid network description: {}", e);
            process::exit(1);
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(&path).unwrap_or_else(|e| {
                eprintln!("Failed to read {}: {}", path, e);
                process::exit(1);
            });
            LayoutConfig::from_json(&text).unwrap_or_else(|e| {
                eprintln!("Invalid config {}: {}", path, e);
                process::exit(1);
            })
        }
        None => LayoutConfig::default(),
    };
    if let Some(w) = width {
        config.width = w;
    }
    if let Some(h) = height {
        config.height = h;
    }

    let ir = match NetworkIR::from_description(&desc) {
        Ok(ir) => ir,
        Err(e) => {
            eprintln!("Validation error: {}", e);
            process::exit(1);
        }
    };

    let rendered = if duty_report {
        serde_json::to_string_pretty(&duty::compute(&ir))
    } else {
        let layout = match LayoutEngine::new(config).layout(&ir) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Layout error: {}", e);
                process::exit(1);
            }
        };
        layout.to_json()
    };

    let json = match rendered {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to encode output: {}", e);
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("Failed to write {}: {}", path, e);
                process::exit(1);
            }
        }
        None => println!("{}", json),
    }
}
