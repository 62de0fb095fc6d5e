use button_to_touch::{Args, DeviceId, DryRunHost, HostCall, TouchMapper, load_configuration};
use clap::Parser;
use tracing::info;

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = match args.config_path() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if !path.exists() {
        eprintln!("No configuration at {}", path.display());
        std::process::exit(1);
    }

    // Resolve every entry against a dry-run host
    let mut host = DryRunHost::new();
    let buttons = match load_configuration(&path, &mut host) {
        Ok(buttons) => buttons,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    if buttons.is_empty() {
        eprintln!("{} maps no buttons", path.display());
        std::process::exit(1);
    }

    for (index, button) in buttons.iter().enumerate() {
        println!(
            "#{index}: params={:?} touch=({}, {})",
            host.device_params(button.device).unwrap_or_default(),
            button.x,
            button.y
        );
    }

    if args.simulate {
        info!("=== Simulating button presses ===");
        let devices: Vec<DeviceId> = buttons.iter().map(|b| b.device).collect();
        let mut mapper = TouchMapper::new(buttons);
        host.take_calls();

        for (index, device) in devices.into_iter().enumerate() {
            host.set_button_state(device, true);
            mapper.poll(&mut host);
            host.set_button_state(device, false);
            mapper.poll(&mut host);

            for call in host.take_calls() {
                match call {
                    HostCall::SetCustomTouchState { x, y, pressed } => {
                        println!("#{index}: set custom touch ({x}, {y}) pressed={pressed}")
                    }
                    HostCall::UseRealTouchState => println!("#{index}: use real touch"),
                    HostCall::NewButtonDevice { .. } => {}
                }
            }
        }
    }
}
