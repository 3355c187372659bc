//! Output device listing.

use clap::Args;
use foldbox_io::{default_output_device, list_output_devices};

#[derive(Args)]
pub struct DevicesArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    let devices = list_output_devices()?;
    let default_name = default_output_device().map(|d| d.name);

    if args.json {
        let list: Vec<_> = devices
            .iter()
            .map(|d| {
                serde_json::json!({
                    "name": d.name,
                    "default_sample_rate": d.default_sample_rate,
                    "default_channels": d.default_channels,
                    "default": default_name.as_deref() == Some(d.name.as_str()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No audio output devices found.");
        return Ok(());
    }

    println!("Output Devices");
    println!("==============\n");
    for (idx, device) in devices.iter().enumerate() {
        let marker = if default_name.as_deref() == Some(device.name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!(
            "  [{}] {} ({} Hz, {} ch){}",
            idx, device.name, device.default_sample_rate, device.default_channels, marker
        );
    }
    println!();
    println!("Tip: pass a partial name to play with --output:");
    println!("  foldbox play song.txt --output usb");
    Ok(())
}
