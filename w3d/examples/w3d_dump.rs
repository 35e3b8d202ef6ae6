use serde_json::json;
use std::path::PathBuf;
use w3d::{CompressedAnimationChannel, ReadOptions, W3dFile};

fn main() {
    env_logger::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut positional = Vec::<String>::new();
    let mut decode_channels = false;
    let mut strict = false;

    for arg in &args {
        match arg.as_str() {
            "--decode-channels" => decode_channels = true,
            "--strict" => strict = true,
            other => positional.push(other.to_string()),
        }
    }

    let path = positional
        .first()
        .map(PathBuf::from)
        .expect("usage: w3d_dump <file.w3d> [--decode-channels] [--strict]");
    let options = ReadOptions {
        warn_unknown_chunks: true,
        strict,
    };
    let file = W3dFile::read_file_with_options(&path, &options).expect("read w3d");

    if !decode_channels {
        println!(
            "{}",
            serde_json::to_string_pretty(&file).expect("serialize w3d")
        );
        return;
    }

    let channels: Vec<_> = file
        .compressed_animation
        .iter()
        .flat_map(|anim| anim.channels.iter())
        .filter_map(|channel| match channel {
            CompressedAnimationChannel::AdaptiveDelta(c) => Some(json!({
                "pivot": c.pivot,
                "type": format!("{:?}", c.channel_type),
                "scale": c.scale,
                "samples": c.samples(),
            })),
            CompressedAnimationChannel::TimeCoded(_) => None,
        })
        .collect();
    let motion: Vec<_> = file
        .compressed_animation
        .iter()
        .flat_map(|anim| anim.motion_channels.iter())
        .filter_map(|channel| {
            channel.samples().map(|samples| {
                json!({
                    "pivot": channel.pivot,
                    "type": format!("{:?}", channel.channel_type),
                    "samples": samples,
                })
            })
        })
        .collect();

    let out = json!({
        "path": path.display().to_string(),
        "adaptive_delta_channels": channels,
        "motion_channels": motion,
    });
    println!("{}", serde_json::to_string_pretty(&out).expect("serialize"));
}
