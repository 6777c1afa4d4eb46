use camsight::{CircleProcessor, CircleProcessorConfig, FrameProcessor, FrameReport};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image.png> [annotated_out.png]", args[0]);
        std::process::exit(2);
    }

    let frame = image::open(&args[1])?.to_rgb8();
    let mut processor = CircleProcessor::new(CircleProcessorConfig::default());
    let out = processor.process(&frame);

    if let FrameReport::Circles { circles } = &out.report {
        println!("Detected {} circles.", circles.len());
        for c in circles {
            println!("  center=({:.1}, {:.1}) radius={:.1}", c.x, c.y, c.radius);
        }
    }

    if let Some(out_path) = args.get(2) {
        out.views[0].image.save(out_path)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
