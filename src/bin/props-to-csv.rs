use std::env;
use std::error::Error;
use std::process;
use propped_model::ProppedModel;
use propped_model::record::{Fixed, Placement};

const HEADER: [&str; 14] = [
    "kind", "name", "file_name",
    "position_x", "position_y", "position_z",
    "rotation_x", "rotation_y", "rotation_z", "rotation_w",
    "scale_x", "scale_y", "scale_z",
    "rotation_around_y",
];

fn put(r: &mut [String], start: usize, xs: &[Fixed]) {
    for (i, x) in xs.iter().enumerate() {
        r[start + i] = x.to_string();
    }
}

/// One CSV row; columns that don't apply to a record kind stay empty.
fn row(p: &Placement) -> Vec<String> {
    let mut r = vec![String::new(); HEADER.len()];
    r[0] = p.kind().as_str().to_owned();
    r[1] = p.name().to_owned();

    match *p {
        Placement::Prop(ref x) => {
            r[2] = x.file_name.clone().unwrap_or_default();
            put(&mut r, 3, &x.position);
            put(&mut r, 6, &x.rotation);
            put(&mut r, 10, &x.scale);
        },
        Placement::Particle(ref x) => {
            put(&mut r, 3, &x.position);
            put(&mut r, 6, &x.rotation);
            r[12] = x.scale.to_string();
        },
        Placement::Feedback(ref x) => {
            put(&mut r, 3, &x.position);
            put(&mut r, 6, &x.orientation);
            r[13] = x.rotation_y.to_string();
        },
        Placement::File(ref x) => {
            r[2] = x.file_name.clone().unwrap_or_default();
            put(&mut r, 3, &x.position);
            put(&mut r, 6, &x.rotation);
            r[12] = x.scale.to_string();
        },
    }
    r
}

fn real_main() -> Result<(), Box<dyn Error>> {
    let args = env::args_os().collect::<Vec<_>>();
    assert!(args.len() == 3, "usage: {} <scene.gltf|scene.glb> <out.csv>",
        args[0].to_string_lossy());

    let m = ProppedModel::from_file(&args[1])?;
    let placements = m.placements();

    let mut w = csv::Writer::from_path(&args[2])?;
    w.write_record(&HEADER)?;
    for p in &placements {
        w.write_record(&row(p))?;
    }
    w.flush()?;

    eprintln!("wrote {} records", placements.len());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = real_main() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
