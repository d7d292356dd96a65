use std::env;
use std::process;
use propped_model::ProppedModel;
use propped_model::record::{Fixed, Kind};

fn join(xs: &[Fixed]) -> String {
    xs.iter().map(Fixed::as_str).collect::<Vec<_>>().join(" ")
}

fn real_main() -> propped_model::Result<()> {
    let args = env::args_os().collect::<Vec<_>>();
    assert!(args.len() == 2, "usage: {} <scene.gltf|scene.glb>", args[0].to_string_lossy());

    let m = ProppedModel::from_file(&args[1])?;

    for &kind in &Kind::ALL {
        println!("{} {} records", m.count(kind), kind.as_str());
    }

    for p in m.props() {
        println!("prop {}", p.name);
        println!("  file {}", p.file_name.as_deref().unwrap_or("(unchanged)"));
        println!("  position {}", join(&p.position));
        println!("  rotation {}", join(&p.rotation));
        println!("  scale {}", join(&p.scale));
    }
    for p in m.particles() {
        println!("particle {}", p.name);
        println!("  position {}", join(&p.position));
        println!("  rotation {}", join(&p.rotation));
        println!("  scale {}", p.scale);
    }
    for f in m.feedbacks() {
        println!("feedback {}", f.name);
        println!("  position {}", join(&f.position));
        println!("  orientation {}", join(&f.orientation));
        println!("  rotation_y {}", f.rotation_y);
    }
    for f in m.files() {
        println!("file {}", f.name);
        println!("  file {}", f.file_name.as_deref().unwrap_or("(unchanged)"));
        println!("  position {}", join(&f.position));
        println!("  rotation {}", join(&f.rotation));
        println!("  scale {}", f.scale);
    }

    match m.build_blocker() {
        Some(vs) => {
            println!("build blocker:");
            for v in vs {
                println!("  {} {}", v.xf, v.zf);
            }
        },
        None => println!("build blocker: none"),
    }
    match m.decal_extents() {
        Some(e) => println!("decal extents: {} {} {}", e.x, e.y, e.z),
        None => println!("decal extents: none"),
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = real_main() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
