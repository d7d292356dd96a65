use log::warn;
use crate::record::Fixed;
use crate::scene::SceneFile;


pub const GROUND_NAME: &str = "ground";
/// Only the first vertices of the ground mesh describe the footprint quad.
pub const GROUND_VERTEX_LIMIT: usize = 4;
pub const DECAL_HALF_HEIGHT: f64 = 0.25;


/// Horizontal coordinates of one ground vertex (`x` and `z` of the glTF position).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GroundVertex {
    pub xf: f64,
    pub zf: f64,
}

/// Half extents of the decal box spanned by the ground quad.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DecalExtents {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
}


/// Find the mesh that describes the ground: the mesh of the last node that is named `ground` or
/// uses a mesh named `ground`.  If no node matches, fall back to the first mesh named `ground`.
pub fn find_ground_mesh(scene: &SceneFile) -> Option<usize> {
    let mut found = None;
    for node in scene.nodes() {
        let mesh = node.mesh.map(|m| m.value());
        let mesh_is_ground = mesh.and_then(|m| scene.mesh_name(m)) == Some(GROUND_NAME);
        if node.name.as_deref() == Some(GROUND_NAME) || mesh_is_ground {
            found = Some(mesh);
        }
    }

    match found {
        Some(mesh) => mesh,
        None => scene.root().meshes.iter()
            .position(|m| m.name.as_deref() == Some(GROUND_NAME)),
    }
}

/// Decode the first few ground vertices.  Every failure here means "no ground" and is only
/// logged.
pub fn ground_vertices(scene: &SceneFile) -> Option<Vec<GroundVertex>> {
    let mesh = match find_ground_mesh(scene) {
        Some(x) => x,
        None => {
            warn!("no ground mesh found");
            return None;
        },
    };

    let positions = match scene.positions(mesh) {
        Ok(x) => x,
        Err(e) => {
            warn!("ground mesh {}: {}", mesh, e);
            return None;
        },
    };
    if positions.is_empty() {
        warn!("ground mesh {} has no vertices", mesh);
        return None;
    }

    Some(positions.iter()
        .take(GROUND_VERTEX_LIMIT)
        .map(|p| GroundVertex { xf: p[0] as f64, zf: p[2] as f64 })
        .collect())
}

/// Round to the nearest multiple of `1 / steps`, with ties going toward positive infinity.
fn round_to(x: f64, steps: f64) -> f64 {
    let y = x * steps;
    // `round` sends ties away from zero; negative ties go back up by one.
    let r = y.round();
    let r = if y - r == 0.5 { r + 1. } else { r };
    r / steps
}

/// The ground quad snapped to the half-unit grid.
pub fn build_blocker(ground: &[GroundVertex]) -> Vec<GroundVertex> {
    ground.iter().map(|v| GroundVertex {
        xf: round_to(v.xf, 2.),
        zf: round_to(v.zf, 2.),
    }).collect()
}

pub fn decal_extents(ground: &[GroundVertex]) -> Option<DecalExtents> {
    let rounded = ground.iter().map(|v| (round_to(v.xf, 100.), round_to(v.zf, 100.)));
    let ((min_x, min_z), (max_x, max_z)) = rounded.fold(None, |acc, (x, z)| {
        Some(match acc {
            None => ((x, z), (x, z)),
            Some(((min_x, min_z), (max_x, max_z))) => (
                (f64::min(min_x, x), f64::min(min_z, z)),
                (f64::max(max_x, x), f64::max(max_z, z)),
            ),
        })
    })?;

    Some(DecalExtents {
        x: Fixed::new((max_x - min_x) / 2.),
        y: Fixed::new(DECAL_HALF_HEIGHT),
        z: Fixed::new((max_z - min_z) / 2.),
    })
}
