use std::f64::consts::PI;
use std::fmt;
use gltf_json::Node;
use nalgebra::{Quaternion, Vector3};


pub const PROP_PREFIX: &str = "prop_";
pub const PARTICLE_PREFIX: &str = "particle_";
pub const FEEDBACK_PREFIX: &str = "fc_";
pub const FILE_PREFIX: &str = "file_";

pub const PROP_EXTENSION: &str = ".prp";
pub const FILE_EXTENSION: &str = ".cfg";


/// A number printed with exactly six digits after the decimal point, the way the game's config
/// files store transforms.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Fixed(String);

impl Fixed {
    /// Ties in the seventh decimal round away from zero.
    pub fn new(x: f64) -> Fixed {
        // Plain `format!` would print negative zero as "-0.000000".
        let x = if x == 0.0 { 0.0 } else { x };
        // `format!` rounds exact ties to even.  The only doubles that sit exactly halfway between
        // two six-decimal values are odd multiples of 1/128; nudge those one ulp away from zero.
        let y = x * 128.;
        let x = if y.fract() == 0.0 && y % 2. != 0.0 {
            f64::from_bits(x.to_bits() + 1)
        } else {
            x
        };
        Fixed(format!("{:.6}", x))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The printed value read back, i.e. the input rounded to six decimals.
    pub fn value(&self) -> f64 {
        self.0.parse().unwrap_or(f64::NAN)
    }
}

impl From<f32> for Fixed {
    fn from(x: f32) -> Fixed {
        Fixed::new(x as f64)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Fixed {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Fixed {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}


/// Node transform with glTF defaults filled in.
#[derive(Clone, PartialEq, Debug)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Transform {
        Transform {
            translation: Vector3::zeros(),
            rotation: Quaternion::identity(),
            scale: Vector3::repeat(1.0),
        }
    }
}

impl Transform {
    /// `matrix` transforms are not decomposed; such nodes get the defaults.
    pub fn from_node(node: &Node) -> Transform {
        let d = Transform::default();
        Transform {
            translation: node.translation.map_or(d.translation, Vector3::from),
            rotation: node.rotation.as_ref().map_or(d.rotation, |r| {
                let [x, y, z, w] = r.0;
                Quaternion::new(w, x, y, z)
            }),
            scale: node.scale.map_or(d.scale, Vector3::from),
        }
    }

    pub fn position_fixed(&self) -> [Fixed; 3] {
        let t = &self.translation;
        [t.x.into(), t.y.into(), t.z.into()]
    }

    /// Rotation in `x, y, z, w` order.
    pub fn rotation_fixed(&self) -> [Fixed; 4] {
        let q = &self.rotation;
        [q.i.into(), q.j.into(), q.k.into(), q.w.into()]
    }

    pub fn scale_fixed(&self) -> [Fixed; 3] {
        let s = &self.scale;
        [s.x.into(), s.y.into(), s.z.into()]
    }
}


#[derive(Clone, PartialEq, Debug)]
pub struct Prop {
    pub name: String,
    /// `None` when the mesh name is not a `.prp` file; whoever writes the record should keep the
    /// file name it already has in that case.
    pub file_name: Option<String>,
    pub position: [Fixed; 3],
    pub rotation: [Fixed; 4],
    pub scale: [Fixed; 3],
}

#[derive(Clone, PartialEq, Debug)]
pub struct Particle {
    pub name: String,
    pub position: [Fixed; 3],
    pub rotation: [Fixed; 4],
    pub scale: f32,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Feedback {
    pub name: String,
    pub position: [Fixed; 3],
    /// `x, y, z, w`
    pub orientation: [Fixed; 4],
    pub rotation_y: Fixed,
}

#[derive(Clone, PartialEq, Debug)]
pub struct FileEntry {
    pub name: String,
    /// `None` when the mesh name is not a `.cfg` file.
    pub file_name: Option<String>,
    pub position: [Fixed; 3],
    pub rotation: [Fixed; 4],
    pub scale: f32,
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Kind {
    Prop,
    Particle,
    Feedback,
    File,
}

impl Kind {
    pub const ALL: [Kind; 4] = [Kind::Prop, Kind::Particle, Kind::Feedback, Kind::File];

    pub fn prefix(self) -> &'static str {
        match self {
            Kind::Prop => PROP_PREFIX,
            Kind::Particle => PARTICLE_PREFIX,
            Kind::Feedback => FEEDBACK_PREFIX,
            Kind::File => FILE_PREFIX,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Prop => "prop",
            Kind::Particle => "particle",
            Kind::Feedback => "feedback",
            Kind::File => "file",
        }
    }

    pub fn matches(self, node_name: &str) -> bool {
        node_name.starts_with(self.prefix())
    }
}


#[derive(Clone, PartialEq, Debug)]
pub enum Placement {
    Prop(Prop),
    Particle(Particle),
    Feedback(Feedback),
    File(FileEntry),
}

impl Placement {
    pub fn kind(&self) -> Kind {
        match *self {
            Placement::Prop(_) => Kind::Prop,
            Placement::Particle(_) => Kind::Particle,
            Placement::Feedback(_) => Kind::Feedback,
            Placement::File(_) => Kind::File,
        }
    }

    pub fn name(&self) -> &str {
        match *self {
            Placement::Prop(ref p) => &p.name,
            Placement::Particle(ref p) => &p.name,
            Placement::Feedback(ref f) => &f.name,
            Placement::File(ref f) => &f.name,
        }
    }
}


/// Build the records for one node.  Each prefix is tested on its own, so a name could in
/// principle produce more than one record.
pub fn classify(name: &str, mesh_name: Option<&str>, t: &Transform) -> Vec<Placement> {
    let mut out = Vec::new();
    for &kind in &Kind::ALL {
        if !kind.matches(name) {
            continue;
        }
        out.push(match kind {
            Kind::Prop => Placement::Prop(Prop {
                name: name.to_owned(),
                file_name: file_name_from_mesh(mesh_name, PROP_EXTENSION),
                position: t.position_fixed(),
                rotation: t.rotation_fixed(),
                scale: t.scale_fixed(),
            }),
            Kind::Particle => Placement::Particle(Particle {
                name: name.to_owned(),
                position: t.position_fixed(),
                rotation: t.rotation_fixed(),
                scale: t.scale.z,
            }),
            Kind::Feedback => {
                let orientation = t.rotation_fixed();
                let q = Quaternion::new(
                    orientation[3].value(),
                    orientation[0].value(),
                    orientation[1].value(),
                    orientation[2].value(),
                );
                Placement::Feedback(Feedback {
                    name: name.to_owned(),
                    position: t.position_fixed(),
                    rotation_y: Fixed::new(rotation_around_y(&q)),
                    orientation,
                })
            },
            Kind::File => Placement::File(FileEntry {
                name: name.to_owned(),
                file_name: file_name_from_mesh(mesh_name, FILE_EXTENSION),
                position: t.position_fixed(),
                rotation: t.rotation_fixed(),
                scale: t.scale.z,
            }),
        });
    }
    out
}

/// Heading in radians around the vertical axis: `2·acos(w)`, mirrored to `2π − 2·acos(w)` when
/// `y > 0`.  Only meaningful for rotations purely around Y; other quaternions are not corrected.
pub fn rotation_around_y(q: &Quaternion<f64>) -> f64 {
    let a = 2.0 * q.w.acos();
    if q.j > 0.0 { 2.0 * PI - a } else { a }
}

/// Strip a Blender-style `.NNN` duplicate suffix from a mesh name.
pub fn strip_instance_suffix(name: &str) -> &str {
    let b = name.as_bytes();
    if b.len() >= 4
        && b[b.len() - 4] == b'.'
        && b[b.len() - 3 ..].iter().all(u8::is_ascii_digit)
    {
        &name[.. name.len() - 4]
    } else {
        name
    }
}

fn file_name_from_mesh(mesh_name: Option<&str>, extension: &str) -> Option<String> {
    let name = strip_instance_suffix(mesh_name?);
    if name.ends_with(extension) {
        Some(name.to_owned())
    } else {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn transform(t: [f32; 3], r: [f32; 4], s: [f32; 3]) -> Transform {
        let [x, y, z, w] = r;
        Transform {
            translation: t.into(),
            rotation: Quaternion::new(w, x, y, z),
            scale: s.into(),
        }
    }

    #[test]
    fn fixed_has_six_decimals() {
        assert_eq!(Fixed::new(1.0), "1.000000");
        assert_eq!(Fixed::new(-2.5), "-2.500000");
        assert_eq!(Fixed::new(0.1234567), "0.123457");
        assert_eq!(Fixed::from(0.1_f32), "0.100000");
        assert_eq!(Fixed::new(-0.0), "0.000000");
        assert_eq!(Fixed::new(1.5).to_string(), "1.500000");
    }

    #[test]
    fn fixed_ties_round_away_from_zero() {
        assert_eq!(Fixed::new(0.0078125), "0.007813");
        assert_eq!(Fixed::new(-0.0078125), "-0.007813");
        assert_eq!(Fixed::from(0.0078125_f32), "0.007813");
        assert_eq!(Fixed::new(1.5078125), "1.507813");
        assert_eq!(Fixed::new(0.0234375), "0.023438");
        // Not ties: one ulp either side of 1/128 still rounds to the nearer value.
        assert_eq!(Fixed::new(f64::from_bits(0.0078125_f64.to_bits() - 1)), "0.007812");
        assert_eq!(Fixed::new(0.00390625), "0.003906");
        assert_eq!(Fixed::new(2.5), "2.500000");
    }

    #[test]
    fn fixed_value_is_rounded_input() {
        assert_eq!(Fixed::new(0.70710678).value(), 0.707107);
    }

    #[test]
    fn instance_suffix() {
        assert_eq!(strip_instance_suffix("tree.prp.001"), "tree.prp");
        assert_eq!(strip_instance_suffix("tree.prp"), "tree.prp");
        assert_eq!(strip_instance_suffix("tree.prp.01"), "tree.prp.01");
        assert_eq!(strip_instance_suffix("tree.prp.0012"), "tree.prp.0012");
        assert_eq!(strip_instance_suffix("tree.prp.a01"), "tree.prp.a01");
        assert_eq!(strip_instance_suffix(".123"), "");
    }

    #[test]
    fn heading_of_y_rotations() {
        let identity = Quaternion::new(1.0, 0.0, 0.0, 0.0);
        assert_eq!(Fixed::new(rotation_around_y(&identity)), "0.000000");

        let half_turn = Quaternion::new(0.0, 0.0, 1.0, 0.0);
        assert_eq!(Fixed::new(rotation_around_y(&half_turn)), "3.141593");

        let pos = Quaternion::new(0.5, 0.0, 0.866025, 0.0);
        assert_eq!(Fixed::new(rotation_around_y(&pos)), "4.188790");
        let neg = Quaternion::new(0.5, 0.0, -0.866025, 0.0);
        assert_eq!(Fixed::new(rotation_around_y(&neg)), "2.094395");
    }

    #[test]
    fn prop_record() {
        let t = transform([1.0, 2.0, -3.25], [0.0, 0.0, 0.0, 1.0], [2.0, 1.0, 0.5]);
        let recs = classify("prop_tree", Some("tree_01.prp.003"), &t);
        assert_eq!(recs.len(), 1);
        let p = match &recs[0] {
            Placement::Prop(p) => p,
            other => panic!("expected prop, got {:?}", other),
        };
        assert_eq!(p.name, "prop_tree");
        assert_eq!(p.file_name.as_deref(), Some("tree_01.prp"));
        assert_eq!(p.position, [Fixed::new(1.0), Fixed::new(2.0), Fixed::new(-3.25)]);
        assert_eq!(p.rotation[3], "1.000000");
        assert_eq!(p.scale[2], "0.500000");
    }

    #[test]
    fn file_name_requires_extension() {
        let t = Transform::default();
        let recs = classify("prop_a", Some("Cube.001"), &t);
        assert!(matches!(&recs[0], Placement::Prop(p) if p.file_name.is_none()));

        let recs = classify("prop_a", Some("thing.cfg"), &t);
        assert!(matches!(&recs[0], Placement::Prop(p) if p.file_name.is_none()));

        let recs = classify("file_a", Some("thing.cfg.002"), &t);
        assert!(matches!(&recs[0],
            Placement::File(f) if f.file_name.as_deref() == Some("thing.cfg")));

        let recs = classify("file_a", Some("thing.prp"), &t);
        assert!(matches!(&recs[0], Placement::File(f) if f.file_name.is_none()));

        let recs = classify("file_a", None, &t);
        assert!(matches!(&recs[0], Placement::File(f) if f.file_name.is_none()));
    }

    #[test]
    fn particle_and_file_scale_is_raw_z() {
        let t = transform([0.0; 3], [0.0, 0.0, 0.0, 1.0], [1.0, 2.0, 3.5]);
        match &classify("particle_smoke", None, &t)[0] {
            Placement::Particle(p) => assert_eq!(p.scale, 3.5),
            other => panic!("expected particle, got {:?}", other),
        }
        match &classify("file_x", None, &Transform::default())[0] {
            Placement::File(f) => assert_eq!(f.scale, 1.0),
            other => panic!("expected file, got {:?}", other),
        }
    }

    #[test]
    fn feedback_heading() {
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let t = transform([0.5, 0.0, 1.0], [0.0, -s, 0.0, s], [1.0; 3]);
        match &classify("fc_worker", None, &t)[0] {
            Placement::Feedback(f) => {
                assert_eq!(f.orientation[1], "-0.707107");
                assert_eq!(f.orientation[3], "0.707107");
                let expected = 2.0 * 0.707107_f64.acos();
                assert_eq!(f.rotation_y, Fixed::new(expected));
                assert_eq!(f.position[0], "0.500000");
            },
            other => panic!("expected feedback, got {:?}", other),
        }
    }

    #[test]
    fn unmatched_names() {
        let t = Transform::default();
        assert!(classify("ground", None, &t).is_empty());
        assert!(classify("Prop_upper", None, &t).is_empty());
        assert!(classify("fc", None, &t).is_empty());
    }
}
