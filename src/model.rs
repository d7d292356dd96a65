use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::path::Path;
use log::{debug, warn};
use crate::error::Result;
use crate::ground::{self, DecalExtents, GroundVertex};
use crate::record::{self, Feedback, FileEntry, Kind, Particle, Placement, Prop, Transform};
use crate::scene::SceneFile;


/// Placement records extracted from a glTF scene, keyed by node name.
///
/// The ground footprint is decoded on first use and cached, including a "no ground" result.  The
/// cache is a plain `OnceCell`, so a `ProppedModel` can't be shared between threads.
pub struct ProppedModel {
    scene: SceneFile,
    props: BTreeMap<String, Prop>,
    particles: BTreeMap<String, Particle>,
    feedbacks: BTreeMap<String, Feedback>,
    files: BTreeMap<String, FileEntry>,
    ground: OnceCell<Option<Vec<GroundVertex>>>,
}

impl ProppedModel {
    pub fn from_file(path: impl AsRef<Path>) -> Result<ProppedModel> {
        let scene = SceneFile::open(path)?;
        Ok(ProppedModel::from_scene(scene))
    }

    pub fn from_scene(scene: SceneFile) -> ProppedModel {
        let mut m = ProppedModel {
            scene,
            props: BTreeMap::new(),
            particles: BTreeMap::new(),
            feedbacks: BTreeMap::new(),
            files: BTreeMap::new(),
            ground: OnceCell::new(),
        };

        let mesh_count = m.scene.root().meshes.len();
        let mut placements = Vec::new();
        for (i, node) in m.scene.nodes().iter().enumerate() {
            let name = match node.name.as_deref() {
                Some(x) => x,
                None => continue,
            };

            let mesh_name = match node.mesh.map(|x| x.value()) {
                Some(idx) if idx >= mesh_count => {
                    warn!("node {} ({}): invalid mesh index {}", i, name, idx);
                    None
                },
                Some(idx) => m.scene.mesh_name(idx),
                None => None,
            };

            placements.extend(record::classify(name, mesh_name, &Transform::from_node(node)));
        }

        for p in placements {
            debug!("{} {}", p.kind().as_str(), p.name());
            match p {
                Placement::Prop(x) => { m.props.insert(x.name.clone(), x); },
                Placement::Particle(x) => { m.particles.insert(x.name.clone(), x); },
                Placement::Feedback(x) => { m.feedbacks.insert(x.name.clone(), x); },
                Placement::File(x) => { m.files.insert(x.name.clone(), x); },
            }
        }

        m
    }

    pub fn scene(&self) -> &SceneFile {
        &self.scene
    }

    pub fn props(&self) -> impl Iterator<Item = &Prop> {
        self.props.values()
    }

    pub fn prop(&self, name: &str) -> Option<&Prop> {
        self.props.get(name)
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.values()
    }

    pub fn particle(&self, name: &str) -> Option<&Particle> {
        self.particles.get(name)
    }

    pub fn feedbacks(&self) -> impl Iterator<Item = &Feedback> {
        self.feedbacks.values()
    }

    pub fn feedback(&self, name: &str) -> Option<&Feedback> {
        self.feedbacks.get(name)
    }

    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.values()
    }

    pub fn file(&self, name: &str) -> Option<&FileEntry> {
        self.files.get(name)
    }

    pub fn count(&self, kind: Kind) -> usize {
        match kind {
            Kind::Prop => self.props.len(),
            Kind::Particle => self.particles.len(),
            Kind::Feedback => self.feedbacks.len(),
            Kind::File => self.files.len(),
        }
    }

    /// All records, grouped by kind.
    pub fn placements(&self) -> Vec<Placement> {
        let mut v = Vec::with_capacity(Kind::ALL.iter().map(|&k| self.count(k)).sum());
        v.extend(self.props().cloned().map(Placement::Prop));
        v.extend(self.particles().cloned().map(Placement::Particle));
        v.extend(self.feedbacks().cloned().map(Placement::Feedback));
        v.extend(self.files().cloned().map(Placement::File));
        v
    }

    /// Up to four ground vertices, or `None` if the scene has no usable ground mesh.
    pub fn ground_vertices(&self) -> Option<&[GroundVertex]> {
        self.ground.get_or_init(|| ground::ground_vertices(&self.scene)).as_deref()
    }

    /// Whether the ground lookup has already run.
    pub fn ground_resolved(&self) -> bool {
        self.ground.get().is_some()
    }

    pub fn build_blocker(&self) -> Option<Vec<GroundVertex>> {
        self.ground_vertices().map(ground::build_blocker)
    }

    pub fn decal_extents(&self) -> Option<DecalExtents> {
        self.ground_vertices().and_then(ground::decal_extents)
    }
}
