//! Assembly of the MEMPHIS stage: letters, palm and lights.

pub use self::letters::{column, Glyph, BASELINE, CAP_HEIGHT};
pub use self::palm::{generate as generate_palm, PalmParams};

use crate::light;
use crate::resource::{Finish, GeometryManager, MaterialManager, Shape};
use crate::scene::SceneNode3d;
use glamx::Vec3;

mod letters;
mod palm;

/// The lines of the word, top to bottom.
pub const LINES: [&[Glyph]; 2] = [
    &[Glyph::M, Glyph::E, Glyph::M2],
    &[Glyph::P, Glyph::H, Glyph::I, Glyph::S],
];

/// Gap between two letters of a line.
pub const LETTER_SPACING: f32 = 0.9;
/// Vertical distance between the baselines of two lines.
pub const LINE_HEIGHT: f32 = 6.6;

/// Where the palm stands, relative to the stage root.
const PALM_POSITION: Vec3 = Vec3::new(-9.4, -8.6, -2.5);

/// The shared catalogs the assembler picks geometries and materials from.
pub struct Parts<'a> {
    geometries: &'a GeometryManager,
    materials: &'a MaterialManager,
}

impl<'a> Parts<'a> {
    /// Creates the parts bin over the two catalogs.
    pub fn new(geometries: &'a GeometryManager, materials: &'a MaterialManager) -> Self {
        Parts {
            geometries,
            materials,
        }
    }

    /// Adds a mesh of `shape` with `finish` as a child of `parent`.
    pub fn add(&self, parent: &mut SceneNode3d, shape: Shape, finish: Finish) -> SceneNode3d {
        parent.add_mesh(self.geometries.get(shape), self.materials.get(finish))
    }
}

/// The assembled scene.
pub struct Stage {
    /// Root of the whole scene.
    pub root: SceneNode3d,
    /// The letter groups, in reading order.
    pub letters: Vec<SceneNode3d>,
    /// The palm group.
    pub palm: SceneNode3d,
    /// The light nodes.
    pub lights: Vec<SceneNode3d>,
}

impl Stage {
    /// The top-level groups the animation drives, with their response weight.
    ///
    /// Letters further along the word respond a bit more, up to the full offset for the
    /// last one; the palm responds less than any letter.
    pub fn animated_groups(&self) -> Vec<(SceneNode3d, f32)> {
        let n = self.letters.len().max(2) - 1;
        let mut groups: Vec<_> = self
            .letters
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), 0.7 + 0.3 * i as f32 / n as f32))
            .collect();
        groups.push((self.palm.clone(), 0.6));
        groups
    }

    /// The number of nodes and meshes of the scene.
    pub fn summary(&self) -> (usize, usize) {
        let mut meshes = 0;
        self.root.apply_to_objects(&mut |_| meshes += 1);
        (self.root.num_nodes(), meshes)
    }
}

/// Builds the whole stage from the two catalogs.
pub fn assemble(
    geometries: &GeometryManager,
    materials: &MaterialManager,
    palm_params: &PalmParams,
) -> Stage {
    let parts = Parts::new(geometries, materials);
    let mut root = SceneNode3d::named("stage");
    let mut letters = Vec::new();

    let first_baseline = (LINES.len() - 1) as f32 * LINE_HEIGHT / 2.0
        - (BASELINE + CAP_HEIGHT) / 2.0
        + 0.25;

    for (row, line) in LINES.iter().enumerate() {
        let y = first_baseline - row as f32 * LINE_HEIGHT;
        let width: f32 = line.iter().map(|g| g.width()).sum::<f32>()
            + LETTER_SPACING * (line.len() - 1) as f32;
        let mut x = -width / 2.0;

        for glyph in line.iter() {
            let mut letter = glyph.build(&parts);
            let _ = letter.set_position(Vec3::new(x + glyph.width() / 2.0, y, 0.0));
            root.add_child(letter.clone());
            letters.push(letter);
            x += glyph.width() + LETTER_SPACING;
        }
    }

    let mut palm = palm::generate(palm_params, &parts);
    let _ = palm.set_position(PALM_POSITION);
    root.add_child(palm.clone());

    let lights = light::stage_lights()
        .into_iter()
        .map(|(position, light)| root.add_light(light).set_position(position))
        .collect();

    let stage = Stage {
        root,
        letters,
        palm,
        lights,
    };

    let (nodes, meshes) = stage.summary();
    log::info!(
        "Assembled {} letters and a palm: {} nodes, {} meshes, {} geometries, {} materials.",
        stage.letters.len(),
        nodes,
        meshes,
        geometries.iter().count(),
        materials.iter().count()
    );

    stage
}
