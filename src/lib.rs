/*!
# Memphis3d

Generative 3D typography: the word **MEMPHIS** spelled with cylinders, spheres, cones,
tori and boxes in a Memphis-design palette, next to a procedurally grown palm tree.
The whole stage leans and drifts toward the mouse cursor or the touching finger.

The scene is a plain scene graph of shared geometries and materials:

```no_run
use memphis3d::prelude::*;

let geometries = GeometryManager::new();
let materials = MaterialManager::new();
let stage = typography::assemble(&geometries, &materials, &PalmParams::default());

assert_eq!(stage.letters.len(), "MEMPHIS".len());
```

Running the binary opens a window and animates the stage:

```no_run
use memphis3d::config::Settings;

pollster::block_on(memphis3d::app::run(Settings::from_env()));
```

Controls:

* `mouse move` / `touch`: steer the stage.
* `space`: freeze or resume the animation.
* `escape`: quit.

The gold parts are shaded with a matcap image. Set `MEMPHIS_MATCAP` to the path or the
http(s) URL of a matcap to use it; a procedural one is used until it is decoded, or if it
cannot be read.
*/
#![allow(clippy::module_inception)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

#[cfg(feature = "serde")]
extern crate serde;

pub use glamx;

pub mod animation;
pub mod app;
pub mod camera;
pub mod color;
pub mod config;
pub mod context;
pub mod event;
pub mod interaction;
pub mod light;
pub mod procedural;
pub mod renderer;
pub mod resource;
pub mod scene;
pub mod typography;
pub mod window;

pub mod prelude {
    pub use crate::animation::*;
    pub use crate::camera::*;
    pub use crate::color::*;
    pub use crate::config::*;
    pub use crate::event::*;
    pub use crate::interaction::*;
    pub use crate::light::*;
    pub use crate::resource::*;
    pub use crate::scene::*;
    pub use crate::typography::{self, Glyph, PalmParams, Stage};
    pub use crate::window::*;
    pub use glamx::{Pose3, Quat, Vec2, Vec3};
}
