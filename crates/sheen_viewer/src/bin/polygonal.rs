use anyhow::Result;

use sheen_math::Vec3;
use sheen_viewport::PolygonalScene;

fn main() -> Result<()> {
    sheen_viewer::run::<PolygonalScene>("Sheen Polygonal", Vec3::new(0.0, 0.0, 5.0))
}
