use anyhow::Result;

use sheen_math::Vec3;
use sheen_viewport::PbrScene;

fn main() -> Result<()> {
    sheen_viewer::run::<PbrScene>("Sheen PBR", Vec3::new(0.0, 0.0, 3.0))
}
