use crate::propagator::RenderPosition;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Radius of the planet sphere in render units.
pub const RENDER_RADIUS: f64 = 2.0;
pub const KM_TO_RENDER: f64 = RENDER_RADIUS / EARTH_RADIUS_KM;

/// Map an Earth-centered inertial position (km) into render space.
///
/// The inertial `z` axis (pole) becomes render `y` (up), and inertial `y`
/// becomes render `-z` to match the renderer's right-handed, y-up frame.
pub fn eci_to_render(position_km: [f64; 3]) -> RenderPosition {
    let [x, y, z] = position_km;
    [
        (x * KM_TO_RENDER) as f32,
        (z * KM_TO_RENDER) as f32,
        (-y * KM_TO_RENDER) as f32,
    ]
}
