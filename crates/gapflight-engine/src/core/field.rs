/// Dimensions of the play field in pixels.
///
/// Agents never move horizontally on screen: they sit at [`Field::AGENT_X`]
/// while the camera scrolls the obstacles past them.
#[derive(Debug, Clone, Copy)]
pub struct Field;

impl Field {
    /// Width of the visible field.
    pub const WIDTH: u32 = 1280;
    /// Height of the visible field.
    pub const HEIGHT: u32 = 720;
    /// Screen x coordinate of every agent's hitbox.
    pub const AGENT_X: f32 = 100.0;

    /// Returns the world x coordinate of an agent for the given camera offset.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn agent_world_x(camera: u32) -> f32 {
        camera as f32 + Self::AGENT_X
    }
}
