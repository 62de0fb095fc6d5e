/// Display specifications
pub mod display {
    /// Bottom screen width in pixels (touchscreen)
    pub const BOTTOM_WIDTH: u32 = 320;

    /// Bottom screen height in pixels (touchscreen)
    pub const BOTTOM_HEIGHT: u32 = 240;
}

/// Touchscreen coordinate specifications
///
/// Touch positions handed to the emulator are normalized against the last
/// addressable pixel of the bottom screen, not its size.
pub mod touch {
    use super::display;

    /// Divisor applied to a pixel X coordinate (319)
    pub const X_DIVISOR: i32 = display::BOTTOM_WIDTH as i32 - 1;

    /// Divisor applied to a pixel Y coordinate (239)
    pub const Y_DIVISOR: i32 = display::BOTTOM_HEIGHT as i32 - 1;
}
