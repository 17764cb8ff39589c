//! Input sampling and press-edge detection
//!
//! Devices are polled by the host into a `RawInput` once per frame. The
//! keyboard is folded into a virtual pad using the standard gamepad button
//! layout, so every device goes through the same debounce table.

use crate::sim::TickInput;

/// Buttons tracked per device (standard gamepad mapping)
pub const BUTTON_COUNT: usize = 17;
/// Gamepads polled
pub const MAX_GAMEPADS: usize = 4;
/// Keyboard plus gamepads
pub const MAX_DEVICES: usize = MAX_GAMEPADS + 1;
const KEYBOARD_SLOT: usize = 0;
/// Stick deflection needed to count as a direction
pub const AXIS_THRESHOLD: f32 = 0.5;

/// Standard gamepad button indices
pub mod buttons {
    pub const SHOOT: usize = 0;
    /// Any face button other than shoot activates the power meter
    pub const POWERUP: [usize; 3] = [1, 2, 3];
    pub const START: usize = 9;
    pub const DPAD_UP: usize = 12;
    pub const DPAD_DOWN: usize = 13;
    pub const DPAD_LEFT: usize = 14;
    pub const DPAD_RIGHT: usize = 15;
}

/// Keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Z
    pub shoot: bool,
    /// X
    pub powerup: bool,
    /// Enter
    pub start: bool,
}

impl KeyState {
    /// Apply a key event by DOM key name. Returns false for unmapped keys.
    pub fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        let slot = match key {
            "ArrowUp" => &mut self.up,
            "ArrowDown" => &mut self.down,
            "ArrowLeft" => &mut self.left,
            "ArrowRight" => &mut self.right,
            "z" | "Z" => &mut self.shoot,
            "x" | "X" => &mut self.powerup,
            "Enter" => &mut self.start,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Keyboard as a virtual gamepad
    fn as_buttons(&self) -> [bool; BUTTON_COUNT] {
        let mut pressed = [false; BUTTON_COUNT];
        pressed[buttons::SHOOT] = self.shoot;
        pressed[buttons::POWERUP[0]] = self.powerup;
        pressed[buttons::START] = self.start;
        pressed[buttons::DPAD_UP] = self.up;
        pressed[buttons::DPAD_DOWN] = self.down;
        pressed[buttons::DPAD_LEFT] = self.left;
        pressed[buttons::DPAD_RIGHT] = self.right;
        pressed
    }
}

/// One connected gamepad's state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadSnapshot {
    pub buttons: [bool; BUTTON_COUNT],
    /// Left stick (x, y), -1..1, positive y is down
    pub axes: [f32; 2],
}

/// Everything sampled from the devices this frame
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    pub keyboard: KeyState,
    /// `None` for a disconnected slot
    pub gamepads: [Option<GamepadSnapshot>; MAX_GAMEPADS],
}

/// Merges devices into tick intents and turns discrete buttons into edges
#[derive(Debug, Clone)]
pub struct InputMapper {
    prev: [[bool; BUTTON_COUNT]; MAX_DEVICES],
    /// Demo mode flag passed through to every tick
    pub idle_mode: bool,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self {
            prev: [[false; BUTTON_COUNT]; MAX_DEVICES],
            idle_mode: false,
        }
    }
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only on the frame `button` goes down on `device`
    fn edge(&self, device: usize, pressed: &[bool; BUTTON_COUNT], button: usize) -> bool {
        pressed[button] && !self.prev[device][button]
    }

    fn apply_device(&mut self, device: usize, pressed: [bool; BUTTON_COUNT], out: &mut TickInput) {
        out.up |= pressed[buttons::DPAD_UP];
        out.down |= pressed[buttons::DPAD_DOWN];
        out.left |= pressed[buttons::DPAD_LEFT];
        out.right |= pressed[buttons::DPAD_RIGHT];

        out.shoot |= self.edge(device, &pressed, buttons::SHOOT);
        out.powerup |= buttons::POWERUP
            .iter()
            .any(|&b| self.edge(device, &pressed, b));
        out.start |= self.edge(device, &pressed, buttons::START);

        self.prev[device] = pressed;
    }

    /// Produce this frame's intents
    pub fn map(&mut self, raw: &RawInput) -> TickInput {
        let mut out = TickInput {
            idle_mode: self.idle_mode,
            ..Default::default()
        };

        self.apply_device(KEYBOARD_SLOT, raw.keyboard.as_buttons(), &mut out);

        for (i, pad) in raw.gamepads.iter().enumerate() {
            let device = KEYBOARD_SLOT + 1 + i;
            match pad {
                Some(pad) => {
                    let [x, y] = pad.axes;
                    out.left |= x < -AXIS_THRESHOLD;
                    out.right |= x > AXIS_THRESHOLD;
                    out.up |= y < -AXIS_THRESHOLD;
                    out.down |= y > AXIS_THRESHOLD;
                    self.apply_device(device, pad.buttons, &mut out);
                }
                None => {
                    // Reconnecting with a button held must not fire
                    // against stale history
                    self.prev[device] = [false; BUTTON_COUNT];
                }
            }
        }

        out
    }
}
