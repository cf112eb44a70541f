use winit::keyboard::KeyCode;

/// Which of the two scenes is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SceneKind {
    #[default]
    Family,
    Robot,
}

impl SceneKind {
    pub fn other(self) -> Self {
        match self {
            SceneKind::Family => SceneKind::Robot,
            SceneKind::Robot => SceneKind::Family,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SceneKind::Family => "family",
            SceneKind::Robot => "robot",
        }
    }
}

/// Boolean inputs selecting optional figures and animations.
///
/// The family flags decide which figures exist; the rest only steer the
/// frame updater and never force a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneFlags {
    pub has_son: bool,
    pub has_daughter: bool,
    pub has_wife: bool,
    pub is_walking: bool,
    pub is_dancing: bool,
    pub is_hovering: bool,
}

/// The part of the flags that determines scene structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FigureSet {
    pub has_son: bool,
    pub has_daughter: bool,
    pub has_wife: bool,
}

impl SceneFlags {
    pub fn figure_set(&self) -> FigureSet {
        FigureSet {
            has_son: self.has_son,
            has_daughter: self.has_daughter,
            has_wife: self.has_wife,
        }
    }

    /// Number of figures the family scene builds for these flags
    pub fn family_size(&self) -> usize {
        1 + [self.has_wife, self.has_son, self.has_daughter]
            .iter()
            .filter(|f| **f)
            .count()
    }
}

/// Everything a key press can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    ToggleWife,
    ToggleSon,
    ToggleDaughter,
    StartWalking,
    StopWalking,
    DanceBurst,
    ToggleHover,
    SwitchScene,
    Quit,
}

impl InputAction {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        let action = match key {
            KeyCode::Digit1 => InputAction::ToggleWife,
            KeyCode::Digit2 => InputAction::ToggleSon,
            KeyCode::Digit3 => InputAction::ToggleDaughter,
            KeyCode::KeyW => InputAction::StartWalking,
            KeyCode::KeyS => InputAction::StopWalking,
            KeyCode::KeyD => InputAction::DanceBurst,
            KeyCode::KeyH => InputAction::ToggleHover,
            KeyCode::Tab => InputAction::SwitchScene,
            KeyCode::Escape => InputAction::Quit,
            _ => return None,
        };
        Some(action)
    }

    /// Applies a flag action; returns true if the figure set changed.
    ///
    /// Dance bursts, scene switches and quitting are timed or handled by the
    /// caller, so they leave the flags untouched here.
    pub fn apply(self, flags: &mut SceneFlags) -> bool {
        let before = flags.figure_set();
        match self {
            InputAction::ToggleWife => flags.has_wife = !flags.has_wife,
            InputAction::ToggleSon => flags.has_son = !flags.has_son,
            InputAction::ToggleDaughter => flags.has_daughter = !flags.has_daughter,
            InputAction::StartWalking => flags.is_walking = true,
            InputAction::StopWalking => flags.is_walking = false,
            InputAction::ToggleHover => flags.is_hovering = !flags.is_hovering,
            InputAction::DanceBurst | InputAction::SwitchScene | InputAction::Quit => {}
        }
        flags.figure_set() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_toggles_change_the_figure_set() {
        let mut flags = SceneFlags::default();
        assert!(InputAction::ToggleSon.apply(&mut flags));
        assert!(flags.has_son);
        assert!(InputAction::ToggleSon.apply(&mut flags));
        assert!(!flags.has_son);
    }

    #[test]
    fn animation_flags_do_not_rebuild() {
        let mut flags = SceneFlags::default();
        assert!(!InputAction::StartWalking.apply(&mut flags));
        assert!(!InputAction::ToggleHover.apply(&mut flags));
        assert!(flags.is_walking && flags.is_hovering);
        assert!(!InputAction::StopWalking.apply(&mut flags));
        assert!(!flags.is_walking);
    }

    #[test]
    fn key_bindings() {
        assert_eq!(InputAction::from_key(KeyCode::Digit1), Some(InputAction::ToggleWife));
        assert_eq!(InputAction::from_key(KeyCode::Tab), Some(InputAction::SwitchScene));
        assert_eq!(InputAction::from_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn family_size_counts_flags() {
        let flags = SceneFlags {
            has_son: true,
            has_wife: true,
            ..Default::default()
        };
        assert_eq!(flags.family_size(), 3);
        assert_eq!(SceneKind::Family.other(), SceneKind::Robot);
    }
}
