//! Lighting state and transition rules
//!
//! Every output of the fixture is a function of [`Lighting`] and the event
//! being applied. The machine never touches hardware; it returns the
//! [`Actions`] the controller must perform, in order.

use lumino_protocol::VpUpdate;

use super::actions::{Action, Actions, PwmLevels};
use super::events::{Event, RemoteKey, Vp};
use crate::config::{LightingConfig, Preset, MAX_LEVEL};

/// Current lighting state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lighting {
    config: LightingConfig,
    power: bool,
    brightness: u8,
    cct: u8,
    /// Last non-zero screen value applied to the backlight
    prev_screen: u16,
}

impl Lighting {
    /// Start powered off, holding the power-on defaults
    pub fn new(config: LightingConfig) -> Self {
        Self {
            config,
            power: false,
            brightness: config.default_brightness,
            cct: config.default_cct,
            prev_screen: 0,
        }
    }

    pub fn is_on(&self) -> bool {
        self.power
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn cct(&self) -> u8 {
        self.cct
    }

    /// Levels the dimmer should show right now
    pub fn levels(&self) -> PwmLevels {
        if self.power {
            PwmLevels {
                white: self.brightness,
                warm: self.cct,
            }
        } else {
            PwmLevels::OFF
        }
    }

    /// Actions run once at boot: clear the display's preset flags and
    /// drive the outputs from the current state
    pub fn startup(&self) -> Actions {
        let mut actions = Actions::new();
        for vp in [Vp::MemoryOne, Vp::MemoryTwo, Vp::EndoMax] {
            push(&mut actions, write(vp, 0));
        }
        push(&mut actions, Action::UpdatePwm(self.levels()));
        actions
    }

    /// Apply an event and return the resulting actions
    ///
    /// An empty list means the event changed nothing.
    pub fn apply(&mut self, event: Event) -> Actions {
        match event {
            Event::Remote(key) => self.apply_remote(key),
            Event::Display(update) => self.apply_display(update),
        }
    }

    fn apply_remote(&mut self, key: RemoteKey) -> Actions {
        let mut actions = Actions::new();

        if key == RemoteKey::Power {
            if self.power {
                self.power = false;
                push(&mut actions, write(Vp::Power, 0));
                push(&mut actions, Action::SetPage(0));
            } else {
                push(&mut actions, Action::SetPage(1));
                push(&mut actions, write(Vp::Power, 1));
                self.power_on();
            }
            self.refresh_and_sync(&mut actions);
            return actions;
        }

        if !self.power {
            return actions;
        }

        let before = (self.brightness, self.cct);
        let max_brightness = self.config.max_brightness;
        let max_cct = self.config.max_cct;
        match key {
            RemoteKey::BrightnessUp => self.brightness = (self.brightness + 1).min(max_brightness),
            RemoteKey::BrightnessDown => self.brightness = self.brightness.saturating_sub(1),
            RemoteKey::CctStep => {
                self.cct = if self.cct < max_cct {
                    self.cct + 1
                } else if self.config.cct_key_wraps {
                    0
                } else {
                    max_cct
                };
            }
            RemoteKey::Endo => self.set_preset(self.config.presets.endo),
            RemoteKey::MemoryOne => self.set_preset(self.config.presets.memory_one),
            RemoteKey::Max => self.set_preset(self.config.presets.max),
            RemoteKey::MemoryTwo => self.set_preset(self.config.presets.memory_two),
            RemoteKey::Power => {}
        }

        // A key held against its limit leaves outputs and display alone
        if (self.brightness, self.cct) != before {
            self.refresh_and_sync(&mut actions);
        }
        actions
    }

    fn apply_display(&mut self, update: VpUpdate) -> Actions {
        let mut actions = Actions::new();
        let Some(vp) = Vp::from_address(update.address) else {
            return actions;
        };
        let value = update.value;

        match vp {
            Vp::Power => {
                if value != 0 && !self.power {
                    self.power_on();
                    self.refresh_and_sync(&mut actions);
                } else if value == 0 && self.power {
                    self.power = false;
                    self.refresh(&mut actions);
                }
            }
            Vp::Brightness => {
                if let Some(level) = self.accept_level(value, self.brightness, self.config.max_brightness) {
                    self.brightness = level;
                    self.refresh(&mut actions);
                }
            }
            Vp::Cct => {
                if let Some(level) = self.accept_level(value, self.cct, self.config.max_cct) {
                    self.cct = level;
                    self.refresh(&mut actions);
                }
            }
            Vp::MemoryOne | Vp::MemoryTwo | Vp::EndoMax => {
                let presets = self.config.presets;
                let preset = match (vp, value) {
                    (Vp::MemoryOne, 1) => Some(presets.memory_one),
                    (Vp::MemoryTwo, 1) => Some(presets.memory_two),
                    (Vp::EndoMax, 1) => Some(presets.endo),
                    (Vp::EndoMax, 2) => Some(presets.max),
                    _ => None,
                };
                if let (true, Some(preset)) = (self.power, preset) {
                    self.set_preset(preset);
                    self.refresh(&mut actions);
                    push(&mut actions, write(vp, 0));
                    self.sync(&mut actions);
                }
            }
            Vp::Screen => {
                if value == 0 {
                    self.prev_screen = 0;
                } else if value != self.prev_screen {
                    self.prev_screen = value;
                    let tenths = value.min(u16::from(MAX_LEVEL)) as u8;
                    push(&mut actions, Action::SetBacklight(tenths * 10));
                }
            }
        }

        actions
    }

    /// A display-requested level, if it is allowed and different
    fn accept_level(&self, value: u16, current: u8, max: u8) -> Option<u8> {
        let level = u8::try_from(value).ok()?;
        (self.power && level <= max && level != current).then_some(level)
    }

    fn power_on(&mut self) {
        self.power = true;
        self.set_preset(self.config.defaults());
    }

    fn set_preset(&mut self, preset: Preset) {
        self.brightness = preset.brightness;
        self.cct = preset.cct;
    }

    fn refresh(&self, actions: &mut Actions) {
        push(actions, Action::UpdatePwm(self.levels()));
    }

    /// Push brightness and colour temperature back to the display
    fn sync(&self, actions: &mut Actions) {
        push(actions, write(Vp::Brightness, self.brightness.into()));
        push(actions, write(Vp::Cct, self.cct.into()));
    }

    fn refresh_and_sync(&self, actions: &mut Actions) {
        self.refresh(actions);
        self.sync(actions);
    }
}

fn write(vp: Vp, value: u16) -> Action {
    Action::WriteVp {
        address: vp.address(),
        value,
    }
}

fn push(actions: &mut Actions, action: Action) {
    // No event produces more than MAX_ACTIONS actions
    let _ = actions.push(action);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lighting() -> Lighting {
        Lighting::new(LightingConfig::default())
    }

    fn powered() -> Lighting {
        let mut lighting = lighting();
        lighting.apply(Event::Remote(RemoteKey::Power));
        lighting
    }

    fn display(vp: Vp, value: u16) -> Event {
        Event::Display(VpUpdate {
            address: vp.address(),
            value,
        })
    }

    fn pwm(white: u8, warm: u8) -> Action {
        Action::UpdatePwm(PwmLevels { white, warm })
    }

    #[test]
    fn test_starts_off_with_defaults() {
        let lighting = lighting();
        assert!(!lighting.is_on());
        assert_eq!(lighting.brightness(), 7);
        assert_eq!(lighting.cct(), 3);
        assert_eq!(lighting.levels(), PwmLevels::OFF);
    }

    #[test]
    fn test_startup_clears_preset_flags() {
        let actions = lighting().startup();
        assert_eq!(
            actions.as_slice(),
            &[
                write(Vp::MemoryOne, 0),
                write(Vp::MemoryTwo, 0),
                write(Vp::EndoMax, 0),
                pwm(0, 0),
            ]
        );
    }

    #[test]
    fn test_remote_power_on_sequence() {
        let mut lighting = lighting();
        let actions = lighting.apply(Event::Remote(RemoteKey::Power));

        assert!(lighting.is_on());
        assert_eq!(
            actions.as_slice(),
            &[
                Action::SetPage(1),
                write(Vp::Power, 1),
                pwm(7, 3),
                write(Vp::Brightness, 7),
                write(Vp::Cct, 3),
            ]
        );
    }

    #[test]
    fn test_remote_power_off_sequence() {
        let mut lighting = powered();
        let actions = lighting.apply(Event::Remote(RemoteKey::Power));

        assert!(!lighting.is_on());
        assert_eq!(
            actions.as_slice(),
            &[
                write(Vp::Power, 0),
                Action::SetPage(0),
                pwm(0, 0),
                write(Vp::Brightness, 7),
                write(Vp::Cct, 3),
            ]
        );
    }

    #[test]
    fn test_power_on_resets_to_defaults() {
        let mut lighting = powered();
        lighting.apply(Event::Remote(RemoteKey::Max));
        lighting.apply(Event::Remote(RemoteKey::Power));
        lighting.apply(Event::Remote(RemoteKey::Power));

        assert_eq!(lighting.brightness(), 7);
        assert_eq!(lighting.cct(), 3);
    }

    #[test]
    fn test_keys_ignored_while_off() {
        let mut lighting = lighting();
        for key in RemoteKey::ALL.into_iter().filter(|k| *k != RemoteKey::Power) {
            assert!(lighting.apply(Event::Remote(key)).is_empty());
        }
        assert_eq!(lighting.brightness(), 7);
    }

    #[test]
    fn test_brightness_clamps() {
        let mut lighting = powered();
        for _ in 0..20 {
            lighting.apply(Event::Remote(RemoteKey::BrightnessUp));
        }
        assert_eq!(lighting.brightness(), 10);

        for _ in 0..20 {
            lighting.apply(Event::Remote(RemoteKey::BrightnessDown));
        }
        assert_eq!(lighting.brightness(), 0);
    }

    #[test]
    fn test_key_at_limit_changes_nothing() {
        let mut lighting = powered();
        lighting.apply(Event::Remote(RemoteKey::Max));
        assert!(lighting.apply(Event::Remote(RemoteKey::BrightnessUp)).is_empty());
        assert!(lighting.apply(Event::Remote(RemoteKey::CctStep)).is_empty());
        assert_eq!((lighting.brightness(), lighting.cct()), (10, 10));

        for _ in 0..10 {
            assert!(!lighting.apply(Event::Remote(RemoteKey::BrightnessDown)).is_empty());
        }
        assert_eq!(lighting.brightness(), 0);
        assert!(lighting.apply(Event::Remote(RemoteKey::BrightnessDown)).is_empty());
    }

    #[test]
    fn test_repeated_preset_changes_nothing() {
        let mut lighting = powered();
        assert!(!lighting.apply(Event::Remote(RemoteKey::MemoryOne)).is_empty());
        assert!(lighting.apply(Event::Remote(RemoteKey::MemoryOne)).is_empty());
    }

    #[test]
    fn test_key_resyncs_display() {
        let mut lighting = powered();
        let actions = lighting.apply(Event::Remote(RemoteKey::BrightnessUp));
        assert_eq!(
            actions.as_slice(),
            &[pwm(8, 3), write(Vp::Brightness, 8), write(Vp::Cct, 3)]
        );
    }

    #[test]
    fn test_cct_key_clamps_by_default() {
        let mut lighting = powered();
        for _ in 0..20 {
            lighting.apply(Event::Remote(RemoteKey::CctStep));
        }
        assert_eq!(lighting.cct(), 10);
    }

    #[test]
    fn test_cct_key_wraps_when_configured() {
        let mut lighting = Lighting::new(LightingConfig {
            cct_key_wraps: true,
            ..LightingConfig::DEFAULT
        });
        lighting.apply(Event::Remote(RemoteKey::Power));
        for _ in 0..7 {
            lighting.apply(Event::Remote(RemoteKey::CctStep));
        }
        assert_eq!(lighting.cct(), 10);

        lighting.apply(Event::Remote(RemoteKey::CctStep));
        assert_eq!(lighting.cct(), 0);
    }

    #[test]
    fn test_remote_presets() {
        let mut lighting = powered();
        let cases = [
            (RemoteKey::Endo, (1, 1)),
            (RemoteKey::MemoryOne, (6, 4)),
            (RemoteKey::Max, (10, 10)),
            (RemoteKey::MemoryTwo, (4, 7)),
        ];
        for (key, (brightness, cct)) in cases {
            let actions = lighting.apply(Event::Remote(key));
            assert_eq!(actions[0], pwm(brightness, cct));
            assert_eq!((lighting.brightness(), lighting.cct()), (brightness, cct));
        }
    }

    #[test]
    fn test_display_power() {
        let mut lighting = lighting();
        let actions = lighting.apply(display(Vp::Power, 1));
        assert!(lighting.is_on());
        assert_eq!(
            actions.as_slice(),
            &[pwm(7, 3), write(Vp::Brightness, 7), write(Vp::Cct, 3)]
        );

        // already on: nothing to do
        assert!(lighting.apply(display(Vp::Power, 1)).is_empty());

        let actions = lighting.apply(display(Vp::Power, 0));
        assert!(!lighting.is_on());
        assert_eq!(actions.as_slice(), &[pwm(0, 0)]);
    }

    #[test]
    fn test_display_brightness_no_echo() {
        let mut lighting = powered();
        let actions = lighting.apply(display(Vp::Brightness, 4));
        assert_eq!(actions.as_slice(), &[pwm(4, 3)]);
    }

    #[test]
    fn test_display_write_idempotent() {
        let mut lighting = powered();
        lighting.apply(display(Vp::Cct, 9));
        let before = lighting.clone();

        let actions = lighting.apply(display(Vp::Cct, 9));
        assert!(actions.is_empty());
        assert_eq!(lighting.cct(), before.cct());
        assert_eq!(lighting.brightness(), before.brightness());
    }

    #[test]
    fn test_display_level_out_of_range_ignored() {
        let mut lighting = powered();
        assert!(lighting.apply(display(Vp::Brightness, 11)).is_empty());
        assert!(lighting.apply(display(Vp::Cct, 0x0105)).is_empty());
        assert_eq!(lighting.brightness(), 7);
        assert_eq!(lighting.cct(), 3);
    }

    #[test]
    fn test_display_levels_need_power() {
        let mut lighting = lighting();
        assert!(lighting.apply(display(Vp::Brightness, 2)).is_empty());
        assert_eq!(lighting.brightness(), 7);
    }

    #[test]
    fn test_display_memory_button() {
        let mut lighting = powered();
        let actions = lighting.apply(display(Vp::MemoryTwo, 1));
        assert_eq!(
            actions.as_slice(),
            &[
                pwm(4, 7),
                write(Vp::MemoryTwo, 0),
                write(Vp::Brightness, 4),
                write(Vp::Cct, 7),
            ]
        );

        // the flag being cleared is echoed back as 0
        assert!(lighting.apply(display(Vp::MemoryTwo, 0)).is_empty());
    }

    #[test]
    fn test_display_endo_max_selector() {
        let mut lighting = powered();
        lighting.apply(display(Vp::EndoMax, 2));
        assert_eq!((lighting.brightness(), lighting.cct()), (10, 10));

        let actions = lighting.apply(display(Vp::EndoMax, 1));
        assert_eq!(actions[1], write(Vp::EndoMax, 0));
        assert_eq!((lighting.brightness(), lighting.cct()), (1, 1));

        assert!(lighting.apply(display(Vp::EndoMax, 3)).is_empty());
    }

    #[test]
    fn test_presets_need_power() {
        let mut lighting = lighting();
        assert!(lighting.apply(display(Vp::MemoryOne, 1)).is_empty());
        assert!(lighting.apply(display(Vp::EndoMax, 2)).is_empty());
    }

    #[test]
    fn test_screen_backlight() {
        let mut lighting = lighting();
        assert_eq!(
            lighting.apply(display(Vp::Screen, 5)).as_slice(),
            &[Action::SetBacklight(50)]
        );
        // same value again: no write
        assert!(lighting.apply(display(Vp::Screen, 5)).is_empty());

        // zero forgets the previous value
        assert!(lighting.apply(display(Vp::Screen, 0)).is_empty());
        assert_eq!(
            lighting.apply(display(Vp::Screen, 5)).as_slice(),
            &[Action::SetBacklight(50)]
        );
    }

    #[test]
    fn test_screen_value_clamped() {
        let mut lighting = lighting();
        assert_eq!(
            lighting.apply(display(Vp::Screen, 40)).as_slice(),
            &[Action::SetBacklight(100)]
        );
    }

    #[test]
    fn test_unknown_address_ignored() {
        let mut lighting = powered();
        let update = VpUpdate {
            address: 0x3000,
            value: 1,
        };
        assert!(lighting.apply(Event::Display(update)).is_empty());
    }
}
