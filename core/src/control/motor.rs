use crate::control::flags::StatusRegister;
use crate::diagnostics::LogManager;
use crate::processing::classifier::DeviceState;

pub const MAX_SPEED_PERCENT: u8 = 100;

/// Speed ramp from rest to `target` in `steps` equal increments, endpoints included.
pub fn ramp_profile(target: u8, steps: u8) -> Vec<u8> {
    let target = target.min(MAX_SPEED_PERCENT);
    if steps == 0 {
        return vec![target];
    }
    (0..=steps)
        .map(|step| (u16::from(target) * u16::from(step) / u16::from(steps)) as u8)
        .collect()
}

/// Speed command and status register of one motor.
pub struct Motor {
    id: u8,
    speed_percent: u8,
    status: StatusRegister,
    logger: LogManager,
}

impl Motor {
    pub fn new(id: u8) -> Self {
        Self {
            id,
            speed_percent: 0,
            status: StatusRegister::from_bits(StatusRegister::POWER_ON),
            logger: LogManager::for_channel(format!("motor-{}", id)),
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn speed_percent(&self) -> u8 {
        self.speed_percent
    }

    pub fn status(&self) -> StatusRegister {
        self.status
    }

    /// Applies a speed command, clamping anything above 100 %. Returns the applied speed.
    pub fn set_speed(&mut self, requested: u8) -> u8 {
        let applied = if requested > MAX_SPEED_PERCENT {
            self.logger.warn(&format!(
                "speed clamped to {}% (input was {})",
                MAX_SPEED_PERCENT, requested
            ));
            MAX_SPEED_PERCENT
        } else {
            requested
        };
        self.speed_percent = applied;
        self.status.write(StatusRegister::ENABLED, applied > 0);
        self.logger.detail(&format!("set to {}%", applied));
        applied
    }

    /// Steps through [`ramp_profile`], leaving the motor at the final speed.
    pub fn ramp_to(&mut self, target: u8, steps: u8) -> Vec<u8> {
        let profile = ramp_profile(target, steps);
        if let Some(&last) = profile.last() {
            self.set_speed(last);
        }
        profile
    }

    /// Mirrors a classified device state onto the motor output.
    pub fn follow_state(&mut self, state: DeviceState, cruise_percent: u8) {
        match state {
            DeviceState::On => {
                self.status.clear(StatusRegister::INTERRUPT);
                self.set_speed(cruise_percent);
            }
            DeviceState::Blinking => {
                self.status.clear(StatusRegister::INTERRUPT);
                self.set_speed(cruise_percent / 2);
            }
            DeviceState::Off => {
                self.set_speed(0);
            }
            DeviceState::Error => {
                self.set_speed(0);
                self.status.set(StatusRegister::INTERRUPT);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_above_limit_is_clamped() {
        let mut motor = Motor::new(2);
        assert_eq!(motor.id(), 2);
        assert_eq!(motor.set_speed(150), 100);
        assert_eq!(motor.speed_percent(), 100);
        assert!(motor.status().enabled());
        assert_eq!(motor.set_speed(50), 50);
    }

    #[test]
    fn ramp_profile_includes_both_ends() {
        assert_eq!(ramp_profile(100, 5), vec![0, 20, 40, 60, 80, 100]);
        assert_eq!(ramp_profile(10, 3), vec![0, 3, 6, 10]);
        assert_eq!(ramp_profile(70, 0), vec![70]);
        assert_eq!(ramp_profile(200, 2), vec![0, 50, 100]);
    }

    #[test]
    fn ramp_leaves_motor_at_target() {
        let mut motor = Motor::new(0);
        motor.ramp_to(60, 4);
        assert_eq!(motor.speed_percent(), 60);
    }

    #[test]
    fn error_state_stops_motor_and_raises_interrupt() {
        let mut motor = Motor::new(1);
        motor.follow_state(DeviceState::On, 80);
        assert_eq!(motor.speed_percent(), 80);

        motor.follow_state(DeviceState::Error, 80);
        assert_eq!(motor.speed_percent(), 0);
        assert!(!motor.status().enabled());
        assert!(motor.status().interrupt_pending());
        assert!(motor.status().power_on());

        motor.follow_state(DeviceState::Blinking, 80);
        assert_eq!(motor.speed_percent(), 40);
        assert!(!motor.status().interrupt_pending());
    }
}
