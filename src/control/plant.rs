//! Room thermal model.
//!
//! First-order linear recurrence for the room temperature one simulated
//! minute ahead, given CRAC power, server heat load and outside temperature.
//! The 0.9 self-coefficient makes it stable: for fixed inputs it converges
//! to [`equilibrium`].

/// Weight of the current temperature.
pub const K_TEMP: f32 = 0.9;
/// Cooling per % of CRAC power.
pub const K_POWER: f32 = 0.08;
/// Heating per unit of server heat load.
pub const K_HEAT: f32 = 0.05;
/// Coupling to the outside temperature.
pub const K_EXTERNAL: f32 = 0.02;
/// Constant gains (lighting, people, envelope).
pub const OFFSET: f32 = 3.5;

/// Temperature one tick ahead.
pub fn next_temperature(temperature: f32, power: f32, external_heat: f32, external_temp: f32) -> f32 {
    K_TEMP * temperature - K_POWER * power + K_HEAT * external_heat + K_EXTERNAL * external_temp + OFFSET
}

/// Fixed point of [`next_temperature`] for constant inputs.
pub fn equilibrium(power: f32, external_heat: f32, external_temp: f32) -> f32 {
    (-K_POWER * power + K_HEAT * external_heat + K_EXTERNAL * external_temp + OFFSET) / (1.0 - K_TEMP)
}

/// Fire-mode override: with oxygen cut the fire is suppressed and the room
/// cools by `suppression`; otherwise combustion heats it by `combustion`.
pub fn fire_step(temperature: f32, oxygen_open: bool, suppression: f32, combustion: f32) -> f32 {
    if oxygen_open {
        temperature + combustion
    } else {
        temperature - suppression
    }
}
